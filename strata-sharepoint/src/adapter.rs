#[cfg(feature = "test-adapters")]
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use strata_core::{SharePointCredentials, StrataError, Url};

use crate::SharePointStore;

/// Default Azure AD authority.
pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com/";

/// Token acquisition abstraction (so we can inject mocks in tests).
#[async_trait]
pub trait SpAuth: Send + Sync {
    /// Exchange user credentials for a bearer token scoped to `site`'s tenant.
    async fn token(
        &self,
        credentials: &SharePointCredentials,
        site: &Url,
    ) -> Result<String, StrataError>;
}

/// Document library REST abstraction.
#[async_trait]
pub trait SpFiles: Send + Sync {
    /// Title of the web at `site`; used to check the site is reachable.
    async fn web_title(&self, site: &Url, token: &str) -> Result<String, StrataError>;

    /// Server-relative URLs of the files directly inside `folder`.
    async fn list_files(
        &self,
        site: &Url,
        token: &str,
        folder: &str,
    ) -> Result<Vec<String>, StrataError>;

    /// Raw contents of the file at `path`.
    async fn download(&self, site: &Url, token: &str, path: &str) -> Result<Vec<u8>, StrataError>;
}

/// Production adapter talking to Azure AD and the SharePoint REST API.
#[derive(Clone)]
pub struct RealAdapter {
    http: reqwest::Client,
    authority: String,
}

impl RealAdapter {
    /// Wrap an HTTP client. `authority` must end with `/`.
    #[must_use]
    pub fn new(http: reqwest::Client, authority: impl Into<String>) -> Self {
        Self {
            http,
            authority: authority.into(),
        }
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Deserialize)]
struct Web {
    #[serde(rename = "Title")]
    title: String,
}

#[derive(Deserialize)]
struct FileList {
    value: Vec<FileEntry>,
}

#[derive(Deserialize)]
struct FileEntry {
    #[serde(rename = "ServerRelativeUrl")]
    server_relative_url: String,
}

/// Quote `path` as an OData string literal usable inside a URL path.
pub(crate) fn odata_literal(path: &str) -> String {
    let escaped = path
        .replace('%', "%25")
        .replace('#', "%23")
        .replace('?', "%3F")
        .replace('\'', "''");
    format!("'{escaped}'")
}

fn endpoint(site: &Url, tail: &str) -> Result<Url, StrataError> {
    site.join(tail).map_err(|e| {
        StrataError::InvalidArg(format!("invalid endpoint {tail:?} under {site}: {e}"))
    })
}

fn transport(e: &reqwest::Error) -> StrataError {
    StrataError::connection(SharePointStore::KEY, e.to_string())
}

fn map_status(status: reqwest::StatusCode, what: &str, body: &str) -> StrataError {
    match status.as_u16() {
        404 => StrataError::not_found(what.to_string()),
        401 | 403 => StrataError::connection(
            SharePointStore::KEY,
            format!("access to {what} denied ({status})"),
        ),
        429 | 500..=599 => StrataError::connection(
            SharePointStore::KEY,
            format!("{what}: server answered {status}: {body}"),
        ),
        _ => StrataError::query(SharePointStore::KEY, format!("{what}: {status}: {body}")),
    }
}

impl RealAdapter {
    async fn get(
        &self,
        url: Url,
        token: &str,
        what: &str,
    ) -> Result<reqwest::Response, StrataError> {
        let resp = self
            .http
            .get(url)
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/json;odata=nometadata")
            .send()
            .await
            .map_err(|e| transport(&e))?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(map_status(status, what, &body))
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: Url,
        token: &str,
        what: &str,
    ) -> Result<T, StrataError> {
        let text = self
            .get(url, token, what)
            .await?
            .text()
            .await
            .map_err(|e| transport(&e))?;
        serde_json::from_str(&text).map_err(|e| StrataError::decode(what, e.to_string()))
    }
}

#[async_trait]
impl SpAuth for RealAdapter {
    async fn token(
        &self,
        credentials: &SharePointCredentials,
        site: &Url,
    ) -> Result<String, StrataError> {
        let raw = format!("{}{}/oauth2/v2.0/token", self.authority, credentials.tenant);
        let url = Url::parse(&raw)
            .map_err(|e| StrataError::InvalidArg(format!("invalid token endpoint {raw:?}: {e}")))?;
        let scope = format!("{}/.default", site.origin().ascii_serialization());
        let form = [
            ("grant_type", "password"),
            ("client_id", credentials.client_id.as_str()),
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
            ("scope", scope.as_str()),
        ];
        let resp = self
            .http
            .post(url)
            .form(&form)
            .send()
            .await
            .map_err(|e| transport(&e))?;
        let status = resp.status();
        let text = resp.text().await.map_err(|e| transport(&e))?;
        let parsed: TokenResponse = serde_json::from_str(&text).map_err(|e| {
            StrataError::connection(
                SharePointStore::KEY,
                format!("unreadable token response ({status}): {e}"),
            )
        })?;
        match parsed.access_token {
            Some(token) if status.is_success() => Ok(token),
            _ => Err(StrataError::connection(
                SharePointStore::KEY,
                format!(
                    "authentication failed for {}: {}: {}",
                    credentials.username,
                    parsed.error.as_deref().unwrap_or("unknown_error"),
                    parsed.error_description.as_deref().unwrap_or("no description"),
                ),
            )),
        }
    }
}

#[async_trait]
impl SpFiles for RealAdapter {
    async fn web_title(&self, site: &Url, token: &str) -> Result<String, StrataError> {
        let url = endpoint(site, "_api/web?$select=Title")?;
        let web: Web = self.get_json(url, token, &format!("site {site}")).await?;
        Ok(web.title)
    }

    async fn list_files(
        &self,
        site: &Url,
        token: &str,
        folder: &str,
    ) -> Result<Vec<String>, StrataError> {
        let url = endpoint(
            site,
            &format!(
                "_api/web/GetFolderByServerRelativeUrl({})/Files?$select=ServerRelativeUrl",
                odata_literal(folder)
            ),
        )?;
        let list: FileList = self.get_json(url, token, &format!("folder {folder}")).await?;
        Ok(list
            .value
            .into_iter()
            .map(|f| f.server_relative_url)
            .collect())
    }

    async fn download(&self, site: &Url, token: &str, path: &str) -> Result<Vec<u8>, StrataError> {
        let url = endpoint(
            site,
            &format!("_api/web/GetFileByServerRelativeUrl({})/$value", odata_literal(path)),
        )?;
        let bytes = self
            .get(url, token, &format!("file {path}"))
            .await?
            .bytes()
            .await
            .map_err(|e| transport(&e))?;
        Ok(bytes.to_vec())
    }
}

/// Supplies the adapters a [`SharePointStore`] is built from.
pub trait CloneArcAdapters {
    /// Clone as `Arc<dyn SpAuth>`.
    fn clone_arc_auth(&self) -> std::sync::Arc<dyn SpAuth>;
    /// Clone as `Arc<dyn SpFiles>`.
    fn clone_arc_files(&self) -> std::sync::Arc<dyn SpFiles>;
}

impl CloneArcAdapters for RealAdapter {
    fn clone_arc_auth(&self) -> std::sync::Arc<dyn SpAuth> {
        std::sync::Arc::new(self.clone())
    }
    fn clone_arc_files(&self) -> std::sync::Arc<dyn SpFiles> {
        std::sync::Arc::new(self.clone())
    }
}

#[cfg(feature = "test-adapters")]
impl dyn SpAuth {
    /// Build an `SpAuth` from a closure (tests only).
    pub fn from_fn<F>(f: F) -> Arc<dyn SpAuth>
    where
        F: Send + Sync + 'static + Fn(&SharePointCredentials, &Url) -> Result<String, StrataError>,
    {
        struct FnAuth<F>(F);
        #[async_trait]
        impl<F> SpAuth for FnAuth<F>
        where
            F: Send
                + Sync
                + 'static
                + Fn(&SharePointCredentials, &Url) -> Result<String, StrataError>,
        {
            async fn token(
                &self,
                credentials: &SharePointCredentials,
                site: &Url,
            ) -> Result<String, StrataError> {
                (self.0)(credentials, site)
            }
        }
        Arc::new(FnAuth(f))
    }
}

#[cfg(feature = "test-adapters")]
impl dyn SpFiles {
    /// Build an `SpFiles` from listing and download closures (tests only).
    ///
    /// `web_title` always succeeds.
    pub fn from_fns<L, D>(list: L, download: D) -> Arc<dyn SpFiles>
    where
        L: Send + Sync + 'static + Fn(&str) -> Result<Vec<String>, StrataError>,
        D: Send + Sync + 'static + Fn(&str) -> Result<Vec<u8>, StrataError>,
    {
        struct FnFiles<L, D> {
            list: L,
            download: D,
        }
        #[async_trait]
        impl<L, D> SpFiles for FnFiles<L, D>
        where
            L: Send + Sync + 'static + Fn(&str) -> Result<Vec<String>, StrataError>,
            D: Send + Sync + 'static + Fn(&str) -> Result<Vec<u8>, StrataError>,
        {
            async fn web_title(&self, _site: &Url, _token: &str) -> Result<String, StrataError> {
                Ok("test".to_string())
            }
            async fn list_files(
                &self,
                _site: &Url,
                _token: &str,
                folder: &str,
            ) -> Result<Vec<String>, StrataError> {
                (self.list)(folder)
            }
            async fn download(
                &self,
                _site: &Url,
                _token: &str,
                path: &str,
            ) -> Result<Vec<u8>, StrataError> {
                (self.download)(path)
            }
        }
        Arc::new(FnFiles { list, download })
    }
}
