//! strata-sharepoint
//!
//! Document store that implements the `strata_core` document traits on top
//! of the SharePoint REST API. Sessions authenticate with the resource-owner
//! password flow against Azure AD and download files by server-relative URL.
#![warn(missing_docs)]

/// Adapter definitions and the production adapter backed by `reqwest`.
pub mod adapter;
mod builder;

use std::sync::Arc;

use adapter::{CloneArcAdapters, RealAdapter, SpAuth, SpFiles};
use async_trait::async_trait;
use strata_core::{DocumentSession, DocumentStore, SharePointCredentials, StrataError, Url};

pub use builder::SharePointStoreBuilder;

/// Public document store. Construct with [`SharePointStore::new`] or
/// [`SharePointStore::builder`].
pub struct SharePointStore {
    auth: Arc<dyn SpAuth>,
    files: Arc<dyn SpFiles>,
}

impl Default for SharePointStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SharePointStore {
    /// Identifier used in logs and errors.
    pub const KEY: &'static str = "strata-sharepoint";

    fn looks_like_not_found(msg: &str) -> bool {
        let m = msg.to_ascii_lowercase();
        m.contains("not found")
            || m.contains("does not exist")
            || m.contains("filenotfoundexception")
    }

    fn normalize_error(e: StrataError, what: &str) -> StrataError {
        match e {
            StrataError::Query { msg, .. } | StrataError::Other(msg)
                if Self::looks_like_not_found(&msg) =>
            {
                StrataError::not_found(what.to_string())
            }
            StrataError::Other(msg) => StrataError::query(Self::KEY, msg),
            other => other,
        }
    }

    /// A store using the public Azure AD authority and a default HTTP client.
    #[must_use]
    pub fn new() -> Self {
        Self::from_adapter(&RealAdapter::new(
            reqwest::Client::new(),
            adapter::DEFAULT_AUTHORITY,
        ))
    }

    /// Build from any adapter provider; tests use this to inject fakes.
    pub fn from_adapter<A: CloneArcAdapters + ?Sized>(adapter: &A) -> Self {
        Self {
            auth: adapter.clone_arc_auth(),
            files: adapter.clone_arc_files(),
        }
    }
}

#[async_trait]
impl DocumentStore for SharePointStore {
    fn name(&self) -> &'static str {
        Self::KEY
    }

    async fn connect(
        &self,
        credentials: &SharePointCredentials,
        site_url: &Url,
    ) -> Result<Box<dyn DocumentSession>, StrataError> {
        let token = self.auth.token(credentials, site_url).await?;
        let title = self
            .files
            .web_title(site_url, &token)
            .await
            .map_err(|e| Self::normalize_error(e, &format!("site {site_url}")))?;
        #[cfg(feature = "tracing")]
        tracing::info!(site = %site_url, title = %title, "sharepoint session opened");
        #[cfg(not(feature = "tracing"))]
        let _ = title;
        Ok(Box::new(SharePointSession {
            files: Arc::clone(&self.files),
            site: site_url.clone(),
            token,
        }))
    }
}

/// An authenticated session bound to one site.
struct SharePointSession {
    files: Arc<dyn SpFiles>,
    site: Url,
    token: String,
}

#[async_trait]
impl DocumentSession for SharePointSession {
    async fn list_folder(&self, folder: &str) -> Result<Vec<String>, StrataError> {
        self.files
            .list_files(&self.site, &self.token, folder)
            .await
            .map_err(|e| SharePointStore::normalize_error(e, &format!("folder {folder}")))
    }

    async fn open_file(&self, path: &str) -> Result<Vec<u8>, StrataError> {
        let bytes = self
            .files
            .download(&self.site, &self.token, path)
            .await
            .map_err(|e| SharePointStore::normalize_error(e, &format!("file {path}")))?;
        #[cfg(feature = "tracing")]
        tracing::debug!(path, bytes = bytes.len(), "file downloaded");
        Ok(bytes)
    }
}
