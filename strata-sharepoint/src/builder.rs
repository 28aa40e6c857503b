use std::time::Duration;

use strata_core::{StrataError, Url};

use crate::SharePointStore;
use crate::adapter::{DEFAULT_AUTHORITY, RealAdapter};

/// Builder for a [`SharePointStore`] backed by the REST API.
#[derive(Debug, Clone)]
pub struct SharePointStoreBuilder {
    authority: String,
    timeout: Option<Duration>,
    client: Option<reqwest::Client>,
}

impl SharePointStore {
    /// Returns a builder with the public Azure AD authority and no timeout.
    #[must_use]
    pub fn builder() -> SharePointStoreBuilder {
        SharePointStoreBuilder {
            authority: DEFAULT_AUTHORITY.to_string(),
            timeout: None,
            client: None,
        }
    }
}

impl SharePointStoreBuilder {
    /// Token authority, e.g. a sovereign-cloud login host.
    #[must_use]
    pub fn authority(mut self, url: impl Into<String>) -> Self {
        self.authority = url.into();
        self
    }

    /// Per-request timeout. Ignored when a client is supplied.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use a preconfigured HTTP client (proxies, TLS roots).
    #[must_use]
    pub fn client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Build the store.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the authority is not a URL, and `Other` if the
    /// HTTP client cannot be constructed.
    pub fn build(self) -> Result<SharePointStore, StrataError> {
        let mut authority = Url::parse(&self.authority).map_err(|e| {
            StrataError::InvalidArg(format!("invalid authority {:?}: {e}", self.authority))
        })?;
        if !authority.path().ends_with('/') {
            let path = format!("{}/", authority.path());
            authority.set_path(&path);
        }
        let http = match self.client {
            Some(client) => client,
            None => {
                let mut builder = reqwest::Client::builder();
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                builder
                    .build()
                    .map_err(|e| StrataError::Other(format!("cannot build HTTP client: {e}")))?
            }
        };
        Ok(SharePointStore::from_adapter(&RealAdapter::new(
            http,
            authority.as_str(),
        )))
    }
}
