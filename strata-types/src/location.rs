//! Addressing of files and folders inside a SharePoint site.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::StrataError;

/// A file or folder URL split into the site it belongs to and its
/// server-relative path.
///
/// ```
/// use strata_types::DocumentLocation;
///
/// let loc = DocumentLocation::parse(
///     "https://contoso.sharepoint.com/sites/Plant%20Ops/Shared%20Documents/Sensors",
///     "Plant Ops",
/// )
/// .unwrap();
/// assert_eq!(loc.site_url().as_str(), "https://contoso.sharepoint.com/sites/Plant%20Ops/");
/// assert_eq!(loc.server_relative_path(), "/sites/Plant Ops/Shared Documents/Sensors");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentLocation {
    site_url: Url,
    server_relative_path: String,
}

impl DocumentLocation {
    /// Split `location` at the path segment named `project`.
    ///
    /// The server-relative path is percent-decoded segment by segment. The site
    /// URL stays encoded; it keeps the origin and every segment up to and
    /// including `project`, and ends with `/`.
    ///
    /// # Errors
    /// Returns `InvalidArg` if `location` is not an absolute URL, a segment
    /// does not decode to UTF-8, or no path segment equals `project`.
    pub fn parse(location: &str, project: &str) -> Result<Self, StrataError> {
        let url = Url::parse(location.trim())
            .map_err(|e| StrataError::InvalidArg(format!("invalid location {location:?}: {e}")))?;
        if url.cannot_be_a_base() {
            return Err(StrataError::InvalidArg(format!(
                "location {location:?} has no path"
            )));
        }

        let raw: Vec<&str> = url.path().trim_end_matches('/').split('/').collect();
        let segments = raw
            .iter()
            .map(|s| {
                urlencoding::decode(s).map(Cow::into_owned).map_err(|e| {
                    StrataError::InvalidArg(format!("location {location:?} is not UTF-8: {e}"))
                })
            })
            .collect::<Result<Vec<String>, _>>()?;
        let project_at = segments
            .iter()
            .position(|s| !s.is_empty() && *s == project)
            .ok_or_else(|| {
                StrataError::InvalidArg(format!(
                    "project {project:?} is not part of location {location:?}"
                ))
            })?;

        let site_path = raw[..=project_at].join("/");
        let site = format!("{}{site_path}/", url.origin().ascii_serialization());
        let site_url = Url::parse(&site)
            .map_err(|e| StrataError::InvalidArg(format!("invalid site url {site:?}: {e}")))?;

        Ok(Self {
            site_url,
            server_relative_path: segments.join("/"),
        })
    }

    /// URL of the site (web) that owns the location, ending with `/`.
    #[must_use]
    pub const fn site_url(&self) -> &Url {
        &self.site_url
    }

    /// Path of the file or folder relative to the server root.
    #[must_use]
    pub fn server_relative_path(&self) -> &str {
        &self.server_relative_path
    }
}
