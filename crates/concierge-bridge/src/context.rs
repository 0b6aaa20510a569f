//! Page context shared from the host page to the widget

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// Where the host page currently is. Produced by the host on iframe load,
/// consumed by the widget and echoed back to the backend with each turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContext {
    /// Full URL of the host page
    pub url: String,
    /// Hostname of the host page
    pub domain: String,
}

impl PageContext {
    /// Build a context from a full URL, deriving the domain from it.
    pub fn from_url(url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        let parsed = Url::parse(&url).map_err(|_| Error::InvalidUrl(url.clone()))?;
        let domain = parsed
            .host_str()
            .ok_or_else(|| Error::InvalidUrl(url.clone()))?
            .to_string();
        Ok(Self { url, domain })
    }

    /// The origin (scheme + host + port) of this page.
    pub fn origin(&self) -> Result<url::Origin> {
        let parsed = Url::parse(&self.url).map_err(|_| Error::InvalidUrl(self.url.clone()))?;
        Ok(parsed.origin())
    }
}

/// One navigation link discovered on the host page. The scanner produces
/// these; the widget forwards them to the backend as `site_navigation`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    pub label: String,
    pub url: String,
}
