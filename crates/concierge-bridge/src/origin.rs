//! Origin allow-list applied on both ends of the channel

use url::Url;

use crate::error::{Error, Result};

/// Explicit allow-list of origins (scheme + host + port).
///
/// Both sending and receiving go through this policy. There is no implicit
/// wildcard; `OriginPolicy::any()` exists for tests and must be opted into.
#[derive(Debug, Clone)]
pub struct OriginPolicy {
    allowed: Vec<url::Origin>,
    allow_any: bool,
}

impl OriginPolicy {
    /// Build a policy from origin strings, e.g. `["https://example.com"]`.
    pub fn allow_list<I, S>(origins: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut allowed = Vec::new();
        for origin in origins {
            allowed.push(parse_origin(origin.as_ref())?);
        }
        Ok(Self {
            allowed,
            allow_any: false,
        })
    }

    /// Accept every origin. Test use only; never ship this.
    pub fn any() -> Self {
        Self {
            allowed: Vec::new(),
            allow_any: true,
        }
    }

    /// Whether an origin string passes the policy.
    pub fn allows(&self, origin: &str) -> bool {
        if self.allow_any {
            return true;
        }
        match parse_origin(origin) {
            Ok(origin) => self.allowed.contains(&origin),
            Err(_) => false,
        }
    }

    /// Like [`allows`](Self::allows) but returns the policy error.
    pub fn check(&self, origin: &str) -> Result<()> {
        if self.allows(origin) {
            Ok(())
        } else {
            Err(Error::OriginNotAllowed(origin.to_string()))
        }
    }
}

fn parse_origin(origin: &str) -> Result<url::Origin> {
    let url = Url::parse(origin).map_err(|_| Error::InvalidOrigin(origin.to_string()))?;
    let origin = url.origin();
    if !origin.is_tuple() {
        return Err(Error::InvalidOrigin(url.to_string()));
    }
    Ok(origin)
}
