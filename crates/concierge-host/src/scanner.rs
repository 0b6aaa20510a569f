//! Site navigation scan shared with the backend for routing context

use concierge_bridge::NavLink;
use url::Url;

use crate::dom::DomAccessor;
use crate::error::Result;

/// Cap on collected links so the context sent upstream stays bounded.
const MAX_NAV_LINKS: usize = 50;

/// Collect the host page's internal navigation links: non-empty labels,
/// http(s) URLs on the page's own domain, deduplicated, at most
/// [`MAX_NAV_LINKS`] entries.
pub fn scan_site_navigation<D: DomAccessor>(dom: &D) -> Result<Vec<NavLink>> {
    let context = dom.page_context()?;
    let mut links = Vec::new();
    let mut seen = std::collections::HashSet::new();

    for anchor in dom.nav_anchors() {
        if links.len() >= MAX_NAV_LINKS {
            break;
        }
        let label = anchor.label.trim();
        if label.is_empty() {
            continue;
        }
        let lower = anchor.url.to_lowercase();
        if lower.starts_with("javascript:")
            || lower.starts_with("mailto:")
            || lower.starts_with("tel:")
        {
            continue;
        }
        let Ok(parsed) = Url::parse(&anchor.url) else {
            continue;
        };
        if parsed.host_str() != Some(context.domain.as_str()) {
            continue;
        }
        if !seen.insert(anchor.url.clone()) {
            continue;
        }
        links.push(NavLink {
            label: label.to_string(),
            url: anchor.url,
        });
    }

    Ok(links)
}
