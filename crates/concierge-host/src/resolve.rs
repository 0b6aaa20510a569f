//! Element resolution with fallbacks for agent-supplied selectors
//!
//! Agent-produced selectors are frequently stale or guessed, so a plain
//! `querySelector` miss is not final. Resolution order, first match wins:
//! exact selector, keyword against `name`/`id`/`placeholder` on input-like
//! elements, label-text association, and (for clicks) visible-text matching.

use crate::dom::{DomAccessor, NodeId};

/// Strip selector sigils (`#`, `.`) to get a keyword for attribute and
/// label matching.
pub fn keyword_of(selector: &str) -> &str {
    selector.trim().trim_start_matches(['#', '.'])
}

/// Resolve an input-like element: exact selector, then keyword against
/// `name`, `id`, case-insensitive `placeholder` substring, then a label
/// whose text contains the keyword.
pub fn resolve_input<D: DomAccessor>(dom: &D, selector: &str) -> Option<NodeId> {
    if let Some(node) = dom.query(selector) {
        return Some(node);
    }

    let keyword = keyword_of(selector);
    if keyword.is_empty() {
        return None;
    }
    let keyword_lower = keyword.to_lowercase();

    let inputs = dom.input_like();
    for attr in ["name", "id"] {
        if let Some(node) = inputs
            .iter()
            .copied()
            .find(|&n| dom.attr(n, attr).as_deref() == Some(keyword))
        {
            return Some(node);
        }
    }
    if let Some(node) = inputs.iter().copied().find(|&n| {
        dom.attr(n, "placeholder")
            .is_some_and(|p| p.to_lowercase().contains(&keyword_lower))
    }) {
        return Some(node);
    }

    dom.labels()
        .into_iter()
        .find(|&label| dom.text(label).to_lowercase().contains(&keyword_lower))
        .and_then(|label| dom.label_target(label))
}

/// Resolve by visible text: equality against clickable elements, then
/// substring against clickable elements, then substring across everything.
pub fn resolve_by_text<D: DomAccessor>(dom: &D, text: &str) -> Option<NodeId> {
    let needle = text.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    let clickable = dom.clickable();
    if let Some(node) = clickable
        .iter()
        .copied()
        .find(|&n| dom.text(n).to_lowercase() == needle)
    {
        return Some(node);
    }
    if let Some(node) = clickable
        .iter()
        .copied()
        .find(|&n| dom.text(n).to_lowercase().contains(&needle))
    {
        return Some(node);
    }
    dom.all_nodes()
        .into_iter()
        .find(|&n| !dom.text(n).is_empty() && dom.text(n).to_lowercase().contains(&needle))
}

/// Resolution for click commands: the selector chain when a selector is
/// given, text matching when one is not (or the chain came up empty and a
/// text fallback exists).
pub fn resolve_click<D: DomAccessor>(
    dom: &D,
    selector: Option<&str>,
    text_fallback: Option<&str>,
) -> Option<NodeId> {
    if let Some(selector) = selector {
        if let Some(node) = resolve_input(dom, selector) {
            return Some(node);
        }
    }
    text_fallback.and_then(|text| resolve_by_text(dom, text))
}

/// Resolution for hover/scroll targets: the input chain, then the keyword
/// treated as visible text.
pub fn resolve_any<D: DomAccessor>(dom: &D, selector: &str) -> Option<NodeId> {
    resolve_input(dom, selector).or_else(|| resolve_by_text(dom, keyword_of(selector)))
}
