//! Tool-invocation markup stripping
//!
//! The backing agent interleaves tool-call markup with answer text. Matched
//! spans for the known tool tags are cut wherever they appear; stray
//! generic tags are only cleaned from final-output text.

use regex::Regex;
use std::sync::LazyLock;

/// Tool tags whose whole `<tag>…</tag>` spans are removed, content included.
const TOOL_TAGS: &[&str] = &[
    "search_web",
    "scrape_webpage",
    "fill_form",
    "click",
    "tool_code",
    "tool_output",
];

static TOOL_SPAN_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = TOOL_TAGS
        .iter()
        .map(|tag| format!("<{tag}>.*?</{tag}>"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("(?s){alternation}")).expect("static pattern")
});

/// A known tool tag opened but never closed (stream cut mid-invocation).
static TOOL_OPEN_TO_END_RE: LazyLock<Regex> = LazyLock::new(|| {
    let names = TOOL_TAGS.join("|");
    Regex::new(&format!("(?s)<(?:{names})>.*$")).expect("static pattern")
});

/// Any leftover `<tag>` / `</tag>` marker (tag only, content kept).
static GENERIC_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[A-Za-z_][A-Za-z0-9_]*>").expect("static pattern"));

/// Remove matched tool-tag spans, including their content.
pub fn strip_tool_spans(text: &str) -> String {
    TOOL_SPAN_RE.replace_all(text, "").into_owned()
}

/// Remove remaining generic tag markers. Final-output text only.
pub fn strip_generic_tags(text: &str) -> String {
    GENERIC_TAG_RE.replace_all(text, "").into_owned()
}

/// Whether the text carries no real content once tool markup is removed.
/// An unterminated known tool tag counts as markup to the end of the text.
/// Used to decide if an authoritative final output may overwrite the
/// streamed text.
pub fn is_tool_markup_only(text: &str) -> bool {
    let without_spans = strip_tool_spans(text);
    let without_cut = TOOL_OPEN_TO_END_RE.replace(&without_spans, "");
    strip_generic_tags(&without_cut).trim().is_empty()
}
