//! Action commands issued by the remote agent against the host page

use serde::{Deserialize, Serialize};

/// One selector/value pair within a form fill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub selector: String,
    pub value: String,
}

/// Named scroll anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollAnchor {
    Top,
    Bottom,
}

/// Scroll destination: a named anchor ("top"/"bottom") or explicit
/// coordinates. Absent entirely means a default relative scroll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScrollTarget {
    Anchor(ScrollAnchor),
    Position { x: f64, y: f64 },
}

/// A DOM manipulation command for the host page to execute.
///
/// Commands are created by the remote agent and executed exactly once; the
/// executor treats resolution failures as reported no-ops, never panics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionCommand {
    /// Click an element located by selector, falling back to visible text.
    Click {
        #[serde(skip_serializing_if = "Option::is_none")]
        selector: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        text_fallback: Option<String>,
    },
    /// Fill a single input-like element.
    Fill { selector: String, value: String },
    /// Scroll an element into view, to an anchor, or by a default amount.
    Scroll {
        #[serde(skip_serializing_if = "Option::is_none")]
        selector: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        target: Option<ScrollTarget>,
    },
    /// Full page navigation. Destructive; gate upstream if needed.
    Navigate { url: String },
    /// Synthetic hover over an element.
    Hover { selector: String },
    /// Fill several fields in order.
    FillForm { fields: Vec<FormField> },
}

impl ActionCommand {
    /// Short human-readable label used in logs and status reporting.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Click { .. } => "click",
            Self::Fill { .. } => "fill",
            Self::Scroll { .. } => "scroll",
            Self::Navigate { .. } => "navigate",
            Self::Hover { .. } => "hover",
            Self::FillForm { .. } => "fill_form",
        }
    }
}
