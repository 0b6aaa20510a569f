//! DOM capability trait injected into the executor
//!
//! The executor never touches a real document directly; everything goes
//! through [`DomAccessor`] so the resolution and execution logic can run
//! against an in-memory double in tests. A browser embedding implements the
//! trait over the live DOM (web-sys or an injected script layer).

use concierge_bridge::{NavLink, PageContext, ScrollAnchor};

use crate::error::Result;

/// Opaque handle to one element of the host document.
pub type NodeId = usize;

/// Synthetic events the executor dispatches after mutating a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomEvent {
    Input,
    Change,
    Blur,
    MouseOver,
}

impl DomEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Change => "change",
            Self::Blur => "blur",
            Self::MouseOver => "mouseover",
        }
    }
}

/// How an element is brought into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    /// Smooth scroll, element centered
    SmoothCenter,
    /// Nearest edge, no animation requirement
    Nearest,
}

/// Capability interface over the host document.
pub trait DomAccessor {
    /// Exact selector lookup.
    fn query(&self, selector: &str) -> Option<NodeId>;

    /// All input-like elements (inputs, textareas, selects).
    fn input_like(&self) -> Vec<NodeId>;

    /// All clickable elements (buttons, links).
    fn clickable(&self) -> Vec<NodeId>;

    /// Every element, for last-resort text searches.
    fn all_nodes(&self) -> Vec<NodeId>;

    /// All label elements.
    fn labels(&self) -> Vec<NodeId>;

    /// The control a label is associated with (`for=` or nested).
    fn label_target(&self, label: NodeId) -> Option<NodeId>;

    /// Anchor candidates found inside common navigation containers
    /// (nav, header, menu/nav classes and ids).
    fn nav_anchors(&self) -> Vec<NavLink>;

    /// Attribute value, e.g. `name`, `id`, `placeholder`.
    fn attr(&self, node: NodeId, name: &str) -> Option<String>;

    /// Visible text content, trimmed.
    fn text(&self, node: NodeId) -> String;

    /// Set an input's value through the platform's native value setter so
    /// frameworks that intercept the property still observe the change.
    fn set_value(&mut self, node: NodeId, value: &str) -> Result<()>;

    /// Dispatch a synthetic bubbling event on the node.
    fn dispatch(&mut self, node: NodeId, event: DomEvent) -> Result<()>;

    /// Invoke the node's click behavior.
    fn click(&mut self, node: NodeId) -> Result<()>;

    /// Focus the node.
    fn focus(&mut self, node: NodeId) -> Result<()>;

    /// Bring the node into view.
    fn scroll_into_view(&mut self, node: NodeId, behavior: ScrollBehavior) -> Result<()>;

    /// Briefly outline the node so the visitor sees what was acted on.
    /// Purely cosmetic; failures are not reported.
    fn highlight(&mut self, node: NodeId);

    /// Full page navigation.
    fn navigate(&mut self, url: &str) -> Result<()>;

    /// Scroll the viewport to absolute coordinates.
    fn scroll_to(&mut self, x: f64, y: f64) -> Result<()>;

    /// Scroll the viewport by a relative amount.
    fn scroll_by(&mut self, dx: f64, dy: f64) -> Result<()>;

    /// Scroll to the top or bottom of the document.
    fn scroll_to_anchor(&mut self, anchor: ScrollAnchor) -> Result<()>;

    /// Current URL/domain of the page.
    fn page_context(&self) -> Result<PageContext>;
}
