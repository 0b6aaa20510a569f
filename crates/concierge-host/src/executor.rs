//! Executes agent action commands against the host page

use concierge_bridge::{ActionCommand, FormField, ScrollTarget};
use serde::Serialize;

use crate::dom::{DomAccessor, DomEvent, ScrollBehavior};
use crate::error::{Error, Result};
use crate::resolve;

/// Relative scroll applied when a scroll command names no target.
const DEFAULT_SCROLL_STEP: f64 = 600.0;

/// Per-field report for a form fill.
#[derive(Debug, Clone, Serialize)]
pub struct FieldOutcome {
    pub selector: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Result of executing one action command. The executor always returns an
/// outcome; failures never cross the boundary as panics or errors.
#[derive(Debug, Clone, Serialize)]
pub struct ActionOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldOutcome>,
}

impl ActionOutcome {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            fields: Vec::new(),
        }
    }
}

/// Performs action commands on the live page through a [`DomAccessor`].
pub struct ActionExecutor<D: DomAccessor> {
    dom: D,
}

impl<D: DomAccessor> ActionExecutor<D> {
    pub fn new(dom: D) -> Self {
        Self { dom }
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    /// Execute one command, reporting success or failure. DOM exceptions
    /// and resolution misses become failure outcomes, never panics.
    pub fn execute(&mut self, command: &ActionCommand) -> ActionOutcome {
        let result = match command {
            ActionCommand::Fill { selector, value } => self.fill(selector, value),
            ActionCommand::Click {
                selector,
                text_fallback,
            } => self.click(selector.as_deref(), text_fallback.as_deref()),
            ActionCommand::Scroll { selector, target } => {
                self.scroll(selector.as_deref(), target.as_ref())
            }
            ActionCommand::Navigate { url } => self.navigate(url),
            ActionCommand::Hover { selector } => self.hover(selector),
            ActionCommand::FillForm { fields } => Ok(self.fill_form(fields)),
        };

        match result {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(kind = command.kind(), error = %e, "action failed");
                ActionOutcome::failed(format!("{} failed: {}", command.kind(), e))
            }
        }
    }

    fn fill(&mut self, selector: &str, value: &str) -> Result<ActionOutcome> {
        self.fill_node(selector, value)?;
        Ok(ActionOutcome::ok(format!("filled {}", selector)))
    }

    /// Shared fill path: resolve, focus, native value set, then `input`,
    /// `change`, `blur` in that order so reactive frameworks and host-page
    /// validation observe the update.
    fn fill_node(&mut self, selector: &str, value: &str) -> Result<()> {
        let node = resolve::resolve_input(&self.dom, selector)
            .ok_or_else(|| Error::NotFound(selector.to_string()))?;
        self.dom.highlight(node);
        self.dom.focus(node)?;
        self.dom.set_value(node, value)?;
        for event in [DomEvent::Input, DomEvent::Change, DomEvent::Blur] {
            self.dom.dispatch(node, event)?;
        }
        Ok(())
    }

    fn click(&mut self, selector: Option<&str>, text: Option<&str>) -> Result<ActionOutcome> {
        let node = resolve::resolve_click(&self.dom, selector, text).ok_or_else(|| {
            Error::NotFound(
                selector
                    .or(text)
                    .unwrap_or("(no selector or text)")
                    .to_string(),
            )
        })?;
        self.dom.highlight(node);
        self.dom.click(node)?;
        self.dom.focus(node)?;
        Ok(ActionOutcome::ok("clicked"))
    }

    fn scroll(
        &mut self,
        selector: Option<&str>,
        target: Option<&ScrollTarget>,
    ) -> Result<ActionOutcome> {
        if let Some(selector) = selector {
            let node = resolve::resolve_any(&self.dom, selector)
                .ok_or_else(|| Error::NotFound(selector.to_string()))?;
            self.dom.scroll_into_view(node, ScrollBehavior::SmoothCenter)?;
            return Ok(ActionOutcome::ok(format!("scrolled to {}", selector)));
        }
        match target {
            Some(ScrollTarget::Anchor(anchor)) => self.dom.scroll_to_anchor(*anchor)?,
            Some(ScrollTarget::Position { x, y }) => self.dom.scroll_to(*x, *y)?,
            None => self.dom.scroll_by(0.0, DEFAULT_SCROLL_STEP)?,
        }
        Ok(ActionOutcome::ok("scrolled"))
    }

    fn navigate(&mut self, url: &str) -> Result<ActionOutcome> {
        self.dom.navigate(url)?;
        Ok(ActionOutcome::ok(format!("navigating to {}", url)))
    }

    fn hover(&mut self, selector: &str) -> Result<ActionOutcome> {
        let node = resolve::resolve_any(&self.dom, selector)
            .ok_or_else(|| Error::NotFound(selector.to_string()))?;
        self.dom.dispatch(node, DomEvent::MouseOver)?;
        self.dom.scroll_into_view(node, ScrollBehavior::Nearest)?;
        Ok(ActionOutcome::ok(format!("hovering {}", selector)))
    }

    /// Fill fields in order, collecting a per-field report. Executes
    /// immediately; confirmation, if wanted, is gated by the embedder.
    fn fill_form(&mut self, fields: &[FormField]) -> ActionOutcome {
        let mut outcomes = Vec::with_capacity(fields.len());
        for field in fields {
            match self.fill_node(&field.selector, &field.value) {
                Ok(()) => outcomes.push(FieldOutcome {
                    selector: field.selector.clone(),
                    success: true,
                    message: None,
                }),
                Err(e) => {
                    tracing::warn!(selector = %field.selector, error = %e, "form field failed");
                    outcomes.push(FieldOutcome {
                        selector: field.selector.clone(),
                        success: false,
                        message: Some(e.to_string()),
                    });
                }
            }
        }
        let success = outcomes.iter().all(|f| f.success);
        let filled = outcomes.iter().filter(|f| f.success).count();
        ActionOutcome {
            success,
            message: format!("filled {}/{} fields", filled, outcomes.len()),
            fields: outcomes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeDom;
    use concierge_bridge::ScrollAnchor;

    fn executor(dom: FakeDom) -> ActionExecutor<FakeDom> {
        ActionExecutor::new(dom)
    }

    #[test]
    fn test_fill_missing_selector_fails_without_panicking() {
        let mut exec = executor(FakeDom::new("https://example.com/"));
        let outcome = exec.execute(&ActionCommand::Fill {
            selector: "#missing".into(),
            value: "x".into(),
        });
        assert!(!outcome.success);
        assert!(outcome.message.contains("element not found"));
    }

    #[test]
    fn test_fill_dispatches_input_change_blur_once_each() {
        let mut dom = FakeDom::new("https://example.com/");
        let node = dom.add_input(Some("#name"), None, None, None);
        let mut exec = executor(dom);
        let outcome = exec.execute(&ActionCommand::Fill {
            selector: "#name".into(),
            value: "Ada".into(),
        });
        assert!(outcome.success);
        assert_eq!(exec.dom().nodes[node].value, "Ada");
        assert_eq!(
            exec.dom().log,
            vec![
                format!("highlight:{}", node),
                format!("focus:{}", node),
                format!("set_value:{}=Ada", node),
                format!("event:{}:input", node),
                format!("event:{}:change", node),
                format!("event:{}:blur", node),
            ]
        );
    }

    #[test]
    fn test_click_then_focus() {
        let mut dom = FakeDom::new("https://example.com/");
        let node = dom.add_button(Some("#buy"), "Buy");
        let mut exec = executor(dom);
        let outcome = exec.execute(&ActionCommand::Click {
            selector: Some("#buy".into()),
            text_fallback: None,
        });
        assert!(outcome.success);
        assert_eq!(
            exec.dom().log,
            vec![
                format!("highlight:{}", node),
                format!("click:{}", node),
                format!("focus:{}", node),
            ]
        );
    }

    #[test]
    fn test_click_by_text_only() {
        let mut dom = FakeDom::new("https://example.com/");
        let node = dom.add_link("Contact us");
        let mut exec = executor(dom);
        let outcome = exec.execute(&ActionCommand::Click {
            selector: None,
            text_fallback: Some("Contact us".into()),
        });
        assert!(outcome.success);
        assert!(exec.dom().log.contains(&format!("click:{}", node)));
    }

    #[test]
    fn test_scroll_element_is_smooth_centered() {
        let mut dom = FakeDom::new("https://example.com/");
        let node = dom.add_div("Reviews");
        let mut exec = executor(dom);
        let outcome = exec.execute(&ActionCommand::Scroll {
            selector: Some("reviews".into()),
            target: None,
        });
        assert!(outcome.success);
        assert_eq!(exec.dom().log, vec![format!("scroll_into_view:{}:center", node)]);
    }

    #[test]
    fn test_scroll_anchor_and_default() {
        let mut exec = executor(FakeDom::new("https://example.com/"));
        exec.execute(&ActionCommand::Scroll {
            selector: None,
            target: Some(ScrollTarget::Anchor(ScrollAnchor::Bottom)),
        });
        exec.execute(&ActionCommand::Scroll {
            selector: None,
            target: None,
        });
        assert_eq!(
            exec.dom().log,
            vec![
                "scroll_anchor:bottom".to_string(),
                format!("scroll_by:0,{}", DEFAULT_SCROLL_STEP),
            ]
        );
    }

    #[test]
    fn test_hover_dispatches_mouseover_then_scrolls_nearest() {
        let mut dom = FakeDom::new("https://example.com/");
        let node = dom.add_button(Some(".menu"), "Menu");
        let mut exec = executor(dom);
        let outcome = exec.execute(&ActionCommand::Hover {
            selector: ".menu".into(),
        });
        assert!(outcome.success);
        assert_eq!(
            exec.dom().log,
            vec![
                format!("event:{}:mouseover", node),
                format!("scroll_into_view:{}:nearest", node),
            ]
        );
    }

    #[test]
    fn test_navigate() {
        let mut exec = executor(FakeDom::new("https://example.com/"));
        let outcome = exec.execute(&ActionCommand::Navigate {
            url: "https://example.com/pricing".into(),
        });
        assert!(outcome.success);
        assert_eq!(
            exec.dom().log,
            vec!["navigate:https://example.com/pricing".to_string()]
        );
    }

    #[test]
    fn test_fill_form_reports_per_field() {
        let mut dom = FakeDom::new("https://example.com/");
        dom.add_input(Some("#name"), None, None, None);
        let mut exec = executor(dom);
        let outcome = exec.execute(&ActionCommand::FillForm {
            fields: vec![
                FormField {
                    selector: "#name".into(),
                    value: "Ada".into(),
                },
                FormField {
                    selector: "#missing".into(),
                    value: "x".into(),
                },
            ],
        });
        assert!(!outcome.success);
        assert_eq!(outcome.fields.len(), 2);
        assert!(outcome.fields[0].success);
        assert!(!outcome.fields[1].success);
        assert_eq!(outcome.message, "filled 1/2 fields");
    }

    #[test]
    fn test_dom_exception_becomes_failure_outcome() {
        let mut dom = FakeDom::new("https://example.com/");
        let node = dom.add_input(Some("#name"), None, None, None);
        dom.set_failing(node);
        let mut exec = executor(dom);
        let outcome = exec.execute(&ActionCommand::Fill {
            selector: "#name".into(),
            value: "Ada".into(),
        });
        assert!(!outcome.success);
        assert!(outcome.message.contains("DOM operation failed"));
    }
}
