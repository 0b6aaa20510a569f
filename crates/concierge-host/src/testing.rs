//! In-memory DOM double shared by the crate's unit tests.

use std::collections::HashMap;

use concierge_bridge::{NavLink, PageContext, ScrollAnchor};

use crate::dom::{DomAccessor, DomEvent, NodeId, ScrollBehavior};
use crate::error::{Error, Result};

pub(crate) struct FakeNode {
    pub selector: Option<String>,
    pub tag: &'static str,
    pub name: Option<String>,
    pub id: Option<String>,
    pub placeholder: Option<String>,
    pub text: String,
    pub value: String,
    /// Simulate a node whose native operations throw.
    pub fail_ops: bool,
}

impl FakeNode {
    fn new(tag: &'static str) -> Self {
        Self {
            selector: None,
            tag,
            name: None,
            id: None,
            placeholder: None,
            text: String::new(),
            value: String::new(),
            fail_ops: false,
        }
    }
}

/// Deterministic [`DomAccessor`] recording every operation in order.
pub(crate) struct FakeDom {
    pub nodes: Vec<FakeNode>,
    label_targets: HashMap<NodeId, NodeId>,
    nav: Vec<NavLink>,
    url: String,
    /// Ordered operation log, e.g. `"focus:2"`, `"event:2:input"`.
    pub log: Vec<String>,
}

impl FakeDom {
    pub fn new(url: &str) -> Self {
        Self {
            nodes: Vec::new(),
            label_targets: HashMap::new(),
            nav: Vec::new(),
            url: url.to_string(),
            log: Vec::new(),
        }
    }

    fn push(&mut self, node: FakeNode) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn add_input(
        &mut self,
        selector: Option<&str>,
        name: Option<&str>,
        id: Option<&str>,
        placeholder: Option<&str>,
    ) -> NodeId {
        let mut node = FakeNode::new("input");
        node.selector = selector.map(String::from);
        node.name = name.map(String::from);
        node.id = id.map(String::from);
        node.placeholder = placeholder.map(String::from);
        self.push(node)
    }

    pub fn add_button(&mut self, selector: Option<&str>, text: &str) -> NodeId {
        let mut node = FakeNode::new("button");
        node.selector = selector.map(String::from);
        node.text = text.to_string();
        self.push(node)
    }

    pub fn add_link(&mut self, text: &str) -> NodeId {
        let mut node = FakeNode::new("a");
        node.text = text.to_string();
        self.push(node)
    }

    pub fn add_div(&mut self, text: &str) -> NodeId {
        let mut node = FakeNode::new("div");
        node.text = text.to_string();
        self.push(node)
    }

    pub fn add_label(&mut self, text: &str, target: Option<NodeId>) -> NodeId {
        let mut node = FakeNode::new("label");
        node.text = text.to_string();
        let id = self.push(node);
        if let Some(target) = target {
            self.label_targets.insert(id, target);
        }
        id
    }

    pub fn add_nav_anchor(&mut self, label: &str, url: &str) {
        self.nav.push(NavLink {
            label: label.to_string(),
            url: url.to_string(),
        });
    }

    pub fn set_failing(&mut self, node: NodeId) {
        self.nodes[node].fail_ops = true;
    }

    fn check(&self, node: NodeId) -> Result<()> {
        if self.nodes[node].fail_ops {
            Err(Error::dom("synthetic DOM failure"))
        } else {
            Ok(())
        }
    }

    fn by_tag(&self, tags: &[&str]) -> Vec<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| tags.contains(&n.tag))
            .map(|(i, _)| i)
            .collect()
    }
}

impl DomAccessor for FakeDom {
    fn query(&self, selector: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.selector.as_deref() == Some(selector))
    }

    fn input_like(&self) -> Vec<NodeId> {
        self.by_tag(&["input", "textarea", "select"])
    }

    fn clickable(&self) -> Vec<NodeId> {
        self.by_tag(&["button", "a"])
    }

    fn all_nodes(&self) -> Vec<NodeId> {
        (0..self.nodes.len()).collect()
    }

    fn labels(&self) -> Vec<NodeId> {
        self.by_tag(&["label"])
    }

    fn label_target(&self, label: NodeId) -> Option<NodeId> {
        self.label_targets.get(&label).copied()
    }

    fn nav_anchors(&self) -> Vec<NavLink> {
        self.nav.clone()
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        let n = &self.nodes[node];
        match name {
            "name" => n.name.clone(),
            "id" => n.id.clone(),
            "placeholder" => n.placeholder.clone(),
            _ => None,
        }
    }

    fn text(&self, node: NodeId) -> String {
        self.nodes[node].text.trim().to_string()
    }

    fn set_value(&mut self, node: NodeId, value: &str) -> Result<()> {
        self.check(node)?;
        self.nodes[node].value = value.to_string();
        self.log.push(format!("set_value:{}={}", node, value));
        Ok(())
    }

    fn dispatch(&mut self, node: NodeId, event: DomEvent) -> Result<()> {
        self.check(node)?;
        self.log.push(format!("event:{}:{}", node, event.name()));
        Ok(())
    }

    fn click(&mut self, node: NodeId) -> Result<()> {
        self.check(node)?;
        self.log.push(format!("click:{}", node));
        Ok(())
    }

    fn focus(&mut self, node: NodeId) -> Result<()> {
        self.check(node)?;
        self.log.push(format!("focus:{}", node));
        Ok(())
    }

    fn scroll_into_view(&mut self, node: NodeId, behavior: ScrollBehavior) -> Result<()> {
        self.check(node)?;
        let how = match behavior {
            ScrollBehavior::SmoothCenter => "center",
            ScrollBehavior::Nearest => "nearest",
        };
        self.log.push(format!("scroll_into_view:{}:{}", node, how));
        Ok(())
    }

    fn highlight(&mut self, node: NodeId) {
        self.log.push(format!("highlight:{}", node));
    }

    fn navigate(&mut self, url: &str) -> Result<()> {
        self.log.push(format!("navigate:{}", url));
        Ok(())
    }

    fn scroll_to(&mut self, x: f64, y: f64) -> Result<()> {
        self.log.push(format!("scroll_to:{},{}", x, y));
        Ok(())
    }

    fn scroll_by(&mut self, dx: f64, dy: f64) -> Result<()> {
        self.log.push(format!("scroll_by:{},{}", dx, dy));
        Ok(())
    }

    fn scroll_to_anchor(&mut self, anchor: ScrollAnchor) -> Result<()> {
        let name = match anchor {
            ScrollAnchor::Top => "top",
            ScrollAnchor::Bottom => "bottom",
        };
        self.log.push(format!("scroll_anchor:{}", name));
        Ok(())
    }

    fn page_context(&self) -> Result<PageContext> {
        Ok(PageContext::from_url(&self.url)?)
    }
}
