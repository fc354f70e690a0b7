//! In-memory UI tree
//!
//! A small arena of elements with just enough behaviour (focus rules,
//! classes, attributes, layout visibility) to drive the controllers without
//! a browser.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};

use super::dom::{Dom, Viewport};

/// Index of a node in a `MemoryDom`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Default)]
struct NodeData {
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attrs: BTreeMap<String, String>,
    classes: BTreeSet<String>,
    styles: BTreeMap<String, String>,
    text: String,
    /// False models `display: none` (zero layout size)
    rendered: bool,
}

impl NodeData {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            rendered: true,
            ..Default::default()
        }
    }

    fn disabled(&self) -> bool {
        self.attrs.contains_key("disabled")
    }

    /// Mirrors `FOCUSABLE_SELECTOR`
    fn tabbable(&self) -> bool {
        let attr = |name: &str| self.attrs.get(name).map(String::as_str);
        let matches_tag = match self.tag.as_str() {
            "a" | "area" => attr("href").is_some(),
            "button" | "select" | "textarea" => !self.disabled(),
            "input" => !self.disabled() && attr("type") != Some("hidden"),
            _ => false,
        };
        matches_tag
            || attr("tabindex").is_some_and(|t| t != "-1")
            || attr("contenteditable") == Some("true")
    }

    /// Anything tabbable, plus elements focusable by script (`tabindex="-1"`)
    fn accepts_focus(&self) -> bool {
        let form_control = matches!(
            self.tag.as_str(),
            "button" | "input" | "select" | "textarea"
        );
        if form_control && self.disabled() {
            return false;
        }
        self.tabbable() || self.attrs.contains_key("tabindex")
    }
}

/// Arena-backed document with a `body` root
pub struct MemoryDom {
    nodes: RefCell<Vec<NodeData>>,
    active: Cell<Option<NodeId>>,
    scroll_locked: Cell<bool>,
    viewport: Cell<Viewport>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    pub fn new() -> Self {
        Self {
            nodes: RefCell::new(vec![NodeData::new("body")]),
            active: Cell::new(None),
            scroll_locked: Cell::new(false),
            viewport: Cell::new(Viewport::default()),
        }
    }

    pub fn body(&self) -> NodeId {
        NodeId(0)
    }

    /// Create an element under `parent`
    pub fn create(&self, parent: NodeId, tag: &str) -> NodeId {
        self.create_with(parent, tag, &[])
    }

    /// Create an element with attributes under `parent`
    pub fn create_with(&self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        let id = NodeId(nodes.len());
        let mut data = NodeData::new(tag);
        data.parent = Some(parent);
        for (name, value) in attrs {
            data.attrs.insert(name.to_string(), value.to_string());
        }
        nodes.push(data);
        nodes[parent.0].children.push(id);
        id
    }

    /// Remove a node (and its subtree) from the document
    pub fn detach(&self, node: NodeId) {
        if let Some(active) = self.active.get() {
            if active == node || self.is_descendant(active, node) {
                self.active.set(None);
            }
        }
        let mut nodes = self.nodes.borrow_mut();
        if let Some(parent) = nodes[node.0].parent.take() {
            nodes[parent.0].children.retain(|c| *c != node);
        }
    }

    /// Toggle layout presence (`display: none` when false)
    pub fn set_rendered(&self, node: NodeId, rendered: bool) {
        self.nodes.borrow_mut()[node.0].rendered = rendered;
    }

    pub fn tag(&self, node: NodeId) -> String {
        self.nodes.borrow()[node.0].tag.clone()
    }

    pub fn text(&self, node: NodeId) -> String {
        self.nodes.borrow()[node.0].text.clone()
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.nodes.borrow()[node.0].styles.get(property).cloned()
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes.borrow()[node.0].children.clone()
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_locked.get()
    }

    pub fn set_viewport(&self, viewport: Viewport) {
        self.viewport.set(viewport);
    }

    fn is_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
        let nodes = self.nodes.borrow();
        let mut cur = nodes[node.0].parent;
        while let Some(p) = cur {
            if p == ancestor {
                return true;
            }
            cur = nodes[p.0].parent;
        }
        false
    }

    fn is_connected(&self, node: NodeId) -> bool {
        node == self.body() || self.is_descendant(node, self.body())
    }

    /// Rendered itself and every ancestor rendered
    fn has_layout(&self, node: NodeId) -> bool {
        let nodes = self.nodes.borrow();
        let mut cur = Some(node);
        while let Some(n) = cur {
            if !nodes[n.0].rendered {
                return false;
            }
            cur = nodes[n.0].parent;
        }
        true
    }

    fn collect_tabbable(&self, node: NodeId, out: &mut Vec<NodeId>) {
        let children = self.children(node);
        for child in children {
            let tabbable = self.nodes.borrow()[child.0].tabbable();
            if tabbable && self.has_layout(child) {
                out.push(child);
            }
            self.collect_tabbable(child, out);
        }
    }
}

impl Dom for MemoryDom {
    type Node = NodeId;

    fn active_element(&self) -> Option<NodeId> {
        self.active.get()
    }

    fn focus(&self, node: &NodeId) -> bool {
        let accepts = self.nodes.borrow()[node.0].accepts_focus();
        if accepts && self.is_connected(*node) && self.has_layout(*node) {
            self.active.set(Some(*node));
            true
        } else {
            false
        }
    }

    fn focusable_within(&self, container: &NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_tabbable(*container, &mut out);
        out
    }

    fn set_class(&self, node: &NodeId, class: &str, on: bool) {
        let mut nodes = self.nodes.borrow_mut();
        let classes = &mut nodes[node.0].classes;
        if on {
            classes.insert(class.to_string());
        } else {
            classes.remove(class);
        }
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.nodes.borrow()[node.0].classes.contains(class)
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.nodes.borrow()[node.0].attrs.get(name).cloned()
    }

    fn set_attribute(&self, node: &NodeId, name: &str, value: &str) {
        self.nodes.borrow_mut()[node.0]
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    fn set_text(&self, node: &NodeId, text: &str) {
        for child in self.children(*node) {
            self.detach(child);
        }
        self.nodes.borrow_mut()[node.0].text = text.to_string();
    }

    fn set_style(&self, node: &NodeId, property: &str, value: &str) {
        let mut nodes = self.nodes.borrow_mut();
        let styles = &mut nodes[node.0].styles;
        if value.is_empty() {
            styles.remove(property);
        } else {
            styles.insert(property.to_string(), value.to_string());
        }
    }

    fn set_disabled(&self, node: &NodeId, disabled: bool) {
        let mut nodes = self.nodes.borrow_mut();
        let attrs = &mut nodes[node.0].attrs;
        if disabled {
            attrs.insert("disabled".to_string(), String::new());
        } else {
            attrs.remove("disabled");
        }
    }

    fn clear_children(&self, node: &NodeId) {
        for child in self.children(*node) {
            self.detach(child);
        }
        self.nodes.borrow_mut()[node.0].text.clear();
    }

    fn append_element(&self, parent: &NodeId, tag: &str) -> Option<NodeId> {
        Some(self.create(*parent, tag))
    }

    fn set_scroll_locked(&self, locked: bool) {
        self.scroll_locked.set(locked);
    }

    fn viewport(&self) -> Viewport {
        self.viewport.get()
    }
}
