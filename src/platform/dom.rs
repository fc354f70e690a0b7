//! UI tree abstraction
//!
//! Components receive the nodes they control at construction and mutate them
//! only through this trait, so the same controller code runs against the
//! browser DOM and against `MemoryDom` in tests.

use std::fmt;

/// A key press as seen by keyboard handlers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub key: String,
    pub shift: bool,
}

impl KeyInput {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            shift: false,
        }
    }

    pub fn with_shift(key: &str) -> Self {
        Self {
            key: key.to_string(),
            shift: true,
        }
    }

    pub fn is_tab(&self) -> bool {
        self.key == "Tab"
    }

    pub fn is_escape(&self) -> bool {
        self.key == "Escape"
    }

    /// Enter or Space, the keys that activate a focused card
    pub fn is_activation(&self) -> bool {
        self.key == "Enter" || self.key == " "
    }
}

/// Viewport size in CSS pixels plus device pixel ratio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub dpr: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, dpr: f64) -> Self {
        Self {
            width,
            height,
            // A zero or NaN ratio would collapse the canvas buffer
            dpr: if dpr > 0.0 { dpr } else { 1.0 },
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0, 1.0)
    }
}

/// The mutations and queries the site components need from a UI tree
pub trait Dom {
    type Node: Clone + PartialEq + fmt::Debug;

    /// Element currently holding keyboard focus
    fn active_element(&self) -> Option<Self::Node>;
    /// Move focus; returns whether `node` holds focus afterwards
    fn focus(&self, node: &Self::Node) -> bool;
    /// Visible, enabled, tabbable descendants in document order
    fn focusable_within(&self, container: &Self::Node) -> Vec<Self::Node>;

    fn set_class(&self, node: &Self::Node, class: &str, on: bool);
    fn has_class(&self, node: &Self::Node, class: &str) -> bool;
    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str);
    fn set_text(&self, node: &Self::Node, text: &str);
    fn set_style(&self, node: &Self::Node, property: &str, value: &str);
    fn set_disabled(&self, node: &Self::Node, disabled: bool);

    fn clear_children(&self, node: &Self::Node);
    /// Create an element and append it to `parent`
    fn append_element(&self, parent: &Self::Node, tag: &str) -> Option<Self::Node>;

    /// Lock or unlock page scrolling behind a modal
    fn set_scroll_locked(&self, locked: bool);
    fn viewport(&self) -> Viewport;
}
