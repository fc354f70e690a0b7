//! Custom cursor: a dot pinned to the pointer and a ring that trails it

use glam::Vec2;

use crate::consts::CURSOR_EASE;

/// Elements that put the cursor into its hover state
pub const CLICKABLE_SELECTOR: &str = "a, button, .variant, .contact-item, .nav-link";

pub const HOVER_CLASS: &str = "is-hover";
pub const ACTIVE_CLASS: &str = "is-active";

/// Only hover-capable fine pointers get the custom cursor
pub fn cursor_enabled(fine_hover_pointer: bool, motion_allowed: bool) -> bool {
    fine_hover_pointer && motion_allowed
}

/// CSS transform that centres an element on `pos`
pub fn translate(pos: Vec2) -> String {
    format!(
        "translate({}px, {}px) translate(-50%, -50%)",
        pos.x, pos.y
    )
}

/// Dot and ring positions, advanced once per frame
#[derive(Debug, Clone, Default)]
pub struct CursorTrail {
    target: Vec2,
    ring: Vec2,
    visible: bool,
    hover: bool,
    pressed: bool,
}

impl CursorTrail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_move(&mut self, pos: Vec2) {
        if !self.visible {
            // Jump the ring on re-entry instead of sweeping in from the old spot
            self.ring = pos;
        }
        self.target = pos;
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.pressed = false;
    }

    pub fn set_hover(&mut self, hover: bool) {
        self.hover = hover;
    }

    pub fn set_pressed(&mut self, pressed: bool) {
        self.pressed = pressed;
    }

    /// Ease the ring toward the pointer. Returns the new ring position.
    pub fn step(&mut self) -> Vec2 {
        self.ring += (self.target - self.ring) * CURSOR_EASE;
        self.ring
    }

    pub fn dot(&self) -> Vec2 {
        self.target
    }

    pub fn ring(&self) -> Vec2 {
        self.ring
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_hover(&self) -> bool {
        self.hover
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }
}
