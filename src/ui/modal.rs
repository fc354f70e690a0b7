//! Modal dialog controller
//!
//! Shared by the contact, pricing and game dialogs. The `active` flag is the
//! single source of truth; every transition mirrors it to the `active` class
//! and `aria-hidden` on the root in the same call.

use std::rc::Rc;

use super::focus::trap_focus;
use crate::platform::{Dom, KeyInput};

/// Nodes a modal controls
#[derive(Debug, Clone)]
pub struct ModalParts<N> {
    /// Outer element carrying `active` / `aria-hidden`
    pub root: N,
    /// Dialog box; Tab is trapped inside it
    pub dialog: N,
    /// Close control, focused on open
    pub close: Option<N>,
}

/// What a key press did to the modal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Ignored,
    Closed,
    /// Focus wrapped around the dialog; suppress the default Tab
    FocusWrapped,
}

impl KeyOutcome {
    pub fn handled(&self) -> bool {
        *self != KeyOutcome::Ignored
    }
}

pub struct Modal<D: Dom> {
    name: &'static str,
    dom: Rc<D>,
    parts: ModalParts<D::Node>,
    active: bool,
    /// Focus owner before `open`, restored on `close`
    restore_to: Option<D::Node>,
}

impl<D: Dom> Modal<D> {
    /// Build a closed modal and sync the DOM to that state
    pub fn new(name: &'static str, dom: Rc<D>, parts: ModalParts<D::Node>) -> Self {
        let modal = Self {
            name,
            dom,
            parts,
            active: false,
            restore_to: None,
        };
        modal.sync();
        modal
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn parts(&self) -> &ModalParts<D::Node> {
        &self.parts
    }

    pub fn dom(&self) -> &Rc<D> {
        &self.dom
    }

    /// Show the dialog and move focus into it. No-op if already open.
    pub fn open(&mut self) -> bool {
        if self.active {
            return false;
        }
        self.restore_to = self.dom.active_element();
        self.active = true;
        self.sync();
        self.dom.set_scroll_locked(true);

        let focused = self
            .parts
            .close
            .as_ref()
            .is_some_and(|close| self.dom.focus(close));
        if !focused {
            self.dom.focus(&self.parts.dialog);
        }
        log::debug!("Modal '{}' opened", self.name);
        true
    }

    /// Hide the dialog and hand focus back. No-op if already closed.
    pub fn close(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        self.sync();
        self.dom.set_scroll_locked(false);

        if let Some(prev) = self.restore_to.take() {
            if !self.dom.focus(&prev) {
                log::debug!("Modal '{}': previous focus owner is gone", self.name);
            }
        }
        log::debug!("Modal '{}' closed", self.name);
        true
    }

    /// Escape closes, Tab is trapped. Only acts while open.
    pub fn handle_key(&mut self, key: &KeyInput) -> KeyOutcome {
        if !self.active {
            return KeyOutcome::Ignored;
        }
        if key.is_escape() {
            self.close();
            return KeyOutcome::Closed;
        }
        if trap_focus(&*self.dom, &self.parts.dialog, key) {
            return KeyOutcome::FocusWrapped;
        }
        KeyOutcome::Ignored
    }

    fn sync(&self) {
        let root = &self.parts.root;
        self.dom.set_class(root, "active", self.active);
        self.dom
            .set_attribute(root, "aria-hidden", if self.active { "false" } else { "true" });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{MemoryDom, NodeId};

    struct Page {
        dom: Rc<MemoryDom>,
        trigger: NodeId,
        close: NodeId,
        send: NodeId,
        modal: Modal<MemoryDom>,
    }

    fn page() -> Page {
        let dom = Rc::new(MemoryDom::new());
        let body = dom.body();
        let trigger = dom.create(body, "button");
        let root = dom.create(body, "div");
        let _overlay = dom.create(root, "div");
        let dialog = dom.create_with(root, "div", &[("tabindex", "-1")]);
        let close = dom.create(dialog, "button");
        let send = dom.create_with(dialog, "a", &[("href", "mailto:hi@example.com")]);
        let modal = Modal::new(
            "contact",
            dom.clone(),
            ModalParts {
                root,
                dialog,
                close: Some(close),
            },
        );
        Page {
            dom,
            trigger,
            close,
            send,
            modal,
        }
    }

    fn in_sync(p: &Page) -> bool {
        let root = &p.modal.parts().root;
        let class = p.dom.has_class(root, "active");
        let aria = p.dom.attribute(root, "aria-hidden");
        class == p.modal.is_active()
            && aria.as_deref() == Some(if p.modal.is_active() { "false" } else { "true" })
    }

    #[test]
    fn test_new_modal_is_closed_in_dom() {
        let p = page();
        assert!(!p.modal.is_active());
        assert!(in_sync(&p));
    }

    #[test]
    fn test_open_close_restores_focus() {
        let mut p = page();
        p.dom.focus(&p.trigger);

        assert!(p.modal.open());
        assert!(in_sync(&p));
        assert!(p.dom.is_scroll_locked());
        assert_eq!(p.dom.active_element(), Some(p.close));

        assert!(p.modal.close());
        assert!(in_sync(&p));
        assert!(!p.dom.is_scroll_locked());
        assert_eq!(p.dom.active_element(), Some(p.trigger));
    }

    #[test]
    fn test_open_twice_keeps_original_focus_owner() {
        let mut p = page();
        p.dom.focus(&p.trigger);
        p.modal.open();
        assert!(!p.modal.open());
        p.modal.close();
        assert_eq!(p.dom.active_element(), Some(p.trigger));
    }

    #[test]
    fn test_focus_falls_back_to_dialog() {
        let mut p = page();
        p.dom.set_rendered(p.close, false);
        p.modal.open();
        assert_eq!(p.dom.active_element(), Some(p.modal.parts().dialog));
    }

    #[test]
    fn test_restore_skips_removed_element() {
        let mut p = page();
        p.dom.focus(&p.trigger);
        p.modal.open();
        p.dom.detach(p.trigger);
        p.modal.close();
        assert!(in_sync(&p));
        // Focus stays where it was, nothing panics
        assert_eq!(p.dom.active_element(), Some(p.close));
    }

    #[test]
    fn test_escape_closes_only_when_open() {
        let mut p = page();
        let esc = KeyInput::new("Escape");
        assert_eq!(p.modal.handle_key(&esc), KeyOutcome::Ignored);

        p.modal.open();
        assert_eq!(p.modal.handle_key(&esc), KeyOutcome::Closed);
        assert!(!p.modal.is_active());
        assert!(in_sync(&p));
    }

    #[test]
    fn test_tab_trapped_while_open() {
        let mut p = page();
        p.modal.open();
        p.dom.focus(&p.send);
        assert_eq!(p.modal.handle_key(&KeyInput::new("Tab")), KeyOutcome::FocusWrapped);
        assert_eq!(p.dom.active_element(), Some(p.close));

        p.modal.close();
        p.dom.focus(&p.send);
        assert_eq!(p.modal.handle_key(&KeyInput::new("Tab")), KeyOutcome::Ignored);
    }

    #[test]
    fn test_close_when_closed_is_noop() {
        let mut p = page();
        p.dom.focus(&p.send);
        assert!(!p.modal.close());
        assert_eq!(p.dom.active_element(), Some(p.send));
        assert!(in_sync(&p));
    }
}
