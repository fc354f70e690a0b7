//! Focus trap: keeps Tab cycling inside a container

use crate::platform::{Dom, KeyInput};

/// Elements reachable with Tab (before the layout-visibility filter)
pub const FOCUSABLE_SELECTOR: &str = "a[href], area[href], button:not([disabled]), \
    input:not([disabled]):not([type=\"hidden\"]), select:not([disabled]), \
    textarea:not([disabled]), [tabindex]:not([tabindex=\"-1\"]), [contenteditable=\"true\"]";

/// Where focus must wrap to, if anywhere.
///
/// Shift+Tab on the first focusable wraps to the last, Tab on the last wraps
/// to the first. Everything else is left to the browser.
pub fn wrap_target<'a, N: PartialEq>(
    focusables: &'a [N],
    active: Option<&N>,
    backwards: bool,
) -> Option<&'a N> {
    let first = focusables.first()?;
    let last = focusables.last()?;
    if backwards && active == Some(first) {
        Some(last)
    } else if !backwards && active == Some(last) {
        Some(first)
    } else {
        None
    }
}

/// Apply the trap for a key press inside `container`.
/// Returns true when focus was wrapped and the default action must be suppressed.
pub fn trap_focus<D: Dom>(dom: &D, container: &D::Node, key: &KeyInput) -> bool {
    if !key.is_tab() {
        return false;
    }
    let focusables = dom.focusable_within(container);
    let active = dom.active_element();
    match wrap_target(&focusables, active.as_ref(), key.shift) {
        Some(target) => {
            dom.focus(target);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{MemoryDom, NodeId};

    fn dialog() -> (MemoryDom, NodeId, Vec<NodeId>) {
        let dom = MemoryDom::new();
        let dialog = dom.create(dom.body(), "div");
        let close = dom.create(dialog, "button");
        let email = dom.create_with(dialog, "a", &[("href", "mailto:hi@example.com")]);
        let send = dom.create(dialog, "button");
        (dom, dialog, vec![close, email, send])
    }

    #[test]
    fn test_tab_on_last_wraps_to_first() {
        let (dom, dialog, nodes) = dialog();
        dom.focus(&nodes[2]);
        assert!(trap_focus(&dom, &dialog, &KeyInput::new("Tab")));
        assert_eq!(dom.active_element(), Some(nodes[0]));
    }

    #[test]
    fn test_shift_tab_on_first_wraps_to_last() {
        let (dom, dialog, nodes) = dialog();
        dom.focus(&nodes[0]);
        assert!(trap_focus(&dom, &dialog, &KeyInput::with_shift("Tab")));
        assert_eq!(dom.active_element(), Some(nodes[2]));
    }

    #[test]
    fn test_middle_left_to_browser() {
        let (dom, dialog, nodes) = dialog();
        dom.focus(&nodes[1]);
        assert!(!trap_focus(&dom, &dialog, &KeyInput::new("Tab")));
        assert!(!trap_focus(&dom, &dialog, &KeyInput::with_shift("Tab")));
        assert_eq!(dom.active_element(), Some(nodes[1]));
    }

    #[test]
    fn test_other_keys_ignored() {
        let (dom, dialog, nodes) = dialog();
        dom.focus(&nodes[2]);
        assert!(!trap_focus(&dom, &dialog, &KeyInput::new("Enter")));
        assert_eq!(dom.active_element(), Some(nodes[2]));
    }

    #[test]
    fn test_hidden_last_is_skipped() {
        let (dom, dialog, nodes) = dialog();
        dom.set_rendered(nodes[2], false);
        dom.focus(&nodes[1]);
        assert!(trap_focus(&dom, &dialog, &KeyInput::new("Tab")));
        assert_eq!(dom.active_element(), Some(nodes[0]));
    }

    #[test]
    fn test_empty_container_noop() {
        let dom = MemoryDom::new();
        let empty = dom.create(dom.body(), "div");
        assert!(!trap_focus(&dom, &empty, &KeyInput::new("Tab")));
    }

    #[test]
    fn test_wrap_target_single() {
        let only = [7];
        assert_eq!(wrap_target(&only, Some(&7), false), Some(&7));
        assert_eq!(wrap_target(&only, Some(&7), true), Some(&7));
        assert_eq!(wrap_target::<i32>(&[], None, false), None);
    }
}
