//! Browser implementations of the platform traits (wasm32 only)

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, Element, HtmlElement, Window};

use super::dom::{Dom, Viewport};
use super::scheduler::{FrameTask, Scheduler, Task, TimerId};
use crate::ui::focus::FOCUSABLE_SELECTOR;

/// `setTimeout` / `requestAnimationFrame` backed scheduler
pub struct BrowserScheduler {
    window: Window,
}

impl BrowserScheduler {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Scheduler for BrowserScheduler {
    fn schedule(&self, delay_ms: u32, task: Task) -> Option<TimerId> {
        // once_into_js frees the closure after it runs
        let callback = Closure::once_into_js(move || task());
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                delay_ms.min(i32::MAX as u32) as i32,
            ) {
            Ok(handle) => Some(TimerId(handle)),
            Err(e) => {
                log::warn!("setTimeout failed: {:?}", e);
                None
            }
        }
    }

    fn cancel(&self, id: TimerId) {
        self.window.clear_timeout_with_handle(id.0);
    }

    fn schedule_frame(&self, task: FrameTask) -> Option<TimerId> {
        let callback = Closure::once_into_js(move |time: f64| task(time));
        match self.window.request_animation_frame(callback.unchecked_ref()) {
            Ok(handle) => Some(TimerId(handle)),
            Err(e) => {
                log::warn!("requestAnimationFrame failed: {:?}", e);
                None
            }
        }
    }

    fn cancel_frame(&self, id: TimerId) {
        let _ = self.window.cancel_animation_frame(id.0);
    }
}

/// The live document
pub struct WebDom {
    window: Window,
    document: Document,
}

impl WebDom {
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self { window, document })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    /// First match of `selector` under `root` (or the whole document)
    pub fn query(&self, root: Option<&Element>, selector: &str) -> Option<Element> {
        match root {
            Some(root) => root.query_selector(selector).ok().flatten(),
            None => self.document.query_selector(selector).ok().flatten(),
        }
    }

    /// All matches of `selector` under `root` (or the whole document)
    pub fn query_all(&self, root: Option<&Element>, selector: &str) -> Vec<Element> {
        let list = match root {
            Some(root) => root.query_selector_all(selector),
            None => self.document.query_selector_all(selector),
        };
        let Ok(list) = list else {
            log::warn!("Bad selector: {}", selector);
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    /// Evaluate a media query, false if unsupported
    pub fn matches_media(&self, query: &str) -> bool {
        self.window
            .match_media(query)
            .ok()
            .flatten()
            .map(|mq| mq.matches())
            .unwrap_or(false)
    }

    pub fn prefers_reduced_motion(&self) -> bool {
        self.matches_media("(prefers-reduced-motion: reduce)")
    }

    pub fn user_agent(&self) -> String {
        self.window.navigator().user_agent().unwrap_or_default()
    }

    pub fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    /// Smooth (or instant) scroll of the window to `top`
    pub fn scroll_to(&self, top: f64, smooth: bool) {
        let options = web_sys::ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(if smooth {
            web_sys::ScrollBehavior::Smooth
        } else {
            web_sys::ScrollBehavior::Auto
        });
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    /// Page hidden (tab switched, minimized)
    pub fn is_hidden(&self) -> bool {
        self.document.visibility_state() == web_sys::VisibilityState::Hidden
    }

    fn has_layout(el: &HtmlElement) -> bool {
        el.offset_width() > 0 || el.offset_height() > 0 || el.get_client_rects().length() > 0
    }
}

impl Dom for WebDom {
    type Node = Element;

    fn active_element(&self) -> Option<Element> {
        self.document.active_element()
    }

    fn focus(&self, node: &Element) -> bool {
        if !node.is_connected() {
            return false;
        }
        let Some(el) = node.dyn_ref::<HtmlElement>() else {
            return false;
        };
        if el.focus().is_err() {
            return false;
        }
        self.document.active_element().as_ref() == Some(node)
    }

    fn focusable_within(&self, container: &Element) -> Vec<Element> {
        self.query_all(Some(container), FOCUSABLE_SELECTOR)
            .into_iter()
            .filter(|el| el.dyn_ref::<HtmlElement>().is_some_and(Self::has_layout))
            .collect()
    }

    fn set_class(&self, node: &Element, class: &str, on: bool) {
        let list = node.class_list();
        let _ = if on {
            list.add_1(class)
        } else {
            list.remove_1(class)
        };
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&self, node: &Element, name: &str, value: &str) {
        let _ = node.set_attribute(name, value);
    }

    fn set_text(&self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn set_style(&self, node: &Element, property: &str, value: &str) {
        if let Some(el) = node.dyn_ref::<HtmlElement>() {
            let _ = el.style().set_property(property, value);
        }
    }

    fn set_disabled(&self, node: &Element, disabled: bool) {
        let _ = if disabled {
            node.set_attribute("disabled", "")
        } else {
            node.remove_attribute("disabled")
        };
    }

    fn clear_children(&self, node: &Element) {
        node.set_text_content(None);
    }

    fn append_element(&self, parent: &Element, tag: &str) -> Option<Element> {
        let el = self.document.create_element(tag).ok()?;
        parent.append_child(&el).ok()?;
        Some(el)
    }

    fn set_scroll_locked(&self, locked: bool) {
        if let Some(body) = self.document.body() {
            self.set_class(&body, "modal-open", locked);
        }
    }

    fn viewport(&self) -> Viewport {
        let dim = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
            v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
        };
        Viewport::new(
            dim(self.window.inner_width()),
            dim(self.window.inner_height()),
            self.window.device_pixel_ratio(),
        )
    }
}
