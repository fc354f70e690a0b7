//! Vitrine entry point
//!
//! In the browser: wires every component to the page once the module loads.
//! Natively: runs a short headless session against the in-memory platform.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_site {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        Element, Event, EventTarget, HtmlCanvasElement, HtmlElement, IntersectionObserver,
        IntersectionObserverEntry, IntersectionObserverInit, KeyboardEvent, MouseEvent,
        WheelEvent,
    };

    use vitrine::consts::*;
    use vitrine::game::{ClickBurst, GameTable, TableNodes, TableTiming};
    use vitrine::platform::web::{BrowserScheduler, WebDom};
    use vitrine::platform::{Dom, KeyInput, Scheduler, Viewport};
    use vitrine::renderer::CanvasPainter;
    use vitrine::sim::{FieldAnimator, ParticleField};
    use vitrine::ui::cursor::{self, CLICKABLE_SELECTOR, CursorTrail};
    use vitrine::ui::nav::{self, NavHighlighter, Section, SectionMap, WheelAction, WheelSnapper};
    use vitrine::ui::pricing::is_price_card;
    use vitrine::ui::{KeyOutcome, Modal, ModalParts, PricingModal};
    use vitrine::{DeviceTier, Settings};

    /// Dialogs that listen to the document's key presses
    struct Dialogs {
        contact: Option<Rc<RefCell<Modal<WebDom>>>>,
        pricing: Option<Rc<RefCell<PricingModal<WebDom>>>>,
        game: Option<Rc<GameTable<WebDom>>>,
    }

    /// Attach a listener for the lifetime of the page
    fn listen(target: &EventTarget, kind: &str, handler: impl FnMut(Event) + 'static) {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        let _ = target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn event_element(event: &Event) -> Option<Element> {
        event.target()?.dyn_into::<Element>().ok()
    }

    fn key_input(event: &Event) -> Option<KeyInput> {
        let key = event.dyn_ref::<KeyboardEvent>()?;
        let mut input = KeyInput::new(&key.key());
        input.shift = key.shift_key();
        Some(input)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let settings = Settings::load();
        let _ = console_log::init_with_level(settings.log_level.to_level());

        log::info!("Vitrine starting...");

        let Some(dom) = WebDom::new() else {
            log::warn!("No document; nothing to enhance");
            return;
        };
        let dom = Rc::new(dom);
        let scheduler: Rc<dyn Scheduler> = Rc::new(BrowserScheduler::new(dom.window().clone()));
        let motion = vitrine::motion_allowed(dom.prefers_reduced_motion(), &settings);
        let seed = js_sys::Date::now() as u64;

        if motion {
            setup_particles(&dom, &scheduler, &settings, seed);
        } else {
            log::info!("Reduced motion: particle field disabled");
        }

        let dialogs = Dialogs {
            contact: setup_contact_modal(&dom),
            pricing: setup_price_modal(&dom),
            game: setup_game(&dom, &scheduler, &settings, seed.wrapping_add(1)),
        };
        setup_keyboard(&dom, dialogs);

        setup_navigation(&dom, &scheduler, &settings);
        if motion {
            setup_reveal(&dom);
        }
        setup_offers_button(&dom, motion);
        setup_cursor(&dom, &scheduler, motion);
        setup_variant_images(&dom);
        setup_variant_toggles(&dom);

        log::info!("Vitrine running!");
    }

    fn setup_particles(
        dom: &Rc<WebDom>,
        scheduler: &Rc<dyn Scheduler>,
        settings: &Settings,
        seed: u64,
    ) {
        let Some(canvas) = dom
            .by_id("particles")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::warn!("No #particles canvas; particle field skipped");
            return;
        };
        let Some(painter) = CanvasPainter::new(canvas) else {
            log::warn!("No 2D context; particle field skipped");
            return;
        };

        let viewport = dom.viewport();
        let tier = DeviceTier::detect(viewport.width, &dom.user_agent());
        let field = ParticleField::new(settings, tier, viewport, seed);
        let measure: Rc<dyn Fn() -> Viewport> = {
            let dom = dom.clone();
            Rc::new(move || dom.viewport())
        };
        let animator = Rc::new(FieldAnimator::new(field, painter, scheduler.clone(), measure));
        log::info!("Particle field running ({} tier)", tier.as_str());

        let window = dom.window();
        {
            let animator = animator.clone();
            listen(window, "resize", move |_| animator.resize());
        }
        {
            let animator = animator.clone();
            listen(window, "orientationchange", move |_| {
                animator.resize_debounced(ORIENTATION_DEBOUNCE_MS)
            });
        }
        if tier.pointer_interaction() {
            {
                let animator = animator.clone();
                listen(window, "mousemove", move |event| {
                    if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                        let pos = Vec2::new(mouse.client_x() as f32, mouse.client_y() as f32);
                        animator.set_pointer(Some(pos));
                    }
                });
            }
            {
                let animator = animator.clone();
                listen(window, "mouseout", move |_| animator.set_pointer(None));
            }
        }

        // Stop drawing while the tab is hidden
        let page = dom.clone();
        listen(dom.document(), "visibilitychange", move |_| {
            animator.set_page_visible(!page.is_hidden());
        });
    }

    /// Root, dialog box and close control of a modal
    fn modal_parts(dom: &WebDom, root_id: &str, close_id: &str) -> Option<ModalParts<Element>> {
        let root = dom.by_id(root_id)?;
        let dialog = dom.query(Some(&root), ".modal-content")?;
        Some(ModalParts {
            root,
            dialog,
            close: dom.by_id(close_id),
        })
    }

    /// Close on the overlay and the close control
    fn wire_dismiss(dom: &WebDom, parts: &ModalParts<Element>, close: impl Fn() + 'static) {
        let close = Rc::new(close);
        if let Some(button) = &parts.close {
            let close = close.clone();
            listen(button, "click", move |_| close());
        }
        if let Some(overlay) = dom.query(Some(&parts.root), ".modal-overlay") {
            listen(&overlay, "click", move |_| close());
        }
    }

    fn setup_contact_modal(dom: &Rc<WebDom>) -> Option<Rc<RefCell<Modal<WebDom>>>> {
        let Some(parts) = modal_parts(dom, "contactModal", "closeModal") else {
            log::warn!("No #contactModal; contact dialog skipped");
            return None;
        };
        let modal = Rc::new(RefCell::new(Modal::new("contact", dom.clone(), parts.clone())));

        for trigger in dom.query_all(None, "#navContactBtn, #heroContactBtn, #floatingContactBtn") {
            let modal = modal.clone();
            listen(&trigger, "click", move |event| {
                event.prevent_default();
                modal.borrow_mut().open();
            });
        }
        {
            let modal = modal.clone();
            wire_dismiss(dom, &parts, move || {
                modal.borrow_mut().close();
            });
        }
        Some(modal)
    }

    fn setup_price_modal(dom: &Rc<WebDom>) -> Option<Rc<RefCell<PricingModal<WebDom>>>> {
        let (Some(parts), Some(title), Some(list)) = (
            modal_parts(dom, "priceModal", "closePriceModal"),
            dom.by_id("priceTitle"),
            dom.by_id("priceList"),
        ) else {
            log::warn!("Pricing dialog markup incomplete; pricing skipped");
            return None;
        };
        let modal = Modal::new("pricing", dom.clone(), parts.clone());
        let pricing = Rc::new(RefCell::new(PricingModal::new(modal, title, list)));

        {
            let pricing = pricing.clone();
            wire_dismiss(dom, &parts, move || {
                pricing.borrow_mut().close();
            });
        }

        let Some(portfolio) = dom.query(None, ".portfolio-content") else {
            return Some(pricing);
        };
        {
            let pricing = pricing.clone();
            listen(&portfolio, "click", move |event| {
                let card = event_element(&event).and_then(|el| el.closest(".variant").ok().flatten());
                if let Some(card) = card {
                    pricing.borrow_mut().open_for_card(&card);
                }
            });
        }
        {
            let pricing = pricing.clone();
            let dom = dom.clone();
            listen(&portfolio, "keydown", move |event| {
                if !key_input(&event).is_some_and(|k| k.is_activation()) {
                    return;
                }
                let card = event_element(&event).and_then(|el| el.closest(".variant").ok().flatten());
                if let Some(card) = card.filter(|c| is_price_card(&*dom, c)) {
                    event.prevent_default();
                    pricing.borrow_mut().open_for_card(&card);
                }
            });
        }
        Some(pricing)
    }

    fn setup_game(
        dom: &Rc<WebDom>,
        scheduler: &Rc<dyn Scheduler>,
        settings: &Settings,
        seed: u64,
    ) -> Option<Rc<GameTable<WebDom>>> {
        let by_id = |id: &str| dom.by_id(id);
        let (Some(parts), Some(hand), Some(score), Some(opponent), Some(status)) = (
            modal_parts(dom, "gameModal", "closeGameModal"),
            by_id("playerHand"),
            by_id("playerScore"),
            by_id("opponentScoreRaw"),
            by_id("gameStatus"),
        ) else {
            log::warn!("Game markup incomplete; easter egg skipped");
            return None;
        };
        let (Some(hit), Some(stay), Some(restart)) =
            (by_id("btnHit"), by_id("btnStay"), by_id("btnRestart"))
        else {
            log::warn!("Game buttons missing; easter egg skipped");
            return None;
        };

        let nodes = TableNodes {
            hand,
            score,
            opponent,
            status,
            hit: hit.clone(),
            stay: stay.clone(),
            restart: restart.clone(),
        };
        let modal = Modal::new("game", dom.clone(), parts.clone());
        let table = Rc::new(GameTable::new(
            modal,
            nodes,
            scheduler.clone(),
            TableTiming::from_settings(settings),
            seed,
        ));

        {
            let table = table.clone();
            wire_dismiss(dom, &parts, move || table.close());
        }
        {
            let table = table.clone();
            listen(&hit, "click", move |_| {
                if let Err(e) = table.hit() {
                    log::debug!("Hit ignored: {}", e);
                }
            });
        }
        {
            let table = table.clone();
            listen(&stay, "click", move |_| {
                if let Err(e) = table.stay() {
                    log::debug!("Stay ignored: {}", e);
                }
            });
        }
        {
            let table = table.clone();
            listen(&restart, "click", move |_| {
                if let Err(e) = table.restart() {
                    log::debug!("Restart ignored: {}", e);
                }
            });
        }

        if let Some(trigger) = by_id("cssTag") {
            dom.set_style(&trigger, "cursor", "pointer");
            let burst = ClickBurst::new(scheduler.clone(), EASTER_EGG_CLICKS, EASTER_EGG_WINDOW_MS);
            {
                let table = table.clone();
                listen(&trigger, "click", move |_| {
                    if burst.register() {
                        table.open();
                    }
                });
            }
            // Rapid clicks would otherwise select the text
            listen(&trigger, "mousedown", |event| event.prevent_default());
        }
        Some(table)
    }

    fn setup_keyboard(dom: &Rc<WebDom>, dialogs: Dialogs) {
        listen(dom.document(), "keydown", move |event| {
            let Some(key) = key_input(&event) else {
                return;
            };
            let mut outcomes = Vec::with_capacity(3);
            if let Some(contact) = &dialogs.contact {
                outcomes.push(contact.borrow_mut().handle_key(&key));
            }
            if let Some(pricing) = &dialogs.pricing {
                outcomes.push(pricing.borrow_mut().handle_key(&key));
            }
            if let Some(game) = &dialogs.game {
                outcomes.push(game.handle_key(&key));
            }
            if outcomes.contains(&KeyOutcome::FocusWrapped) {
                event.prevent_default();
            }
        });
    }

    fn section_map(sections: &[Element]) -> SectionMap {
        SectionMap::new(
            sections
                .iter()
                .filter_map(|el| {
                    let html = el.dyn_ref::<HtmlElement>()?;
                    Some(Section::new(
                        &el.id(),
                        f64::from(html.offset_top()),
                        f64::from(html.offset_height()),
                    ))
                })
                .collect(),
        )
    }

    fn observer(
        threshold: f64,
        root_margin: &str,
        on_visible: impl FnMut(Element) + 'static,
    ) -> Option<IntersectionObserver> {
        let mut on_visible = on_visible;
        let callback = Closure::<dyn FnMut(js_sys::Array)>::new(move |entries: js_sys::Array| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                if entry.is_intersecting() {
                    on_visible(entry.target());
                }
            }
        });
        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(threshold));
        init.set_root_margin(root_margin);
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init);
        callback.forget();
        match observer {
            Ok(observer) => Some(observer),
            Err(e) => {
                log::warn!("IntersectionObserver unavailable: {:?}", e);
                None
            }
        }
    }

    fn setup_navigation(dom: &Rc<WebDom>, scheduler: &Rc<dyn Scheduler>, settings: &Settings) {
        let links = dom.query_all(None, ".nav-link");
        let sections = Rc::new(dom.query_all(None, "section[id]"));

        let window = dom.window().clone();
        if let Some(navbar) = dom.by_id("navbar") {
            let dom = dom.clone();
            listen(&window, "scroll", move |_| {
                dom.set_class(&navbar, "visible", nav::navbar_visible(dom.scroll_y()));
            });
        }

        for link in links.iter().filter(|l| l.id() != "navContactBtn") {
            let dom = dom.clone();
            let sections = sections.clone();
            let href = link.get_attribute("href").unwrap_or_default();
            listen(link, "click", move |event| {
                let map = section_map(&sections);
                if let Some(top) = nav::scroll_target(&href, &map, dom.viewport().width) {
                    event.prevent_default();
                    dom.scroll_to(top, true);
                }
            });
        }

        let hrefs = links
            .iter()
            .map(|l| l.get_attribute("href").unwrap_or_default())
            .collect();
        let mut highlighter = NavHighlighter::new(hrefs);
        let highlight = {
            let dom = dom.clone();
            let links = links.clone();
            move |section: Element| {
                let active = highlighter.on_section_visible(&section.id());
                for (i, link) in links.iter().enumerate() {
                    dom.set_class(link, "active", active == Some(i));
                }
            }
        };
        if let Some(observer) = observer(0.3, "-80px 0px -60% 0px", highlight) {
            for section in sections.iter() {
                observer.observe(section);
            }
        }

        if !WheelSnapper::enabled_for(dom.viewport().width, settings.wheel_snap_min_width) {
            return;
        }
        let snapper = WheelSnapper::new(scheduler.clone(), settings.snap_cooldown_ms);
        let dom = dom.clone();
        let callback = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(wheel) = event.dyn_ref::<WheelEvent>() else {
                return;
            };
            let map = section_map(&sections);
            let viewport = dom.viewport();
            match snapper.on_wheel(wheel.delta_y(), dom.scroll_y(), viewport.height, &map) {
                WheelAction::PassThrough => {}
                WheelAction::Swallow => event.prevent_default(),
                WheelAction::SnapTo { top, .. } => {
                    event.prevent_default();
                    dom.scroll_to(top, true);
                }
            }
        });
        // Must be non-passive to cancel the native scroll
        let options = web_sys::AddEventListenerOptions::new();
        options.set_passive(false);
        let _ = window.add_event_listener_with_callback_and_add_event_listener_options(
                "wheel",
                callback.as_ref().unchecked_ref(),
                &options,
            );
        callback.forget();
        log::debug!("Wheel snapping enabled");
    }

    fn setup_reveal(dom: &Rc<WebDom>) {
        // Rows scroll sideways on narrow layouts; cards stay visible there
        if dom.viewport().width <= MOBILE_MAX_WIDTH {
            return;
        }
        let reveal = {
            let dom = dom.clone();
            move |card: Element| {
                dom.set_style(&card, "opacity", "1");
                dom.set_style(&card, "transform", "translateY(0)");
            }
        };
        let Some(observer) = observer(0.1, "0px 0px -50px 0px", reveal) else {
            return;
        };
        for card in dom.query_all(None, ".variant") {
            dom.set_style(&card, "opacity", "0");
            dom.set_style(&card, "transform", "translateY(30px)");
            dom.set_style(&card, "transition", "opacity 0.6s ease, transform 0.6s ease");
            observer.observe(&card);
        }
    }

    fn setup_offers_button(dom: &Rc<WebDom>, motion: bool) {
        let Some(button) = dom.by_id("myOffersBtn") else {
            return;
        };
        let dom = dom.clone();
        listen(&button, "click", move |_| {
            if let Some(portfolio) = dom.by_id("portfolio") {
                let options = web_sys::ScrollIntoViewOptions::new();
                options.set_behavior(if motion {
                    web_sys::ScrollBehavior::Smooth
                } else {
                    web_sys::ScrollBehavior::Auto
                });
                portfolio.scroll_into_view_with_scroll_into_view_options(&options);
            }
        });
    }

    fn setup_cursor(dom: &Rc<WebDom>, scheduler: &Rc<dyn Scheduler>, motion: bool) {
        let (Some(dot), Some(ring)) = (
            dom.query(None, ".cursor-dot"),
            dom.query(None, ".cursor-ring"),
        ) else {
            return;
        };
        let fine = dom.matches_media("(hover: hover) and (pointer: fine)");
        if !cursor::cursor_enabled(fine, motion) {
            return;
        }

        let trail = Rc::new(RefCell::new(CursorTrail::new()));
        let window = dom.window().clone();
        let set_opacity = {
            let dom = dom.clone();
            let (dot, ring) = (dot.clone(), ring.clone());
            Rc::new(move |value: &str| {
                dom.set_style(&dot, "opacity", value);
                dom.set_style(&ring, "opacity", value);
            })
        };

        {
            let (dom, dot, trail, set_opacity) =
                (dom.clone(), dot.clone(), trail.clone(), set_opacity.clone());
            listen(&window, "mousemove", move |event| {
                let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                let pos = Vec2::new(mouse.client_x() as f32, mouse.client_y() as f32);
                trail.borrow_mut().on_move(pos);
                dom.set_style(&dot, "transform", &cursor::translate(pos));
                set_opacity("1");
            });
        }
        for kind in ["mouseout", "blur"] {
            let (trail, set_opacity) = (trail.clone(), set_opacity.clone());
            listen(&window, kind, move |_| {
                trail.borrow_mut().hide();
                set_opacity("0");
            });
        }

        let set_state = {
            let dom = dom.clone();
            let (dot, ring) = (dot.clone(), ring.clone());
            Rc::new(move |class: &str, on: bool, both: bool| {
                dom.set_class(&dot, class, on);
                if both {
                    dom.set_class(&ring, class, on);
                }
            })
        };
        let clickable = |event: &Event| {
            event_element(event)
                .and_then(|el| el.closest(CLICKABLE_SELECTOR).ok().flatten())
                .is_some()
        };
        for (kind, on) in [("mouseover", true), ("mouseout", false)] {
            let (trail, set_state) = (trail.clone(), set_state.clone());
            listen(&window, kind, move |event| {
                if clickable(&event) {
                    trail.borrow_mut().set_hover(on);
                    set_state(cursor::HOVER_CLASS, on, true);
                }
            });
        }
        for (kind, on) in [("mousedown", true), ("mouseup", false), ("dragend", false)] {
            let (trail, set_state) = (trail.clone(), set_state.clone());
            listen(&window, kind, move |_| {
                trail.borrow_mut().set_pressed(on);
                set_state(cursor::ACTIVE_CLASS, on, false);
            });
        }

        animate_cursor(dom.clone(), scheduler.clone(), trail, ring);
    }

    /// Ease the ring every frame for the lifetime of the page
    fn animate_cursor(
        dom: Rc<WebDom>,
        scheduler: Rc<dyn Scheduler>,
        trail: Rc<RefCell<CursorTrail>>,
        ring: Element,
    ) {
        let sched = scheduler.clone();
        scheduler.schedule_frame(Box::new(move |_time| {
            let pos = trail.borrow_mut().step();
            dom.set_style(&ring, "transform", &cursor::translate(pos));
            animate_cursor(dom, sched, trail, ring);
        }));
    }

    fn setup_variant_images(dom: &Rc<WebDom>) {
        for card in dom.query_all(None, ".variant[data-image]") {
            let Some(path) = card.get_attribute("data-image").filter(|p| !p.is_empty()) else {
                continue;
            };
            let value = format!("url({})", path);
            dom.set_style(&card, "--bg-image", &value);
            if let Some(preview) = dom.query(Some(&card), ".variant-preview") {
                dom.set_style(&preview, "--bg-image", &value);
            }
        }
    }

    fn setup_variant_toggles(dom: &Rc<WebDom>) {
        for button in dom.query_all(None, ".variant-toggle-btn") {
            let toggle = {
                let dom = dom.clone();
                let button = button.clone();
                Rc::new(move |event: &Event| {
                    event.prevent_default();
                    // Keep the card's own click (pricing) from firing
                    event.stop_propagation();
                    let Some(card) = button.closest(".variant").ok().flatten() else {
                        return;
                    };
                    let shown = !dom.has_class(&card, "show-preview");
                    dom.set_class(&card, "show-preview", shown);
                    dom.set_attribute(&button, "aria-pressed", if shown { "true" } else { "false" });
                })
            };
            {
                let toggle = toggle.clone();
                listen(&button, "click", move |event| toggle(&event));
            }
            listen(&button, "keydown", move |event| {
                if key_input(&event).is_some_and(|k| k.is_activation()) {
                    toggle(&event);
                }
            });
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_site::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Vitrine (native) starting...");
    log::info!("Native mode runs headless - build for wasm32 to use it on a page");

    headless::particles();
    headless::contact_modal();
    headless::card_game();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// A short session against the in-memory platform
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::rc::Rc;

    use vitrine::game::{GameTable, TableNodes, TableTiming};
    use vitrine::platform::{Dom, KeyInput, ManualScheduler, MemoryDom, Scheduler, Viewport};
    use vitrine::renderer::RecordingPainter;
    use vitrine::sim::{FieldAnimator, ParticleField};
    use vitrine::ui::{Modal, ModalParts};
    use vitrine::{DeviceTier, Settings};

    const SEED: u64 = 0x5EED;

    pub fn particles() {
        let settings = Settings::default();
        let viewport = Viewport::new(1280.0, 800.0, 2.0);
        let tier = DeviceTier::detect(viewport.width, "");
        let sched = Rc::new(ManualScheduler::new());
        let scheduler: Rc<dyn Scheduler> = sched.clone();
        let field = ParticleField::new(&settings, tier, viewport, SEED);
        let animator = FieldAnimator::new(
            field,
            RecordingPainter::new(),
            scheduler,
            Rc::new(move || viewport),
        );

        animator.set_pointer(Some(glam::Vec2::new(640.0, 400.0)));
        for _ in 0..120 {
            sched.run_frame();
        }
        let (frames, circles) = animator.with_painter(|p| (p.frames, p.circles()));
        let (w, h) = animator.with_field(|f| f.buffer_size());
        log::info!(
            "Particle field: {} frames, {} circles in the last, buffer {}x{}",
            frames,
            circles,
            w,
            h
        );
    }

    pub fn contact_modal() {
        let dom = Rc::new(MemoryDom::new());
        let body = dom.body();
        let trigger = dom.create(body, "button");
        let root = dom.create(body, "div");
        let dialog = dom.create(root, "div");
        let close = dom.create(dialog, "button");
        dom.create_with(dialog, "a", &[("href", "mailto:hello@example.com")]);

        let mut modal = Modal::new(
            "contact",
            dom.clone(),
            ModalParts {
                root,
                dialog,
                close: Some(close),
            },
        );
        dom.focus(&trigger);
        modal.open();
        modal.handle_key(&KeyInput::new("Escape"));
        log::info!(
            "Contact modal: open={}, focus restored={}",
            modal.is_active(),
            dom.active_element() == Some(trigger)
        );
    }

    pub fn card_game() {
        let dom = Rc::new(MemoryDom::new());
        let body = dom.body();
        let root = dom.create(body, "div");
        let dialog = dom.create(root, "div");
        let nodes = TableNodes {
            hand: dom.create(dialog, "div"),
            score: dom.create(dialog, "span"),
            opponent: dom.create(dialog, "span"),
            status: dom.create(dialog, "p"),
            hit: dom.create(dialog, "button"),
            stay: dom.create(dialog, "button"),
            restart: dom.create(dialog, "button"),
        };
        let status = nodes.status;
        let modal = Modal::new(
            "game",
            dom.clone(),
            ModalParts {
                root,
                dialog,
                close: None,
            },
        );
        let sched = Rc::new(ManualScheduler::new());
        let settings = Settings::default();
        let table = GameTable::new(
            modal,
            nodes,
            sched.clone(),
            TableTiming::from_settings(&settings),
            SEED,
        );

        table.open();
        while table.player_score() < 17 {
            if let Err(e) = table.hit() {
                log::warn!("Hit failed: {}", e);
                break;
            }
        }
        if let Err(e) = table.stay() {
            log::debug!("Stay skipped: {}", e);
        }
        sched.advance(settings.reveal_delay_ms + settings.resolve_delay_ms);
        log::info!(
            "Card game: player {} -> {}",
            table.player_score(),
            dom.text(status)
        );
    }
}
