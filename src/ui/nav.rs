//! Scroll and navigation coordination
//!
//! Geometry comes in as plain numbers (section offsets, scroll position,
//! viewport size); the browser glue measures and applies the results.

use std::cell::Cell;
use std::rc::Rc;

use crate::consts::*;
use crate::platform::Scheduler;

/// A page section's vertical extent
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl Section {
    pub fn new(id: &str, top: f64, height: f64) -> Self {
        Self {
            id: id.to_string(),
            top,
            height,
        }
    }

    fn contains(&self, y: f64) -> bool {
        y >= self.top && y < self.top + self.height
    }
}

/// Sections in document order
#[derive(Debug, Clone, Default)]
pub struct SectionMap {
    sections: Vec<Section>,
}

impl SectionMap {
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    pub fn find(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Section under the viewport centre; the first section if none is
    pub fn current_index(&self, scroll_y: f64, viewport_height: f64) -> Option<usize> {
        if self.sections.is_empty() {
            return None;
        }
        let probe = scroll_y + viewport_height / 2.0;
        Some(
            self.sections
                .iter()
                .position(|s| s.contains(probe))
                .unwrap_or(0),
        )
    }
}

/// Where an in-page link points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// `#home`: the very top of the page
    Top,
    Section(String),
    /// Not an in-page anchor; leave it to the browser
    Other,
}

impl LinkTarget {
    pub fn parse(href: &str) -> Self {
        match href.strip_prefix('#') {
            Some("home") => LinkTarget::Top,
            Some(id) if !id.is_empty() => LinkTarget::Section(id.to_string()),
            _ => LinkTarget::Other,
        }
    }
}

/// Header clearance above a scrolled-to section. Narrow layouts scroll past
/// the anchor to show more content.
pub fn link_offset(viewport_width: f64) -> f64 {
    if viewport_width <= MOBILE_MAX_WIDTH {
        NAV_OFFSET_NARROW
    } else {
        NAV_OFFSET_WIDE
    }
}

/// Scroll position for a navigation link, `None` if it isn't ours to handle
pub fn scroll_target(href: &str, sections: &SectionMap, viewport_width: f64) -> Option<f64> {
    match LinkTarget::parse(href) {
        LinkTarget::Top => Some(0.0),
        LinkTarget::Section(id) => sections
            .find(&id)
            .map(|s| s.top - link_offset(viewport_width)),
        LinkTarget::Other => None,
    }
}

/// Navbar shows once the hero is scrolled away
pub fn navbar_visible(scroll_y: f64) -> bool {
    scroll_y > NAVBAR_REVEAL_SCROLL
}

/// Tracks which navigation link mirrors the visible section
#[derive(Debug, Clone)]
pub struct NavHighlighter {
    hrefs: Vec<String>,
    active: Option<usize>,
}

impl NavHighlighter {
    pub fn new(hrefs: Vec<String>) -> Self {
        Self {
            hrefs,
            active: None,
        }
    }

    /// A section became visible. Returns the link index that is now active;
    /// `None` means no link points at it and every link is inactive.
    pub fn on_section_visible(&mut self, section_id: &str) -> Option<usize> {
        let anchor = format!("#{}", section_id);
        self.active = self.hrefs.iter().position(|h| *h == anchor);
        self.active
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.active == Some(index)
    }

    pub fn len(&self) -> usize {
        self.hrefs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hrefs.is_empty()
    }
}

/// What to do with a wheel event
#[derive(Debug, Clone, PartialEq)]
pub enum WheelAction {
    /// Let the browser scroll normally
    PassThrough,
    /// Suppress the event (a snap is in flight)
    Swallow,
    /// Suppress the event and scroll to this section
    SnapTo { index: usize, top: f64 },
}

/// One-section-per-gesture wheel snapping for wide viewports
pub struct WheelSnapper {
    scheduler: Rc<dyn Scheduler>,
    cooldown_ms: u32,
    snapping: Rc<Cell<bool>>,
}

impl WheelSnapper {
    pub fn new(scheduler: Rc<dyn Scheduler>, cooldown_ms: u32) -> Self {
        Self {
            scheduler,
            cooldown_ms,
            snapping: Rc::new(Cell::new(false)),
        }
    }

    /// Snapping is only wired up on wide viewports
    pub fn enabled_for(viewport_width: f64, min_width: f64) -> bool {
        viewport_width >= min_width
    }

    pub fn is_snapping(&self) -> bool {
        self.snapping.get()
    }

    pub fn on_wheel(
        &self,
        delta_y: f64,
        scroll_y: f64,
        viewport_height: f64,
        sections: &SectionMap,
    ) -> WheelAction {
        if self.snapping.get() {
            return WheelAction::Swallow;
        }
        if delta_y.abs() < WHEEL_MIN_DELTA {
            return WheelAction::PassThrough;
        }
        let Some(current) = sections.current_index(scroll_y, viewport_height) else {
            return WheelAction::PassThrough;
        };
        let next = if delta_y > 0.0 {
            current + 1
        } else if current == 0 {
            return WheelAction::PassThrough;
        } else {
            current - 1
        };
        let Some(section) = sections.get(next) else {
            return WheelAction::PassThrough;
        };

        self.snapping.set(true);
        let snapping = self.snapping.clone();
        let armed = self
            .scheduler
            .schedule(self.cooldown_ms, Box::new(move || snapping.set(false)));
        if armed.is_none() {
            // No timer means no way to release the lock
            self.snapping.set(false);
        }
        log::debug!("Wheel snap {} -> {} ({})", current, next, section.id);
        WheelAction::SnapTo {
            index: next,
            top: section.top,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::ManualScheduler;

    fn sections() -> SectionMap {
        SectionMap::new(vec![
            Section::new("home", 0.0, 900.0),
            Section::new("about", 900.0, 900.0),
            Section::new("portfolio", 1800.0, 1500.0),
            Section::new("contact", 3300.0, 700.0),
        ])
    }

    #[test]
    fn test_current_section_by_centre() {
        let map = sections();
        assert_eq!(map.current_index(0.0, 900.0), Some(0));
        assert_eq!(map.current_index(500.0, 900.0), Some(1));
        assert_eq!(map.current_index(2000.0, 900.0), Some(2));
        // Past the end falls back to the first section
        assert_eq!(map.current_index(9000.0, 900.0), Some(0));
        assert_eq!(SectionMap::default().current_index(0.0, 900.0), None);
    }

    #[test]
    fn test_link_targets() {
        let map = sections();
        assert_eq!(scroll_target("#home", &map, 1920.0), Some(0.0));
        assert_eq!(scroll_target("#about", &map, 1920.0), Some(820.0));
        assert_eq!(scroll_target("#about", &map, 390.0), Some(940.0));
        assert_eq!(scroll_target("#missing", &map, 1920.0), None);
        assert_eq!(scroll_target("https://example.com", &map, 1920.0), None);
        assert_eq!(LinkTarget::parse("#"), LinkTarget::Other);
    }

    #[test]
    fn test_navbar_reveal() {
        assert!(!navbar_visible(300.0));
        assert!(navbar_visible(301.0));
    }

    #[test]
    fn test_highlighter_single_active() {
        let mut nav = NavHighlighter::new(vec![
            "#home".into(),
            "#about".into(),
            "#portfolio".into(),
        ]);
        assert_eq!(nav.on_section_visible("portfolio"), Some(2));
        assert!(nav.is_active(2));
        assert!(!nav.is_active(0));
        assert_eq!(nav.on_section_visible("contact"), None);
        assert_eq!(nav.active(), None);
    }

    #[test]
    fn test_wheel_snaps_one_section() {
        let sched = Rc::new(ManualScheduler::new());
        let snapper = WheelSnapper::new(sched.clone(), SNAP_COOLDOWN_MS);
        let map = sections();

        assert_eq!(
            snapper.on_wheel(120.0, 0.0, 900.0, &map),
            WheelAction::SnapTo { index: 1, top: 900.0 }
        );
        // Same gesture keeps firing: swallowed
        assert_eq!(snapper.on_wheel(120.0, 100.0, 900.0, &map), WheelAction::Swallow);

        sched.advance(SNAP_COOLDOWN_MS);
        assert!(!snapper.is_snapping());
        assert_eq!(
            snapper.on_wheel(-80.0, 900.0, 900.0, &map),
            WheelAction::SnapTo { index: 0, top: 0.0 }
        );
    }

    #[test]
    fn test_wheel_small_delta_and_edges_pass() {
        let sched = Rc::new(ManualScheduler::new());
        let snapper = WheelSnapper::new(sched.clone(), SNAP_COOLDOWN_MS);
        let map = sections();

        assert_eq!(snapper.on_wheel(5.0, 0.0, 900.0, &map), WheelAction::PassThrough);
        assert_eq!(snapper.on_wheel(-120.0, 0.0, 900.0, &map), WheelAction::PassThrough);
        assert_eq!(snapper.on_wheel(120.0, 3300.0, 900.0, &map), WheelAction::PassThrough);
        assert!(!snapper.is_snapping());
        assert_eq!(sched.pending_timers(), 0);
    }

    #[test]
    fn test_snap_width_gate() {
        assert!(WheelSnapper::enabled_for(1440.0, WHEEL_SNAP_MIN_WIDTH));
        assert!(!WheelSnapper::enabled_for(1439.0, WHEEL_SNAP_MIN_WIDTH));
    }
}
