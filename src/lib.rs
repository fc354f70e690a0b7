//! Vitrine - interactive layer for a portfolio site
//!
//! Core modules:
//! - `sim`: Particle field simulation and its frame animator
//! - `ui`: Focus trap, modal controller, pricing sheet, navigation, cursor
//! - `game`: Easter-egg card game (deck, scoring, table controller)
//! - `renderer`: 2D drawing surface abstraction
//! - `platform`: DOM and scheduler abstraction (browser and in-memory)
//! - `settings`: Tunables loaded from the page

pub mod game;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod ui;

pub use settings::{DeviceTier, Settings};

/// Site configuration constants
pub mod consts {
    /// Particle counts per device tier
    pub const DESKTOP_PARTICLES: usize = 80;
    pub const MOBILE_PARTICLES: usize = 40;

    /// Pointer repulsion radius (CSS pixels)
    pub const POINTER_RADIUS: f32 = 150.0;
    /// Max distance for a connection line between two particles
    pub const CONNECT_DISTANCE: f32 = 120.0;

    /// Particle fill colour
    pub const PARTICLE_RGB: (u8, u8, u8) = (139, 133, 99);
    pub const PARTICLE_ALPHA: f32 = 0.5;
    /// Peak alpha of a connection line (at zero distance)
    pub const CONNECTION_ALPHA: f32 = 0.2;

    /// Viewports at or below this width use the mobile layout
    pub const MOBILE_MAX_WIDTH: f64 = 768.0;
    /// Wheel snapping only kicks in at or above this width
    pub const WHEEL_SNAP_MIN_WIDTH: f64 = 1440.0;

    /// Delay before re-measuring after an orientation change
    pub const ORIENTATION_DEBOUNCE_MS: u32 = 100;

    /// Card game pacing
    pub const DEAL_STAGGER_MS: u32 = 200;
    pub const REVEAL_DELAY_MS: u32 = 1000;
    pub const RESOLVE_DELAY_MS: u32 = 600;

    /// Opponent score is drawn once per game from this range
    pub const OPPONENT_MIN: u8 = 15;
    pub const OPPONENT_MAX: u8 = 26;

    /// Clicks needed on the trigger to open the game
    pub const EASTER_EGG_CLICKS: u32 = 5;
    /// Click counter resets after this much idle time
    pub const EASTER_EGG_WINDOW_MS: u32 = 1000;

    /// Wheel snapping
    pub const SNAP_COOLDOWN_MS: u32 = 700;
    pub const WHEEL_MIN_DELTA: f64 = 10.0;

    /// Section link offsets (wide / narrow layout)
    pub const NAV_OFFSET_WIDE: f64 = 80.0;
    pub const NAV_OFFSET_NARROW: f64 = -40.0;
    /// Navbar becomes visible once scrolled past this
    pub const NAVBAR_REVEAL_SCROLL: f64 = 300.0;

    /// Cursor ring easing factor per frame
    pub const CURSOR_EASE: f32 = 0.15;
}

/// Whether the reduced-motion preference allows decorative animation
#[inline]
pub fn motion_allowed(prefers_reduced_motion: bool, settings: &Settings) -> bool {
    !prefers_reduced_motion && !settings.reduced_motion
}
