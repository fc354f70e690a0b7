//! Site settings and device tiering
//!
//! Read from an optional JSON block embedded in the page. Every field has a
//! default, so a partial block only overrides what it names.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Substrings that mark a touch-first user agent
const MOBILE_AGENTS: [&str; 8] = [
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];

/// Device performance tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DeviceTier {
    #[default]
    Desktop,
    Mobile,
}

impl DeviceTier {
    /// Classify from viewport width and user agent
    pub fn detect(viewport_width: f64, user_agent: &str) -> Self {
        let agent = user_agent.to_lowercase();
        if viewport_width <= MOBILE_MAX_WIDTH || MOBILE_AGENTS.iter().any(|m| agent.contains(m)) {
            DeviceTier::Mobile
        } else {
            DeviceTier::Desktop
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceTier::Desktop => "desktop",
            DeviceTier::Mobile => "mobile",
        }
    }

    /// Pointer repulsion only makes sense with a hovering cursor
    pub fn pointer_interaction(&self) -> bool {
        *self == DeviceTier::Desktop
    }
}

/// Log verbosity for the browser console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level(self) -> log::Level {
        match self {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid settings json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field} must be positive")]
    NotPositive { field: &'static str },
}

/// Site tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Particle field ===
    pub desktop_particles: usize,
    pub mobile_particles: usize,
    /// Pointer repulsion radius
    pub pointer_radius: f32,
    /// Draw lines between nearby particles (desktop only)
    pub connect_particles: bool,
    pub connect_distance: f32,

    // === Card game ===
    pub deal_stagger_ms: u32,
    pub reveal_delay_ms: u32,
    pub resolve_delay_ms: u32,

    // === Navigation ===
    pub snap_cooldown_ms: u32,
    pub wheel_snap_min_width: f64,

    // === Accessibility ===
    /// Force reduced motion regardless of the OS preference
    pub reduced_motion: bool,

    pub log_level: LogLevel,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            desktop_particles: DESKTOP_PARTICLES,
            mobile_particles: MOBILE_PARTICLES,
            pointer_radius: POINTER_RADIUS,
            // Off unless the page opts in
            connect_particles: false,
            connect_distance: CONNECT_DISTANCE,

            deal_stagger_ms: DEAL_STAGGER_MS,
            reveal_delay_ms: REVEAL_DELAY_MS,
            resolve_delay_ms: RESOLVE_DELAY_MS,

            snap_cooldown_ms: SNAP_COOLDOWN_MS,
            wheel_snap_min_width: WHEEL_SNAP_MIN_WIDTH,

            reduced_motion: false,
            log_level: LogLevel::Info,
        }
    }
}

impl Settings {
    /// Parse and validate a settings block
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.pointer_radius <= 0.0 {
            return Err(ConfigError::NotPositive {
                field: "pointer_radius",
            });
        }
        if self.connect_distance <= 0.0 {
            return Err(ConfigError::NotPositive {
                field: "connect_distance",
            });
        }
        Ok(())
    }

    /// Particle count for a device tier
    pub fn particle_count(&self, tier: DeviceTier) -> usize {
        match tier {
            DeviceTier::Desktop => self.desktop_particles,
            DeviceTier::Mobile => self.mobile_particles,
        }
    }

    /// Connection distance if connections are drawn on this tier
    pub fn connections(&self, tier: DeviceTier) -> Option<f32> {
        (self.connect_particles && tier == DeviceTier::Desktop).then_some(self.connect_distance)
    }

    /// Element id of the JSON settings block
    const CONFIG_ELEMENT_ID: &'static str = "vitrine-config";

    /// Load settings from the page's config block (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let text = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::CONFIG_ELEMENT_ID))
            .and_then(|el| el.text_content());

        let Some(json) = text else {
            return Self::default();
        };

        match Self::from_json(&json) {
            Ok(settings) => settings,
            Err(e) => {
                // Logger isn't up yet, so go straight to the console
                web_sys::console::warn_1(&format!("vitrine: {e}, using defaults").into());
                Self::default()
            }
        }
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        log::debug!("No page to read #{} from", Self::CONFIG_ELEMENT_ID);
        Self::default()
    }
}
