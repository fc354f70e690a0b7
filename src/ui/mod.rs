//! Page interaction: dialogs, navigation and cursor

pub mod cursor;
pub mod focus;
pub mod modal;
pub mod nav;
pub mod pricing;

pub use cursor::CursorTrail;
pub use focus::{trap_focus, FOCUSABLE_SELECTOR};
pub use modal::{KeyOutcome, Modal, ModalParts};
pub use nav::{NavHighlighter, Section, SectionMap, WheelAction, WheelSnapper};
pub use pricing::{PriceSheet, PricingModal};
