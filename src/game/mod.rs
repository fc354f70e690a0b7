//! Easter-egg card game
//!
//! - `cards` / `hand`: deck, shuffle and ace-adjusted scoring
//! - `engine`: turn sequence as a pure state machine
//! - `table`: modal controller that renders the game and owns its timers
//! - `trigger`: click burst that opens it

pub mod cards;
pub mod engine;
pub mod hand;
pub mod table;
pub mod trigger;

pub use cards::{Card, Deck, Rank, Suit};
pub use engine::{CardGame, GameError, GamePhase, Outcome, Tone};
pub use hand::{Hand, score_cards};
pub use table::{GameTable, TableNodes, TableTiming};
pub use trigger::ClickBurst;
