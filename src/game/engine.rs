//! Turn sequence: the player draws against a concealed opponent score
//!
//! Pure state machine; the table controller owns the timers that pace
//! `reveal` and `resolve`.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use thiserror::Error;

use super::cards::{Card, Deck};
use super::hand::{BLACKJACK, Hand};
use crate::consts::{OPPONENT_MAX, OPPONENT_MIN};

/// Shown in place of the opponent score until it is revealed
pub const CONCEALED: &str = "??";
pub const INTRO_MESSAGE: &str = "Get 21 or beat the opponent!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Idle,
    PlayerTurn,
    /// Player stayed; opponent reveal pending
    Resolving,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Bust,
    OpponentBust,
    Win,
    Loss,
    Push,
}

/// Status colour class of an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Good,
    Bad,
    Neutral,
}

impl Tone {
    pub fn color(&self) -> &'static str {
        match self {
            Tone::Good => "#48bb78",
            Tone::Bad => "#e53e3e",
            Tone::Neutral => "#ecc94b",
        }
    }
}

impl Outcome {
    pub fn decide(player: u8, opponent: u8) -> Self {
        if player > BLACKJACK {
            Outcome::Bust
        } else if opponent > BLACKJACK {
            Outcome::OpponentBust
        } else if player > opponent {
            Outcome::Win
        } else if player < opponent {
            Outcome::Loss
        } else {
            Outcome::Push
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Outcome::Bust => "Bust! You went over 21.",
            Outcome::OpponentBust => "Opponent Bust! You Win!",
            Outcome::Win => "You Win!",
            Outcome::Loss => "You Lost.",
            Outcome::Push => "Push (Tie).",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Outcome::OpponentBust | Outcome::Win => Tone::Good,
            Outcome::Bust | Outcome::Loss => Tone::Bad,
            Outcome::Push => Tone::Neutral,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("cannot {action} while {phase:?}")]
    InvalidAction {
        action: &'static str,
        phase: GamePhase,
    },
    #[error("deck is exhausted")]
    DeckExhausted,
}

pub struct CardGame {
    rng: Pcg32,
    deck: Deck,
    hand: Hand,
    opponent: u8,
    revealed: bool,
    phase: GamePhase,
    outcome: Option<Outcome>,
}

impl CardGame {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            deck: Deck::default(),
            hand: Hand::new(),
            opponent: 0,
            revealed: false,
            phase: GamePhase::Idle,
            outcome: None,
        }
    }

    /// Fresh shuffled deck, new opponent score, two cards dealt.
    /// Allowed from any phase.
    pub fn start(&mut self) {
        let deck = Deck::shuffled(&mut self.rng);
        let opponent = self.rng.random_range(OPPONENT_MIN..=OPPONENT_MAX);
        // A full deck always covers the opening deal
        let _ = self.start_with(deck, opponent);
    }

    /// Start from a stacked deck and a fixed opponent score
    pub fn start_with(&mut self, deck: Deck, opponent: u8) -> Result<(), GameError> {
        if deck.len() < 2 {
            return Err(GameError::DeckExhausted);
        }
        self.deck = deck;
        self.hand.clear();
        self.opponent = opponent;
        self.revealed = false;
        self.outcome = None;
        self.phase = GamePhase::PlayerTurn;
        for _ in 0..2 {
            if let Some(card) = self.deck.draw() {
                self.hand.push(card);
            }
        }
        log::debug!("Game started: {} vs hidden {}", self.hand.score(), opponent);
        Ok(())
    }

    /// New game once the previous one has finished
    pub fn restart(&mut self) -> Result<(), GameError> {
        self.expect_phase("restart", GamePhase::Finished)?;
        self.start();
        Ok(())
    }

    /// Draw one card; going over 21 ends the game
    pub fn hit(&mut self) -> Result<Card, GameError> {
        self.expect_phase("hit", GamePhase::PlayerTurn)?;
        let card = self.deck.draw().ok_or(GameError::DeckExhausted)?;
        self.hand.push(card);
        if self.hand.is_bust() {
            self.finish(Outcome::Bust);
        }
        Ok(card)
    }

    pub fn stay(&mut self) -> Result<(), GameError> {
        self.expect_phase("stay", GamePhase::PlayerTurn)?;
        self.phase = GamePhase::Resolving;
        Ok(())
    }

    /// Uncover the opponent score
    pub fn reveal(&mut self) -> Result<u8, GameError> {
        self.expect_phase("reveal", GamePhase::Resolving)?;
        self.revealed = true;
        Ok(self.opponent)
    }

    /// Compare scores and finish
    pub fn resolve(&mut self) -> Result<Outcome, GameError> {
        self.expect_phase("resolve", GamePhase::Resolving)?;
        self.revealed = true;
        let outcome = Outcome::decide(self.hand.score(), self.opponent);
        self.finish(outcome);
        Ok(outcome)
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn opponent_score(&self) -> u8 {
        self.opponent
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn opponent_display(&self) -> String {
        if self.revealed {
            self.opponent.to_string()
        } else {
            CONCEALED.to_string()
        }
    }

    fn expect_phase(&self, action: &'static str, phase: GamePhase) -> Result<(), GameError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(GameError::InvalidAction {
                action,
                phase: self.phase,
            })
        }
    }

    fn finish(&mut self, outcome: Outcome) {
        self.outcome = Some(outcome);
        self.phase = GamePhase::Finished;
        log::info!("Game finished: {}", outcome.message());
    }
}
