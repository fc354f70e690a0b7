//! Hand scoring

use super::cards::Card;

pub const BLACKJACK: u8 = 21;

/// Best total for a card sequence: aces count 11, dropping to 1 one at a
/// time while the total is over 21.
pub fn score_cards(cards: &[Card]) -> u8 {
    let mut total: u32 = cards.iter().map(|c| u32::from(c.rank.value())).sum();
    let mut soft_aces = cards.iter().filter(|c| c.rank.is_ace()).count();
    while total > u32::from(BLACKJACK) && soft_aces > 0 {
        total -= 10;
        soft_aces -= 1;
    }
    // A full deck tops out at 340
    total.min(u32::from(u8::MAX)) as u8
}

/// Dealt cards with the score kept in step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
    score: u8,
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
        self.score = score_cards(&self.cards);
    }

    pub fn clear(&mut self) {
        self.cards.clear();
        self.score = 0;
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn is_bust(&self) -> bool {
        self.score > BLACKJACK
    }

    pub fn is_blackjack(&self) -> bool {
        self.cards.len() == 2 && self.score == BLACKJACK
    }
}
