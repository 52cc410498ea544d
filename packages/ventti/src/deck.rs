use rand::{seq::SliceRandom, thread_rng};
use serde::{Deserialize, Serialize};

use crate::card::{Card, Rank, Suit};

/// A stack of cards. Draws come from the end of the backing vector, so the
/// last card is the top of the deck. A drawn card never returns to the deck.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// All 52 cards in a fixed suit-then-rank order.
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(52);
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                cards.push(Card::new(suit, rank));
            }
        }
        Self { cards }
    }

    /// A standard deck in uniformly random order. Every call produces an
    /// independent deck.
    pub fn shuffled() -> Self {
        let mut deck = Self::standard();
        let mut rng = thread_rng();
        deck.cards.shuffle(&mut rng);
        deck
    }

    /// A deck with a caller-chosen order. The last card is drawn first.
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// Remove and return the top card, `None` once the deck is empty.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
