use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::card::Card;
use crate::deck::Deck;
use crate::hand;
use crate::report::{Outcome, ResultReporter};

/// Cards consumed by the opening deal: two to the player, two to the dealer.
pub const OPENING_DEAL_CARDS: usize = 4;

/// The dealer draws to 16 and stands on all 17s.
pub const DEALER_STANDS_AT: u8 = 17;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundError {
    /// Guard against a broken deck implementation; a fresh 52-card deck can
    /// always cover the opening deal.
    #[error("deck holds {0} cards, the opening deal needs four")]
    ShortDeck(usize),
}

/// One complete deal-through-outcome cycle. Owned by a single presentation
/// session and mutated only through `hit` and `stand`; once an outcome is
/// set the round is terminal and both transitions become no-ops.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    deck: Deck,
    player_hand: Vec<Card>,
    dealer_hand: Vec<Card>,
    outcome: Option<Outcome>,
    message: String,
    reporter: ResultReporter,
}

impl Round {
    /// Opening deal: two cards to the player, then two to the dealer. Fails
    /// without dealing anything when the deck cannot cover all four draws.
    pub fn deal(mut deck: Deck) -> Result<Round, RoundError> {
        if deck.remaining() < OPENING_DEAL_CARDS {
            return Err(RoundError::ShortDeck(deck.remaining()));
        }

        let mut player_hand = Vec::with_capacity(2);
        let mut dealer_hand = Vec::with_capacity(2);
        for _ in 0..2 {
            player_hand.extend(deck.draw());
        }
        for _ in 0..2 {
            dealer_hand.extend(deck.draw());
        }

        Ok(Round {
            deck,
            player_hand,
            dealer_hand,
            outcome: None,
            message: String::new(),
            reporter: ResultReporter::default(),
        })
    }

    /// Draw one card for the player. No-op once the round is terminal or the
    /// deck is empty. Going over 21 settles the round as a loss.
    pub fn hit(&mut self) -> RoundSnapshot {
        if self.is_terminal() || self.deck.is_empty() {
            return self.snapshot();
        }

        self.player_hand.extend(self.deck.draw());
        if hand::is_busted(&self.player_hand) {
            self.settle(Outcome::Loss, "You bust!");
        }

        self.snapshot()
    }

    /// End the player's turn. The dealer draws while under 17 and the deck
    /// lasts, then the final values decide the outcome. No-op once terminal.
    pub fn stand(&mut self) -> RoundSnapshot {
        if self.is_terminal() {
            return self.snapshot();
        }

        while hand::hand_value(&self.dealer_hand) < DEALER_STANDS_AT && !self.deck.is_empty() {
            self.dealer_hand.extend(self.deck.draw());
        }

        let player = hand::hand_value(&self.player_hand);
        let dealer = hand::hand_value(&self.dealer_hand);
        if hand::is_busted(&self.dealer_hand) {
            self.settle(Outcome::Win, "Dealer busts!");
        } else if dealer > player {
            self.settle(Outcome::Loss, "Dealer wins.");
        } else if dealer < player {
            self.settle(Outcome::Win, "You win!");
        } else {
            self.settle(Outcome::Draw, "Push.");
        }

        self.snapshot()
    }

    fn settle(&mut self, outcome: Outcome, message: &str) {
        self.outcome = Some(outcome);
        self.message = message.to_string();
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn player_hand(&self) -> &[Card] {
        &self.player_hand
    }

    pub fn dealer_hand(&self) -> &[Card] {
        &self.dealer_hand
    }

    pub fn deck_remaining(&self) -> usize {
        self.deck.remaining()
    }

    /// The settled outcome, handed over exactly once per round so the caller
    /// can forward it to the scoreboard without double counting.
    pub fn take_report(&mut self) -> Option<Outcome> {
        self.reporter.deliver(self.outcome)
    }

    /// Immutable view of the round for rendering.
    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            player_hand: self.player_hand.clone(),
            dealer_hand: self.dealer_hand.clone(),
            is_terminal: self.is_terminal(),
            outcome: self.outcome,
            message: self.message.clone(),
            deck_remaining: self.deck.remaining(),
        }
    }
}

/// An immutable view of a round for presentation. Hand values are derived
/// on demand rather than stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub player_hand: Vec<Card>,
    pub dealer_hand: Vec<Card>,
    pub is_terminal: bool,
    pub outcome: Option<Outcome>,
    pub message: String,
    pub deck_remaining: usize,
}

impl RoundSnapshot {
    pub fn player_value(&self) -> u8 {
        hand::hand_value(&self.player_hand)
    }

    pub fn dealer_value(&self) -> u8 {
        hand::hand_value(&self.dealer_hand)
    }

    /// Value of the dealer's face-up card alone, for rendering before the
    /// hole card is revealed.
    pub fn dealer_up_card_value(&self) -> u8 {
        hand::hand_value(self.dealer_hand.get(..1).unwrap_or(&[]))
    }
}

#[cfg(test)]
mod tests;
