use serde::{Deserialize, Serialize};

/// One of the four French suits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

    pub fn symbol(&self) -> char {
        match self {
            Suit::Spades => '♠',
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
            Suit::Clubs => '♣',
        }
    }
}

/// Card rank, ace through king.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    Ace,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Blackjack value of the rank. An ace counts as 11 here; demoting it
    /// to 1 is the valuation's job.
    pub fn value(&self) -> u8 {
        match self {
            Rank::Ace => 11,
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten | Rank::Jack | Rank::Queen | Rank::King => 10,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }
}

/// A single playing card. A standard deck holds one per (suit, rank) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    pub fn new(suit: Suit, rank: Rank) -> Self {
        Self { suit, rank }
    }

    /// Blackjack value of this card.
    pub fn value(&self) -> u8 {
        self.rank.value()
    }

    /// Short display form, e.g. `A♠` or `10♥`.
    pub fn to_display(&self) -> String {
        format!("{}{}", self.rank.label(), self.suit.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_display() {
        assert_eq!(Card::new(Suit::Spades, Rank::Ace).to_display(), "A♠");
        assert_eq!(Card::new(Suit::Hearts, Rank::Ten).to_display(), "10♥");
        assert_eq!(Card::new(Suit::Clubs, Rank::Queen).to_display(), "Q♣");
    }

    #[test]
    fn test_card_values() {
        assert_eq!(Card::new(Suit::Hearts, Rank::Ace).value(), 11);
        assert_eq!(Card::new(Suit::Diamonds, Rank::Two).value(), 2);
        assert_eq!(Card::new(Suit::Spades, Rank::Ten).value(), 10);
        assert_eq!(Card::new(Suit::Clubs, Rank::Jack).value(), 10);
        assert_eq!(Card::new(Suit::Clubs, Rank::King).value(), 10);
    }

    #[test]
    fn test_rank_all_covers_thirteen() {
        assert_eq!(Rank::ALL.len(), 13);
        assert_eq!(Suit::ALL.len(), 4);
    }
}
