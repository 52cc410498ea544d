mod card;
mod deck;
mod hand;
mod report;
mod round;

pub use card::{Card, Rank, Suit};
pub use deck::Deck;
pub use hand::{hand_value, is_blackjack, is_busted, is_soft};
pub use report::{Outcome, ResultReporter};
pub use round::{Round, RoundError, RoundSnapshot, DEALER_STANDS_AT, OPENING_DEAL_CARDS};
