use crate::card::Card;

/// Best blackjack total for a hand. Aces count as 11 until the total would
/// bust, then drop to 1 one at a time. An empty hand is worth 0, and partial
/// hands (e.g. the dealer's lone up-card) are valued the same way.
pub fn hand_value(cards: &[Card]) -> u8 {
    let mut total = 0;
    let mut aces = 0;

    for card in cards {
        let value = card.value();
        if value == 11 {
            aces += 1;
        }
        total += value;
    }

    // Demote aces while the hand is over
    while total > 21 && aces > 0 {
        total -= 10;
        aces -= 1;
    }

    total
}

/// A hand is soft while at least one ace still counts as 11.
pub fn is_soft(cards: &[Card]) -> bool {
    let floor: u8 = cards
        .iter()
        .map(|c| if c.value() == 11 { 1 } else { c.value() })
        .sum();
    cards.iter().any(|c| c.value() == 11) && hand_value(cards) == floor + 10
}

/// Hand value over 21.
pub fn is_busted(cards: &[Card]) -> bool {
    hand_value(cards) > 21
}

/// A natural: 21 from the first two cards.
pub fn is_blackjack(cards: &[Card]) -> bool {
    cards.len() == 2 && hand_value(cards) == 21
}
