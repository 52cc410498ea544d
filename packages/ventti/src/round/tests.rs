use super::*;
use crate::card::{Rank, Suit};
use crate::deck::Deck;
use crate::hand::is_blackjack;

use Rank::*;
use Suit::*;

/// Deck that yields the listed cards in order: the first pair goes to the
/// player, the second to the dealer, the rest feed later draws.
fn seeded_deck(draw_order: &[(Rank, Suit)]) -> Deck {
    let cards = draw_order
        .iter()
        .rev()
        .map(|&(rank, suit)| Card::new(suit, rank))
        .collect();
    Deck::from_cards(cards)
}

#[test]
fn test_deal_shape() {
    let round = Round::deal(Deck::shuffled()).unwrap();
    let snapshot = round.snapshot();

    assert_eq!(snapshot.player_hand.len(), 2);
    assert_eq!(snapshot.dealer_hand.len(), 2);
    assert_eq!(snapshot.deck_remaining, 48);
    assert!(!snapshot.is_terminal);
    assert_eq!(snapshot.outcome, None);
    assert_eq!(snapshot.message, "");
}

#[test]
fn test_deal_order_player_first() {
    let round = Round::deal(seeded_deck(&[
        (Ace, Diamonds),
        (King, Hearts),
        (Nine, Spades),
        (Ten, Clubs),
    ]))
    .unwrap();

    assert_eq!(
        round.player_hand(),
        [Card::new(Diamonds, Ace), Card::new(Hearts, King)]
    );
    assert_eq!(
        round.dealer_hand(),
        [Card::new(Spades, Nine), Card::new(Clubs, Ten)]
    );
}

#[test]
fn test_deal_refuses_short_deck() {
    let deck = seeded_deck(&[(Ace, Diamonds), (King, Hearts), (Nine, Spades)]);
    let err = Round::deal(deck).unwrap_err();
    assert_eq!(err, RoundError::ShortDeck(3));
}

#[test]
fn test_hit_appends_one_card() {
    let mut round = Round::deal(seeded_deck(&[
        (Five, Diamonds),
        (Six, Hearts),
        (Nine, Spades),
        (Ten, Clubs),
        (Two, Hearts),
    ]))
    .unwrap();

    let snapshot = round.hit();
    assert_eq!(snapshot.player_hand.len(), 3);
    assert_eq!(snapshot.player_value(), 13);
    assert_eq!(snapshot.deck_remaining, 0);
    assert!(!snapshot.is_terminal);
}

#[test]
fn test_hit_past_21_is_a_terminal_loss() {
    let mut round = Round::deal(seeded_deck(&[
        (Ten, Spades),
        (Ten, Hearts),
        (Seven, Clubs),
        (Eight, Clubs),
        (Five, Diamonds),
    ]))
    .unwrap();

    let snapshot = round.hit();
    assert!(snapshot.is_terminal);
    assert_eq!(snapshot.outcome, Some(Outcome::Loss));
    assert_eq!(snapshot.message, "You bust!");
    assert_eq!(snapshot.player_value(), 25);
}

#[test]
fn test_terminal_round_is_absorbing() {
    let mut round = Round::deal(seeded_deck(&[
        (Ten, Spades),
        (Ten, Hearts),
        (Seven, Clubs),
        (Eight, Clubs),
        (Five, Diamonds),
        (Two, Diamonds),
    ]))
    .unwrap();

    let settled = round.hit();
    assert!(settled.is_terminal);

    // Repeated transitions return the identical snapshot and draw nothing
    assert_eq!(round.hit(), settled);
    assert_eq!(round.stand(), settled);
    assert_eq!(round.hit(), settled);
    assert_eq!(round.deck_remaining(), 1);
}

#[test]
fn test_hit_on_empty_deck_is_a_no_op() {
    let mut round = Round::deal(seeded_deck(&[
        (Five, Diamonds),
        (Six, Hearts),
        (Nine, Spades),
        (Ten, Clubs),
    ]))
    .unwrap();
    assert_eq!(round.deck_remaining(), 0);

    let before = round.snapshot();
    assert_eq!(round.hit(), before);
    assert_eq!(round.player_hand().len(), 2);
    assert!(!round.is_terminal());
}

#[test]
fn test_stand_dealer_draws_to_17() {
    let mut round = Round::deal(seeded_deck(&[
        (Ten, Spades),
        (Ten, Hearts),
        (Ten, Diamonds),
        (Six, Clubs),
        (Two, Diamonds),
        (Nine, Clubs),
    ]))
    .unwrap();

    // Dealer starts at 16, draws the 2 and stops on 18
    let snapshot = round.stand();
    assert_eq!(snapshot.dealer_value(), 18);
    assert_eq!(snapshot.dealer_hand.len(), 3);
    assert!(snapshot.dealer_value() >= DEALER_STANDS_AT);
    assert_eq!(snapshot.outcome, Some(Outcome::Win));
    assert_eq!(snapshot.message, "You win!");
}

#[test]
fn test_stand_dealer_busts_from_16() {
    let mut round = Round::deal(seeded_deck(&[
        (Ten, Spades),
        (Nine, Hearts),
        (Ten, Diamonds),
        (Six, Clubs),
        (Six, Diamonds),
    ]))
    .unwrap();

    let snapshot = round.stand();
    assert_eq!(snapshot.dealer_value(), 22);
    assert!(snapshot.is_terminal);
    assert_eq!(snapshot.outcome, Some(Outcome::Win));
    assert_eq!(snapshot.message, "Dealer busts!");
}

#[test]
fn test_stand_dealer_higher_is_a_loss() {
    let mut round = Round::deal(seeded_deck(&[
        (Ten, Spades),
        (Seven, Hearts),
        (Ten, Diamonds),
        (Nine, Clubs),
    ]))
    .unwrap();

    let snapshot = round.stand();
    assert_eq!(snapshot.outcome, Some(Outcome::Loss));
    assert_eq!(snapshot.message, "Dealer wins.");
}

#[test]
fn test_stand_equal_values_is_a_draw() {
    let mut round = Round::deal(seeded_deck(&[
        (Ten, Spades),
        (Ten, Hearts),
        (Ten, Diamonds),
        (Queen, Clubs),
    ]))
    .unwrap();

    let snapshot = round.stand();
    assert_eq!(snapshot.player_value(), 20);
    assert_eq!(snapshot.dealer_value(), 20);
    assert_eq!(snapshot.outcome, Some(Outcome::Draw));
    assert_eq!(snapshot.message, "Push.");
}

#[test]
fn test_stand_is_idempotent_after_settlement() {
    let mut round = Round::deal(seeded_deck(&[
        (Ten, Spades),
        (Ten, Hearts),
        (Ten, Diamonds),
        (Queen, Clubs),
    ]))
    .unwrap();

    let settled = round.stand();
    assert_eq!(round.stand(), settled);
    assert_eq!(round.hit(), settled);
    assert_eq!(round.stand(), settled);
}

#[test]
fn test_dealer_stops_when_deck_runs_out() {
    // Dealer sits at 4 with nothing left to draw
    let mut round = Round::deal(seeded_deck(&[
        (Ten, Spades),
        (Ten, Hearts),
        (Two, Diamonds),
        (Two, Clubs),
    ]))
    .unwrap();

    let snapshot = round.stand();
    assert_eq!(snapshot.dealer_value(), 4);
    assert_eq!(snapshot.outcome, Some(Outcome::Win));
}

#[test]
fn test_report_is_delivered_exactly_once() {
    let mut round = Round::deal(seeded_deck(&[
        (Ten, Spades),
        (Ten, Hearts),
        (Ten, Diamonds),
        (Queen, Clubs),
    ]))
    .unwrap();

    assert_eq!(round.take_report(), None);
    round.stand();
    assert_eq!(round.take_report(), Some(Outcome::Draw));
    assert_eq!(round.take_report(), None);
    round.stand();
    assert_eq!(round.take_report(), None);
}

#[test]
fn test_up_card_value_ignores_the_hole_card() {
    let round = Round::deal(seeded_deck(&[
        (Five, Diamonds),
        (Six, Hearts),
        (Nine, Spades),
        (Ten, Clubs),
    ]))
    .unwrap();

    let snapshot = round.snapshot();
    assert_eq!(snapshot.dealer_up_card_value(), 9);
    assert_eq!(snapshot.dealer_value(), 19);
}

#[test]
fn test_up_card_value_of_an_empty_hand_is_zero() {
    let snapshot = RoundSnapshot {
        player_hand: Vec::new(),
        dealer_hand: Vec::new(),
        is_terminal: false,
        outcome: None,
        message: String::new(),
        deck_remaining: 0,
    };
    assert_eq!(snapshot.dealer_up_card_value(), 0);
    assert_eq!(snapshot.player_value(), 0);
}

#[test]
fn test_seeded_blackjack_round_end_to_end() {
    // Top of the deck: A♦, K♥ to the player, 9♠, 10♣ to the dealer
    let deck = seeded_deck(&[
        (Ace, Diamonds),
        (King, Hearts),
        (Nine, Spades),
        (Ten, Clubs),
        (Two, Clubs),
        (Three, Clubs),
    ]);

    let mut round = Round::deal(deck).unwrap();
    let dealt = round.snapshot();
    assert_eq!(dealt.player_value(), 21);
    assert!(is_blackjack(&dealt.player_hand));
    assert_eq!(dealt.dealer_up_card_value(), 9);

    // Dealer holds 19 and never draws; player wins on 21 vs 19
    let settled = round.stand();
    assert_eq!(settled.dealer_hand.len(), 2);
    assert_eq!(settled.deck_remaining, 2);
    assert_eq!(settled.outcome, Some(Outcome::Win));
    assert_eq!(round.take_report(), Some(Outcome::Win));
}
