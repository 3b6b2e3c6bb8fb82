use holdem_core::{evaluate_best_hand, Card, HandCategory, Rank::*, Suit::*};

fn c(rank: holdem_core::Rank, suit: holdem_core::Suit) -> Card {
    Card { rank, suit }
}

#[test]
fn ace_high_straight_flush_beats_everything() {
    let hand = vec![
        c(Ace, Spades),
        c(King, Spades),
        c(Queen, Spades),
        c(Jack, Spades),
        c(Ten, Spades),
        c(Two, Hearts),
        c(Three, Clubs),
    ];
    let eval = evaluate_best_hand(&hand);
    assert_eq!(eval.category, HandCategory::StraightFlush);
    assert_eq!(eval.tiebreak, vec![Ace]);
}

#[test]
fn four_of_a_kind_ranks_above_full_house() {
    let quads = evaluate_best_hand(&vec![
        c(Nine, Hearts),
        c(Nine, Diamonds),
        c(Nine, Clubs),
        c(Nine, Spades),
        c(Two, Hearts),
        c(Three, Clubs),
        c(Four, Spades),
    ]);
    let full_house = evaluate_best_hand(&vec![
        c(Nine, Hearts),
        c(Nine, Diamonds),
        c(Nine, Clubs),
        c(Two, Spades),
        c(Two, Hearts),
        c(Three, Clubs),
        c(Four, Spades),
    ]);
    assert_eq!(quads.category, HandCategory::FourOfAKind);
    assert_eq!(full_house.category, HandCategory::FullHouse);
    assert!(quads > full_house);
}

#[test]
fn full_house_tiebreak_prefers_higher_trips_first() {
    let aces_over = evaluate_best_hand(&vec![
        c(Ace, Hearts),
        c(Ace, Diamonds),
        c(Ace, Clubs),
        c(Two, Spades),
        c(Two, Hearts),
    ]);
    let kings_over_aces = evaluate_best_hand(&vec![
        c(King, Hearts),
        c(King, Diamonds),
        c(King, Clubs),
        c(Ace, Spades),
        c(Ace, Hearts),
    ]);
    assert!(aces_over > kings_over_aces);
}

#[test]
fn flush_beats_straight() {
    let flush = evaluate_best_hand(&vec![
        c(Two, Hearts),
        c(Five, Hearts),
        c(Seven, Hearts),
        c(Nine, Hearts),
        c(Jack, Hearts),
    ]);
    let straight = evaluate_best_hand(&vec![
        c(Two, Clubs),
        c(Three, Hearts),
        c(Four, Diamonds),
        c(Five, Clubs),
        c(Six, Spades),
    ]);
    assert_eq!(flush.category, HandCategory::Flush);
    assert_eq!(straight.category, HandCategory::Straight);
    assert!(flush > straight);
}

#[test]
fn wheel_straight_is_five_high_not_ace_high() {
    let wheel = evaluate_best_hand(&vec![
        c(Ace, Clubs),
        c(Two, Diamonds),
        c(Three, Hearts),
        c(Four, Spades),
        c(Five, Clubs),
    ]);
    assert_eq!(wheel.category, HandCategory::Straight);
    assert_eq!(wheel.tiebreak, vec![Five]);
}

#[test]
fn two_pair_tiebreak_orders_high_pair_then_low_pair_then_kicker() {
    let a = evaluate_best_hand(&vec![
        c(King, Hearts),
        c(King, Diamonds),
        c(Queen, Clubs),
        c(Queen, Spades),
        c(Two, Hearts),
    ]);
    let b = evaluate_best_hand(&vec![
        c(King, Clubs),
        c(King, Spades),
        c(Queen, Hearts),
        c(Queen, Diamonds),
        c(Three, Clubs),
    ]);
    assert_eq!(a.category, HandCategory::TwoPair);
    assert!(b > a, "higher kicker should break the tie between identical two pairs");
}

#[test]
fn evaluator_finds_the_best_five_of_seven() {
    // Hole cards give trips; board alone offers only two pair.
    let cards = vec![
        c(Seven, Hearts),
        c(Seven, Diamonds),
        c(Seven, Clubs),
        c(King, Spades),
        c(King, Hearts),
        c(Two, Clubs),
        c(Three, Diamonds),
    ];
    let eval = evaluate_best_hand(&cards);
    assert_eq!(eval.category, HandCategory::FullHouse);
    assert_eq!(eval.tiebreak, vec![Seven, King]);
}

#[test]
fn high_card_orders_kickers_from_strongest_to_weakest() {
    let eval = evaluate_best_hand(&vec![
        c(Ace, Hearts),
        c(Jack, Diamonds),
        c(Eight, Clubs),
        c(Four, Spades),
        c(Two, Hearts),
    ]);
    assert_eq!(eval.category, HandCategory::HighCard);
    assert_eq!(eval.tiebreak, vec![Ace, Jack, Eight, Four, Two]);
}
