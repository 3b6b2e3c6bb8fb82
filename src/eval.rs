use crate::card::{Card, Rank, Suit};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// Hand category, declared low to high so `derive(Ord)` matches spec's
/// primary ordering directly. The royal flush is not a distinct
/// category — it is simply the ace-high straight flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HandCategory {
    HighCard,
    OnePair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
}

/// A fully evaluated 5-card hand: category plus a tie-break rank list in
/// the order that decides ties within the category. `Ord` on this type
/// *is* the spec's total-order key — comparing two evaluations directly
/// answers "which hand wins".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandEvaluation {
    pub category: HandCategory,
    pub tiebreak: Vec<Rank>,
    pub best_five: [Card; 5],
}

impl PartialOrd for HandEvaluation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HandEvaluation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.category
            .cmp(&other.category)
            .then_with(|| self.tiebreak.cmp(&other.tiebreak))
    }
}

/// Evaluates the best possible 5-card hand from 5..7 cards, enumerating
/// every 5-card subset when more than 5 are given.
pub fn evaluate_best_hand(cards: &[Card]) -> HandEvaluation {
    assert!(cards.len() >= 5, "evaluator requires at least 5 cards, got {}", cards.len());
    if cards.len() == 5 {
        let five = [cards[0], cards[1], cards[2], cards[3], cards[4]];
        return evaluate_five(&five);
    }
    cards
        .iter()
        .copied()
        .combinations(5)
        .map(|c| evaluate_five(&[c[0], c[1], c[2], c[3], c[4]]))
        .max()
        .expect("at least one 5-card combination exists when len >= 5")
}

fn evaluate_five(cards: &[Card; 5]) -> HandEvaluation {
    let mut rank_counts: HashMap<Rank, u8> = HashMap::new();
    for card in cards {
        *rank_counts.entry(card.rank).or_insert(0) += 1;
    }
    let mut suit_counts: HashMap<Suit, u8> = HashMap::new();
    for card in cards {
        *suit_counts.entry(card.suit).or_insert(0) += 1;
    }

    let is_flush = suit_counts.values().any(|&n| n == 5);
    let straight_high = check_straight(cards);

    if is_flush {
        if let Some(high) = straight_high {
            return HandEvaluation {
                category: HandCategory::StraightFlush,
                tiebreak: vec![high],
                best_five: *cards,
            };
        }
    }

    if let Some(quad_rank) = rank_counts
        .iter()
        .find(|&(_, &n)| n == 4)
        .map(|(r, _)| *r)
    {
        let kicker = rank_counts
            .iter()
            .filter(|(r, _)| **r != quad_rank)
            .map(|(r, _)| *r)
            .max()
            .expect("one kicker remains after four of a kind");
        return HandEvaluation {
            category: HandCategory::FourOfAKind,
            tiebreak: vec![quad_rank, kicker],
            best_five: *cards,
        };
    }

    if let Some(trip_rank) = rank_counts
        .iter()
        .find(|&(_, &n)| n == 3)
        .map(|(r, _)| *r)
    {
        if let Some(pair_rank) = rank_counts
            .iter()
            .filter(|(r, _)| **r != trip_rank)
            .find(|&(_, &n)| n >= 2)
            .map(|(r, _)| *r)
        {
            return HandEvaluation {
                category: HandCategory::FullHouse,
                tiebreak: vec![trip_rank, pair_rank],
                best_five: *cards,
            };
        }
    }

    if is_flush {
        let mut kickers: Vec<Rank> = cards.iter().map(|c| c.rank).collect();
        kickers.sort_by(|a, b| b.cmp(a));
        return HandEvaluation {
            category: HandCategory::Flush,
            tiebreak: kickers,
            best_five: *cards,
        };
    }

    if let Some(high) = straight_high {
        return HandEvaluation {
            category: HandCategory::Straight,
            tiebreak: vec![high],
            best_five: *cards,
        };
    }

    if let Some(trip_rank) = rank_counts
        .iter()
        .find(|&(_, &n)| n == 3)
        .map(|(r, _)| *r)
    {
        let mut kickers: Vec<Rank> = rank_counts
            .iter()
            .filter(|(r, _)| **r != trip_rank)
            .map(|(r, _)| *r)
            .collect();
        kickers.sort_by(|a, b| b.cmp(a));
        kickers.truncate(2);
        return HandEvaluation {
            category: HandCategory::ThreeOfAKind,
            tiebreak: std::iter::once(trip_rank).chain(kickers).collect(),
            best_five: *cards,
        };
    }

    let mut pairs: Vec<Rank> = rank_counts
        .iter()
        .filter(|&(_, &n)| n == 2)
        .map(|(r, _)| *r)
        .collect();
    if pairs.len() >= 2 {
        pairs.sort_by(|a, b| b.cmp(a));
        let (high_pair, low_pair) = (pairs[0], pairs[1]);
        let kicker = rank_counts
            .iter()
            .filter(|(r, _)| **r != high_pair && **r != low_pair)
            .map(|(r, _)| *r)
            .max()
            .expect("one kicker remains after two pair");
        return HandEvaluation {
            category: HandCategory::TwoPair,
            tiebreak: vec![high_pair, low_pair, kicker],
            best_five: *cards,
        };
    }

    if let Some(pair_rank) = rank_counts
        .iter()
        .find(|&(_, &n)| n == 2)
        .map(|(r, _)| *r)
    {
        let mut kickers: Vec<Rank> = rank_counts
            .iter()
            .filter(|(r, _)| **r != pair_rank)
            .map(|(r, _)| *r)
            .collect();
        kickers.sort_by(|a, b| b.cmp(a));
        kickers.truncate(3);
        return HandEvaluation {
            category: HandCategory::OnePair,
            tiebreak: std::iter::once(pair_rank).chain(kickers).collect(),
            best_five: *cards,
        };
    }

    let mut kickers: Vec<Rank> = cards.iter().map(|c| c.rank).collect();
    kickers.sort_by(|a, b| b.cmp(a));
    HandEvaluation {
        category: HandCategory::HighCard,
        tiebreak: kickers,
        best_five: *cards,
    }
}

/// Returns the straight's high card, if the five cards form one.
/// The wheel (A-2-3-4-5) counts as five-high, strictly below 6-high.
fn check_straight(cards: &[Card; 5]) -> Option<Rank> {
    let mut values: HashSet<u8> = cards.iter().map(|c| c.rank.value()).collect();
    if values.contains(&14) {
        values.insert(1);
    }
    let mut sorted: Vec<u8> = values.into_iter().collect();
    sorted.sort_unstable();

    let mut consecutive = 1;
    let mut high: Option<u8> = None;
    for i in 1..sorted.len() {
        if sorted[i] == sorted[i - 1] + 1 {
            consecutive += 1;
            if consecutive >= 5 {
                high = Some(sorted[i]);
            }
        } else if sorted[i] != sorted[i - 1] {
            consecutive = 1;
        }
    }
    high.map(Rank::from_value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Rank::*, Suit::*};

    fn c(rank: Rank, suit: Suit) -> Card {
        Card { rank, suit }
    }

    #[test]
    fn royal_flush_is_just_a_straight_flush() {
        let hand = [
            c(Ace, Hearts),
            c(King, Hearts),
            c(Queen, Hearts),
            c(Jack, Hearts),
            c(Ten, Hearts),
        ];
        let eval = evaluate_five(&hand);
        assert_eq!(eval.category, HandCategory::StraightFlush);
        assert_eq!(eval.tiebreak, vec![Ace]);
    }

    #[test]
    fn wheel_loses_to_six_high_straight() {
        let wheel = evaluate_five(&[
            c(Ace, Spades),
            c(Two, Hearts),
            c(Three, Clubs),
            c(Four, Diamonds),
            c(Five, Spades),
        ]);
        let six_high = evaluate_five(&[
            c(Six, Hearts),
            c(Five, Clubs),
            c(Four, Spades),
            c(Three, Hearts),
            c(Two, Diamonds),
        ]);
        assert_eq!(wheel.category, HandCategory::Straight);
        assert_eq!(wheel.tiebreak, vec![Five]);
        assert!(six_high > wheel);
    }

    #[test]
    fn four_of_a_kind_kicker_from_seven_cards() {
        let cards = vec![
            c(Ace, Hearts),
            c(Ace, Diamonds),
            c(Ace, Clubs),
            c(Ace, Spades),
            c(King, Hearts),
            c(Two, Clubs),
            c(Three, Clubs),
        ];
        let eval = evaluate_best_hand(&cards);
        assert_eq!(eval.category, HandCategory::FourOfAKind);
        assert_eq!(eval.tiebreak, vec![Ace, King]);
    }

    #[test]
    fn evaluator_picks_best_of_seven() {
        // Board has a flush draw complete via two hole suited connectors beating trips.
        let cards = vec![
            c(Nine, Hearts),
            c(Eight, Hearts),
            c(Seven, Hearts),
            c(Six, Hearts),
            c(Two, Hearts),
            c(Two, Clubs),
            c(Two, Spades),
        ];
        let eval = evaluate_best_hand(&cards);
        assert_eq!(eval.category, HandCategory::Flush);
    }

    #[test]
    fn ordering_is_irreflexive_and_transitive_for_sample_hands() {
        let high_card = evaluate_five(&[
            c(Ace, Hearts),
            c(King, Diamonds),
            c(Nine, Clubs),
            c(Five, Spades),
            c(Two, Hearts),
        ]);
        let one_pair = evaluate_five(&[
            c(Ace, Hearts),
            c(Ace, Diamonds),
            c(Nine, Clubs),
            c(Five, Spades),
            c(Two, Hearts),
        ]);
        let full_house = evaluate_five(&[
            c(Ace, Hearts),
            c(Ace, Diamonds),
            c(Ace, Clubs),
            c(Five, Spades),
            c(Five, Hearts),
        ]);
        assert!(high_card < one_pair);
        assert!(one_pair < full_house);
        assert!(high_card < full_house);
        assert_eq!(high_card.cmp(&high_card), Ordering::Equal);
    }
}
