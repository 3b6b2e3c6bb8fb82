use rand::rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Card rank, ordered low to high so `derive(Ord)` gives the right comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    Two = 2,
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
    Ace,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
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
        Rank::Ace,
    ];

    pub fn value(&self) -> u8 {
        *self as u8
    }

    pub fn from_value(value: u8) -> Self {
        match value {
            2 => Rank::Two,
            3 => Rank::Three,
            4 => Rank::Four,
            5 => Rank::Five,
            6 => Rank::Six,
            7 => Rank::Seven,
            8 => Rank::Eight,
            9 => Rank::Nine,
            10 => Rank::Ten,
            11 => Rank::Jack,
            12 => Rank::Queen,
            13 => Rank::King,
            14 | 1 => Rank::Ace,
            _ => panic!("invalid rank value: {value}"),
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let c = match self {
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        };
        write!(f, "{c}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let c = match self {
            Suit::Clubs => 'c',
            Suit::Diamonds => 'd',
            Suit::Hearts => 'h',
            Suit::Spades => 's',
        };
        write!(f, "{c}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

/// The 32-bit LCG pinned by the spec so seeded shuffles reproduce
/// identically across implementations. Not a general-purpose PRNG —
/// do not reuse outside of `Deck::new`.
struct SeededStream {
    state: u32,
}

impl SeededStream {
    fn from_seed(seed: &str) -> Self {
        let mut h: u32 = 0;
        for byte in seed.bytes() {
            h = h.wrapping_mul(31).wrapping_add(byte as u32);
        }
        Self { state: h }
    }

    /// Advances the generator and returns a uniform float in [0, 1).
    fn next_unit(&mut self) -> f64 {
        self.state = (self.state.wrapping_mul(9301).wrapping_add(49297)) % 233280;
        self.state as f64 / 233280.0
    }
}

fn canonical_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(52);
    for &suit in &Suit::ALL {
        for &rank in &Rank::ALL {
            deck.push(Card { rank, suit });
        }
    }
    deck
}

fn fisher_yates_seeded(deck: &mut [Card], stream: &mut SeededStream) {
    for i in (1..deck.len()).rev() {
        let j = (stream.next_unit() * (i as f64 + 1.0)).floor() as usize;
        deck.swap(i, j);
    }
}

/// A deck of cards with a cursor tracking how many have been dealt.
/// `remaining()` is the public view of `GameState`'s "remaining deck".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
    cursor: usize,
}

impl Deck {
    /// An empty deck, used before any hand has been dealt.
    pub fn empty() -> Self {
        Self {
            cards: Vec::new(),
            cursor: 0,
        }
    }

    /// Produces a freshly shuffled deck. With a seed, the shuffle follows
    /// the spec's pinned LCG bit-for-bit; without one, falls back to
    /// `rand`'s own shuffle (non-reproducible, used for live play).
    pub fn new(seed: Option<&str>) -> Self {
        let mut cards = canonical_deck();
        match seed {
            Some(seed) => {
                let mut stream = SeededStream::from_seed(seed);
                fisher_yates_seeded(&mut cards, &mut stream);
            }
            None => {
                let mut rng = rng();
                cards.shuffle(&mut rng);
            }
        }
        Self { cards, cursor: 0 }
    }

    /// Deals the next card off the top, or `None` if the deck is exhausted.
    pub fn draw(&mut self) -> Option<Card> {
        let card = self.cards.get(self.cursor).copied();
        if card.is_some() {
            self.cursor += 1;
        }
        card
    }

    pub fn remaining(&self) -> usize {
        self.cards.len() - self.cursor
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_deck_has_52_unique_cards() {
        let deck = canonical_deck();
        assert_eq!(deck.len(), 52);
        let unique: std::collections::HashSet<_> =
            deck.iter().map(|c| (c.rank, c.suit)).collect();
        assert_eq!(unique.len(), 52);
    }

    #[test]
    fn seeded_shuffle_is_deterministic() {
        let a = Deck::new(Some("s1"));
        let b = Deck::new(Some("s1"));
        assert_eq!(a.cards, b.cards);
    }

    #[test]
    fn different_seeds_usually_differ() {
        let a = Deck::new(Some("s1"));
        let b = Deck::new(Some("s2"));
        assert_ne!(a.cards, b.cards);
    }

    #[test]
    fn draw_consumes_cards_in_order_and_exhausts() {
        let mut deck = Deck::new(Some("s1"));
        let mut drawn = Vec::new();
        while let Some(c) = deck.draw() {
            drawn.push(c);
        }
        assert_eq!(drawn.len(), 52);
        assert_eq!(deck.draw(), None);
        assert_eq!(deck.remaining(), 0);
    }
}
