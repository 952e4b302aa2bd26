use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DECK_SIZE: usize = 36;

/// A concrete playing card. Cards travel over the wire as their deck index,
/// `suit * 9 + rank ordinal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    pub const fn index(self) -> u8 {
        self.suit as u8 * 9 + self.rank.ordinal()
    }

    pub fn from_index(index: u8) -> Option<Self> {
        let rank = Rank::from_ordinal(index % 9)?;
        let suit = Suit::from_index(usize::from(index / 9))?;
        Some(Self::new(rank, suit))
    }

    /// A trump beats any non-trump; otherwise only a higher card of the same suit wins.
    pub fn beats(self, other: Card, trump: Suit) -> bool {
        if self.suit == trump && other.suit != trump {
            return true;
        }
        self.suit == other.suit && self.rank > other.rank
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

impl From<Card> for u8 {
    fn from(card: Card) -> Self {
        card.index()
    }
}

impl TryFrom<u8> for Card {
    type Error = CardCodeError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Card::from_index(index).ok_or(CardCodeError::OutOfRange(i16::from(index)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CardCodeError {
    #[error("card code {0} is outside -2..=35")]
    OutOfRange(i16),
    #[error("card code -2 (no card) where a card is required")]
    Absent,
}

#[cfg(test)]
mod tests {
    use super::{Card, DECK_SIZE, Rank, Suit};

    #[test]
    fn index_roundtrip_covers_deck() {
        for index in 0..DECK_SIZE as u8 {
            let card = Card::from_index(index).expect("index in range");
            assert_eq!(card.index(), index);
        }
        assert_eq!(Card::from_index(DECK_SIZE as u8), None);
    }

    #[test]
    fn index_layout_is_suit_major() {
        assert_eq!(Card::from_index(10), Some(Card::new(Rank::Seven, Suit::Spades)));
        assert_eq!(Card::from_index(23), Some(Card::new(Rank::Jack, Suit::Hearts)));
    }

    #[test]
    fn same_suit_higher_rank_beats() {
        let seven = Card::new(Rank::Seven, Suit::Spades);
        let eight = Card::new(Rank::Eight, Suit::Spades);
        assert!(eight.beats(seven, Suit::Hearts));
        assert!(!seven.beats(eight, Suit::Hearts));
    }

    #[test]
    fn off_suit_non_trump_never_beats() {
        let ten_clubs = Card::from_index(4).unwrap();
        let ace_spades = Card::from_index(17).unwrap();
        assert!(!ten_clubs.beats(ace_spades, Suit::Spades));
        assert!(!ace_spades.beats(ten_clubs, Suit::Hearts));
    }

    #[test]
    fn lowest_trump_beats_highest_plain_card() {
        let six_hearts = Card::new(Rank::Six, Suit::Hearts);
        let ace_clubs = Card::new(Rank::Ace, Suit::Clubs);
        assert!(six_hearts.beats(ace_clubs, Suit::Hearts));
        assert!(!ace_clubs.beats(six_hearts, Suit::Hearts));
    }

    #[test]
    fn beats_is_irreflexive_and_asymmetric() {
        for trump in Suit::ALL {
            for a in 0..DECK_SIZE as u8 {
                let a = Card::from_index(a).unwrap();
                assert!(!a.beats(a, trump), "{a} beats itself");
                for b in 0..DECK_SIZE as u8 {
                    let b = Card::from_index(b).unwrap();
                    if a.beats(b, trump) {
                        assert!(!b.beats(a, trump), "{a} and {b} beat each other");
                    }
                }
            }
        }
    }
}
