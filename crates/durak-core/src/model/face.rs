use crate::model::card::{Card, CardCodeError, DECK_SIZE};
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Wire code for a card whose identity is hidden from the observer.
pub const DOWN_CODE: i8 = -1;
/// Wire code for "no card" (an uncovered slot, or an action without a card).
pub const ABSENT_CODE: i8 = -2;

/// A card as one observer sees it: face up with a known identity, or face
/// down. Rank and suit only exist on face-up cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum CardFace {
    Up(Card),
    Down,
}

impl CardFace {
    pub const fn card(self) -> Option<Card> {
        match self {
            CardFace::Up(card) => Some(card),
            CardFace::Down => None,
        }
    }

    pub const fn is_down(self) -> bool {
        matches!(self, CardFace::Down)
    }

    pub fn rank(self) -> Option<Rank> {
        self.card().map(|card| card.rank)
    }

    pub fn suit(self) -> Option<Suit> {
        self.card().map(|card| card.suit)
    }

    /// Face-down cards never beat and are never beaten.
    pub fn beats(self, other: CardFace, trump: Suit) -> bool {
        match (self, other) {
            (CardFace::Up(card), CardFace::Up(other)) => card.beats(other, trump),
            _ => false,
        }
    }

    pub const fn code(self) -> i8 {
        match self {
            CardFace::Up(card) => card.index() as i8,
            CardFace::Down => DOWN_CODE,
        }
    }

    pub fn from_code(code: i8) -> Result<Self, CardCodeError> {
        match Self::decode(code)? {
            Some(face) => Ok(face),
            None => Err(CardCodeError::Absent),
        }
    }

    pub fn encode(face: Option<CardFace>) -> i8 {
        face.map_or(ABSENT_CODE, CardFace::code)
    }

    pub fn decode(code: i8) -> Result<Option<CardFace>, CardCodeError> {
        match code {
            ABSENT_CODE => Ok(None),
            DOWN_CODE => Ok(Some(CardFace::Down)),
            code if (0..DECK_SIZE as i8).contains(&code) => Card::from_index(code as u8)
                .map(|card| Some(CardFace::Up(card)))
                .ok_or(CardCodeError::OutOfRange(i16::from(code))),
            _ => Err(CardCodeError::OutOfRange(i16::from(code))),
        }
    }
}

impl From<Card> for CardFace {
    fn from(card: Card) -> Self {
        CardFace::Up(card)
    }
}

impl From<CardFace> for i8 {
    fn from(face: CardFace) -> Self {
        face.code()
    }
}

impl TryFrom<i8> for CardFace {
    type Error = CardCodeError;

    fn try_from(code: i8) -> Result<Self, Self::Error> {
        CardFace::from_code(code)
    }
}

impl fmt::Display for CardFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardFace::Up(card) => write!(f, "{card}"),
            CardFace::Down => f.write_str("??"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ABSENT_CODE, CardFace, DOWN_CODE};
    use crate::model::card::{Card, CardCodeError};
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    #[test]
    fn down_cards_never_beat_or_lose() {
        let ace = CardFace::Up(Card::new(Rank::Ace, Suit::Hearts));
        assert!(!CardFace::Down.beats(ace, Suit::Hearts));
        assert!(!ace.beats(CardFace::Down, Suit::Hearts));
        assert!(!CardFace::Down.beats(CardFace::Down, Suit::Hearts));
    }

    #[test]
    fn codes_match_wire_sentinels() {
        assert_eq!(CardFace::Down.code(), DOWN_CODE);
        assert_eq!(CardFace::encode(None), ABSENT_CODE);
        assert_eq!(CardFace::decode(ABSENT_CODE), Ok(None));
        assert_eq!(
            CardFace::decode(35),
            Ok(Some(CardFace::Up(Card::new(Rank::Ace, Suit::Diamonds))))
        );
    }

    #[test]
    fn invalid_codes_are_rejected() {
        assert_eq!(CardFace::decode(36), Err(CardCodeError::OutOfRange(36)));
        assert_eq!(CardFace::decode(-3), Err(CardCodeError::OutOfRange(-3)));
        assert_eq!(CardFace::from_code(ABSENT_CODE), Err(CardCodeError::Absent));
    }

    #[test]
    fn faces_serialize_as_codes() {
        let faces = vec![CardFace::Up(Card::new(Rank::Seven, Suit::Clubs)), CardFace::Down];
        let json = serde_json::to_string(&faces).unwrap();
        assert_eq!(json, "[1,-1]");
        let back: Vec<CardFace> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, faces);
    }
}
