use crate::model::face::CardFace;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use serde::{Deserialize, Serialize};

/// Cards held by one player, in the order they arrived.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hand {
    cards: Vec<CardFace>,
}

impl Hand {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn with_cards(cards: Vec<CardFace>) -> Self {
        Self { cards }
    }

    pub fn add(&mut self, card: CardFace) {
        self.cards.push(card);
    }

    /// Removes one copy of `card`. Removing `Down` takes any face-down card.
    pub fn remove(&mut self, card: CardFace) -> bool {
        if let Some(index) = self.cards.iter().position(|&c| c == card) {
            self.cards.remove(index);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, card: CardFace) -> bool {
        self.cards.contains(&card)
    }

    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&CardFace) -> bool,
    {
        self.cards.retain(keep);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CardFace> {
        self.cards.iter()
    }

    pub fn cards(&self) -> &[CardFace] {
        &self.cards
    }

    pub fn count_down(&self) -> usize {
        self.cards.iter().filter(|c| c.is_down()).count()
    }

    pub fn lowest_in_suit(&self, suit: Suit) -> Option<Rank> {
        self.cards
            .iter()
            .filter_map(|c| c.card())
            .filter(|c| c.suit == suit)
            .map(|c| c.rank)
            .min()
    }
}

#[cfg(test)]
mod tests {
    use super::Hand;
    use crate::model::card::Card;
    use crate::model::face::CardFace;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    fn up(rank: Rank, suit: Suit) -> CardFace {
        CardFace::Up(Card::new(rank, suit))
    }

    #[test]
    fn add_and_remove_cards() {
        let mut hand = Hand::new();
        let card = up(Rank::Nine, Suit::Clubs);
        hand.add(card);
        assert!(hand.contains(card));
        assert!(hand.remove(card));
        assert!(!hand.contains(card));
        assert!(!hand.remove(card));
    }

    #[test]
    fn keeps_arrival_order() {
        let mut hand = Hand::new();
        hand.add(up(Rank::King, Suit::Spades));
        hand.add(up(Rank::Six, Suit::Clubs));
        hand.add(CardFace::Down);
        assert_eq!(hand.cards()[0], up(Rank::King, Suit::Spades));
        assert_eq!(hand.cards()[2], CardFace::Down);
        assert_eq!(hand.count_down(), 1);
    }

    #[test]
    fn removing_down_takes_one_hidden_card() {
        let mut hand = Hand::with_cards(vec![CardFace::Down, CardFace::Down]);
        assert!(hand.remove(CardFace::Down));
        assert_eq!(hand.len(), 1);
    }

    #[test]
    fn lowest_in_suit_ignores_hidden_cards() {
        let hand = Hand::with_cards(vec![
            up(Rank::Queen, Suit::Hearts),
            CardFace::Down,
            up(Rank::Eight, Suit::Hearts),
            up(Rank::Six, Suit::Clubs),
        ]);
        assert_eq!(hand.lowest_in_suit(Suit::Hearts), Some(Rank::Eight));
        assert_eq!(hand.lowest_in_suit(Suit::Diamonds), None);
    }
}
