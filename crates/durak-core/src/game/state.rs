use crate::game::error::{ActionError, SetupError, StateError};
use crate::model::action::{Action, Verb};
use crate::model::card::Card;
use crate::model::deck::Deck;
use crate::model::direction::Direction;
use crate::model::face::CardFace;
use crate::model::hand::Hand;
use crate::model::rank::Rank;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 6;
pub const HAND_SIZE: usize = 6;

/// Authoritative snapshot of one table.
///
/// The state only changes through [`GameState::take_action`]; searches work on
/// clones. `plays` and `covers` are parallel: `covers[i]` answers `plays[i]`
/// and is `None` while that attack is open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GameStateRecord")]
pub struct GameState {
    attacker: usize,
    defender: usize,
    picking_up: bool,
    passed: Vec<bool>,
    deferring: Vec<bool>,
    won: Vec<bool>,
    trump: Card,
    plays: Vec<CardFace>,
    covers: Vec<Option<CardFace>>,
    hands: Vec<Hand>,
    /// Cards in each hand that every player has seen, i.e. picked up from the table.
    known: Vec<Hand>,
    direction: Direction,
    deck: VecDeque<CardFace>,
    discarded: usize,
}

/// Wire form of [`GameState`]. Restoring one checks the shape the rules
/// index on before any action is enumerated.
#[derive(Deserialize)]
struct GameStateRecord {
    attacker: usize,
    defender: usize,
    picking_up: bool,
    passed: Vec<bool>,
    deferring: Vec<bool>,
    won: Vec<bool>,
    trump: Card,
    plays: Vec<CardFace>,
    covers: Vec<Option<CardFace>>,
    hands: Vec<Hand>,
    known: Vec<Hand>,
    direction: Direction,
    deck: VecDeque<CardFace>,
    discarded: usize,
}

impl TryFrom<GameStateRecord> for GameState {
    type Error = StateError;

    fn try_from(record: GameStateRecord) -> Result<Self, Self::Error> {
        let players = record.hands.len();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players) {
            return Err(StateError::PlayerCount { players });
        }

        for (field, len) in [
            ("known", record.known.len()),
            ("passed", record.passed.len()),
            ("deferring", record.deferring.len()),
            ("won", record.won.len()),
        ] {
            if len != players {
                return Err(StateError::SeatCount {
                    field,
                    len,
                    players,
                });
            }
        }

        if record.plays.len() != record.covers.len() {
            return Err(StateError::TableShape {
                plays: record.plays.len(),
                covers: record.covers.len(),
            });
        }

        for (role, seat) in [("attacker", record.attacker), ("defender", record.defender)] {
            if seat >= players {
                return Err(StateError::RoleSeat {
                    role,
                    seat,
                    players,
                });
            }
        }

        Ok(Self {
            attacker: record.attacker,
            defender: record.defender,
            picking_up: record.picking_up,
            passed: record.passed,
            deferring: record.deferring,
            won: record.won,
            trump: record.trump,
            plays: record.plays,
            covers: record.covers,
            hands: record.hands,
            known: record.known,
            direction: record.direction,
            deck: record.deck,
            discarded: record.discarded,
        })
    }
}

impl GameState {
    pub fn new(num_players: usize) -> Result<Self, SetupError> {
        let seed: u64 = rand::random();
        Self::with_seed(num_players, seed)
    }

    pub fn with_seed(num_players: usize, seed: u64) -> Result<Self, SetupError> {
        Self::from_deck(num_players, &Deck::shuffled_with_seed(seed))
    }

    /// Deals six cards to each player in deck order. The last card of the deck
    /// fixes trump and the lowest trump opens.
    pub fn from_deck(num_players: usize, deck: &Deck) -> Result<Self, SetupError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&num_players) {
            return Err(SetupError::PlayerCount {
                requested: num_players,
            });
        }

        let cards = deck.cards();
        let dealt = num_players * HAND_SIZE;
        let trump = match deck.trump() {
            Some(trump) if cards.len() >= dealt => trump,
            _ => {
                return Err(SetupError::ShortDeck {
                    needed: dealt,
                    available: cards.len(),
                });
            }
        };

        let mut hands: Vec<Hand> = (0..num_players).map(|_| Hand::new()).collect();
        for (index, card) in cards[..dealt].iter().enumerate() {
            hands[index / HAND_SIZE].add(CardFace::Up(*card));
        }

        let mut attacker = 0;
        let mut lowest: Option<Rank> = None;
        for (player, hand) in hands.iter().enumerate() {
            if let Some(rank) = hand.lowest_in_suit(trump.suit) {
                if lowest.is_none_or(|low| rank < low) {
                    lowest = Some(rank);
                    attacker = player;
                }
            }
        }

        Ok(Self {
            attacker,
            defender: (attacker + 1) % num_players,
            picking_up: false,
            passed: vec![false; num_players],
            deferring: vec![false; num_players],
            won: vec![false; num_players],
            trump,
            plays: Vec::new(),
            covers: Vec::new(),
            hands,
            known: (0..num_players).map(|_| Hand::new()).collect(),
            direction: Direction::Clockwise,
            deck: cards[dealt..].iter().copied().map(CardFace::Up).collect(),
            discarded: 0,
        })
    }

    pub fn num_players(&self) -> usize {
        self.hands.len()
    }

    pub fn attacker(&self) -> usize {
        self.attacker
    }

    pub fn defender(&self) -> usize {
        self.defender
    }

    pub fn trump(&self) -> Card {
        self.trump
    }

    pub fn plays(&self) -> &[CardFace] {
        &self.plays
    }

    pub fn covers(&self) -> &[Option<CardFace>] {
        &self.covers
    }

    pub fn hand(&self, player: usize) -> &Hand {
        &self.hands[player]
    }

    pub fn known(&self, player: usize) -> &Hand {
        &self.known[player]
    }

    pub fn has_passed(&self, player: usize) -> bool {
        self.passed[player]
    }

    pub fn is_deferring(&self, player: usize) -> bool {
        self.deferring[player]
    }

    pub fn has_won(&self, player: usize) -> bool {
        self.won[player]
    }

    pub fn is_picking_up(&self) -> bool {
        self.picking_up
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn deck(&self) -> &VecDeque<CardFace> {
        &self.deck
    }

    pub fn cards_in_deck(&self) -> usize {
        self.deck.len()
    }

    pub fn won_count(&self) -> usize {
        self.won.iter().filter(|&&w| w).count()
    }

    /// Cards beaten off in successfully defended rounds.
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    /// Hands, both table rows, the deck, and the discard pile.
    pub fn total_cards(&self) -> usize {
        self.hands.iter().map(Hand::len).sum::<usize>()
            + self.plays.len()
            + self.num_covered()
            + self.deck.len()
            + self.discarded
    }

    // Arrangement helpers for constructed positions. They index by player and
    // panic on an out-of-range seat.

    pub fn set_roles(&mut self, attacker: usize, defender: usize) {
        assert!(attacker < self.num_players() && defender < self.num_players());
        self.attacker = attacker;
        self.defender = defender;
    }

    /// Replaces a hand; known cards that are no longer held are forgotten.
    pub fn set_hand(&mut self, player: usize, cards: Vec<CardFace>) {
        self.hands[player] = Hand::with_cards(cards);
        let hand = &self.hands[player];
        self.known[player].retain(|card| hand.contains(*card));
    }

    pub fn set_known(&mut self, player: usize, cards: Vec<CardFace>) {
        self.known[player] = Hand::with_cards(cards);
    }

    pub fn set_table(&mut self, plays: Vec<CardFace>, covers: Vec<Option<CardFace>>) {
        assert_eq!(plays.len(), covers.len(), "every play needs a cover slot");
        self.plays = plays;
        self.covers = covers;
    }

    pub fn set_trump(&mut self, trump: Card) {
        self.trump = trump;
    }

    pub fn set_deck(&mut self, cards: Vec<CardFace>) {
        self.deck = cards.into();
    }

    pub fn num_covered(&self) -> usize {
        self.covers.iter().filter(|c| c.is_some()).count()
    }

    fn num_open(&self) -> usize {
        self.plays.len() - self.num_covered()
    }

    fn rank_on_table(&self, rank: Rank) -> bool {
        self.plays
            .iter()
            .chain(self.covers.iter().flatten())
            .any(|face| face.rank() == Some(rank))
    }

    pub fn attacker_actions(&self, player: usize) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.deferring[player] || self.passed[player] || self.won[player] {
            return actions;
        }

        if self.plays.is_empty() {
            // Only the designated attacker opens a round.
            if self.attacker == player {
                actions.extend(self.hands[player].iter().map(|&card| Action::play(player, card)));
            }
            return actions;
        }

        // The defender must be able to answer every open attack.
        if self.hands[self.defender].len() > self.num_open() {
            for &card in self.hands[player].iter() {
                let playable = match card.rank() {
                    Some(rank) => self.rank_on_table(rank),
                    None => true,
                };
                if playable {
                    actions.push(Action::play(player, card));
                }
            }
        }

        let covered = self.num_covered();
        if self.picking_up || covered == self.plays.len() {
            actions.push(Action::pass(player));
        }
        if !self.picking_up && covered < self.plays.len() {
            actions.push(Action::defer(player));
        }
        actions
    }

    /// Rank shared by every attack when the defender may still pass them on.
    pub fn reverse_rank(&self) -> Option<Rank> {
        let rank = self.plays.first()?.rank()?;
        let uniform = self.plays.iter().all(|play| play.rank() == Some(rank))
            && self.covers.iter().all(Option::is_none);
        uniform.then_some(rank)
    }

    pub fn defender_actions(&self, player: usize) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.picking_up {
            return actions;
        }

        let hand = &self.hands[player];
        if let Some(rank) = self.reverse_rank() {
            if self.plays.len() < self.hands[self.attacker].len() {
                for &card in hand.iter() {
                    if card.rank() == Some(rank) {
                        actions.push(Action::reverse(player, card));
                    }
                }
            }
        }

        for (slot, &attack) in self.plays.iter().enumerate() {
            if self.covers[slot].is_some() {
                continue;
            }
            for &card in hand.iter() {
                if card.is_down() || card.beats(attack, self.trump.suit) {
                    actions.push(Action::cover(player, card, attack));
                }
            }
        }

        if self.num_covered() < self.plays.len() {
            actions.push(Action::pick_up(player));
        }
        actions
    }

    pub fn player_actions(&self, player: usize) -> Vec<Action> {
        if player == self.defender {
            self.defender_actions(player)
        } else {
            self.attacker_actions(player)
        }
    }

    pub fn all_actions(&self) -> Vec<Action> {
        (0..self.num_players())
            .flat_map(|player| self.player_actions(player))
            .collect()
    }

    pub fn is_legal(&self, action: &Action) -> bool {
        action.player < self.num_players() && self.player_actions(action.player).contains(action)
    }

    /// Next player still in the game, walking in the current direction.
    ///
    /// # Panics
    /// When every player has already won; callers check [`GameState::is_over`] first.
    pub fn next_role(&self, player: usize) -> usize {
        let n = self.num_players();
        (1..=n)
            .map(|steps| self.direction.step(player, steps, n))
            .find(|&p| !self.won[p])
            .unwrap_or_else(|| panic!("next_role({player}) with every player out"))
    }

    pub fn all_passed(&self) -> bool {
        (0..self.num_players()).all(|p| p == self.defender || self.won[p] || self.passed[p])
    }

    pub fn is_over(&self) -> bool {
        self.deck.is_empty() && self.won_count() + 1 >= self.num_players()
    }

    /// The one player left holding cards once the game is over.
    pub fn loser(&self) -> Option<usize> {
        if !self.is_over() {
            return None;
        }
        self.won.iter().position(|&w| !w)
    }

    /// Applies a legal action. No validation happens here; see
    /// [`GameState::try_take_action`] for externally supplied actions.
    pub fn take_action(&mut self, action: Action) {
        let player = action.player;
        match action.verb {
            Verb::Play | Verb::Reverse => {
                if let Some(card) = action.card {
                    self.plays.push(card);
                    self.covers.push(None);
                    self.discard(player, card);
                }
                if action.verb == Verb::Reverse {
                    std::mem::swap(&mut self.attacker, &mut self.defender);
                    self.direction = self.direction.flip();
                }
                self.deferring.fill(false);
                self.check_emptied_hand(player);
            }
            Verb::Cover => {
                if let (Some(card), Some(covering)) = (action.card, action.covering) {
                    let slot = (0..self.plays.len())
                        .find(|&i| self.plays[i] == covering && self.covers[i].is_none());
                    if let Some(slot) = slot {
                        self.covers[slot] = Some(card);
                    }
                    self.discard(player, card);
                }
                self.deferring.fill(false);
                self.check_emptied_hand(player);
            }
            Verb::PickUp => {
                self.picking_up = true;
                self.deferring.fill(false);
            }
            Verb::Pass => {
                self.passed[player] = true;
                if self.all_passed() {
                    self.finish_round();
                }
            }
            Verb::Defer => {
                self.deferring[player] = true;
            }
        }

        if !self.is_over() {
            while self.won[self.attacker] || self.attacker == self.defender {
                self.attacker = self.next_role(self.attacker);
                self.defender = self.next_role(self.attacker);
            }
            while self.won[self.defender] {
                self.defender = self.next_role(self.defender);
            }
        }
    }

    pub fn try_take_action(&mut self, action: Action) -> Result<(), ActionError> {
        if self.is_over() {
            return Err(ActionError::GameOver);
        }
        if action.player >= self.num_players() {
            return Err(ActionError::UnknownPlayer {
                player: action.player,
                players: self.num_players(),
            });
        }
        if !self.player_actions(action.player).contains(&action) {
            return Err(ActionError::Illegal(action));
        }
        self.take_action(action);
        Ok(())
    }

    fn discard(&mut self, player: usize, card: CardFace) {
        self.hands[player].remove(card);
        self.known[player].remove(card);
    }

    // Clearing `passed` keeps the round from stalling once a player drops out.
    fn check_emptied_hand(&mut self, player: usize) {
        if self.deck.is_empty() && self.hands[player].is_empty() {
            self.passed.fill(false);
            self.won[player] = true;
        }
    }

    fn finish_round(&mut self) {
        let defender = self.defender;
        if self.picking_up {
            let plays = std::mem::take(&mut self.plays);
            let covers = std::mem::take(&mut self.covers);
            for card in plays.into_iter().chain(covers.into_iter().flatten()) {
                self.hands[defender].add(card);
                if !card.is_down() {
                    self.known[defender].add(card);
                }
            }
            self.attacker = self.next_role(defender);
            self.defender = self.next_role(self.attacker);
        } else {
            self.discarded += self.plays.len() + self.num_covered();
            self.attacker = self.next_role(self.attacker);
            self.defender = self.next_role(self.attacker);
        }

        self.plays.clear();
        self.covers.clear();
        self.picking_up = false;
        self.deferring.fill(false);
        self.passed.fill(false);
        self.deal(defender);
    }

    /// Tops every hand up to six, starting after `after` and walking in the
    /// current direction. Running out of cards with an empty deck wins.
    fn deal(&mut self, after: usize) {
        let n = self.num_players();
        for steps in 1..=n {
            let player = self.direction.step(after, steps, n);
            while self.hands[player].len() < HAND_SIZE {
                match self.deck.pop_front() {
                    Some(card) => self.hands[player].add(card),
                    None => {
                        if self.hands[player].is_empty() {
                            self.won[player] = true;
                        }
                        break;
                    }
                }
            }
        }
    }

    /// Redacts every other player's hand down to the cards they have shown,
    /// padded with face-down cards to the true size. The undealt deck goes face
    /// down as well, apart from the public trump at its bottom.
    pub fn mask(&mut self, me: usize) {
        for player in 0..self.num_players() {
            if player == me {
                continue;
            }
            let size = self.hands[player].len();
            let mut masked = self.known[player].clone();
            while masked.len() < size {
                masked.add(CardFace::Down);
            }
            self.hands[player] = masked;
        }

        let trump = CardFace::Up(self.trump);
        for card in self.deck.iter_mut() {
            if *card != trump {
                *card = CardFace::Down;
            }
        }
    }

    pub fn masked_for(&self, me: usize) -> GameState {
        let mut view = self.clone();
        view.mask(me);
        view
    }
}
