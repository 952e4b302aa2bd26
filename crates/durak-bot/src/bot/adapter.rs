use crate::eval::{EvalParams, evaluate};
use crate::search::SearchState;
use durak_core::game::state::GameState;
use durak_core::model::action::Action;

/// A Durak position wired into the generic search.
#[derive(Debug, Clone)]
pub struct DurakSearch {
    state: GameState,
    params: EvalParams,
}

impl DurakSearch {
    pub fn new(state: GameState, params: EvalParams) -> Self {
        Self { state, params }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// A face-down card on the table hides what may be played next.
    pub fn table_is_hidden(&self) -> bool {
        self.state
            .plays()
            .iter()
            .chain(self.state.covers().iter().flatten())
            .any(|face| face.is_down())
    }
}

impl SearchState for DurakSearch {
    type Action = Action;

    fn num_players(&self) -> usize {
        self.state.num_players()
    }

    fn evaluate(&self, player: usize) -> f64 {
        evaluate(&self.state, player, &self.params)
    }

    fn children(&self, player: usize) -> Vec<(Action, DurakSearch)> {
        if self.state.is_over() || self.table_is_hidden() {
            return Vec::new();
        }
        self.state
            .player_actions(player)
            .into_iter()
            .map(|action| {
                let mut next = self.state.clone();
                next.take_action(action);
                (action, DurakSearch::new(next, self.params))
            })
            .collect()
    }

    fn is_over(&self) -> bool {
        self.state.is_over()
    }
}

#[cfg(test)]
mod tests {
    use super::DurakSearch;
    use crate::eval::EvalParams;
    use crate::search::SearchState;
    use durak_core::game::state::GameState;
    use durak_core::model::card::Card;
    use durak_core::model::face::CardFace;
    use durak_core::model::rank::Rank;
    use durak_core::model::suit::Suit;

    #[test]
    fn children_follow_the_rules_engine() {
        let state = GameState::with_seed(2, 17).unwrap();
        let attacker = state.attacker();
        let node = DurakSearch::new(state.clone(), EvalParams::default());
        let children = node.children(attacker);
        assert_eq!(children.len(), state.player_actions(attacker).len());
        for (action, child) in &children {
            assert_eq!(child.state().plays().len(), 1);
            assert_eq!(Some(&action.card.unwrap()), child.state().plays().first());
        }
        // The source position is untouched.
        assert!(node.state().plays().is_empty());
    }

    #[test]
    fn hidden_table_cards_stop_expansion() {
        let mut state = GameState::with_seed(2, 17).unwrap();
        state.set_roles(0, 1);
        state.set_table(
            vec![CardFace::Up(Card::new(Rank::Seven, Suit::Clubs))],
            vec![Some(CardFace::Down)],
        );
        let node = DurakSearch::new(state, EvalParams::default());
        assert!(node.table_is_hidden());
        assert!(node.children(0).is_empty());
        assert!(node.children(1).is_empty());
    }
}
