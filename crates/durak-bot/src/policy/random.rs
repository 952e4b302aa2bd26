use super::Policy;
use durak_core::game::state::GameState;
use durak_core::model::action::Action;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Uniform choice among the seat's legal actions.
pub struct RandomPolicy {
    name: String,
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose(&mut self, state: &GameState, player: usize) -> Option<Action> {
        if player >= state.num_players() {
            return None;
        }
        state.player_actions(player).choose(&mut self.rng).copied()
    }
}
