mod random;
mod search;

pub use random::RandomPolicy;
pub use search::SearchPolicy;

use durak_core::game::state::GameState;
use durak_core::model::action::Action;

/// Decision interface shared by every kind of seat. Policies receive the live
/// table and are responsible for looking only at what their seat may see.
pub trait Policy: Send {
    fn name(&self) -> &str;

    /// Next action for `player`, or `None` when the policy has nothing to do.
    fn choose(&mut self, state: &GameState, player: usize) -> Option<Action>;
}
