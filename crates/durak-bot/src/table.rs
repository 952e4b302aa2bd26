use crate::bot::SearchBot;
use durak_core::game::error::ActionError;
use durak_core::game::state::GameState;
use durak_core::model::action::Action;
use parking_lot::Mutex;
use tracing::{Level, event};

/// One live game guarded by a lock. Searches run on masked snapshots outside
/// the lock; only the commit of the chosen action holds it.
pub struct SharedTable {
    state: Mutex<GameState>,
}

impl SharedTable {
    pub fn new(state: GameState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn snapshot_for(&self, player: usize) -> GameState {
        self.state.lock().masked_for(player)
    }

    pub fn with_state<R>(&self, read: impl FnOnce(&GameState) -> R) -> R {
        read(&*self.state.lock())
    }

    pub fn is_over(&self) -> bool {
        self.state.lock().is_over()
    }

    /// Applies `action` if it is still legal on the live table.
    pub fn commit(&self, action: Action) -> Result<(), ActionError> {
        let mut state = self.state.lock();
        let result = state.try_take_action(action);
        if let Err(err) = &result {
            event!(
                target: "durak_bot::table",
                Level::WARN,
                player = action.player,
                action = %action,
                error = %err,
                "rejected action"
            );
        }
        result
    }

    /// Searches for `player` and commits the result. `Ok(None)` means the
    /// search had nothing to offer; an `Err` means the table moved on while
    /// the search ran and the choice went stale.
    pub fn decide_and_commit(
        &self,
        bot: &SearchBot,
        player: usize,
    ) -> Result<Option<Action>, ActionError> {
        let snapshot = self.snapshot_for(player);
        match bot.find_best_action(&snapshot, player) {
            Some(action) => self.commit(action).map(|()| Some(action)),
            None => Ok(None),
        }
    }

    pub fn into_inner(self) -> GameState {
        self.state.into_inner()
    }
}
