mod adapter;

pub use adapter::DurakSearch;

use crate::eval::EvalParams;
use crate::search::{SearchReport, search_iterative};
use durak_core::game::state::GameState;
use durak_core::model::action::Action;
use std::time::Duration;
use tracing::{Level, event};

pub const DEFAULT_MAX_DEPTH: usize = 10;
pub const DEFAULT_TIME_BUDGET_MS: u64 = 100;

/// Searching player. Each decision runs on a masked clone of the table, so a
/// bot never sees more than its seat would.
#[derive(Debug, Clone)]
pub struct SearchBot {
    params: EvalParams,
    max_depth: usize,
    time_budget: Duration,
}

impl Default for SearchBot {
    fn default() -> Self {
        Self::new(
            EvalParams::default(),
            DEFAULT_MAX_DEPTH,
            Duration::from_millis(DEFAULT_TIME_BUDGET_MS),
        )
    }
}

impl SearchBot {
    pub fn new(params: EvalParams, max_depth: usize, time_budget: Duration) -> Self {
        Self {
            params,
            max_depth,
            time_budget,
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn time_budget(&self) -> Duration {
        self.time_budget
    }

    /// Full search result for `player`. The returned action was chosen on a
    /// masked view and must be validated against the live table before use.
    pub fn analyse(&self, state: &GameState, player: usize) -> SearchReport<Action> {
        if player >= state.num_players() || state.is_over() {
            return SearchReport {
                action: None,
                score: None,
                depth: 0,
                nodes: 0,
                timed_out: false,
            };
        }

        let root = DurakSearch::new(state.masked_for(player), self.params);
        let report = search_iterative(&root, player, self.max_depth, self.time_budget);
        event!(
            target: "durak_bot::decision",
            Level::DEBUG,
            player,
            depth = report.depth,
            nodes = report.nodes,
            timed_out = report.timed_out,
            chosen = %report
                .action
                .map(|a| a.to_string())
                .unwrap_or_else(|| "none".to_string()),
        );
        report
    }

    pub fn find_best_action(&self, state: &GameState, player: usize) -> Option<Action> {
        self.analyse(state, player).action
    }
}

/// One-shot search with default weights.
pub fn find_best_action(
    state: &GameState,
    player: usize,
    depth: usize,
    budget_ms: u64,
) -> Option<Action> {
    SearchBot::new(
        EvalParams::default(),
        depth,
        Duration::from_millis(budget_ms),
    )
    .find_best_action(state, player)
}
