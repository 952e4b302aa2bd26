// Time-bounded lookahead over any game that can list its moves and score a position.
//
// The search never assumes a fixed ply order: at every node each player is asked
// for moves, since in shedding games several players may act on the same table.

mod minimax;

pub use minimax::{SearchOutcome, SearchReport, search, search_iterative};

use std::time::{Duration, Instant};
use thiserror::Error;

/// Position contract for [`search`]. Implementors own a full copy of their game
/// state; children are independent successors.
pub trait SearchState: Sized {
    type Action: Clone;

    fn num_players(&self) -> usize;

    /// Static value of the position from `player`'s point of view.
    fn evaluate(&self, player: usize) -> f64;

    /// Moves open to `player` with the position each one leads to. Empty when
    /// the player cannot act or the position must not be expanded further.
    fn children(&self, player: usize) -> Vec<(Self::Action, Self)>;

    fn is_over(&self) -> bool;
}

/// Wall-clock budget shared by one search call tree.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start: Instant,
    budget: Duration,
}

impl Deadline {
    pub fn after(budget: Duration) -> Self {
        Self {
            start: Instant::now(),
            budget,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn expired(&self) -> bool {
        self.start.elapsed() >= self.budget
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("search budget expired")]
pub struct Timeout;
