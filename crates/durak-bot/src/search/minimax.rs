use super::{Deadline, SearchState, Timeout};
use std::time::Duration;
use tracing::{Level, event};

/// Result of one fixed-depth [`search`].
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome<A> {
    /// The move selected at this node, `None` at leaves.
    pub action: Option<A>,
    /// Evaluation of the selected line for every player.
    pub scores: Vec<f64>,
    pub nodes: usize,
}

/// Result of [`search_iterative`].
#[derive(Debug, Clone, PartialEq)]
pub struct SearchReport<A> {
    pub action: Option<A>,
    pub score: Option<f64>,
    /// Deepest fully completed pass; zero when none finished.
    pub depth: usize,
    pub nodes: usize,
    pub timed_out: bool,
}

impl<A> SearchReport<A> {
    fn empty() -> Self {
        Self {
            action: None,
            score: None,
            depth: 0,
            nodes: 0,
            timed_out: false,
        }
    }
}

fn leaf<S: SearchState>(state: &S) -> SearchOutcome<S::Action> {
    SearchOutcome {
        action: None,
        scores: (0..state.num_players()).map(|p| state.evaluate(p)).collect(),
        nodes: 1,
    }
}

/// Depth-limited max^n search without pruning.
///
/// Every player that can move at a node is expanded, and the node keeps the
/// move whose line scores best for the player making it. Scores are never
/// negated: each mover maximises its own evaluation. With `player_only` only
/// `player`'s moves are expanded at this node; deeper nodes always expand
/// everyone. A node where nobody can move is scored as a leaf.
pub fn search<S: SearchState>(
    state: &S,
    player: usize,
    depth: usize,
    deadline: &Deadline,
    player_only: bool,
) -> Result<SearchOutcome<S::Action>, Timeout> {
    if deadline.expired() {
        return Err(Timeout);
    }
    if depth == 0 || state.is_over() {
        return Ok(leaf(state));
    }

    let movers = if player_only {
        player..player + 1
    } else {
        0..state.num_players()
    };

    let mut nodes = 1;
    let mut best: Option<(f64, S::Action, Vec<f64>)> = None;
    for mover in movers {
        for (action, child) in state.children(mover) {
            let outcome = search(&child, mover, depth - 1, deadline, false)?;
            nodes += outcome.nodes;
            let value = outcome.scores[mover];
            if best.as_ref().is_none_or(|(top, _, _)| value > *top) {
                best = Some((value, action, outcome.scores));
            }
        }
    }

    match best {
        Some((_, action, scores)) => Ok(SearchOutcome {
            action: Some(action),
            scores,
            nodes,
        }),
        None => Ok(leaf(state)),
    }
}

/// Iterative deepening over `player`'s moves at the root.
///
/// Depth `d` searches every root move to `d - 1` further plies. A pass cut
/// short by the budget is thrown away and the last complete pass wins.
/// Deepening stops early once a pass visits exactly as many nodes as the one
/// before it, since the whole reachable tree has then been seen.
pub fn search_iterative<S: SearchState>(
    state: &S,
    player: usize,
    max_depth: usize,
    budget: Duration,
) -> SearchReport<S::Action> {
    let deadline = Deadline::after(budget);
    let root = state.children(player);
    let mut report = SearchReport::empty();
    if root.is_empty() {
        return report;
    }

    let mut previous_nodes = None;
    'deepen: for depth in 1..=max_depth {
        if deadline.expired() {
            report.timed_out = true;
            break;
        }

        let mut nodes = 0;
        let mut best: Option<(f64, S::Action)> = None;
        for (action, child) in &root {
            match search(child, player, depth - 1, &deadline, false) {
                Ok(outcome) => {
                    nodes += outcome.nodes;
                    let value = outcome.scores[player];
                    if best.as_ref().is_none_or(|(top, _)| value > *top) {
                        best = Some((value, action.clone()));
                    }
                }
                Err(Timeout) => {
                    report.timed_out = true;
                    event!(
                        target: "durak_bot::search",
                        Level::DEBUG,
                        player,
                        depth,
                        elapsed_ms = deadline.elapsed().as_millis() as u64,
                        "budget expired, keeping previous depth"
                    );
                    break 'deepen;
                }
            }
        }

        if let Some((score, action)) = best {
            report.action = Some(action);
            report.score = Some(score);
        }
        report.depth = depth;
        report.nodes = nodes;
        event!(
            target: "durak_bot::search",
            Level::DEBUG,
            player,
            depth,
            nodes,
            score = report.score.unwrap_or(f64::NAN),
            elapsed_ms = deadline.elapsed().as_millis() as u64,
            "depth complete"
        );

        if previous_nodes == Some(nodes) {
            break;
        }
        previous_nodes = Some(nodes);
    }
    report
}
