use crate::model::action::Action;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("durak is played by 2 to 6 players, not {requested}")]
    PlayerCount { requested: usize },
    #[error("dealing needs {needed} cards but the deck holds {available}")]
    ShortDeck { needed: usize, available: usize },
}

/// Rejections from [`crate::game::state::GameState::try_take_action`]. The
/// state is left untouched whenever one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("the game is already over")]
    GameOver,
    #[error("player {player} is not seated at a table of {players}")]
    UnknownPlayer { player: usize, players: usize },
    #[error("{0} is not legal right now")]
    Illegal(Action),
}

/// Reasons a serialized table cannot be restored as a live state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("a table of {players} players is outside 2 to 6")]
    PlayerCount { players: usize },
    #[error("`{field}` has {len} entries for {players} players")]
    SeatCount {
        field: &'static str,
        len: usize,
        players: usize,
    },
    #[error("{plays} attacks on the table but {covers} cover slots")]
    TableShape { plays: usize, covers: usize },
    #[error("{role} seat {seat} is not at a table of {players}")]
    RoleSeat {
        role: &'static str,
        seat: usize,
        players: usize,
    },
}
