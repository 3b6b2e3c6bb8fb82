use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error taxonomy for the engine's external interface.
///
/// Every mutator returns `Result<GameState, GameError>`; on `Err` the
/// caller's prior state is untouched (mutators only ever write to a
/// clone, never to `&self`).
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameError {
    #[error("action is not legal in the current state")]
    InvalidAction,
    #[error("player does not have enough chips for this action")]
    InsufficientStack,
    #[error("it is not this seat's turn to act")]
    NotPlayersTurn,
    #[error("no hand is currently active")]
    GameNotStarted,
    #[error("table has no empty seats")]
    GameFull,
    #[error("no player with that id is seated at this table")]
    PlayerNotFound,
    #[error("requested seat is already occupied")]
    SeatTaken,
    #[error("seat index is out of range")]
    InvalidSeat,
    #[error("fewer than the minimum number of players are ready to play")]
    MinPlayersNotMet,
    #[error("internal invariant violated: {0}")]
    Unknown(String),
}
