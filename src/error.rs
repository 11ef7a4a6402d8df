use thiserror::Error;

/// Errors returned by board operations and game commands.
///
/// Every error is recoverable: the game state is left exactly as it was
/// before the rejected call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The target cell is occupied, flips nothing, or the game is over.
    #[error("illegal move at ({row}, {col})")]
    IllegalMove { row: u8, col: u8 },

    /// Pass requested while the current player still has a legal move.
    #[error("cannot pass while a legal move is available")]
    InvalidPass,

    /// Undo requested with nothing earlier than the current state.
    #[error("no earlier state to undo to")]
    NoHistory,

    #[error("row/col out of range: ({row}, {col})")]
    OutOfBounds { row: u8, col: u8 },

    #[error("invalid board: {0}")]
    InvalidBoard(String),
}

pub type GameResult<T> = Result<T, GameError>;
