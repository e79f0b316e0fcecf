use thiserror::Error;

/// Errors surfaced by the engine's public operations.
///
/// Every error is detected before any mutation; a failed call leaves the
/// engine state untouched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GameError {
    /// A tile spawn was requested with no empty cell on the board. This
    /// signals a caller bug (terminal detection must guarantee an empty
    /// cell first), not a recoverable game state.
    #[error("no empty cell available to spawn a tile")]
    BoardFull,

    /// Undo requested deeper than the recorded history. A no-op; the
    /// caller may retry with a smaller depth.
    #[error("cannot undo {requested} step(s), history holds {available}")]
    UndoUnavailable { requested: usize, available: usize },

    /// A board handed to `restore` does not match the engine's grid size.
    #[error("restored board is {got}x{got}, engine expects {expected}x{expected}")]
    GridSizeMismatch { expected: usize, got: usize },
}
