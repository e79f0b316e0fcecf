//! Engine module: N x N board, slide/merge ops, bounded undo history and
//! the game state machine. Public API stays small and ergonomic.
//!
//! - `Board` is the row-major grid state with useful methods.
//! - Free functions mirror the methods when convenient (e.g., `shift`).
//! - The line algorithm lives in `ops` as a single source of truth; up/down
//!   moves reuse it through transposition.

mod error;
mod event;
mod history;
mod ops;
pub mod state;

mod game;

pub use error::GameError;
pub use event::GameEvent;
pub use game::{Game, MoveOutcome};
pub use history::{History, Snapshot, UNDO_CAPACITY};
pub use state::{Board, MergeMask, Move};

pub use ops::{count_empty, is_game_over, is_win, shift, Shift, WIN_TILE};
