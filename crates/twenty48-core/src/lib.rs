//! Rule engine for an N x N sliding-tile merge puzzle (2048 family).
//!
//! The crate owns the authoritative game state: it applies directional
//! moves, merges equal tiles, tracks score, spawns new tiles, detects
//! win/terminal conditions and keeps a bounded undo history. Rendering,
//! animation and input recognition are the caller's business; the engine
//! exposes plain state plus synchronous [`engine::GameEvent`]
//! notifications.
//!
//! ```
//! use rand::{rngs::StdRng, SeedableRng};
//! use twenty48_core::{Game, Move};
//!
//! let mut game = Game::with_rng(4, StdRng::seed_from_u64(7));
//! game.start().unwrap();
//! let outcome = game.make_move(Move::Left).unwrap();
//! if outcome.changed {
//!     assert!(game.history_len() >= 1);
//! }
//! ```

pub mod engine;

pub use engine::{Board, Game, GameError, GameEvent, MergeMask, Move, MoveOutcome};
