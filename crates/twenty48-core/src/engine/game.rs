use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::error::GameError;
use super::event::{EventHandler, GameEvent};
use super::history::{History, Snapshot};
use super::ops;
use super::state::{Board, MergeMask, Move};

/// What a [`Game::make_move`] call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Whether the board changed (merge or slide). Blocked moves and moves
    /// on a terminal board report `false`.
    pub changed: bool,
    /// Score gained by merges during this move.
    pub score_delta: u32,
    /// Position of the tile spawned after a changed move.
    pub spawned: Option<(usize, usize)>,
    /// The move was rejected because the board is terminal.
    pub game_over: bool,
}

impl MoveOutcome {
    fn unchanged() -> Self {
        MoveOutcome {
            changed: false,
            score_delta: 0,
            spawned: None,
            game_over: false,
        }
    }
}

/// The puzzle state machine: authoritative board, score, bounded undo
/// history and terminal status.
///
/// Single-threaded by design. Every operation runs synchronously over at
/// most N^2 cells; callers driving the engine from multiple threads must
/// serialize access themselves.
///
/// Randomness enters only through tile spawning and is injected at
/// construction, so seeded runs replay identically.
pub struct Game<R: Rng = StdRng> {
    board: Board,
    previous: Board,
    score: u32,
    previous_score: u32,
    merged: MergeMask,
    history: History,
    over: bool,
    rng: R,
    handlers: Vec<EventHandler>,
}

impl Game<StdRng> {
    /// Engine with an entropy-seeded RNG. Call [`Game::start`] to spawn the
    /// initial two tiles.
    pub fn new(size: usize) -> Self {
        Self::with_rng(size, StdRng::from_entropy())
    }
}

impl<R: Rng> Game<R> {
    /// Engine with an injected random source, for deterministic play.
    pub fn with_rng(size: usize, rng: R) -> Self {
        Game {
            board: Board::empty(size),
            previous: Board::empty(size),
            score: 0,
            previous_score: 0,
            merged: MergeMask::new(size),
            history: History::new(),
            over: false,
            rng,
            handlers: Vec::new(),
        }
    }

    /// Register a synchronous event handler. Handlers should be in place
    /// before [`Game::start`] so they observe the initial notifications.
    pub fn on_event(&mut self, handler: impl FnMut(&GameEvent) + 'static) {
        self.handlers.push(Box::new(handler));
    }

    /// Side length of the grid.
    pub fn size(&self) -> usize {
        self.board.size()
    }

    /// Begin a fresh game: zeroed board, two spawned tiles, cleared score,
    /// history and terminal flag. Also restarts a finished game.
    pub fn start(&mut self) -> Result<(), GameError> {
        let size = self.size();
        self.board = Board::empty(size);
        self.score = 0;
        self.previous_score = 0;
        self.over = false;
        self.history.clear();
        self.merged.clear();
        self.emit(GameEvent::ScoreChanged { score: 0 });
        // The one place spawning is legal on a board that might fill up:
        // an all-empty grid always fits two tiles (N >= 2).
        self.board.spawn_random_tile(&mut self.rng)?;
        self.board.spawn_random_tile(&mut self.rng)?;
        self.previous = self.board.clone();
        debug!("new game started on {}x{} grid", size, size);
        self.emit(GameEvent::BoardUpdated {
            board: self.board.clone(),
            merged: self.merged.clone(),
        });
        Ok(())
    }

    /// Apply a directional move.
    ///
    /// On a terminal board this is a defined no-op: the terminal flag
    /// latches, [`GameEvent::GameOver`] fires and nothing mutates. On a
    /// blocked move nothing mutates and no tile spawns. On a changed move
    /// the pre-move snapshot is recorded for undo, the score accumulates
    /// the merge total and one random tile spawns.
    pub fn make_move(&mut self, direction: Move) -> Result<MoveOutcome, GameError> {
        self.merged.clear();
        if self.over || ops::is_game_over(&self.board) {
            self.over = true;
            info!("move {:?} rejected: game over at score {}", direction, self.score);
            self.emit(GameEvent::GameOver {
                final_score: self.score,
            });
            return Ok(MoveOutcome {
                game_over: true,
                ..MoveOutcome::unchanged()
            });
        }

        let shifted = ops::shift(&self.board, direction);
        if !shifted.changed {
            debug!("move {:?} blocked", direction);
            return Ok(MoveOutcome::unchanged());
        }

        // Commit: the pre-move state becomes both the single-step previous
        // state and a history entry.
        self.previous_score = self.score;
        self.previous = std::mem::replace(&mut self.board, shifted.board);
        self.history.record(Snapshot {
            score: self.previous_score,
            board: self.previous.clone(),
        });
        self.score += shifted.score_delta;
        self.merged = shifted.merged;

        self.emit(GameEvent::ScoreChanged { score: self.score });

        // A changed move always leaves an empty cell (a slide implies one
        // existed; a merge frees one), so the spawn cannot fail here.
        let spawned = self.board.spawn_random_tile(&mut self.rng)?;
        debug!(
            "move {:?}: +{} points, spawned {} at {:?}",
            direction,
            shifted.score_delta,
            self.board.get(spawned.0, spawned.1),
            spawned
        );
        self.emit(GameEvent::BoardUpdated {
            board: self.board.clone(),
            merged: self.merged.clone(),
        });

        Ok(MoveOutcome {
            changed: true,
            score_delta: shifted.score_delta,
            spawned: Some(spawned),
            game_over: false,
        })
    }

    /// Undo `times` committed moves (1 = most recent).
    ///
    /// Restores the snapshot at that depth and discards it together with
    /// every more recent history entry. Rejected without side effects when
    /// `times` exceeds the recorded history.
    pub fn undo(&mut self, times: usize) -> Result<(), GameError> {
        let available = self.history.len();
        let snapshot = self
            .history
            .take_back(times)
            .ok_or(GameError::UndoUnavailable {
                requested: times,
                available,
            })?;
        self.merged.clear();
        self.score = snapshot.score;
        self.board = snapshot.board;
        // The restored state had a legal move, so it cannot be terminal.
        self.over = false;
        match self.history.head() {
            Some(head) => {
                self.previous_score = head.score;
                self.previous = head.board.clone();
            }
            None => {
                // No older history: the previous state collapses onto the
                // restored current state.
                self.previous_score = self.score;
                self.previous = self.board.clone();
            }
        }
        debug!("undo {} step(s), score back to {}", times, self.score);
        self.emit(GameEvent::ScoreChanged { score: self.score });
        self.emit(GameEvent::BoardUpdated {
            board: self.board.clone(),
            merged: self.merged.clone(),
        });
        Ok(())
    }

    /// Rehydrate engine state from an external persistence layer without
    /// replaying moves. Pushes one history entry for the restored previous
    /// state, so a single-step undo works right away.
    pub fn restore(
        &mut self,
        previous: Board,
        current: Board,
        previous_score: u32,
        score: u32,
    ) -> Result<(), GameError> {
        for board in [&previous, &current] {
            if board.size() != self.size() {
                return Err(GameError::GridSizeMismatch {
                    expected: self.size(),
                    got: board.size(),
                });
            }
        }
        self.over = false;
        self.previous = previous;
        self.board = current;
        self.previous_score = previous_score;
        self.score = score;
        self.merged.clear();
        self.history.record(Snapshot {
            score: previous_score,
            board: self.previous.clone(),
        });
        debug!("state restored at score {}", score);
        self.emit(GameEvent::ScoreChanged { score: self.score });
        self.emit(GameEvent::BoardUpdated {
            board: self.board.clone(),
            merged: self.merged.clone(),
        });
        Ok(())
    }

    /// Current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Board as it was before the most recent committed move.
    pub fn previous_board(&self) -> &Board {
        &self.previous
    }

    /// Current score.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Score as it was before the most recent committed move.
    pub fn previous_score(&self) -> u32 {
        self.previous_score
    }

    /// Merge flags from the last move, for animation cues.
    pub fn merged_mask(&self) -> &MergeMask {
        &self.merged
    }

    /// Latched terminal flag. Set when a move is attempted on a terminal
    /// board; cleared by `start`, `undo` and `restore`.
    pub fn is_over(&self) -> bool {
        self.over
    }

    /// Whether any cell has reached the winning tile. Independent of
    /// game-over; a won game may still have legal moves.
    pub fn is_win(&self) -> bool {
        ops::is_win(&self.board)
    }

    /// Number of undo steps currently available.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    fn emit(&mut self, event: GameEvent) {
        for handler in &mut self.handlers {
            handler(&event);
        }
    }
}
