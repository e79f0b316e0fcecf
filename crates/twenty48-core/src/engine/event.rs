use super::state::{Board, MergeMask};

/// Notification pushed to the presentation layer.
///
/// Events are dispatched synchronously, after the corresponding state
/// mutation has fully committed and before the engine call returns.
/// Handlers registered via [`super::Game::on_event`] observe, per committed
/// move: `ScoreChanged`, then `BoardUpdated`.
#[derive(Clone, Debug)]
pub enum GameEvent {
    /// The current score changed (move committed, undo, restore or start).
    ScoreChanged { score: u32 },
    /// The board changed; `merged` flags the cells that hold a tile
    /// produced by a merge, for animation cues.
    BoardUpdated { board: Board, merged: MergeMask },
    /// A move was requested on a terminal board.
    GameOver { final_score: u32 },
}

pub(crate) type EventHandler = Box<dyn FnMut(&GameEvent)>;
