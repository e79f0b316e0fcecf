use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::state::Board;

/// Number of prior move-states the engine keeps recoverable. Older history
/// is permanently discarded, trading memory for a fixed worst-case undo
/// depth.
pub const UNDO_CAPACITY: usize = 3;

/// Immutable (score, board) pair recorded before a committed move.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub score: u32,
    pub board: Board,
}

/// Bounded most-recent-first stack of [`Snapshot`]s.
#[derive(Clone, Debug, Default)]
pub struct History {
    entries: VecDeque<Snapshot>,
}

impl History {
    pub fn new() -> Self {
        History {
            entries: VecDeque::with_capacity(UNDO_CAPACITY),
        }
    }

    /// Insert at the head, evicting the oldest entry once capacity is
    /// exceeded.
    pub fn record(&mut self, snapshot: Snapshot) {
        if self.entries.len() == UNDO_CAPACITY {
            self.entries.pop_back();
        }
        self.entries.push_front(snapshot);
    }

    /// Take the snapshot `times` steps back (1 = most recent), discarding
    /// it and every more recent entry. Entries strictly older than the
    /// restored one stay available for further undo.
    ///
    /// Returns `None` without touching the stack when `times` is zero or
    /// exceeds the current size.
    pub fn take_back(&mut self, times: usize) -> Option<Snapshot> {
        if times == 0 || times > self.entries.len() {
            return None;
        }
        let snapshot = self.entries[times - 1].clone();
        self.entries.drain(..times);
        Some(snapshot)
    }

    /// Most recent entry, if any.
    pub fn head(&self) -> Option<&Snapshot> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
