use crate::board::Board;
use crate::error::{GameError, GameResult};
use crate::types::{LastAction, Player, Position};

/// Copy of the undoable part of a game state, taken before each transition.
///
/// The terminal flag is not stored; it is derived from `board` on restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryEntry {
    pub board: Board,
    pub current_player: Player,
    pub last_move: Option<Position>,
    pub last_action: LastAction,
}

/// Linear undo stack. Entries are owned copies, never views of the live state.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    /// Removes and returns the most recent entry.
    pub fn pop(&mut self) -> GameResult<HistoryEntry> {
        self.entries.pop().ok_or(GameError::NoHistory)
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
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
