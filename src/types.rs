use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{BOARD_SIZE, FlipSet};
use crate::error::{GameError, GameResult};

/// One of the two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    Black,
    White,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Black => f.write_str("black"),
            Self::White => f.write_str("white"),
        }
    }
}

/// Contents of a single square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cell {
    #[default]
    Empty,
    Black,
    White,
}

impl From<Player> for Cell {
    fn from(player: Player) -> Self {
        match player {
            Player::Black => Self::Black,
            Player::White => Self::White,
        }
    }
}

/// A board coordinate, always inside the 8x8 grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    pub fn new(row: u8, col: u8) -> GameResult<Self> {
        if row as usize >= BOARD_SIZE || col as usize >= BOARD_SIZE {
            return Err(GameError::OutOfBounds { row, col });
        }
        Ok(Self { row, col })
    }

    /// Bit index of this square, `row * 8 + col`.
    pub fn index(self) -> usize {
        self.row as usize * BOARD_SIZE + self.col as usize
    }

    pub(crate) fn from_index(idx: usize) -> Self {
        debug_assert!(idx < BOARD_SIZE * BOARD_SIZE);
        Self {
            row: (idx / BOARD_SIZE) as u8,
            col: (idx % BOARD_SIZE) as u8,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Disc counts per colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Score {
    pub black: u8,
    pub white: u8,
}

impl Score {
    /// Result of a finished game with these counts.
    pub fn outcome(self) -> Outcome {
        if self.black > self.white {
            Outcome::Win(Player::Black)
        } else if self.white > self.black {
            Outcome::Win(Player::White)
        } else {
            Outcome::Draw
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    Win(Player),
    Draw,
}

impl Outcome {
    pub fn winner(self) -> Option<Player> {
        match self {
            Self::Win(player) => Some(player),
            Self::Draw => None,
        }
    }
}

/// The transition that produced the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum LastAction {
    /// Fresh game, nothing played yet.
    #[default]
    Start,
    Move {
        player: Player,
        position: Position,
        flipped: FlipSet,
        /// The opponent had no reply and was skipped by the automatic pass
        /// policy, so `player` moves again.
        opponent_passed: bool,
    },
    /// `player` forfeited a turn with an explicit pass.
    Pass { player: Player },
}

impl LastAction {
    /// True when the turn did not simply alternate.
    pub fn is_pass(&self) -> bool {
        match self {
            Self::Pass { .. } => true,
            Self::Move {
                opponent_passed, ..
            } => *opponent_passed,
            Self::Start => false,
        }
    }

    pub fn flipped(&self) -> FlipSet {
        match self {
            Self::Move { flipped, .. } => *flipped,
            _ => FlipSet::default(),
        }
    }
}

/// Read-only view of a game handed to the presentation layer.
///
/// Contract:
/// - `cells` holds 64 entries in row-major order.
/// - `flipped` is empty unless the last action was a move.
/// - `is_pass` is set after an explicit pass and after a move that skipped
///   the opponent.
/// - `outcome` is `None` until `is_game_over` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub cells: Vec<Cell>,
    pub current_player: Player,
    pub black_count: u8,
    pub white_count: u8,
    pub is_game_over: bool,
    pub is_pass: bool,
    pub flipped: Vec<Position>,
    pub last_move: Option<Position>,
    pub legal_moves: Vec<Position>,
    pub can_undo: bool,
    pub outcome: Option<Outcome>,
}
