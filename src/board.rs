use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::{GameError, GameResult};
use crate::types::{Cell, Player, Position, Score};

pub const BOARD_SIZE: usize = 8;
const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;
const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Discs a move would convert, one bit per square (`row * 8 + col`).
///
/// Iteration is row-major. Serializes as a list of positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FlipSet(u64);

impl FlipSet {
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn contains(self, pos: Position) -> bool {
        (self.0 & bit(pos.index())) != 0
    }

    pub fn bits(self) -> u64 {
        self.0
    }

    pub fn iter(self) -> impl Iterator<Item = Position> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let idx = bits.trailing_zeros() as usize;
            bits &= bits - 1;
            Some(Position::from_index(idx))
        })
    }
}

impl Serialize for FlipSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// A playable square together with the discs it would flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LegalMove {
    pub position: Position,
    pub flips: FlipSet,
}

/// Othello board state represented by two bitboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    black: u64,
    white: u64,
}

impl Board {
    /// Creates the opening position:
    /// (3,3)=white, (3,4)=black, (4,3)=black, (4,4)=white.
    pub fn new() -> Self {
        Self {
            black: bit(28) | bit(35),
            white: bit(27) | bit(36),
        }
    }

    /// Builds a board from raw occupancy masks. The masks must not overlap.
    pub fn from_bitboards(black: u64, white: u64) -> GameResult<Self> {
        if black & white != 0 {
            return Err(GameError::InvalidBoard(format!(
                "black and white overlap at mask {:#018x}",
                black & white
            )));
        }
        Ok(Self { black, white })
    }

    pub fn get(&self, pos: Position) -> Cell {
        let square = bit(pos.index());
        if (self.black & square) != 0 {
            Cell::Black
        } else if (self.white & square) != 0 {
            Cell::White
        } else {
            Cell::Empty
        }
    }

    /// Discs `player` would flip by playing at `pos`.
    /// Empty when the square is occupied or no line is closed.
    pub fn flips(&self, pos: Position, player: Player) -> FlipSet {
        let (me, opp) = self.sides(player);
        FlipSet(Self::collect_flips(pos.index(), me, opp))
    }

    /// Every legal move for `player`, in row-major order.
    pub fn legal_moves(&self, player: Player) -> Vec<LegalMove> {
        let (me, opp) = self.sides(player);
        let occupied = me | opp;

        (0..NUM_SQUARES)
            .filter(|&pos| (occupied & bit(pos)) == 0)
            .filter_map(|pos| {
                let flips = Self::collect_flips(pos, me, opp);
                (flips != 0).then(|| LegalMove {
                    position: Position::from_index(pos),
                    flips: FlipSet(flips),
                })
            })
            .collect()
    }

    pub fn has_legal_move(&self, player: Player) -> bool {
        let (me, opp) = self.sides(player);
        let occupied = me | opp;
        (0..NUM_SQUARES)
            .any(|pos| (occupied & bit(pos)) == 0 && Self::collect_flips(pos, me, opp) != 0)
    }

    /// Plays `player` at `pos` and returns the resulting board along with the
    /// flipped discs. `self` is left untouched.
    pub fn apply_move(&self, pos: Position, player: Player) -> GameResult<(Board, FlipSet)> {
        let flips = self.flips(pos, player);
        if flips.is_empty() {
            return Err(GameError::IllegalMove {
                row: pos.row,
                col: pos.col,
            });
        }

        let (me, opp) = self.sides(player);
        let next_me = me | bit(pos.index()) | flips.0;
        let next_opp = opp & !flips.0;

        let next = match player {
            Player::Black => Self {
                black: next_me,
                white: next_opp,
            },
            Player::White => Self {
                black: next_opp,
                white: next_me,
            },
        };
        Ok((next, flips))
    }

    /// True when neither colour can move, whoever is nominally to play.
    pub fn is_terminal(&self) -> bool {
        !self.has_legal_move(Player::Black) && !self.has_legal_move(Player::White)
    }

    pub fn count(&self) -> Score {
        Score {
            black: self.black.count_ones() as u8,
            white: self.white.count_ones() as u8,
        }
    }

    pub fn empty_count(&self) -> u8 {
        let score = self.count();
        NUM_SQUARES as u8 - score.black - score.white
    }

    /// All 64 cells in row-major order.
    pub fn cells(&self) -> [Cell; NUM_SQUARES] {
        let mut cells = [Cell::Empty; NUM_SQUARES];
        for (pos, cell) in cells.iter_mut().enumerate() {
            *cell = self.get(Position::from_index(pos));
        }
        cells
    }

    fn sides(&self, player: Player) -> (u64, u64) {
        match player {
            Player::Black => (self.black, self.white),
            Player::White => (self.white, self.black),
        }
    }

    fn collect_flips(pos: usize, me: u64, opp: u64) -> u64 {
        if pos >= NUM_SQUARES {
            return 0;
        }

        let move_bit = bit(pos);
        if ((me | opp) & move_bit) != 0 {
            return 0;
        }

        let row = (pos / BOARD_SIZE) as i32;
        let col = (pos % BOARD_SIZE) as i32;
        let mut flips = 0u64;

        for (dr, dc) in DIRECTIONS {
            let mut r = row + dr;
            let mut c = col + dc;
            let mut line = 0u64;

            // The run only counts if an in-bounds disc of our own closes it.
            while in_bounds(r, c) {
                let square = bit((r as usize) * BOARD_SIZE + c as usize);
                if (opp & square) != 0 {
                    line |= square;
                } else {
                    if (me & square) != 0 {
                        flips |= line;
                    }
                    break;
                }

                r += dr;
                c += dc;
            }
        }

        flips
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Eight lines of eight characters: `.` empty, `B` black, `W` white.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells().chunks(BOARD_SIZE) {
            for cell in row {
                let ch = match cell {
                    Cell::Empty => '.',
                    Cell::Black => 'B',
                    Cell::White => 'W',
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = GameError;

    /// Parses the `Display` form. Surrounding whitespace and blank lines are
    /// ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if rows.len() != BOARD_SIZE {
            return Err(GameError::InvalidBoard(format!(
                "expected {BOARD_SIZE} rows, got {}",
                rows.len()
            )));
        }

        let mut black = 0u64;
        let mut white = 0u64;
        for (r, line) in rows.iter().enumerate() {
            if line.chars().count() != BOARD_SIZE {
                return Err(GameError::InvalidBoard(format!(
                    "row {r} must have {BOARD_SIZE} cells: {line:?}"
                )));
            }
            for (c, ch) in line.chars().enumerate() {
                let square = bit(r * BOARD_SIZE + c);
                match ch {
                    '.' => {}
                    'B' => black |= square,
                    'W' => white |= square,
                    other => {
                        return Err(GameError::InvalidBoard(format!(
                            "unexpected character {other:?} at ({r}, {c})"
                        )));
                    }
                }
            }
        }

        Self::from_bitboards(black, white)
    }
}

fn bit(pos: usize) -> u64 {
    if pos < NUM_SQUARES { 1u64 << pos } else { 0 }
}

fn in_bounds(row: i32, col: i32) -> bool {
    (0..BOARD_SIZE as i32).contains(&row) && (0..BOARD_SIZE as i32).contains(&col)
}
