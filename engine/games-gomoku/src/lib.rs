//! Gomoku rules for the search engine.
//!
//! Gomoku is played on an N×N grid. Players alternately place a stone on any
//! empty cell; the first to line up five stones horizontally, vertically or
//! diagonally wins. A full board without a five is a draw.
//!
//! # Board Layout
//!
//! Cells are stored row-major and actions index them directly:
//! ```text
//! action = row * N + col
//!
//! N = 5:
//! Row 0: [ 0][ 1][ 2][ 3][ 4]
//! Row 1: [ 5][ 6][ 7][ 8][ 9]
//! Row 2: [10][11][12][13][14]
//! Row 3: [15][16][17][18][19]
//! Row 4: [20][21][22][23][24]
//! ```
//!
//! # Usage
//!
//! ```rust
//! use games_gomoku::{Gomoku, Outcome, Player};
//!
//! let rules = Gomoku::new(9).unwrap();
//! let board = rules.initial_board();
//! let (board, next) = rules.apply_move(&board, Player::Black, 40);
//! assert_eq!(next, Player::White);
//! assert_eq!(rules.game_ended(&board, next), Outcome::Ongoing);
//! ```
//!
//! Every operation is a pure function of its inputs. The [`Gomoku`] value
//! only carries the configured board size.

mod board;

pub use board::{Board, BoardError, Player};

use thiserror::Error;

/// Stones in a row needed to win.
pub const WIN_LENGTH: usize = 5;

/// Largest supported side length.
pub const MAX_SIZE: usize = 255;

/// Scan directions as (d_row, d_col): horizontal, vertical, diagonal, anti-diagonal.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Index of a cell, `row * N + col`.
pub type Action = usize;

/// Errors produced when configuring the rules.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RulesError {
    #[error("Invalid board size {size}: must be between 1 and {max}")]
    InvalidSize { size: usize, max: usize },
}

/// Result of [`Gomoku::game_ended`], from the perspective of the queried player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Ongoing,
    Win,
    Loss,
    Draw,
}

impl Outcome {
    /// Value reported for a draw. Non-zero so a draw is never mistaken for an
    /// ongoing game.
    pub const DRAW_VALUE: f32 = 1e-4;

    #[inline]
    pub fn is_terminal(self) -> bool {
        self != Outcome::Ongoing
    }

    /// Scalar value: win 1, loss -1, draw [`Outcome::DRAW_VALUE`], ongoing 0.
    pub fn value(self) -> f32 {
        match self {
            Outcome::Ongoing => 0.0,
            Outcome::Win => 1.0,
            Outcome::Loss => -1.0,
            Outcome::Draw => Self::DRAW_VALUE,
        }
    }
}

/// Memoization key for a board.
///
/// Layout: side length as two little-endian bytes, then the cells packed two
/// bits each (`00` empty, `01` black, `10` white), four cells per byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateKey(Box<[u8]>);

impl StateKey {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// A five-in-a-row found on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinningLine {
    pub player: Player,
    /// The five cells as (row, col), starting at the scan origin.
    pub cells: [(usize, usize); WIN_LENGTH],
}

/// Gomoku rule engine for a fixed board size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gomoku {
    n: usize,
}

impl Gomoku {
    /// Standard board size.
    pub const DEFAULT_SIZE: usize = 15;

    pub fn new(n: usize) -> Result<Self, RulesError> {
        if n == 0 || n > MAX_SIZE {
            return Err(RulesError::InvalidSize {
                size: n,
                max: MAX_SIZE,
            });
        }
        Ok(Self { n })
    }

    /// Side length N.
    #[inline]
    pub fn size(&self) -> usize {
        self.n
    }

    pub fn initial_board(&self) -> Board {
        Board::empty(self.n)
    }

    pub fn board_size(&self) -> (usize, usize) {
        (self.n, self.n)
    }

    /// Number of actions, N².
    #[inline]
    pub fn action_count(&self) -> usize {
        self.n * self.n
    }

    #[inline]
    pub fn action_to_coords(&self, action: Action) -> (usize, usize) {
        (action / self.n, action % self.n)
    }

    #[inline]
    pub fn coords_to_action(&self, row: usize, col: usize) -> Action {
        row * self.n + col
    }

    /// Place `player`'s stone at `action` and hand the turn to the opponent.
    ///
    /// The cell must be empty; consult [`Gomoku::valid_moves`] first.
    pub fn apply_move(&self, board: &Board, player: Player, action: Action) -> (Board, Player) {
        debug_assert_eq!(board.size(), self.n);
        debug_assert_eq!(board.cells()[action], 0, "cell {} is occupied", action);
        (board.with_cell(action, player.sign()), player.opponent())
    }

    /// `true` at every empty cell.
    pub fn valid_moves(&self, board: &Board) -> Vec<bool> {
        board.cells().iter().map(|&c| c == 0).collect()
    }

    /// Whether `player` has five consecutive stones anywhere on the board.
    pub fn check_win(&self, board: &Board, player: Player) -> bool {
        let stone = player.sign();
        (0..self.n).any(|row| {
            (0..self.n).any(|col| {
                board.get(row, col) == stone
                    && DIRECTIONS
                        .iter()
                        .any(|&dir| self.run_length(board, row, col, dir, stone) == WIN_LENGTH)
            })
        })
    }

    /// Terminal status from `player`'s point of view.
    ///
    /// A five for `player` is checked before a five for the opponent, then a
    /// full board is a draw.
    pub fn game_ended(&self, board: &Board, player: Player) -> Outcome {
        if self.check_win(board, player) {
            Outcome::Win
        } else if self.check_win(board, player.opponent()) {
            Outcome::Loss
        } else if board.empty_count() == 0 {
            Outcome::Draw
        } else {
            Outcome::Ongoing
        }
    }

    /// Board as seen by `player`: their stones become `+1`.
    pub fn canonical_form(&self, board: &Board, player: Player) -> Board {
        board.scaled(player.sign())
    }

    /// Byte-exact key for `board`. Rotations and reflections are distinct.
    pub fn fingerprint(&self, board: &Board) -> StateKey {
        let cells = board.cells();
        let mut bytes = Vec::with_capacity(2 + cells.len().div_ceil(4));
        bytes.extend_from_slice(&(board.size() as u16).to_le_bytes());

        for chunk in cells.chunks(4) {
            let packed = chunk.iter().enumerate().fold(0u8, |acc, (i, &cell)| {
                let code = match cell {
                    1 => 0b01,
                    -1 => 0b10,
                    _ => 0b00,
                };
                acc | (code << (i * 2))
            });
            bytes.push(packed);
        }

        StateKey(bytes.into_boxed_slice())
    }

    /// First five-in-a-row found scanning origins row-major, for either player.
    pub fn winning_line(&self, board: &Board) -> Option<WinningLine> {
        for row in 0..self.n {
            for col in 0..self.n {
                let stone = board.get(row, col);
                let Some(player) = Player::from_sign(stone) else {
                    continue;
                };

                for &(dr, dc) in &DIRECTIONS {
                    if self.run_length(board, row, col, (dr, dc), stone) == WIN_LENGTH {
                        let mut cells = [(0, 0); WIN_LENGTH];
                        for (i, cell) in cells.iter_mut().enumerate() {
                            let i = i as isize;
                            *cell = (
                                (row as isize + dr * i) as usize,
                                (col as isize + dc * i) as usize,
                            );
                        }
                        return Some(WinningLine { player, cells });
                    }
                }
            }
        }
        None
    }

    /// Consecutive `stone` cells starting at the origin along `dir`, capped at
    /// [`WIN_LENGTH`]. Stops at the first mismatch or the board edge.
    fn run_length(
        &self,
        board: &Board,
        row: usize,
        col: usize,
        (dr, dc): (isize, isize),
        stone: i8,
    ) -> usize {
        let n = self.n as isize;
        (0..WIN_LENGTH as isize)
            .take_while(|&i| {
                let r = row as isize + dr * i;
                let c = col as isize + dc * i;
                (0..n).contains(&r) && (0..n).contains(&c) && board.get(r as usize, c as usize) == stone
            })
            .count()
    }
}

impl Default for Gomoku {
    fn default() -> Self {
        Self {
            n: Self::DEFAULT_SIZE,
        }
    }
}
