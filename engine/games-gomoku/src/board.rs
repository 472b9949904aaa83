//! Board snapshot and player types.
//!
//! A board is an N×N grid of `i8` cells: `+1` for black stones, `-1` for
//! white stones, `0` for empty. Boards are immutable values; applying a move
//! yields a new board.

use std::fmt;

use thiserror::Error;

/// Errors produced when building a board from external data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("Board must have at least one row")]
    Empty,

    #[error("Board must be square: row {row} has {actual} cells, expected {expected}")]
    NotSquare {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid buffer length: expected {expected} but got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Invalid cell value {value} at index {index}, expected -1, 0 or 1")]
    InvalidCell { index: usize, value: i8 },
}

/// One of the two sides.
///
/// In canonical form the side to move is always [`Player::Black`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    /// Cell value `+1`.
    Black,
    /// Cell value `-1`.
    White,
}

impl Player {
    /// Cell value written for this player's stones.
    #[inline]
    pub fn sign(self) -> i8 {
        match self {
            Player::Black => 1,
            Player::White => -1,
        }
    }

    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }

    /// Parse a cell value. Returns `None` for `0` or out-of-range values.
    pub fn from_sign(sign: i8) -> Option<Player> {
        match sign {
            1 => Some(Player::Black),
            -1 => Some(Player::White),
            _ => None,
        }
    }
}

/// Immutable N×N grid snapshot, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    cells: Vec<i8>,
}

impl Board {
    /// All-empty board of the given side length.
    pub fn empty(size: usize) -> Self {
        Self {
            size,
            cells: vec![0; size * size],
        }
    }

    /// Build a board from row-major cells, validating length and values.
    pub fn from_cells(size: usize, cells: Vec<i8>) -> Result<Self, BoardError> {
        if size == 0 {
            return Err(BoardError::Empty);
        }
        if cells.len() != size * size {
            return Err(BoardError::InvalidLength {
                expected: size * size,
                actual: cells.len(),
            });
        }
        if let Some((index, &value)) = cells
            .iter()
            .enumerate()
            .find(|(_, &v)| !(-1..=1).contains(&v))
        {
            return Err(BoardError::InvalidCell { index, value });
        }
        Ok(Self { size, cells })
    }

    /// Build a board from a grid of rows. The grid must be square.
    pub fn from_rows<R: AsRef<[i8]>>(rows: &[R]) -> Result<Self, BoardError> {
        let size = rows.len();
        if size == 0 {
            return Err(BoardError::Empty);
        }

        let mut cells = Vec::with_capacity(size * size);
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != size {
                return Err(BoardError::NotSquare {
                    row,
                    expected: size,
                    actual: values.len(),
                });
            }
            cells.extend_from_slice(values);
        }

        Self::from_cells(size, cells)
    }

    /// Side length N.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> i8 {
        self.cells[row * self.size + col]
    }

    /// Row-major cell slice.
    #[inline]
    pub fn cells(&self) -> &[i8] {
        &self.cells
    }

    /// Copy of the grid as rows.
    pub fn to_rows(&self) -> Vec<Vec<i8>> {
        self.cells.chunks(self.size).map(|r| r.to_vec()).collect()
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c == 0).count()
    }

    pub fn stone_count(&self) -> usize {
        self.cells.len() - self.empty_count()
    }

    /// New board with one cell overwritten.
    pub(crate) fn with_cell(&self, index: usize, value: i8) -> Board {
        let mut cells = self.cells.clone();
        cells[index] = value;
        Board {
            size: self.size,
            cells,
        }
    }

    /// New board with every cell multiplied by `sign`.
    pub(crate) fn scaled(&self, sign: i8) -> Board {
        Board {
            size: self.size,
            cells: self.cells.iter().map(|&c| c * sign).collect(),
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for col in 0..self.size {
            write!(f, "{:>3}", col)?;
        }
        writeln!(f)?;

        for (row, cells) in self.cells.chunks(self.size).enumerate() {
            write!(f, "{:>3}", row)?;
            for &cell in cells {
                let mark = match cell {
                    1 => 'X',
                    -1 => 'O',
                    _ => '.',
                };
                write!(f, "{:>3}", mark)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_sign_and_opponent() {
        assert_eq!(Player::Black.sign(), 1);
        assert_eq!(Player::White.sign(), -1);
        assert_eq!(Player::Black.opponent(), Player::White);
        assert_eq!(Player::from_sign(-1), Some(Player::White));
        assert_eq!(Player::from_sign(0), None);
        assert_eq!(Player::from_sign(2), None);
    }

    #[test]
    fn test_from_rows() {
        let board = Board::from_rows(&[vec![1i8, 0], vec![0, -1]]).unwrap();
        assert_eq!(board.size(), 2);
        assert_eq!(board.get(0, 0), 1);
        assert_eq!(board.get(1, 1), -1);
        assert_eq!(board.stone_count(), 2);
        assert_eq!(board.to_rows(), vec![vec![1, 0], vec![0, -1]]);
    }

    #[test]
    fn test_from_rows_rejects_ragged_grid() {
        let err = Board::from_rows(&[vec![0i8, 0, 0], vec![0, 0], vec![0, 0, 0]]).unwrap_err();
        assert_eq!(
            err,
            BoardError::NotSquare {
                row: 1,
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn test_from_rows_rejects_bad_cell() {
        let err = Board::from_rows(&[vec![0i8, 2], vec![0, 0]]).unwrap_err();
        assert_eq!(err, BoardError::InvalidCell { index: 1, value: 2 });
    }

    #[test]
    fn test_from_rows_rejects_empty() {
        let rows: Vec<Vec<i8>> = Vec::new();
        assert_eq!(Board::from_rows(&rows).unwrap_err(), BoardError::Empty);
    }

    #[test]
    fn test_from_cells_length_mismatch() {
        let err = Board::from_cells(3, vec![0; 8]).unwrap_err();
        assert!(err.to_string().contains("expected 9"));
    }

    #[test]
    fn test_display() {
        let board = Board::from_rows(&[vec![1i8, 0], vec![0, -1]]).unwrap();
        let text = board.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains('X'));
        assert!(lines[2].contains('O'));
    }
}
