//! JSON request and response types for `gomoku predict`.
//!
//! The grid uses the web frontend encoding: `0` empty, `1` black, and `2`
//! (or `-1`) white. `currentPlayer` uses the same ids.

use anyhow::{anyhow, Result};
use games_gomoku::{Board, Gomoku, Player};
use mcts::SearchResult;
use serde::{Deserialize, Serialize};

/// Position to search.
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub grid: Vec<Vec<i8>>,
    #[serde(rename = "currentPlayer")]
    pub current_player: i8,
}

/// Suggested move.
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub row: usize,
    pub col: usize,
    /// Expected outcome for the side to move, in [-1, 1]
    pub value: f32,
    /// Move probabilities, row-major over the N² cells
    pub policy: Vec<f32>,
}

impl From<&SearchResult> for PredictResponse {
    fn from(result: &SearchResult) -> Self {
        Self {
            row: result.row,
            col: result.col,
            value: result.value,
            policy: result.policy.clone(),
        }
    }
}

/// Map a frontend player id to a stone value.
fn stone(id: i8) -> Option<i8> {
    match id {
        0 => Some(0),
        1 => Some(1),
        2 | -1 => Some(-1),
        _ => None,
    }
}

impl PredictRequest {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| anyhow!("Invalid request JSON: {}", e))
    }

    /// Side to move.
    pub fn player(&self) -> Result<Player> {
        stone(self.current_player)
            .and_then(Player::from_sign)
            .ok_or_else(|| {
                anyhow!(
                    "currentPlayer must be 1, 2 or -1, got {}",
                    self.current_player
                )
            })
    }

    /// Board in {+1, -1, 0} encoding, checked against the rules' size.
    pub fn board(&self, rules: &Gomoku) -> Result<Board> {
        let mut rows = Vec::with_capacity(self.grid.len());
        for (r, row) in self.grid.iter().enumerate() {
            let mut cells = Vec::with_capacity(row.len());
            for (c, &id) in row.iter().enumerate() {
                let value = stone(id)
                    .ok_or_else(|| anyhow!("Invalid cell value {} at ({}, {})", id, r, c))?;
                cells.push(value);
            }
            rows.push(cells);
        }

        let board = Board::from_rows(&rows)?;
        if board.size() != rules.size() {
            return Err(anyhow!(
                "Board must be {}x{}, got {}x{}",
                rules.size(),
                rules.size(),
                board.size(),
                board.size()
            ));
        }
        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> Gomoku {
        Gomoku::new(3).unwrap()
    }

    #[test]
    fn test_parse_frontend_encoding() {
        let request = PredictRequest::from_json(
            r#"{"grid": [[1, 0, 2], [0, 2, 0], [0, 0, 1]], "currentPlayer": 2}"#,
        )
        .unwrap();

        assert_eq!(request.player().unwrap(), Player::White);
        let board = request.board(&rules()).unwrap();
        assert_eq!(board.to_rows(), vec![vec![1, 0, -1], vec![0, -1, 0], vec![0, 0, 1]]);
    }

    #[test]
    fn test_minus_one_is_white() {
        let request =
            PredictRequest::from_json(r#"{"grid": [[0]], "currentPlayer": -1}"#).unwrap();
        assert_eq!(request.player().unwrap(), Player::White);
    }

    #[test]
    fn test_invalid_player() {
        let request =
            PredictRequest::from_json(r#"{"grid": [[0]], "currentPlayer": 3}"#).unwrap();
        assert!(request.player().is_err());

        let request =
            PredictRequest::from_json(r#"{"grid": [[0]], "currentPlayer": 0}"#).unwrap();
        assert!(request.player().is_err());
    }

    #[test]
    fn test_invalid_cell() {
        let request = PredictRequest::from_json(
            r#"{"grid": [[1, 0, 5], [0, 0, 0], [0, 0, 0]], "currentPlayer": 1}"#,
        )
        .unwrap();
        let err = request.board(&rules()).unwrap_err();
        assert!(err.to_string().contains("(0, 2)"));
    }

    #[test]
    fn test_ragged_grid() {
        let request = PredictRequest::from_json(
            r#"{"grid": [[0, 0, 0], [0, 0], [0, 0, 0]], "currentPlayer": 1}"#,
        )
        .unwrap();
        assert!(request.board(&rules()).is_err());
    }

    #[test]
    fn test_wrong_size() {
        let request =
            PredictRequest::from_json(r#"{"grid": [[0, 0], [0, 0]], "currentPlayer": 1}"#)
                .unwrap();
        let err = request.board(&rules()).unwrap_err();
        assert!(err.to_string().contains("3x3"));
    }

    #[test]
    fn test_missing_field() {
        assert!(PredictRequest::from_json(r#"{"grid": [[0]]}"#).is_err());
    }

    #[test]
    fn test_response_json() {
        let response = PredictResponse {
            row: 1,
            col: 2,
            value: 0.5,
            policy: vec![0.0, 1.0],
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"row\":1"));
        assert!(json.contains("\"col\":2"));
    }
}
