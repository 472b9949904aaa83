//! Evaluator trait for position evaluation.
//!
//! The evaluator provides policy (action probabilities) and value estimates
//! for canonical boards. In AlphaZero this is a neural network. For testing
//! and for play without a trained model we provide a uniform evaluator.

use games_gomoku::Board;
use thiserror::Error;

/// Errors that can occur during evaluation.
#[derive(Debug, Error)]
pub enum EvaluatorError {
    #[error("Evaluation failed: {0}")]
    EvaluationFailed(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Model error: {0}")]
    ModelError(String),
}

/// Result of evaluating a game state.
#[derive(Debug, Clone)]
pub struct EvalResult {
    /// Policy: one non-negative weight per action (length N²).
    /// Does not need to sum to 1; the search masks and renormalizes it.
    pub policy: Vec<f32>,

    /// Value estimate for the side to move.
    /// Range: -1.0 (certain loss) to +1.0 (certain win).
    pub value: f32,
}

/// Trait for position evaluators.
///
/// The board passed in is always in canonical form: the side to move owns
/// the `+1` stones. The search calls `evaluate` exactly once per newly
/// discovered state and blocks until it returns.
///
/// Closures `Fn(&Board) -> Result<EvalResult, EvaluatorError>` implement
/// this trait, which keeps test stubs short.
pub trait Evaluator: Send + Sync {
    fn evaluate(&self, board: &Board) -> Result<EvalResult, EvaluatorError>;
}

impl<F> Evaluator for F
where
    F: Fn(&Board) -> Result<EvalResult, EvaluatorError> + Send + Sync,
{
    fn evaluate(&self, board: &Board) -> Result<EvalResult, EvaluatorError> {
        self(board)
    }
}

/// Uniform evaluator that assigns equal probability to all empty cells.
/// Value is always 0.0 (neutral). Used when no learned model is available.
#[derive(Debug, Clone, Default)]
pub struct UniformEvaluator;

impl UniformEvaluator {
    pub fn new() -> Self {
        Self
    }
}

impl Evaluator for UniformEvaluator {
    fn evaluate(&self, board: &Board) -> Result<EvalResult, EvaluatorError> {
        let cells = board.cells();
        let mut policy = vec![0.0; cells.len()];

        let num_empty = board.empty_count();
        if num_empty == 0 {
            // Full board - terminal state
            return Ok(EvalResult { policy, value: 0.0 });
        }

        let prob = 1.0 / num_empty as f32;
        for (slot, &cell) in policy.iter_mut().zip(cells) {
            if cell == 0 {
                *slot = prob;
            }
        }

        Ok(EvalResult { policy, value: 0.0 })
    }
}
