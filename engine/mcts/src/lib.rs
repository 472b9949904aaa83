//! Monte Carlo Tree Search (MCTS) for AlphaZero-style Gomoku play.
//!
//! The search works on canonical boards (side to move owns the `+1` stones)
//! produced by [`games_gomoku::Gomoku`], and gets its priors and leaf values
//! from an injected [`Evaluator`].
//!
//! # Overview
//!
//! Statistics are kept per canonical state rather than per tree node, so
//! transpositions share visit counts and values. Each simulation:
//!
//! 1. **Terminal check**: won, lost and drawn states return their cached value
//! 2. **Expansion**: a state seen for the first time gets its prior, either a
//!    one-hot prior on an immediate winning move or the masked evaluator
//!    policy
//! 3. **Selection**: expanded states pick the action with the highest PUCT
//!    score, lowest index on ties
//! 4. **Backup**: the value is folded into the running mean of each edge on
//!    the path, flipping sign at every ply
//!
//! # Usage
//!
//! ```rust,ignore
//! use games_gomoku::Gomoku;
//! use mcts::{run_mcts, MctsConfig, UniformEvaluator};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let rules = Gomoku::new(15).unwrap();
//! let root = rules.initial_board();
//!
//! let evaluator = UniformEvaluator::new();
//! let config = MctsConfig::for_evaluation();
//!
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//! let result = run_mcts(&rules, &evaluator, config, &root, &mut rng).unwrap();
//!
//! println!("Best move: ({}, {})", result.row, result.col);
//! println!("Value: {}", result.value);
//! ```
//!
//! # Configuration
//!
//! The [`MctsConfig`] struct controls search behavior:
//!
//! - `num_simulations`: Number of simulations per search (default: 400)
//! - `c_puct`: Exploration constant for PUCT (default: 1.0)
//! - `temperature`: Temperature for action selection (1.0 = proportional, 0.0 = greedy)
//! - `visit_total`: Whether the exploration term counts visits over the whole
//!   search or only over the scored state's edges
//!
//! # Evaluators
//!
//! - [`UniformEvaluator`]: Uniform policy over empty cells, value 0
//! - Any `Fn(&Board) -> Result<EvalResult, EvaluatorError>` closure

pub mod config;
pub mod evaluator;
pub mod search;
pub mod stats;

// Re-export main types
pub use config::{MctsConfig, VisitTotal};
pub use evaluator::{EvalResult, Evaluator, EvaluatorError, UniformEvaluator};
pub use search::{run_mcts, MctsSearch, SearchError, SearchResult, SearchStats};
pub use stats::{EdgeStats, Expansion, SearchTables, StateEntry};
