//! MCTS search implementation.
//!
//! Each simulation descends from the root through already expanded states:
//! 1. Terminal check: terminal states return their cached value
//! 2. Expansion: the first visit to a state caches its valid moves and prior,
//!    either from an immediate winning move or from the evaluator
//! 3. Selection: expanded states pick the action with the highest PUCT score
//! 4. Backup: the returned value updates the edge statistics and flips sign
//!    on the way up
//!
//! All boards handled here are canonical: the side to move owns the `+1`
//! stones. Values are returned from the perspective of the parent state.

use games_gomoku::{Action, Board, Gomoku, Player, StateKey};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::{MctsConfig, VisitTotal};
use crate::evaluator::{Evaluator, EvaluatorError};
use crate::stats::{EdgeStats, Expansion, SearchTables, StateEntry};

/// Errors that can occur during MCTS search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Evaluator error: {0}")]
    EvaluatorError(#[from] EvaluatorError),

    #[error("Evaluator returned a policy of length {actual}, expected {expected}")]
    PolicyLength { expected: usize, actual: usize },

    #[error("Evaluator returned a non-finite value: {0}")]
    InvalidValue(f32),

    #[error("Board is {actual}x{actual}, rules expect {expected}x{expected}")]
    BoardSizeMismatch { expected: usize, actual: usize },

    #[error("Temperature must be finite and non-negative, got {0}")]
    InvalidTemperature(f32),

    #[error("No legal moves available")]
    NoLegalMoves,

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Result of an MCTS search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Chosen action index
    pub action: Action,

    /// Row of the chosen action
    pub row: usize,

    /// Column of the chosen action
    pub col: usize,

    /// Action distribution over all N² actions
    pub policy: Vec<f32>,

    /// Visit-weighted mean of Q(root, ·), from the side to move
    pub value: f32,

    /// Number of simulations performed
    pub simulations: u32,
}

/// Counters describing the work a search has done.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub simulations: u32,
    pub evaluator_calls: u32,
    pub tactical_wins: u32,
    pub terminal_hits: u32,
}

/// MCTS search state.
///
/// One value owns the statistics of one independent search. Create a fresh
/// search for every position that is searched from scratch.
pub struct MctsSearch<'a, E: Evaluator> {
    rules: &'a Gomoku,
    evaluator: &'a E,
    config: MctsConfig,
    tables: SearchTables,
    stats: SearchStats,
}

impl<'a, E: Evaluator> MctsSearch<'a, E> {
    /// Create a new search with empty statistics.
    pub fn new(rules: &'a Gomoku, evaluator: &'a E, config: MctsConfig) -> Self {
        Self {
            rules,
            evaluator,
            config,
            tables: SearchTables::new(),
            stats: SearchStats::default(),
        }
    }

    /// Run one simulation from the canonical `root`.
    ///
    /// Returns the value backed up to the caller of the root, i.e. from the
    /// perspective of the player who moved into `root`.
    pub fn run_simulation(&mut self, root: &Board) -> Result<f32, SearchError> {
        self.check_board(root)?;
        let value = self.simulate(root, 0)?;
        self.stats.simulations += 1;

        trace!(
            simulation = self.stats.simulations,
            value = value,
            states = self.tables.len(),
            "MCTS simulation complete"
        );

        Ok(value)
    }

    /// Probability of playing each action from `root`, derived from the root
    /// visit counts.
    ///
    /// Temperature 0 puts all mass on one most-visited action, breaking ties
    /// uniformly at random. Otherwise counts are raised to `1/temperature`
    /// and normalized. Without any root visits the distribution is uniform
    /// over the empty cells.
    pub fn action_distribution(
        &self,
        root: &Board,
        temperature: f32,
        rng: &mut ChaCha20Rng,
    ) -> Result<Vec<f32>, SearchError> {
        self.check_board(root)?;
        if !temperature.is_finite() || temperature < 0.0 {
            return Err(SearchError::InvalidTemperature(temperature));
        }

        let num_actions = self.rules.action_count();
        let key = self.rules.fingerprint(root);
        let counts = self
            .tables
            .get(&key)
            .and_then(StateEntry::expansion)
            .map(Expansion::visit_counts)
            .unwrap_or_else(|| vec![0; num_actions]);
        let max = counts.iter().copied().max().unwrap_or(0);

        if max == 0 {
            if temperature == 0.0 {
                let valid: Vec<Action> = valid_actions(&self.rules.valid_moves(root)).collect();
                let action = *valid.choose(rng).ok_or(SearchError::NoLegalMoves)?;
                return Ok(one_hot(num_actions, action));
            }
            return uniform_over_valid(&self.rules.valid_moves(root));
        }

        if temperature == 0.0 {
            let best: Vec<Action> = counts
                .iter()
                .enumerate()
                .filter(|(_, &c)| c == max)
                .map(|(a, _)| a)
                .collect();
            let action = *best.choose(rng).ok_or(SearchError::NoLegalMoves)?;
            return Ok(one_hot(num_actions, action));
        }

        // Scale by the max count first so large exponents cannot overflow.
        let exponent = 1.0 / temperature as f64;
        let weights: Vec<f64> = counts
            .iter()
            .map(|&c| (c as f64 / max as f64).powf(exponent))
            .collect();
        let total: f64 = weights.iter().sum();

        Ok(weights.iter().map(|w| (w / total) as f32).collect())
    }

    /// Run the configured number of simulations, then pick an action from
    /// the distribution at the configured temperature.
    pub fn run(&mut self, root: &Board, rng: &mut ChaCha20Rng) -> Result<SearchResult, SearchError> {
        for _ in 0..self.config.num_simulations {
            self.run_simulation(root)?;
        }

        let policy = self.action_distribution(root, self.config.temperature, rng)?;
        let action = sample_action(&policy, rng)?;
        let (row, col) = self.rules.action_to_coords(action);
        let value = self.root_value(root);

        debug!(
            action,
            row,
            col,
            value,
            simulations = self.stats.simulations,
            evaluator_calls = self.stats.evaluator_calls,
            tactical_wins = self.stats.tactical_wins,
            states = self.tables.len(),
            "MCTS search complete"
        );

        Ok(SearchResult {
            action,
            row,
            col,
            policy,
            value,
            simulations: self.stats.simulations,
        })
    }

    /// Visit-weighted mean of Q(root, ·); 0 before any root visit.
    pub fn root_value(&self, root: &Board) -> f32 {
        let key = self.rules.fingerprint(root);
        let Some(expansion) = self.tables.get(&key).and_then(StateEntry::expansion) else {
            return 0.0;
        };

        let (weighted, visits) = (0..self.rules.action_count())
            .filter_map(|a| expansion.edge(a))
            .fold((0.0f64, 0u64), |(sum, n), e| {
                (sum + e.q as f64 * e.visits as f64, n + e.visits as u64)
            });

        if visits == 0 {
            0.0
        } else {
            (weighted / visits as f64) as f32
        }
    }

    /// Statistics tables (for inspection/debugging).
    pub fn tables(&self) -> &SearchTables {
        &self.tables
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    fn check_board(&self, board: &Board) -> Result<(), SearchError> {
        if board.size() != self.rules.size() {
            return Err(SearchError::BoardSizeMismatch {
                expected: self.rules.size(),
                actual: board.size(),
            });
        }
        Ok(())
    }

    /// One recursive descent. Depth is bounded by the number of empty cells.
    fn simulate(&mut self, board: &Board, depth: usize) -> Result<f32, SearchError> {
        let rules = self.rules;
        let key = rules.fingerprint(board);

        let outcome = self
            .tables
            .outcome_or_insert_with(&key, || rules.game_ended(board, Player::Black));
        if outcome.is_terminal() {
            self.stats.terminal_hits += 1;
            trace!(depth, ?outcome, "reached terminal state");
            return Ok(-outcome.value());
        }

        let expanded = self
            .tables
            .get(&key)
            .is_some_and(StateEntry::is_expanded);
        if !expanded {
            return self.expand(board, &key, depth);
        }

        let action = self.select(&key)?;
        let (next, next_player) = rules.apply_move(board, Player::Black, action);
        let next = rules.canonical_form(&next, next_player);

        let value = self.simulate(&next, depth + 1)?;
        self.tables.record(&key, action, value);

        Ok(-value)
    }

    /// First visit to a state: cache its valid moves and prior.
    fn expand(&mut self, board: &Board, key: &StateKey, depth: usize) -> Result<f32, SearchError> {
        let valid = self.rules.valid_moves(board);

        if let Some(action) = self.winning_move(board, &valid) {
            let prior = one_hot(valid.len(), action);
            self.tables.expand(key, Expansion::new(valid, prior));
            self.stats.tactical_wins += 1;
            trace!(depth, action, "immediate win, skipping evaluator");
            // A win for the side to move is a loss for the parent.
            return Ok(-1.0);
        }

        let eval = self.evaluator.evaluate(board)?;
        self.stats.evaluator_calls += 1;

        if eval.policy.len() != valid.len() {
            return Err(SearchError::PolicyLength {
                expected: valid.len(),
                actual: eval.policy.len(),
            });
        }
        if !eval.value.is_finite() {
            return Err(SearchError::InvalidValue(eval.value));
        }

        let prior = masked_prior(&eval.policy, &valid);
        let value = eval.value.clamp(-1.0, 1.0);
        self.tables.expand(key, Expansion::new(valid, prior));

        trace!(depth, value, "expanded leaf");
        Ok(-value)
    }

    /// First valid action (lowest index) that completes a five for the side
    /// to move.
    fn winning_move(&self, board: &Board, valid: &[bool]) -> Option<Action> {
        valid_actions(valid).find(|&action| {
            let (next, _) = self.rules.apply_move(board, Player::Black, action);
            self.rules.check_win(&next, Player::Black)
        })
    }

    /// `totalVisits` term for scoring the edges of `expansion`.
    fn visit_total(&self, expansion: &Expansion) -> u64 {
        match self.config.visit_total {
            VisitTotal::WholeTree => self.tables.total_visits(),
            VisitTotal::Siblings => expansion.sibling_visits(),
        }
    }

    /// Valid action with the strictly greatest PUCT score. On ties the
    /// lowest index wins.
    fn select(&self, key: &StateKey) -> Result<Action, SearchError> {
        let expansion = self
            .tables
            .get(key)
            .and_then(StateEntry::expansion)
            .ok_or_else(|| SearchError::InvalidState("selecting from an unexpanded state".into()))?;

        let total = self.visit_total(expansion) as f32;
        let sqrt_total = total.sqrt();
        let sqrt_total_eps = (total + self.config.exploration_epsilon).sqrt();

        let mut best_score = f32::NEG_INFINITY;
        let mut best_action = None;
        for action in valid_actions(expansion.valid()) {
            let score = puct_score(
                expansion.edge(action),
                expansion.prior()[action],
                self.config.c_puct,
                sqrt_total,
                sqrt_total_eps,
            );
            if score > best_score {
                best_score = score;
                best_action = Some(action);
            }
        }

        best_action.ok_or(SearchError::NoLegalMoves)
    }
}

/// PUCT score of one edge.
///
/// Visited: `Q + c_puct * P * sqrt(total) / (1 + N)`.
/// Unvisited: `c_puct * P * sqrt(total + eps)`.
#[inline]
pub fn puct_score(
    edge: Option<&EdgeStats>,
    prior: f32,
    c_puct: f32,
    sqrt_total: f32,
    sqrt_total_eps: f32,
) -> f32 {
    match edge {
        Some(e) => e.q + c_puct * prior * sqrt_total / (1.0 + e.visits as f32),
        None => c_puct * prior * sqrt_total_eps,
    }
}

fn valid_actions(valid: &[bool]) -> impl Iterator<Item = Action> + '_ {
    valid
        .iter()
        .enumerate()
        .filter_map(|(a, &v)| v.then_some(a))
}

fn one_hot(len: usize, action: Action) -> Vec<f32> {
    let mut v = vec![0.0; len];
    v[action] = 1.0;
    v
}

fn uniform_over_valid(valid: &[bool]) -> Result<Vec<f32>, SearchError> {
    let count = valid.iter().filter(|&&v| v).count();
    if count == 0 {
        return Err(SearchError::NoLegalMoves);
    }
    let p = 1.0 / count as f32;
    Ok(valid.iter().map(|&v| if v { p } else { 0.0 }).collect())
}

/// Mask `policy` by `valid` and renormalize. Negative or non-finite weights
/// count as zero. Zero remaining mass falls back to uniform over valid moves.
fn masked_prior(policy: &[f32], valid: &[bool]) -> Vec<f32> {
    let masked: Vec<f32> = policy
        .iter()
        .zip(valid)
        .map(|(&p, &v)| if v && p.is_finite() && p > 0.0 { p } else { 0.0 })
        .collect();
    let total: f64 = masked.iter().map(|&p| p as f64).sum();

    if total > 0.0 {
        masked.iter().map(|&p| (p as f64 / total) as f32).collect()
    } else {
        uniform_over_valid(valid).unwrap_or(masked)
    }
}

/// Sample an action from a probability distribution.
fn sample_action(policy: &[f32], rng: &mut ChaCha20Rng) -> Result<Action, SearchError> {
    let r: f32 = rng.gen();
    let mut cumsum = 0.0;

    for (i, &p) in policy.iter().enumerate() {
        cumsum += p;
        if r < cumsum {
            return Ok(i);
        }
    }

    // Fallback to last non-zero action (handles floating point issues)
    for (i, &p) in policy.iter().enumerate().rev() {
        if p > 0.0 {
            return Ok(i);
        }
    }

    Err(SearchError::NoLegalMoves)
}

/// Convenience function to run a single MCTS search from a canonical root.
pub fn run_mcts<E: Evaluator>(
    rules: &Gomoku,
    evaluator: &E,
    config: MctsConfig,
    root: &Board,
    rng: &mut ChaCha20Rng,
) -> Result<SearchResult, SearchError> {
    let mut search = MctsSearch::new(rules, evaluator, config);
    search.run(root, rng)
}
