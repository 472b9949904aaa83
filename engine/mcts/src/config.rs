//! MCTS configuration parameters.

use std::fmt;
use std::str::FromStr;

/// Which edges contribute to the `totalVisits` term of the exploration bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisitTotal {
    /// Sum of visit counts over every edge recorded in the whole search.
    #[default]
    WholeTree,
    /// Sum of visit counts over the edges of the state being scored.
    Siblings,
}

impl FromStr for VisitTotal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tree" | "whole_tree" | "whole-tree" => Ok(VisitTotal::WholeTree),
            "siblings" | "sibling" => Ok(VisitTotal::Siblings),
            other => Err(format!(
                "unknown visit total '{}', expected 'tree' or 'siblings'",
                other
            )),
        }
    }
}

impl fmt::Display for VisitTotal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VisitTotal::WholeTree => write!(f, "tree"),
            VisitTotal::Siblings => write!(f, "siblings"),
        }
    }
}

/// Configuration for Monte Carlo Tree Search.
#[derive(Debug, Clone)]
pub struct MctsConfig {
    /// Number of simulations run by [`crate::MctsSearch::run`].
    pub num_simulations: u32,

    /// Exploration constant for the PUCT formula.
    /// Higher values encourage exploration, lower values favor exploitation.
    pub c_puct: f32,

    /// Temperature for action selection after search.
    /// 1.0 = proportional to visit counts, 0.0 = most-visited (argmax).
    pub temperature: f32,

    /// Added to `totalVisits` when scoring an unvisited edge so the
    /// exploration bonus is non-zero before the first visit.
    pub exploration_epsilon: f32,

    /// Scope of the `totalVisits` term.
    pub visit_total: VisitTotal,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            num_simulations: 400,
            c_puct: 1.0,
            temperature: 1.0,
            exploration_epsilon: 1e-8,
            visit_total: VisitTotal::WholeTree,
        }
    }
}

impl MctsConfig {
    /// Create config for self-play style search (sampling from visit counts).
    pub fn for_training() -> Self {
        Self {
            num_simulations: 100,
            ..Self::default()
        }
    }

    /// Create config for competitive play (greedy selection).
    pub fn for_evaluation() -> Self {
        Self {
            num_simulations: 400,
            temperature: 0.0, // Greedy
            ..Self::default()
        }
    }

    /// Create a fast config for testing.
    pub fn for_testing() -> Self {
        Self {
            num_simulations: 50,
            temperature: 0.0,
            ..Self::default()
        }
    }

    /// Builder pattern: set number of simulations.
    pub fn with_simulations(mut self, n: u32) -> Self {
        self.num_simulations = n;
        self
    }

    /// Builder pattern: set c_puct exploration constant.
    pub fn with_c_puct(mut self, c: f32) -> Self {
        self.c_puct = c;
        self
    }

    /// Builder pattern: set temperature.
    pub fn with_temperature(mut self, t: f32) -> Self {
        self.temperature = t;
        self
    }

    /// Builder pattern: set the scope of the visit total.
    pub fn with_visit_total(mut self, visit_total: VisitTotal) -> Self {
        self.visit_total = visit_total;
        self
    }
}
