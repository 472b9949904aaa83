//! Per-search statistics tables.
//!
//! Statistics are keyed by the fingerprint of a canonical board, so
//! transpositions share one entry. Every state the search has seen has a
//! [`StateEntry`] holding its cached terminal outcome; states that have been
//! expanded additionally carry an [`Expansion`] with the valid-move mask, the
//! prior policy and the per-action edge statistics.
//!
//! Outcome, mask and prior are written once and never replaced for the
//! lifetime of the tables. Only edge statistics change after insertion.

use std::collections::HashMap;

use games_gomoku::{Action, Outcome, StateKey};

/// Statistics for one (state, action) edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeStats {
    /// N(s,a): number of backups through this edge.
    pub visits: u32,
    /// Q(s,a): running mean of the values backed up through this edge.
    pub q: f32,
}

impl EdgeStats {
    /// Fold one backed-up value into the running mean.
    #[inline]
    pub fn update(&mut self, value: f32) {
        let n = self.visits as f32;
        self.q = (n * self.q + value) / (n + 1.0);
        self.visits += 1;
    }
}

/// Data cached when a state is first expanded.
#[derive(Debug, Clone)]
pub struct Expansion {
    valid: Vec<bool>,
    prior: Vec<f32>,
    /// Edge statistics per action; `None` until the edge is first visited.
    edges: Vec<Option<EdgeStats>>,
}

impl Expansion {
    pub fn new(valid: Vec<bool>, prior: Vec<f32>) -> Self {
        debug_assert_eq!(valid.len(), prior.len());
        let edges = vec![None; valid.len()];
        Self {
            valid,
            prior,
            edges,
        }
    }

    /// Valid-move mask.
    #[inline]
    pub fn valid(&self) -> &[bool] {
        &self.valid
    }

    /// Prior P(s,·), zero on invalid actions.
    #[inline]
    pub fn prior(&self) -> &[f32] {
        &self.prior
    }

    #[inline]
    pub fn edge(&self, action: Action) -> Option<&EdgeStats> {
        self.edges[action].as_ref()
    }

    /// Visit counts per action, 0 for unvisited edges.
    pub fn visit_counts(&self) -> Vec<u32> {
        self.edges
            .iter()
            .map(|e| e.map_or(0, |e| e.visits))
            .collect()
    }

    /// Sum of N(s,a) over this state's edges.
    pub fn sibling_visits(&self) -> u64 {
        self.edges.iter().flatten().map(|e| e.visits as u64).sum()
    }
}

/// Everything the search caches for one state.
#[derive(Debug, Clone)]
pub struct StateEntry {
    outcome: Outcome,
    expansion: Option<Expansion>,
}

impl StateEntry {
    #[inline]
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    #[inline]
    pub fn expansion(&self) -> Option<&Expansion> {
        self.expansion.as_ref()
    }

    #[inline]
    pub fn is_expanded(&self) -> bool {
        self.expansion.is_some()
    }
}

/// Statistics owned by a single search.
#[derive(Debug, Default)]
pub struct SearchTables {
    states: HashMap<StateKey, StateEntry>,
    /// Sum of N(s,a) over every edge in the table.
    total_visits: u64,
}

impl SearchTables {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, key: &StateKey) -> Option<&StateEntry> {
        self.states.get(key)
    }

    /// Cached outcome for `key`, computing and storing it on first sight.
    pub fn outcome_or_insert_with(
        &mut self,
        key: &StateKey,
        outcome: impl FnOnce() -> Outcome,
    ) -> Outcome {
        if let Some(entry) = self.states.get(key) {
            return entry.outcome;
        }
        let outcome = outcome();
        self.states.insert(
            key.clone(),
            StateEntry {
                outcome,
                expansion: None,
            },
        );
        outcome
    }

    /// Attach the expansion for a state whose outcome is already cached.
    /// An existing expansion is kept.
    pub fn expand(&mut self, key: &StateKey, expansion: Expansion) {
        debug_assert!(
            self.states.contains_key(key),
            "expanding a state with no cached outcome"
        );
        if let Some(entry) = self.states.get_mut(key) {
            entry.expansion.get_or_insert(expansion);
        }
    }

    /// Record a backed-up value on the edge (key, action).
    ///
    /// Returns `false` if the state is not expanded, in which case nothing
    /// is recorded.
    pub fn record(&mut self, key: &StateKey, action: Action, value: f32) -> bool {
        let Some(expansion) = self
            .states
            .get_mut(key)
            .and_then(|entry| entry.expansion.as_mut())
        else {
            return false;
        };

        expansion.edges[action]
            .get_or_insert(EdgeStats { visits: 0, q: 0.0 })
            .update(value);
        self.total_visits += 1;
        true
    }

    /// Sum of N(s,a) over every edge of every state.
    #[inline]
    pub fn total_visits(&self) -> u64 {
        self.total_visits
    }

    /// Number of states seen (terminal or not).
    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Number of expanded states.
    pub fn expanded_len(&self) -> usize {
        self.states.values().filter(|e| e.is_expanded()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use games_gomoku::Gomoku;

    fn key(rules: &Gomoku, action: Option<Action>) -> StateKey {
        let board = rules.initial_board();
        let board = match action {
            Some(a) => rules.apply_move(&board, games_gomoku::Player::Black, a).0,
            None => board,
        };
        rules.fingerprint(&board)
    }

    #[test]
    fn test_edge_update_running_mean() {
        let mut edge = EdgeStats { visits: 1, q: 1.0 };
        edge.update(-1.0);
        assert_eq!(edge.visits, 2);
        assert!(edge.q.abs() < 1e-6);

        edge.update(1.0);
        assert_eq!(edge.visits, 3);
        assert!((edge.q - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_outcome_is_memoized() {
        let rules = Gomoku::new(3).unwrap();
        let mut tables = SearchTables::new();
        let k = key(&rules, None);

        assert_eq!(tables.outcome_or_insert_with(&k, || Outcome::Ongoing), Outcome::Ongoing);
        // Second lookup never calls the closure and keeps the first value.
        let cached = tables.outcome_or_insert_with(&k, || panic!("outcome recomputed"));
        assert_eq!(cached, Outcome::Ongoing);
        assert_eq!(tables.len(), 1);
    }

    #[test]
    fn test_expansion_is_written_once() {
        let rules = Gomoku::new(2).unwrap();
        let mut tables = SearchTables::new();
        let k = key(&rules, None);
        tables.outcome_or_insert_with(&k, || Outcome::Ongoing);

        tables.expand(&k, Expansion::new(vec![true; 4], vec![0.25; 4]));
        tables.expand(&k, Expansion::new(vec![false; 4], vec![0.0; 4]));

        let expansion = tables.get(&k).unwrap().expansion().unwrap();
        assert_eq!(expansion.valid(), &[true; 4]);
        assert_eq!(expansion.prior(), &[0.25; 4]);
        assert_eq!(tables.expanded_len(), 1);
    }

    #[test]
    fn test_record_creates_then_updates_edges() {
        let rules = Gomoku::new(2).unwrap();
        let mut tables = SearchTables::new();
        let root = key(&rules, None);
        let child = key(&rules, Some(0));
        for k in [&root, &child] {
            tables.outcome_or_insert_with(k, || Outcome::Ongoing);
            tables.expand(k, Expansion::new(vec![true; 4], vec![0.25; 4]));
        }

        assert!(tables.record(&root, 1, 0.5));
        assert!(tables.record(&root, 1, -0.5));
        assert!(tables.record(&child, 3, 1.0));

        let expansion = tables.get(&root).unwrap().expansion().unwrap();
        assert!(expansion.edge(0).is_none());
        let edge = expansion.edge(1).unwrap();
        assert_eq!(edge.visits, 2);
        assert!(edge.q.abs() < 1e-6);
        assert_eq!(expansion.visit_counts(), vec![0, 2, 0, 0]);
        assert_eq!(expansion.sibling_visits(), 2);

        // Whole-table total counts the child's edge too.
        assert_eq!(tables.total_visits(), 3);
    }

    #[test]
    fn test_record_on_unexpanded_state_is_ignored() {
        let rules = Gomoku::new(2).unwrap();
        let mut tables = SearchTables::new();
        let k = key(&rules, None);
        tables.outcome_or_insert_with(&k, || Outcome::Draw);

        assert!(!tables.record(&k, 0, 1.0));
        assert_eq!(tables.total_visits(), 0);
    }
}
