//! Configuration for the gomoku CLI
//!
//! Configuration is loaded from config.toml with environment variable overrides.
//! CLI arguments take highest priority, followed by env vars, then config.toml.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use engine_config::{load_config, CentralConfig};
use mcts::{MctsConfig, VisitTotal};
use once_cell::sync::Lazy;
use tracing::level_filters::LevelFilter;

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

// Default value functions that read from central config
fn default_log_level() -> String {
    CENTRAL_CONFIG.common.log_level.clone()
}

fn default_board_size() -> usize {
    CENTRAL_CONFIG.common.board_size
}

fn default_seed() -> u64 {
    CENTRAL_CONFIG.common.seed
}

fn default_num_simulations() -> u32 {
    CENTRAL_CONFIG.mcts.num_simulations
}

fn default_c_puct() -> f32 {
    CENTRAL_CONFIG.mcts.c_puct as f32
}

fn default_temperature() -> f32 {
    CENTRAL_CONFIG.mcts.temperature as f32
}

fn default_temp_threshold() -> u32 {
    CENTRAL_CONFIG.mcts.temp_threshold
}

fn default_visit_total() -> String {
    CENTRAL_CONFIG.mcts.visit_total.clone()
}

fn default_exploration_epsilon() -> f32 {
    CENTRAL_CONFIG.mcts.exploration_epsilon as f32
}

#[derive(Parser, Debug, Clone)]
#[command(name = "gomoku")]
#[command(about = "Gomoku PUCT search engine")]
#[command(
    long_about = "Runs the PUCT Monte Carlo Tree Search on Gomoku positions.

Configuration is loaded from config.toml with GOMOKU_<SECTION>_<KEY>
environment variable overrides. CLI arguments take highest priority."
)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value_t = default_log_level())]
    pub log_level: String,

    /// Board side length N
    #[arg(long, global = true, default_value_t = default_board_size())]
    pub board_size: usize,

    /// Seed for tie-breaking and move sampling
    #[arg(long, global = true, default_value_t = default_seed())]
    pub seed: u64,

    /// Number of MCTS simulations per move
    #[arg(long, global = true, default_value_t = default_num_simulations())]
    pub num_simulations: u32,

    /// PUCT exploration constant
    #[arg(long, global = true, default_value_t = default_c_puct())]
    pub c_puct: f32,

    /// Scope of the visit total in the exploration term ("tree" or "siblings")
    #[arg(long, global = true, default_value_t = default_visit_total())]
    pub visit_total: String,

    /// Added to the visit total when scoring unvisited moves
    #[arg(long, global = true, default_value_t = default_exploration_epsilon())]
    pub exploration_epsilon: f32,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Suggest a move for a position given as JSON
    Predict {
        /// JSON file with {"grid": [[...]], "currentPlayer": 1|2|-1}; stdin if omitted
        #[arg(long)]
        input: Option<PathBuf>,

        /// Temperature for choosing the move (0 = most visited)
        #[arg(long, default_value_t = default_temperature())]
        temperature: f32,
    },
    /// Let the engine play a full game against itself
    Play {
        /// Plies played at temperature 1 before switching to greedy play
        #[arg(long, default_value_t = default_temp_threshold())]
        temp_threshold: u32,
    },
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.board_size == 0 || self.board_size > games_gomoku::MAX_SIZE {
            return Err(anyhow!(
                "board_size must be between 1 and {}, got {}",
                games_gomoku::MAX_SIZE,
                self.board_size
            ));
        }

        if self.num_simulations == 0 {
            return Err(anyhow!("num_simulations must be greater than 0"));
        }

        if !self.c_puct.is_finite() || self.c_puct < 0.0 {
            return Err(anyhow!("c_puct must be a non-negative number"));
        }

        if !self.exploration_epsilon.is_finite() || self.exploration_epsilon < 0.0 {
            return Err(anyhow!("exploration_epsilon must be a non-negative number"));
        }

        self.parse_visit_total()?;

        if let Command::Predict { temperature, .. } = &self.command {
            if !temperature.is_finite() || *temperature < 0.0 {
                return Err(anyhow!("temperature must be a non-negative number"));
            }
        }

        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        Ok(())
    }

    fn parse_visit_total(&self) -> Result<VisitTotal> {
        self.visit_total.parse().map_err(|e: String| anyhow!(e))
    }

    /// Search configuration for one move at the given temperature.
    pub fn mcts_config(&self, temperature: f32) -> Result<MctsConfig> {
        Ok(MctsConfig {
            num_simulations: self.num_simulations,
            c_puct: self.c_puct,
            temperature,
            exploration_epsilon: self.exploration_epsilon,
            visit_total: self.parse_visit_total()?,
        })
    }
}
