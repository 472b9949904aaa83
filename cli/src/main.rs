//! gomoku - command-line front end for the PUCT search engine
//!
//! Subcommands:
//! 1. `predict`: read a position as JSON and print the suggested move
//! 2. `play`: let the engine play a full game against itself
//!
//! No learned model ships with the engine; both subcommands search with the
//! uniform evaluator.

use std::io::Read;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use games_gomoku::{Gomoku, Outcome};
use mcts::{run_mcts, UniformEvaluator};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::info;

mod config;
mod play;
mod request;

use crate::config::{Command, Config};
use crate::request::{PredictRequest, PredictResponse};

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let config = Config::parse();
    config.validate()?;

    init_tracing(&config.log_level)?;
    info!(
        board_size = config.board_size,
        num_simulations = config.num_simulations,
        visit_total = %config.visit_total,
        "Configuration loaded"
    );

    let rules = Gomoku::new(config.board_size)?;
    let mut rng = ChaCha20Rng::seed_from_u64(config.seed);

    match &config.command {
        Command::Predict { input, temperature } => {
            let text = match input {
                Some(path) => std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                None => {
                    let mut text = String::new();
                    std::io::stdin()
                        .read_to_string(&mut text)
                        .context("Failed to read request from stdin")?;
                    text
                }
            };

            let request = PredictRequest::from_json(&text)?;
            let player = request.player()?;
            let board = request.board(&rules)?;
            if rules.game_ended(&board, player) != Outcome::Ongoing {
                return Err(anyhow!("Game is already over"));
            }

            let canonical = rules.canonical_form(&board, player);
            let result = run_mcts(
                &rules,
                &UniformEvaluator::new(),
                config.mcts_config(*temperature)?,
                &canonical,
                &mut rng,
            )?;
            info!(
                row = result.row,
                col = result.col,
                value = result.value,
                simulations = result.simulations,
                "Search complete"
            );

            println!("{}", serde_json::to_string(&PredictResponse::from(&result))?);
        }
        Command::Play { temp_threshold } => {
            let record = play::self_play(
                &rules,
                &UniformEvaluator::new(),
                &config.mcts_config(0.0)?,
                *temp_threshold,
                &mut rng,
            )?;

            println!("{}", record.final_board);
            match &record.winning_line {
                Some(line) => {
                    let cells: Vec<String> = line
                        .cells
                        .iter()
                        .map(|(r, c)| format!("({}, {})", r, c))
                        .collect();
                    println!(
                        "{:?} wins after {} moves: {}",
                        line.player,
                        record.moves.len(),
                        cells.join(" ")
                    );
                }
                None => println!("Draw after {} moves", record.moves.len()),
            }
        }
    }

    Ok(())
}
