//! Engine-vs-engine demonstration games.

use anyhow::Result;
use games_gomoku::{Action, Board, Gomoku, Player, WinningLine};
use mcts::{run_mcts, Evaluator, MctsConfig};
use rand_chacha::ChaCha20Rng;
use tracing::{debug, info};

/// Finished game.
#[derive(Debug)]
pub struct GameRecord {
    /// Moves in play order as (player, row, col)
    pub moves: Vec<(Player, usize, usize)>,
    pub final_board: Board,
    /// `None` for a draw
    pub winning_line: Option<WinningLine>,
}

/// Play one game from the empty board, searching every move from scratch.
///
/// The first `temp_threshold` plies sample from the visit distribution at
/// temperature 1, later plies play the most visited move.
pub fn self_play<E: Evaluator>(
    rules: &Gomoku,
    evaluator: &E,
    config: &MctsConfig,
    temp_threshold: u32,
    rng: &mut ChaCha20Rng,
) -> Result<GameRecord> {
    let mut board = rules.initial_board();
    let mut player = Player::Black;
    let mut moves = Vec::new();

    loop {
        let ply = moves.len();
        let temperature = if (ply as u32) < temp_threshold { 1.0 } else { 0.0 };
        let canonical = rules.canonical_form(&board, player);

        let result = run_mcts(
            rules,
            evaluator,
            config.clone().with_temperature(temperature),
            &canonical,
            rng,
        )?;
        let action: Action = result.action;

        debug!(
            ply,
            ?player,
            row = result.row,
            col = result.col,
            value = result.value,
            temperature,
            "Engine move"
        );

        let (next, next_player) = rules.apply_move(&board, player, action);
        moves.push((player, result.row, result.col));
        board = next;

        if rules.check_win(&board, player) {
            info!(?player, plies = moves.len(), "Game won");
            break;
        }
        if board.empty_count() == 0 {
            info!(plies = moves.len(), "Game drawn");
            break;
        }
        player = next_player;
    }

    let winning_line = rules.winning_line(&board);
    Ok(GameRecord {
        moves,
        final_board: board,
        winning_line,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcts::UniformEvaluator;
    use rand::SeedableRng;

    #[test]
    fn test_self_play_finishes() {
        let rules = Gomoku::new(5).unwrap();
        let evaluator = UniformEvaluator::new();
        let config = MctsConfig::for_testing().with_simulations(30);

        for seed in 0..3 {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let record = self_play(&rules, &evaluator, &config, 4, &mut rng).unwrap();

            assert_eq!(record.moves.len(), record.final_board.stone_count());
            // Players alternate starting with black.
            for (i, (player, _, _)) in record.moves.iter().enumerate() {
                let expected = if i % 2 == 0 { Player::Black } else { Player::White };
                assert_eq!(*player, expected);
            }

            match record.winning_line.as_ref().map(|line| line.player) {
                Some(winner) => {
                    assert!(rules.check_win(&record.final_board, winner));
                    assert_eq!(record.moves.last().map(|m| m.0), Some(winner));
                }
                None => assert_eq!(record.final_board.empty_count(), 0),
            }
        }
    }

    #[test]
    fn test_self_play_is_deterministic_per_seed() {
        let rules = Gomoku::new(5).unwrap();
        let evaluator = UniformEvaluator::new();
        let config = MctsConfig::for_testing().with_simulations(20);

        let mut rng = ChaCha20Rng::seed_from_u64(9);
        let first = self_play(&rules, &evaluator, &config, 6, &mut rng).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(9);
        let second = self_play(&rules, &evaluator, &config, 6, &mut rng).unwrap();

        assert_eq!(first.moves, second.moves);
    }
}
