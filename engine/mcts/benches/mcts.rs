//! MCTS benchmarks for performance profiling.
//!
//! Run with: `cargo bench -p mcts`
//!
//! These benchmarks measure:
//! - Full MCTS search with varying simulation counts and board sizes
//! - Search from different game phases (opening, midgame, forced win)
//! - Statistics table operations (backup, visit counts)
//! - Configuration variants (c_puct, visit total scope)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use games_gomoku::{Board, Gomoku, Player};
use mcts::{Expansion, MctsConfig, MctsSearch, SearchTables, UniformEvaluator, VisitTotal};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// Canonical board after playing `moves` as (row, col) pairs from an empty board.
fn play_moves(rules: &Gomoku, moves: &[(usize, usize)]) -> Board {
    let mut board = rules.initial_board();
    let mut player = Player::Black;
    for &(row, col) in moves {
        let (next, next_player) = rules.apply_move(&board, player, rules.coords_to_action(row, col));
        board = next;
        player = next_player;
    }
    rules.canonical_form(&board, player)
}

fn search_once(rules: &Gomoku, config: &MctsConfig, root: &Board) {
    let evaluator = UniformEvaluator::new();
    let mut rng = ChaCha20Rng::seed_from_u64(42);
    let mut search = MctsSearch::new(rules, &evaluator, config.clone());
    black_box(search.run(root, &mut rng).unwrap());
}

// =============================================================================
// Full MCTS Search Benchmarks
// =============================================================================

fn bench_mcts_search_simulations(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_search_simulations");
    let rules = Gomoku::default();
    let root = rules.initial_board();

    for sims in [50, 100, 200, 400, 800] {
        group.throughput(Throughput::Elements(sims as u64));
        group.bench_with_input(BenchmarkId::new("15x15", sims), &sims, |b, &sims| {
            let config = MctsConfig::for_testing().with_simulations(sims);
            b.iter(|| search_once(&rules, &config, &root));
        });
    }

    group.finish();
}

fn bench_board_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_board_sizes");
    let config = MctsConfig::for_testing().with_simulations(200);

    for n in [7usize, 9, 11, 15, 19] {
        let rules = Gomoku::new(n).unwrap();
        let root = rules.initial_board();
        group.bench_with_input(BenchmarkId::new("opening", n), &n, |b, _| {
            b.iter(|| search_once(&rules, &config, &root));
        });
    }

    group.finish();
}

fn bench_mcts_game_phases(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_game_phases");
    let rules = Gomoku::default();
    let config = MctsConfig::for_testing().with_simulations(200);

    let opening = rules.initial_board();
    group.bench_function("opening", |b| {
        b.iter(|| search_once(&rules, &config, &opening));
    });

    let midgame = play_moves(
        &rules,
        &[(7, 7), (7, 8), (8, 8), (6, 6), (8, 7), (9, 9), (6, 8), (5, 9)],
    );
    group.bench_function("midgame", |b| {
        b.iter(|| search_once(&rules, &config, &midgame));
    });

    // Black to move with an open four: the tactical scan short-circuits.
    let forced_win = play_moves(
        &rules,
        &[(7, 3), (0, 0), (7, 4), (0, 2), (7, 5), (0, 4), (7, 6), (0, 6)],
    );
    group.bench_function("forced_win", |b| {
        b.iter(|| search_once(&rules, &config, &forced_win));
    });

    group.finish();
}

// =============================================================================
// Statistics Table Benchmarks
// =============================================================================

fn bench_table_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_table_ops");
    let rules = Gomoku::default();
    let root = rules.initial_board();
    let key = rules.fingerprint(&root);
    let actions = rules.action_count();

    let expanded = || {
        let mut tables = SearchTables::new();
        tables.outcome_or_insert_with(&key, || rules.game_ended(&root, Player::Black));
        let valid = rules.valid_moves(&root);
        let prior = vec![1.0 / actions as f32; actions];
        tables.expand(&key, Expansion::new(valid, prior));
        tables
    };

    group.bench_function("record_225_edges", |b| {
        b.iter_batched(
            expanded,
            |mut tables| {
                for action in 0..actions {
                    tables.record(&key, action, 0.5);
                }
                black_box(tables)
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.bench_function("visit_counts", |b| {
        let mut tables = expanded();
        for action in 0..actions {
            for _ in 0..(action % 7) {
                tables.record(&key, action, -0.25);
            }
        }
        b.iter(|| {
            let expansion = tables.get(&key).and_then(|e| e.expansion()).unwrap();
            black_box(expansion.visit_counts())
        });
    });

    group.finish();
}

// =============================================================================
// Configuration Comparison Benchmarks
// =============================================================================

fn bench_mcts_configs(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_configs");
    let rules = Gomoku::new(9).unwrap();
    let root = rules.initial_board();
    let sims = 200u32;

    group.bench_function("training_config", |b| {
        let config = MctsConfig::for_training().with_simulations(sims);
        b.iter(|| search_once(&rules, &config, &root));
    });

    group.bench_function("evaluation_config", |b| {
        let config = MctsConfig::for_evaluation().with_simulations(sims);
        b.iter(|| search_once(&rules, &config, &root));
    });

    for scope in [VisitTotal::WholeTree, VisitTotal::Siblings] {
        group.bench_with_input(
            BenchmarkId::new("visit_total", scope),
            &scope,
            |b, &scope| {
                let config = MctsConfig::for_testing()
                    .with_simulations(sims)
                    .with_visit_total(scope);
                b.iter(|| search_once(&rules, &config, &root));
            },
        );
    }

    for c_puct in [0.5, 1.0, 2.5, 4.0] {
        group.bench_with_input(BenchmarkId::new("c_puct", c_puct), &c_puct, |b, &c_puct| {
            let config = MctsConfig::for_testing()
                .with_simulations(sims)
                .with_c_puct(c_puct);
            b.iter(|| search_once(&rules, &config, &root));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_mcts_search_simulations,
    bench_board_sizes,
    bench_mcts_game_phases,
    bench_table_operations,
    bench_mcts_configs,
);

criterion_main!(benches);
