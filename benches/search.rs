//! Criterion benchmarks for the move searches on a few fixed positions.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use dropfour::game::Board;
use dropfour::mcts::Mcts;
use dropfour::search::{alpha_beta, expectimax};
use rand::rngs::StdRng;
use rand::SeedableRng;

const POSITIONS: [&str; 3] = [
    "0000000/0000000/0000000/0000000/0000000/0000000",
    "0000000/0000000/0000000/0010000/0021000/0122100",
    "0000000/0100000/0200000/0110200/2221100/1212120",
];

fn boards() -> Vec<Board> {
    POSITIONS
        .iter()
        .map(|&input| Board::try_from(input).unwrap())
        .collect()
}

fn tree_search(c: &mut Criterion) {
    let boards = boards();
    let mut group = c.benchmark_group("Tree search");
    for depth in [4, 6] {
        let _ = group.bench_with_input(
            BenchmarkId::new("alpha-beta", depth),
            &boards,
            |b, boards| {
                b.iter(|| {
                    for board in boards {
                        let _ = criterion::black_box(alpha_beta(board, board.side_to_move(), depth));
                    }
                });
            },
        );
        let _ = group.bench_with_input(
            BenchmarkId::new("expectimax", depth),
            &boards,
            |b, boards| {
                b.iter(|| {
                    for board in boards {
                        let _ = criterion::black_box(expectimax(board, board.side_to_move(), depth));
                    }
                });
            },
        );
    }
    group.finish();
}

fn monte_carlo(c: &mut Criterion) {
    let boards = boards();
    let mut group = c.benchmark_group("MCTS");
    for iterations in [1_000, 5_000] {
        let mcts = Mcts::new(iterations);
        let _ = group.bench_with_input(
            BenchmarkId::from_parameter(iterations),
            &boards,
            |b, boards| {
                let mut rng = StdRng::seed_from_u64(0);
                b.iter(|| {
                    for board in boards {
                        let _ = criterion::black_box(mcts.search(board, board.side_to_move(), &mut rng));
                    }
                });
            },
        );
    }
    group.finish();
}

criterion_group! {
    name = search;
    config = Criterion::default().sample_size(10);
    targets = tree_search, monte_carlo
}

criterion_main!(search);
