//! Benchmarks for propagation and full solves.
//!
//! # Running
//!
//! ```sh
//! cargo bench --bench solver
//! ```

use std::hint;

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use quadrille_core::{Board, PuzzleGrid};
use quadrille_solver::{Propagator, solve, solve_all_parallel, solve_grid};

const CLASSIC: &str = "\
    53..7....\
    6..195...\
    .98....6.\
    8...6...3\
    4..8.3..1\
    7...2...6\
    .6....28.\
    ...419..5\
    ....8..79";

fn classic_puzzle() -> PuzzleGrid {
    CLASSIC.parse().unwrap()
}

fn bench_propagate(c: &mut Criterion) {
    let puzzles = [
        ("classic_9x9", classic_puzzle()),
        ("empty_9x9", PuzzleGrid::empty(9).unwrap()),
        ("empty_16x16", PuzzleGrid::empty(16).unwrap()),
    ];

    for (param, puzzle) in puzzles {
        let mut propagator = Propagator::new(puzzle.width());
        c.bench_with_input(BenchmarkId::new("propagate", param), &puzzle, |b, puzzle| {
            b.iter_batched_ref(
                || Board::from_grid(hint::black_box(puzzle)),
                |board| {
                    let status = propagator.resolve(board);
                    hint::black_box(status)
                },
                BatchSize::SmallInput,
            );
        });
    }
}

fn bench_solve(c: &mut Criterion) {
    let puzzles = [
        ("classic_9x9", classic_puzzle()),
        ("empty_9x9", PuzzleGrid::empty(9).unwrap()),
    ];

    for (param, puzzle) in puzzles {
        let mut propagator = Propagator::new(puzzle.width());
        c.bench_with_input(BenchmarkId::new("solve", param), &puzzle, |b, puzzle| {
            b.iter_batched(
                || Board::from_grid(hint::black_box(puzzle)),
                |board| {
                    let solved = solve(board, &mut propagator);
                    hint::black_box(solved)
                },
                BatchSize::SmallInput,
            );
        });
    }
}

fn bench_batch(c: &mut Criterion) {
    let batch: Vec<PuzzleGrid> = (0..16).map(|_| classic_puzzle()).collect();

    c.bench_function("solve_all_parallel/classic_x16", |b| {
        b.iter(|| {
            let results = solve_all_parallel(hint::black_box(&batch));
            hint::black_box(results)
        });
    });

    c.bench_function("solve_grid/classic", |b| {
        b.iter(|| {
            let board = solve_grid(hint::black_box(&classic_puzzle()));
            hint::black_box(board)
        });
    });
}

criterion_group!(benches, bench_propagate, bench_solve, bench_batch);
criterion_main!(benches);
