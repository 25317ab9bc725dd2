//! Solving batches of independent puzzles.
//!
//! Distinct puzzles share no state: each gets its own board and its own
//! propagator scratch, which makes a batch embarrassingly parallel. The
//! wall-clock budget variant enforces its deadline on the waiting side
//! only: workers already in flight run to completion and their results are
//! kept if they arrive in time, while entries still outstanding at the
//! deadline are reported as timed out.

use std::{
    sync::mpsc,
    thread,
    time::{Duration, Instant},
};

use quadrille_core::{Board, PuzzleGrid};
use rayon::prelude::*;

use crate::{error::SolverError, search::solve_grid};

/// Per-puzzle result of a budgeted batch solve.
#[derive(Debug)]
pub enum BatchOutcome {
    /// A complete valid board was found.
    Solved(Board),
    /// The search space was exhausted without a solution.
    NoSolution,
    /// The batch budget expired before this entry finished.
    TimedOut,
}

impl BatchOutcome {
    /// Returns the solved board, if this entry produced one.
    #[must_use]
    pub const fn board(&self) -> Option<&Board> {
        match self {
            Self::Solved(board) => Some(board),
            Self::NoSolution | Self::TimedOut => None,
        }
    }

    /// Returns `true` if this entry produced a solution.
    #[must_use]
    pub const fn is_solved(&self) -> bool {
        matches!(self, Self::Solved(_))
    }
}

impl From<Result<Board, SolverError>> for BatchOutcome {
    fn from(result: Result<Board, SolverError>) -> Self {
        match result {
            Ok(board) => Self::Solved(board),
            Err(SolverError::NoSolution) => Self::NoSolution,
        }
    }
}

/// Solves every puzzle in order on the calling thread.
///
/// The output is index-aligned with the input.
#[must_use]
pub fn solve_all(puzzles: &[PuzzleGrid]) -> Vec<Result<Board, SolverError>> {
    let start = Instant::now();
    let results = puzzles.iter().map(solve_grid).collect();
    log::debug!(
        "solved {} puzzles sequentially in {:?}",
        puzzles.len(),
        start.elapsed()
    );
    results
}

/// Solves the puzzles across the rayon thread pool.
///
/// Each puzzle gets a private board and propagator; completion order does
/// not matter because the collected output is index-aligned with the input.
#[must_use]
pub fn solve_all_parallel(puzzles: &[PuzzleGrid]) -> Vec<Result<Board, SolverError>> {
    let start = Instant::now();
    let results = puzzles.par_iter().map(solve_grid).collect();
    log::debug!(
        "solved {} puzzles in parallel in {:?}",
        puzzles.len(),
        start.elapsed()
    );
    results
}

/// Solves the puzzles in parallel under a wall-clock budget.
///
/// The engine itself exposes no cancellation: workers that are still
/// solving when the budget expires keep running on a detached thread, but
/// nobody waits for them any longer. Entries that completed in time keep
/// their results; the rest come back as [`BatchOutcome::TimedOut`], in
/// input order.
#[must_use]
pub fn solve_all_within(puzzles: Vec<PuzzleGrid>, budget: Duration) -> Vec<BatchOutcome> {
    let total = puzzles.len();
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        puzzles
            .into_par_iter()
            .enumerate()
            .for_each_with(sender, |sender, (index, puzzle)| {
                let outcome = BatchOutcome::from(solve_grid(&puzzle));
                // The receiver hangs up at the deadline; late results are
                // simply dropped.
                let _ = sender.send((index, outcome));
            });
    });

    let deadline = Instant::now() + budget;
    let mut outcomes: Vec<BatchOutcome> = (0..total).map(|_| BatchOutcome::TimedOut).collect();
    let mut finished = 0;
    while finished < total {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        match receiver.recv_timeout(remaining) {
            Ok((index, outcome)) => {
                outcomes[index] = outcome;
                finished += 1;
            }
            Err(mpsc::RecvTimeoutError::Timeout | mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }
    log::debug!("budgeted batch: {finished}/{total} finished within {budget:?}");
    outcomes
}
