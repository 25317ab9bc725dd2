//! Guess-and-backtrack search over propagated boards.

use quadrille_core::{Board, PuzzleGrid};

use crate::{
    error::SolverError,
    propagate::{BoardStatus, Propagator},
};

/// Counters collected while searching.
///
/// Guessing and backtracking are the expensive part of a solve; these
/// counters make the cost visible without a profiler.
///
/// # Examples
///
/// ```
/// use quadrille_core::{Board, PuzzleGrid};
/// use quadrille_solver::{Propagator, solve_with_stats};
///
/// let puzzle = PuzzleGrid::empty(9).unwrap();
/// let board = Board::from_grid(&puzzle);
/// let mut propagator = Propagator::new(9);
/// let (result, stats) = solve_with_stats(board, &mut propagator);
/// assert!(result.is_ok());
/// // An empty grid cannot be finished by propagation alone.
/// assert!(stats.guesses > 0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Branches taken (boards pushed onto the guess stack).
    pub guesses: u32,
    /// Branches refuted (boards popped after a contradiction).
    pub backtracks: u32,
}

/// Solves a board, propagating and branching until a complete valid board
/// is found or the search space is exhausted.
///
/// The search keeps an explicit stack of parent boards (capacity `width²`,
/// one guess per cell in the worst case). Each round propagates the current
/// board to fixpoint:
///
/// - complete: that board is the solution;
/// - contradiction: the current board is discarded and its recorded guess
///   is permanently removed from its parent, which becomes current again;
/// - incomplete: the current board branches and the child becomes current.
///
/// Every backtrack strictly removes one candidate from some board, and
/// candidate sets only ever shrink, so the loop terminates. Running out of
/// parents means the givens themselves admit no solution.
///
/// The propagator is the per-search scratch instance; it must not be shared
/// with a concurrently running solve.
///
/// # Errors
///
/// Returns [`SolverError::NoSolution`] when the search space is exhausted.
///
/// # Panics
///
/// Panics if `propagator` was built for a different width than `board`.
pub fn solve(board: Board, propagator: &mut Propagator) -> Result<Board, SolverError> {
    solve_with_stats(board, propagator).0
}

/// Like [`solve`], additionally reporting search statistics.
///
/// # Panics
///
/// Panics if `propagator` was built for a different width than `board`.
pub fn solve_with_stats(
    board: Board,
    propagator: &mut Propagator,
) -> (Result<Board, SolverError>, SearchStats) {
    let width = board.width();
    let mut stats = SearchStats::default();
    let mut parents: Vec<Board> = Vec::with_capacity(width * width);
    let mut current = board;

    loop {
        match propagator.resolve(&mut current) {
            BoardStatus::Complete => {
                log::debug!(
                    "solved width-{width} puzzle: {} guesses, {} backtracks",
                    stats.guesses,
                    stats.backtracks
                );
                return (Ok(current), stats);
            }
            BoardStatus::Incomplete => {
                let child = current.guess();
                stats.guesses += 1;
                parents.push(current);
                current = child;
            }
            BoardStatus::Invalid => {
                let Some(mut parent) = parents.pop() else {
                    log::debug!(
                        "width-{width} puzzle proven unsolvable after {} guesses",
                        stats.guesses
                    );
                    return (Err(SolverError::NoSolution), stats);
                };
                let guess = current
                    .guess_record()
                    .expect("a branched board carries a guess record");
                parent.retract_guess(guess);
                stats.backtracks += 1;
                current = parent;
            }
        }
    }
}

/// Solves a single puzzle grid, building the board and a private propagator.
///
/// # Errors
///
/// Returns [`SolverError::NoSolution`] when the puzzle admits no solution.
pub fn solve_grid(grid: &PuzzleGrid) -> Result<Board, SolverError> {
    let board = Board::from_grid(grid);
    let mut propagator = Propagator::new(board.width());
    solve(board, &mut propagator)
}
