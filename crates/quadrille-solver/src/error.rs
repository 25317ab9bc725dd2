//! Solver error types.

use derive_more::{Display, Error};

/// Errors surfaced by the solving engine.
///
/// Contradictions found during search are recovered internally by
/// backtracking; the only one that reaches the caller is a contradiction at
/// the root with no parent left to backtrack into, which means the puzzle
/// has no solution. Malformed input never gets this far; it is rejected by
/// [`PuzzleGrid`](quadrille_core::PuzzleGrid) before a board exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum SolverError {
    /// The search space is exhausted: no assignment satisfies the givens.
    #[display("puzzle has no solution")]
    NoSolution,
}
