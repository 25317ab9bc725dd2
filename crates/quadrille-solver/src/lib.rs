//! Solving engine for Quadrille puzzles.
//!
//! The engine combines fixpoint constraint propagation over the board's
//! row/column/box groups ([`Propagator`]) with explicit-stack guess and
//! backtrack search ([`solve`]) for the puzzles the heuristics alone cannot
//! finish. A standalone [validator](crate::validate) checks boards for rule
//! violations and completeness, and the [batch](crate::batch) helpers solve
//! independent puzzles sequentially, in parallel, or under a wall-clock
//! budget.
//!
//! # Examples
//!
//! ```
//! use quadrille_core::PuzzleGrid;
//! use quadrille_solver::{solve_grid, validate};
//!
//! let puzzle: PuzzleGrid = ".2343.1221.3432.".parse().unwrap();
//! let board = solve_grid(&puzzle)?;
//! assert!(validate(&board).is_complete());
//! # Ok::<(), quadrille_solver::SolverError>(())
//! ```

pub use self::{
    batch::{BatchOutcome, solve_all, solve_all_parallel, solve_all_within},
    error::SolverError,
    propagate::{BoardStatus, Propagator},
    search::{SearchStats, solve, solve_grid, solve_with_stats},
    validate::{ValidationError, is_complete, is_valid, matches_givens, validate,
        validate_solutions},
};

mod batch;
mod error;
mod propagate;
mod search;
mod validate;

#[cfg(test)]
mod testing;
