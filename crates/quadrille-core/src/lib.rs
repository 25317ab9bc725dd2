//! Core data model for Quadrille.
//!
//! This crate holds everything a solving engine needs to represent an N×N
//! Latin-square puzzle (classic 9×9 Sudoku and larger variants up to 36×36):
//!
//! - [`ValueSet`]: a `u64` bitset of candidate values, backed by a shared
//!   read-only mask table
//! - [`CellState`]: one cell's value and remaining candidates
//! - [`Board`]: the full grid plus its row/column/box constraint groups
//! - [`PuzzleGrid`]: the validated numeric grid at the system boundary,
//!   with text parsing and formatting
//!
//! Solving logic lives in the `quadrille-solver` crate; this crate only
//! guarantees the structural invariants the solver relies on (incremental
//! candidate counts, singleton collapse, fresh rebuilds on branching).

pub use self::{
    board::{Board, Guess},
    cell::CellState,
    grid::{GridError, PuzzleGrid},
    value_set::{MAX_WIDTH, ValueSet, Values, value_mask},
};

mod board;
mod cell;
mod grid;
mod value_set;
