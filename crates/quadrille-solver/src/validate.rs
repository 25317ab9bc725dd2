//! Rule-violation and completeness checks.

use derive_more::{Display, Error};
use quadrille_core::{Board, PuzzleGrid, ValueSet};

use crate::propagate::BoardStatus;

/// Why a batch of solutions failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum ValidationError {
    /// The puzzle and solution collections differ in length.
    #[display("{puzzles} puzzles but {solutions} solutions")]
    CountMismatch {
        /// Number of puzzles supplied.
        puzzles: usize,
        /// Number of solutions supplied.
        solutions: usize,
    },
    /// A solution still contains unknown cells.
    #[display("solution {index} is incomplete")]
    Incomplete {
        /// Index of the failing pair.
        index: usize,
    },
    /// A solution violates a row, column, or box constraint.
    #[display("solution {index} is invalid")]
    Invalid {
        /// Index of the failing pair.
        index: usize,
    },
    /// A solution disagrees with one of its puzzle's given cells.
    #[display("solution {index} contradicts its given at row {row}, column {col}")]
    GivenMismatch {
        /// Index of the failing pair.
        index: usize,
        /// Row of the disagreeing cell.
        row: usize,
        /// Column of the disagreeing cell.
        col: usize,
    },
}

/// Returns `true` if no group contains two equal placed values.
///
/// Unknown cells are ignored; use [`is_complete`] for the completeness
/// half of the check.
#[must_use]
pub fn is_valid(board: &Board) -> bool {
    for group in 0..board.group_count() {
        let mut observed = ValueSet::EMPTY;
        for &i in board.group(group) {
            let value = board.cell_at(usize::from(i)).value();
            if value == 0 {
                continue;
            }
            if observed.contains(value) {
                return false;
            }
            observed.insert(value);
        }
    }
    true
}

/// Returns `true` if every cell has a value.
#[must_use]
pub fn is_complete(board: &Board) -> bool {
    board.cells().all(|cell| cell.value() != 0)
}

/// Checks validity, then completeness.
///
/// Completeness is only meaningful on a valid board, so an invalid board is
/// reported as [`BoardStatus::Invalid`] without looking further.
#[must_use]
pub fn validate(board: &Board) -> BoardStatus {
    if !is_valid(board) {
        BoardStatus::Invalid
    } else if is_complete(board) {
        BoardStatus::Complete
    } else {
        BoardStatus::Incomplete
    }
}

/// Returns `true` if the board agrees with every given (non-zero) cell of
/// the puzzle it was solved from.
#[must_use]
pub fn matches_givens(puzzle: &PuzzleGrid, board: &Board) -> bool {
    given_mismatch(puzzle, board).is_none()
}

/// Finds the first given cell the board disagrees with.
fn given_mismatch(puzzle: &PuzzleGrid, board: &Board) -> Option<(usize, usize)> {
    if puzzle.width() != board.width() {
        return Some((0, 0));
    }
    for row in 0..puzzle.width() {
        for col in 0..puzzle.width() {
            let given = puzzle.value(row, col);
            if given != 0 && board.value_at(row, col) != given {
                return Some((row, col));
            }
        }
    }
    None
}

/// Validates a batch of solutions against the puzzles they were solved
/// from: each must be complete, valid, and consistent with its puzzle's
/// givens.
///
/// # Errors
///
/// Returns the first failure, carrying the index of the offending pair.
pub fn validate_solutions(
    puzzles: &[PuzzleGrid],
    solutions: &[Board],
) -> Result<(), ValidationError> {
    if puzzles.len() != solutions.len() {
        return Err(ValidationError::CountMismatch {
            puzzles: puzzles.len(),
            solutions: solutions.len(),
        });
    }
    for (index, (puzzle, solution)) in puzzles.iter().zip(solutions).enumerate() {
        match validate(solution) {
            BoardStatus::Invalid => return Err(ValidationError::Invalid { index }),
            BoardStatus::Incomplete => return Err(ValidationError::Incomplete { index }),
            BoardStatus::Complete => {}
        }
        if let Some((row, col)) = given_mismatch(puzzle, solution) {
            return Err(ValidationError::GivenMismatch { index, row, col });
        }
    }
    Ok(())
}
