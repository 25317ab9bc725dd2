//! The puzzle board and its constraint groups.

use std::fmt::{self, Display};

use crate::{cell::CellState, grid::PuzzleGrid};

/// The cell, coordinates and value forced when a board branched.
///
/// A branched board carries this record so that, on backtrack, the parent
/// can retract exactly that candidate instead of restoring a snapshot: the
/// parent was never mutated when the child was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Guess {
    /// Row of the guessed cell.
    pub row: usize,
    /// Column of the guessed cell.
    pub col: usize,
    /// The value that was forced into the cell.
    pub value: u8,
}

/// A full `width × width` grid of [`CellState`]s plus the derived constraint
/// groups.
///
/// Every cell belongs to exactly three groups: its row, its column, and its
/// `box_width × box_width` box. Groups are stored as index views over the
/// shared cells, in the fixed order rows, columns, boxes (boxes in row-major
/// box order), and each group carries a seen-mask recording which values
/// have already triggered cross-cell elimination there.
///
/// Boards do not implement `Clone`. Branch copies are created through
/// [`Board::guess`], which rebuilds candidate state from the placed values
/// alone; propagation history deliberately does not survive a branch.
#[derive(Debug, PartialEq)]
pub struct Board {
    width: usize,
    box_width: usize,
    cells: Vec<CellState>,
    /// Flat table of `3 * width` groups, `width` cell indices each.
    groups: Vec<u16>,
    seen: Vec<u64>,
    guess: Option<Guess>,
}

impl Board {
    /// Builds a board from a validated numeric grid.
    ///
    /// Placed cells get the degenerate "value is authoritative" state;
    /// unknown cells start with every value possible.
    #[must_use]
    pub fn from_grid(grid: &PuzzleGrid) -> Self {
        let width = grid.width();
        let cells = (0..width * width)
            .map(|i| {
                let value = grid.value(i / width, i % width);
                if value == 0 {
                    CellState::unknown(width)
                } else {
                    CellState::given(value)
                }
            })
            .collect();
        Self {
            width,
            box_width: width.isqrt(),
            cells,
            groups: build_groups(width),
            seen: vec![0; 3 * width],
            guess: None,
        }
    }

    /// Returns the grid side length.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Returns the box side length (the square root of the width).
    #[inline]
    #[must_use]
    pub const fn box_width(&self) -> usize {
        self.box_width
    }

    /// Returns the number of constraint groups (`3 * width`).
    #[inline]
    #[must_use]
    pub const fn group_count(&self) -> usize {
        3 * self.width
    }

    /// Returns the cell indices of one group.
    ///
    /// # Panics
    ///
    /// Panics if `group` is out of range.
    #[inline]
    #[must_use]
    pub fn group(&self, group: usize) -> &[u16] {
        &self.groups[group * self.width..(group + 1) * self.width]
    }

    /// Returns one group's index view, the full cell slice, and the group's
    /// seen-mask, all mutably borrowable at once.
    ///
    /// This is the working surface of the constraint propagator: it walks a
    /// group's indices while editing the cells they point at and the
    /// elimination bookkeeping for that group.
    ///
    /// # Panics
    ///
    /// Panics if `group` is out of range.
    #[inline]
    pub fn group_view_mut(&mut self, group: usize) -> (&[u16], &mut [CellState], &mut u64) {
        (
            &self.groups[group * self.width..(group + 1) * self.width],
            &mut self.cells,
            &mut self.seen[group],
        )
    }

    /// Returns the seen-mask of a group.
    ///
    /// # Panics
    ///
    /// Panics if `group` is out of range.
    #[inline]
    #[must_use]
    pub fn seen_mask(&self, group: usize) -> u64 {
        self.seen[group]
    }

    /// Returns the cell at a flat row-major index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[inline]
    #[must_use]
    pub fn cell_at(&self, index: usize) -> &CellState {
        &self.cells[index]
    }

    /// Returns the cell at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of range.
    #[inline]
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> &CellState {
        &self.cells[row * self.width + col]
    }

    /// Returns the cell at `(row, col)` mutably.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of range.
    #[inline]
    pub fn cell_mut(&mut self, row: usize, col: usize) -> &mut CellState {
        &mut self.cells[row * self.width + col]
    }

    /// Returns the value at `(row, col)`, 0 while unknown.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of range.
    #[inline]
    #[must_use]
    pub fn value_at(&self, row: usize, col: usize) -> u8 {
        self.cell(row, col).value()
    }

    /// Iterates over all cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &CellState> {
        self.cells.iter()
    }

    /// Returns the guess record attached when this board branched off its
    /// parent, if any.
    #[inline]
    #[must_use]
    pub const fn guess_record(&self) -> Option<Guess> {
        self.guess
    }

    /// Picks a cell to branch on and returns the branched board.
    ///
    /// The first unknown cell with exactly two candidates wins immediately;
    /// this fast path deliberately takes the first such cell in row-major
    /// order rather than hunting for the global minimum. Failing that, the
    /// unknown cell with the fewest candidates overall is chosen, earliest
    /// position breaking ties. The branch forces the chosen cell's smallest
    /// candidate.
    ///
    /// # Panics
    ///
    /// Panics if the board has no unknown cell; callers only branch on
    /// incomplete boards.
    #[must_use]
    pub fn guess(&self) -> Self {
        let mut best: Option<(usize, u8)> = None;
        for (i, cell) in self.cells.iter().enumerate() {
            if cell.value() != 0 {
                continue;
            }
            let remaining = cell.remaining();
            if remaining == 2 {
                return self.branch(i, cell.first_candidate());
            }
            if best.is_none_or(|(_, least)| remaining < least) {
                best = Some((i, remaining));
            }
        }
        let Some((i, _)) = best else {
            panic!("guess requires a board with at least one unknown cell");
        };
        self.branch(i, self.cells[i].first_candidate())
    }

    /// Permanently removes a failed branch's guess from this board.
    ///
    /// Backtracking narrows the parent instead of restoring snapshots: the
    /// recorded candidate is force-removed, and the guarantee that it is
    /// still present comes from the parent having been left untouched while
    /// the child ran.
    pub fn retract_guess(&mut self, guess: Guess) {
        let index = guess.row * self.width + guess.col;
        self.cells[index].force_remove(guess.value);
    }

    /// Duplicates the placed values into a fresh board and forces one value.
    fn branch(&self, index: usize, value: u8) -> Self {
        let mut child = self.fresh_clone();
        child.cells[index].set_value(value);
        child.guess = Some(Guess {
            row: index / self.width,
            col: index % self.width,
            value,
        });
        child
    }

    /// Copies the placed values only; every unknown cell's candidates are
    /// rebuilt from scratch and all seen-masks reset, so the copy must be
    /// re-propagated from the ground up.
    fn fresh_clone(&self) -> Self {
        let cells = self
            .cells
            .iter()
            .map(|cell| {
                if cell.value() == 0 {
                    CellState::unknown(self.width)
                } else {
                    CellState::given(cell.value())
                }
            })
            .collect();
        Self {
            width: self.width,
            box_width: self.box_width,
            cells,
            groups: self.groups.clone(),
            seen: vec![0; 3 * self.width],
            guess: None,
        }
    }

    /// Extracts the current values into a numeric grid.
    #[must_use]
    pub fn to_grid(&self) -> PuzzleGrid {
        let values = self.cells.iter().map(CellState::value).collect();
        PuzzleGrid::from_values_unchecked(self.width, values)
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.to_grid(), f)
    }
}

/// Lays out the `3 * width` groups: rows, columns, then boxes in row-major
/// box order, each box's cells in row-major order.
#[expect(clippy::cast_possible_truncation)]
fn build_groups(width: usize) -> Vec<u16> {
    let box_width = width.isqrt();
    let mut groups = Vec::with_capacity(3 * width * width);
    for row in 0..width {
        for col in 0..width {
            groups.push((row * width + col) as u16);
        }
    }
    for col in 0..width {
        for row in 0..width {
            groups.push((row * width + col) as u16);
        }
    }
    for box_row in 0..box_width {
        for box_col in 0..box_width {
            for row in box_row * box_width..(box_row + 1) * box_width {
                for col in box_col * box_width..(box_col + 1) * box_width {
                    groups.push((row * width + col) as u16);
                }
            }
        }
    }
    groups
}
