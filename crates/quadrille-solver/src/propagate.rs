//! Fixpoint constraint propagation.

use quadrille_core::{Board, MAX_WIDTH, ValueSet, value_mask};
use tinyvec::ArrayVec;

use crate::validate;

/// Outcome of a propagation run (or a validation pass).
///
/// Only three of the four `(valid, complete)` combinations are reachable
/// (an invalid board is never reported complete), so the pair is an enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardStatus {
    /// A constraint group holds two equal placed values.
    Invalid,
    /// No rule violation, but unknown cells remain.
    Incomplete,
    /// Every cell is placed and no rule is violated.
    Complete,
}

impl BoardStatus {
    /// Returns `true` unless a contradiction was found.
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        !matches!(self, Self::Invalid)
    }

    /// Returns `true` if every cell is placed on a valid board.
    #[inline]
    #[must_use]
    pub const fn is_complete(self) -> bool {
        matches!(self, Self::Complete)
    }
}

/// Scratch list of cell indices collected per candidate arity.
type ArityList = ArrayVec<[u16; MAX_WIDTH]>;

/// Applies elimination and deduction rules to a board until no further
/// progress is possible, or a contradiction is found.
///
/// The propagator owns per-search scratch state (the arity lists below), so
/// one instance must never be shared between boards solved concurrently.
/// Within a single search it is reused across every propagation call.
///
/// The rules, applied per group and swept to fixpoint:
///
/// 1. **All-different elimination**: each placed value is eliminated from
///    every other unplaced cell of its group, at most once per
///    (group, value) pair thanks to the group's seen-mask; two equal placed
///    values abort the whole run as a contradiction.
/// 2. **Hidden singles**: only attempted in a sweep that has produced no
///    work so far: a value admitted by exactly one unplaced cell of a group
///    is assigned there directly.
/// 3. **Naked pairs/triples/quads**: cells collected at arity 2/3/4 during
///    the scan; per arity, the first maximal run of exactly k identical
///    k-candidate masks licenses removing those k values from the rest of
///    the group.
///
/// # Examples
///
/// ```
/// use quadrille_core::{Board, PuzzleGrid};
/// use quadrille_solver::Propagator;
///
/// let puzzle: PuzzleGrid = ".2343.1221.3432.".parse().unwrap();
/// let mut board = Board::from_grid(&puzzle);
/// let status = Propagator::new(board.width()).resolve(&mut board);
/// assert!(status.is_complete());
/// ```
#[derive(Debug)]
pub struct Propagator {
    width: usize,
    pairs: ArityList,
    triples: ArityList,
    quads: ArityList,
    work: u32,
    invalid: bool,
}

impl Propagator {
    /// Creates a propagator for boards of the given width.
    ///
    /// # Panics
    ///
    /// Panics if `width` exceeds [`MAX_WIDTH`].
    #[must_use]
    pub fn new(width: usize) -> Self {
        assert!(
            width <= MAX_WIDTH,
            "width must not exceed {MAX_WIDTH}, got {width}"
        );
        Self {
            width,
            pairs: ArityList::new(),
            triples: ArityList::new(),
            quads: ArityList::new(),
            work: 0,
            invalid: false,
        }
    }

    /// Sweeps all groups repeatedly until a full sweep changes nothing.
    ///
    /// Returns [`BoardStatus::Invalid`] as soon as a contradiction shows
    /// up; otherwise runs to fixpoint and reports whether the board came
    /// out complete.
    ///
    /// # Panics
    ///
    /// Panics if the board's width differs from the propagator's.
    pub fn resolve(&mut self, board: &mut Board) -> BoardStatus {
        assert_eq!(
            board.width(),
            self.width,
            "propagator scratch is sized for width {}",
            self.width
        );
        self.invalid = false;
        self.work = 1;
        while self.work > 0 {
            self.work = 0;
            for group in 0..board.group_count() {
                self.eliminate_in_group(board, group);
                if self.invalid {
                    return BoardStatus::Invalid;
                }
                if self.work == 0 {
                    self.assign_hidden_single(board, group);
                }
                self.reduce_naked_sets(board, group);
            }
        }
        if validate::is_complete(board) {
            BoardStatus::Complete
        } else {
            BoardStatus::Incomplete
        }
    }

    /// Returns how many eliminations and assignments the last
    /// [`resolve`](Self::resolve) performed in its final sweep. Zero means
    /// the board was already at fixpoint.
    #[inline]
    #[must_use]
    pub const fn last_sweep_work(&self) -> u32 {
        self.work
    }

    /// Duplicate detection, all-different elimination, and arity collection
    /// for one group.
    fn eliminate_in_group(&mut self, board: &mut Board, group: usize) {
        self.pairs.clear();
        self.triples.clear();
        self.quads.clear();

        let (indices, cells, seen) = board.group_view_mut(group);
        let mut observed: u64 = 0;
        for pos in 0..indices.len() {
            let i = usize::from(indices[pos]);
            let value = cells[i].value();
            if value == 0 {
                match cells[i].remaining() {
                    2 => self.pairs.push(indices[pos]),
                    3 => self.triples.push(indices[pos]),
                    4 => self.quads.push(indices[pos]),
                    _ => {}
                }
                continue;
            }
            let mask = value_mask(value);
            if observed & mask != 0 {
                self.invalid = true;
                return;
            }
            observed |= mask;
            // Eliminate across the group at most once per (group, value).
            if *seen & mask == 0 {
                *seen |= mask;
                for &j in indices {
                    let j = usize::from(j);
                    if cells[j].value() == 0 {
                        cells[j].try_remove(value, &mut self.work);
                    }
                }
            }
        }
    }

    /// Per arity, applies at most one naked-set reduction to the group,
    /// using the cells collected by the elimination scan.
    fn reduce_naked_sets(&mut self, board: &mut Board, group: usize) {
        if self.pairs.len() >= 2 {
            let list = std::mem::take(&mut self.pairs);
            self.reduce_naked_set(board, group, &list, 2);
        }
        if self.triples.len() >= 3 {
            let list = std::mem::take(&mut self.triples);
            self.reduce_naked_set(board, group, &list, 3);
        }
        if self.quads.len() >= 4 {
            let list = std::mem::take(&mut self.quads);
            self.reduce_naked_set(board, group, &list, 4);
        }
    }

    /// Applies at most one naked-set reduction of arity `k` to the group.
    ///
    /// The collected cells are sorted by candidate mask; the first maximal
    /// run of exactly `k` equal masks wins, and its `k` values are removed
    /// from every other unplaced cell of the group. Longer runs are an
    /// over-constrained group; they are left for the search to refute.
    fn reduce_naked_set(&mut self, board: &mut Board, group: usize, collected: &[u16], k: usize) {
        let mut sorted: ArityList = collected.iter().copied().collect();
        sorted.sort_unstable_by_key(|&i| board.cell_at(usize::from(i)).possibilities().bits());

        let mut start = 0;
        while start < sorted.len() {
            let anchor = board.cell_at(usize::from(sorted[start]));
            let mask = anchor.possibilities().bits();
            let mut end = start + 1;
            while end < sorted.len()
                && board.cell_at(usize::from(sorted[end])).possibilities().bits() == mask
            {
                end += 1;
            }
            // A collected cell may have been shrunk by an earlier arity's
            // reduction in this same visit; the live count decides.
            if end - start == k && usize::from(anchor.remaining()) == k {
                let run = &sorted[start..end];
                let values: ArrayVec<[u8; 4]> = ValueSet::from_bits(mask).iter().collect();
                let (indices, cells, _) = board.group_view_mut(group);
                for &j in indices {
                    if run.contains(&j) {
                        continue;
                    }
                    let j = usize::from(j);
                    if cells[j].value() != 0 {
                        continue;
                    }
                    for &value in &values {
                        cells[j].try_remove(value, &mut self.work);
                    }
                }
                return;
            }
            start = end;
        }
    }

    /// Assigns the first hidden single found in the group, if any.
    ///
    /// A value already placed in the group abandons that value's scan; once
    /// elimination has run, no unplaced cell can still admit it anyway.
    #[expect(clippy::cast_possible_truncation)]
    fn assign_hidden_single(&mut self, board: &mut Board, group: usize) {
        let (indices, cells, _) = board.group_view_mut(group);
        for value in 1..=self.width as u8 {
            let mut sole: Option<usize> = None;
            let mut abandoned = false;
            for &i in indices {
                let i = usize::from(i);
                if cells[i].value() == value {
                    abandoned = true;
                    break;
                }
                if cells[i].value() == 0 && cells[i].has_candidate(value) {
                    if sole.is_some() {
                        abandoned = true;
                        break;
                    }
                    sole = Some(i);
                }
            }
            if abandoned {
                continue;
            }
            if let Some(i) = sole {
                cells[i].set_value(value);
                self.work += 1;
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use quadrille_core::PuzzleGrid;

    use super::*;
    use crate::testing;

    fn resolve_str(text: &str) -> (Board, BoardStatus) {
        let grid: PuzzleGrid = text.parse().unwrap();
        let mut board = Board::from_grid(&grid);
        let status = Propagator::new(board.width()).resolve(&mut board);
        (board, status)
    }

    #[test]
    fn test_duplicate_in_row_is_invalid() {
        // Two 5s in the first row, never reaching the guess phase.
        let mut text = String::from("5...5....");
        text.push_str(&".".repeat(72));
        let (_, status) = resolve_str(&text);
        assert_eq!(status, BoardStatus::Invalid);
        assert!(!status.is_valid());
    }

    #[test]
    fn test_duplicate_in_box_is_invalid() {
        let mut text = String::from(".7.......");
        text.push_str("......... .7.......".replace(' ', "").as_str());
        text.push_str(&".".repeat(54));
        let (_, status) = resolve_str(&text);
        assert_eq!(status, BoardStatus::Invalid);
    }

    #[test]
    fn test_row_givens_propagate_eliminations() {
        // One full row in a 4×4: the row below is narrowed to the box
        // complements, even though the puzzle as a whole stays open.
        let (board, status) = resolve_str("1234............");
        assert_eq!(status, BoardStatus::Incomplete);
        assert_eq!(board.cell(1, 0).possibilities(), testing::value_set([3, 4]));
        assert_eq!(board.cell(1, 1).possibilities(), testing::value_set([3, 4]));
        assert_eq!(board.cell(1, 2).possibilities(), testing::value_set([1, 2]));
        assert_eq!(board.cell(1, 3).possibilities(), testing::value_set([1, 2]));
    }

    #[test]
    fn test_forced_grid_completes_without_guessing() {
        // A full grid minus its last row is restored by elimination alone:
        // every empty cell is the sole blank of its column.
        let mut grid = testing::pattern_grid(9);
        for col in 0..9 {
            grid.set_value(8, col, 0);
        }
        let expected = testing::pattern_grid(9);

        let mut board = Board::from_grid(&grid);
        let status = Propagator::new(9).resolve(&mut board);
        assert_eq!(status, BoardStatus::Complete);
        assert_eq!(board.to_grid(), expected);
    }

    #[test]
    fn test_resolve_is_idempotent_at_fixpoint() {
        let grid = testing::wiki_puzzle();
        let mut board = Board::from_grid(&grid);
        let mut propagator = Propagator::new(9);

        let first = propagator.resolve(&mut board);
        let snapshot = board.to_grid();

        let second = propagator.resolve(&mut board);
        assert_eq!(first, second);
        assert_eq!(board.to_grid(), snapshot);
        assert_eq!(propagator.last_sweep_work(), 0);
    }

    #[test]
    fn test_hidden_single_assignment() {
        let mut board = Board::from_grid(&PuzzleGrid::empty(9).unwrap());
        let mut work = 0;
        // Value 5 survives only at (0, 3) within row 0.
        for col in 0..9 {
            if col != 3 {
                board.cell_mut(0, col).try_remove(5, &mut work);
            }
        }

        let status = Propagator::new(9).resolve(&mut board);
        assert!(status.is_valid());
        assert_eq!(board.value_at(0, 3), 5);
    }

    #[test]
    fn test_naked_pair_reduction() {
        let mut board = Board::from_grid(&PuzzleGrid::empty(9).unwrap());
        let mut work = 0;
        for col in [0, 1] {
            for v in 3..=9 {
                board.cell_mut(0, col).try_remove(v, &mut work);
            }
        }

        let status = Propagator::new(9).resolve(&mut board);
        assert!(status.is_valid());
        for col in 2..9 {
            let cell = board.cell(0, col);
            assert!(!cell.has_candidate(1), "column {col} still admits 1");
            assert!(!cell.has_candidate(2), "column {col} still admits 2");
        }
        // The pair cells themselves keep their two candidates.
        assert_eq!(board.cell(0, 0).possibilities(), testing::value_set([1, 2]));
    }

    #[test]
    fn test_naked_triple_reduction() {
        let mut board = Board::from_grid(&PuzzleGrid::empty(9).unwrap());
        let mut work = 0;
        for col in [2, 5, 7] {
            for v in [4, 5, 6, 7, 8, 9] {
                board.cell_mut(3, col).try_remove(v, &mut work);
            }
        }

        let status = Propagator::new(9).resolve(&mut board);
        assert!(status.is_valid());
        for col in 0..9 {
            if [2, 5, 7].contains(&col) {
                continue;
            }
            let cell = board.cell(3, col);
            for v in [1, 2, 3] {
                assert!(!cell.has_candidate(v), "column {col} still admits {v}");
            }
        }
    }

    #[test]
    fn test_naked_quad_reduction() {
        let mut board = Board::from_grid(&PuzzleGrid::empty(16).unwrap());
        let mut work = 0;
        for col in [0, 4, 9, 13] {
            for v in 5..=16 {
                board.cell_mut(2, col).try_remove(v, &mut work);
            }
        }

        let status = Propagator::new(16).resolve(&mut board);
        assert!(status.is_valid());
        for col in 0..16 {
            if [0, 4, 9, 13].contains(&col) {
                continue;
            }
            let cell = board.cell(2, col);
            for v in 1..=4 {
                assert!(!cell.has_candidate(v), "column {col} still admits {v}");
            }
        }
    }

    #[test]
    fn test_wiki_puzzle_resolves_validly() {
        let (board, status) = {
            let grid = testing::wiki_puzzle();
            let mut board = Board::from_grid(&grid);
            let status = Propagator::new(9).resolve(&mut board);
            (board, status)
        };
        assert!(status.is_valid());
        // Whatever progress was made, the givens are untouched.
        assert!(crate::matches_givens(&testing::wiki_puzzle(), &board));
    }
}
