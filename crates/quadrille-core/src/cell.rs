//! Per-cell solving state.

use crate::value_set::ValueSet;

/// One grid cell: its value (0 while unknown) and its remaining candidates.
///
/// The candidate count is maintained incrementally alongside the bitset and
/// is never recomputed by scanning. Whenever a removal leaves exactly one
/// candidate, the cell collapses: `value` is assigned the sole survivor
/// without any separate assignment step.
///
/// Once `value` is non-zero the candidate data is no longer authoritative
/// and must not be consulted; placed cells created by [`CellState::given`]
/// carry an empty candidate set for exactly that reason.
///
/// # Examples
///
/// ```
/// use quadrille_core::CellState;
///
/// let mut cell = CellState::unknown(4);
/// let mut work = 0;
/// cell.try_remove(1, &mut work);
/// cell.try_remove(2, &mut work);
/// cell.try_remove(4, &mut work);
///
/// // Three removals happened, and the last one collapsed the cell.
/// assert_eq!(work, 3);
/// assert_eq!(cell.value(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellState {
    value: u8,
    possibilities: ValueSet,
    remaining: u8,
}

impl CellState {
    /// Creates an unknown cell with every value 1..=`width` still possible.
    ///
    /// # Panics
    ///
    /// Panics if `width` exceeds [`MAX_WIDTH`](crate::MAX_WIDTH).
    #[must_use]
    #[expect(clippy::cast_possible_truncation)]
    pub fn unknown(width: usize) -> Self {
        Self {
            value: 0,
            possibilities: ValueSet::all(width),
            remaining: width as u8,
        }
    }

    /// Creates a placed cell. The value is authoritative; no candidates are
    /// tracked.
    #[must_use]
    pub const fn given(value: u8) -> Self {
        Self {
            value,
            possibilities: ValueSet::EMPTY,
            remaining: 0,
        }
    }

    /// Returns the cell's value, 0 while unknown.
    #[inline]
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.value
    }

    /// Returns `true` if the cell has no value yet.
    #[inline]
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        self.value == 0
    }

    /// Returns the remaining candidate count.
    #[inline]
    #[must_use]
    pub const fn remaining(&self) -> u8 {
        self.remaining
    }

    /// Returns the candidate set. Meaningless once the cell is placed.
    #[inline]
    #[must_use]
    pub const fn possibilities(&self) -> ValueSet {
        self.possibilities
    }

    /// Returns `true` if `value` is still a candidate.
    #[inline]
    #[must_use]
    pub fn has_candidate(&self, value: u8) -> bool {
        self.possibilities.contains(value)
    }

    /// Assigns a value directly, leaving the candidate data untouched.
    ///
    /// Used when a deduction or a branch forces a value from the outside;
    /// from here on the candidates are stale and must not be consulted.
    #[inline]
    pub fn set_value(&mut self, value: u8) {
        self.value = value;
    }

    /// Unconditionally removes a candidate.
    ///
    /// The caller guarantees the candidate is present; this is the
    /// backtracking path, where the retracted guess value was taken from
    /// this very cell's candidates and the cell has not been touched since.
    pub fn force_remove(&mut self, value: u8) {
        debug_assert!(
            self.possibilities.contains(value),
            "force_remove of an absent candidate {value}"
        );
        self.possibilities.remove(value);
        self.remaining -= 1;
        self.collapse_if_single();
    }

    /// Removes a candidate if present, counting the removal in `work`.
    ///
    /// Does nothing (and does not touch `work`) when the candidate is
    /// already gone, which is what makes repeated elimination passes cheap.
    pub fn try_remove(&mut self, value: u8, work: &mut u32) {
        if !self.possibilities.contains(value) {
            return;
        }
        self.possibilities.remove(value);
        self.remaining -= 1;
        *work += 1;
        self.collapse_if_single();
    }

    #[inline]
    fn collapse_if_single(&mut self) {
        if self.remaining == 1 {
            self.value = match self.possibilities.first() {
                Some(v) => v,
                None => unreachable!("remaining count 1 with empty candidate set"),
            };
        }
    }

    /// Returns the smallest remaining candidate.
    ///
    /// # Panics
    ///
    /// Panics if no candidate remains; that means the caller's bookkeeping
    /// is broken, not that the puzzle is wrong.
    #[must_use]
    pub fn first_candidate(&self) -> u8 {
        match self.possibilities.first() {
            Some(v) => v,
            None => panic!("first_candidate on a cell with no remaining candidates"),
        }
    }

    /// Returns the two remaining candidates in ascending order.
    ///
    /// # Panics
    ///
    /// Panics unless exactly two candidates remain.
    #[must_use]
    pub fn two_candidates(&self) -> [u8; 2] {
        assert_eq!(
            self.remaining, 2,
            "two_candidates on a cell with {} remaining",
            self.remaining
        );
        let mut iter = self.possibilities.iter();
        [self.next_extracted(&mut iter), self.next_extracted(&mut iter)]
    }

    /// Returns the three remaining candidates in ascending order.
    ///
    /// # Panics
    ///
    /// Panics unless exactly three candidates remain.
    #[must_use]
    pub fn three_candidates(&self) -> [u8; 3] {
        assert_eq!(
            self.remaining, 3,
            "three_candidates on a cell with {} remaining",
            self.remaining
        );
        let mut iter = self.possibilities.iter();
        [
            self.next_extracted(&mut iter),
            self.next_extracted(&mut iter),
            self.next_extracted(&mut iter),
        ]
    }

    /// Returns the four remaining candidates in ascending order.
    ///
    /// # Panics
    ///
    /// Panics unless exactly four candidates remain.
    #[must_use]
    pub fn four_candidates(&self) -> [u8; 4] {
        assert_eq!(
            self.remaining, 4,
            "four_candidates on a cell with {} remaining",
            self.remaining
        );
        let mut iter = self.possibilities.iter();
        [
            self.next_extracted(&mut iter),
            self.next_extracted(&mut iter),
            self.next_extracted(&mut iter),
            self.next_extracted(&mut iter),
        ]
    }

    /// Returns every remaining candidate in ascending order.
    #[must_use]
    pub fn all_candidates(&self) -> impl Iterator<Item = u8> {
        self.possibilities.iter()
    }

    fn next_extracted(&self, iter: &mut crate::value_set::Values) -> u8 {
        match iter.next() {
            Some(v) => v,
            None => panic!(
                "candidate extraction ran dry with remaining count {}",
                self.remaining
            ),
        }
    }
}
