//! Numeric puzzle grids and their text form.
//!
//! [`PuzzleGrid`] is the validated boundary between the outside world and
//! the solving engine: every grid that reaches [`Board`](crate::Board)
//! construction has already been checked for a sane width and in-range
//! values, so the engine itself never re-validates input.
//!
//! The text form mirrors the classic wire format: one character per cell in
//! row-major order, `.` or `0` for unknowns. Widths up to 9 use the digits
//! `1`..`9`; widths 10 through 36 use the extended alphabet `A`..`Z` for
//! 1..26, `+` for 27 and `1`..`9` for 28..36.
//!
//! # Examples
//!
//! ```
//! use quadrille_core::PuzzleGrid;
//!
//! let grid: PuzzleGrid = "1234....3.2...41".parse()?;
//! assert_eq!(grid.width(), 4);
//! assert_eq!(grid.value(0, 3), 4);
//! assert_eq!(grid.value(1, 0), 0);
//! # Ok::<(), quadrille_core::GridError>(())
//! ```

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use derive_more::{Display, Error};

use crate::value_set::MAX_WIDTH;

/// Widest grid the character alphabet can express.
const MAX_SYMBOL_WIDTH: usize = 36;

/// Rejection reasons for malformed puzzle input.
///
/// All of these are fatal at construction time; the solving engine assumes
/// a well-formed grid and never produces them itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum GridError {
    /// The flat cell count is not a square number.
    #[display("cell count {len} is not a square number")]
    NotSquare {
        /// Number of cells provided.
        len: usize,
    },
    /// The grid width is not a perfect square, so no box layout exists.
    #[display("grid width {width} is not a perfect square")]
    WidthNotPerfectSquare {
        /// The offending width.
        width: usize,
    },
    /// The grid width exceeds the bitset capacity.
    #[display("grid width {width} exceeds the supported maximum of {MAX_WIDTH}")]
    WidthTooLarge {
        /// The offending width.
        width: usize,
    },
    /// A cell value lies outside `0..=width`.
    #[display("value {value} at row {row}, column {col} is outside 0..={width}")]
    ValueOutOfRange {
        /// The offending value.
        value: u8,
        /// Row of the offending cell.
        row: usize,
        /// Column of the offending cell.
        col: usize,
        /// The grid width.
        width: usize,
    },
    /// A character has no meaning for the inferred grid width.
    #[display("symbol {symbol:?} is not valid for a puzzle of width {width}")]
    InvalidSymbol {
        /// The offending character.
        symbol: char,
        /// The inferred grid width.
        width: usize,
    },
    /// The width has no character alphabet (text form caps at 36).
    #[display("no text form exists for width {width} (maximum is {MAX_SYMBOL_WIDTH})")]
    WidthNotRepresentable {
        /// The offending width.
        width: usize,
    },
}

/// A validated `width × width` grid of values, 0 meaning unknown.
///
/// This is the input and output shape of the engine: puzzles come in as
/// grids, and solved boards convert back via
/// [`Board::to_grid`](crate::Board::to_grid).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleGrid {
    width: usize,
    values: Vec<u8>,
}

impl PuzzleGrid {
    /// Builds a grid from row-major values, validating shape and range.
    ///
    /// # Errors
    ///
    /// Returns a [`GridError`] if the value count is not `width²`, the
    /// width is not a perfect square, the width exceeds the supported
    /// maximum, or any value lies outside `0..=width`.
    pub fn from_values(width: usize, values: Vec<u8>) -> Result<Self, GridError> {
        if width > MAX_WIDTH {
            return Err(GridError::WidthTooLarge { width });
        }
        if width.isqrt() * width.isqrt() != width {
            return Err(GridError::WidthNotPerfectSquare { width });
        }
        if values.len() != width * width {
            return Err(GridError::NotSquare { len: values.len() });
        }
        for (i, &value) in values.iter().enumerate() {
            if usize::from(value) > width {
                return Err(GridError::ValueOutOfRange {
                    value,
                    row: i / width,
                    col: i % width,
                    width,
                });
            }
        }
        Ok(Self { width, values })
    }

    /// Builds a grid from values the caller already knows to be in range.
    pub(crate) fn from_values_unchecked(width: usize, values: Vec<u8>) -> Self {
        debug_assert_eq!(values.len(), width * width);
        Self { width, values }
    }

    /// Builds an all-unknown grid.
    ///
    /// # Errors
    ///
    /// Returns a [`GridError`] if the width is invalid.
    pub fn empty(width: usize) -> Result<Self, GridError> {
        Self::from_values(width, vec![0; width * width])
    }

    /// Returns the grid side length.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Returns the value at `(row, col)`, 0 meaning unknown.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of range.
    #[inline]
    #[must_use]
    pub fn value(&self, row: usize, col: usize) -> u8 {
        self.values[row * self.width + col]
    }

    /// Sets the value at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of range or the value exceeds the
    /// width.
    #[inline]
    pub fn set_value(&mut self, row: usize, col: usize, value: u8) {
        assert!(
            usize::from(value) <= self.width,
            "value {value} is outside 0..={}",
            self.width
        );
        self.values[row * self.width + col] = value;
    }

    /// Counts the placed (non-zero) cells.
    #[must_use]
    pub fn given_count(&self) -> usize {
        self.values.iter().filter(|&&v| v != 0).count()
    }

    /// Parses a `~`- or newline-separated list of puzzles.
    ///
    /// Empty segments are skipped, so trailing separators are harmless.
    ///
    /// # Errors
    ///
    /// Returns the first [`GridError`] encountered.
    pub fn parse_batch(text: &str) -> Result<Vec<Self>, GridError> {
        text.split(['~', '\n', '\r'])
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(str::parse)
            .collect()
    }

    /// Renders the grid with blank lines and double spaces between boxes,
    /// the way a human reads it.
    #[must_use]
    pub fn to_pretty_string(&self) -> String {
        let box_width = self.width.isqrt();
        let mut out = String::new();
        for row in 0..self.width {
            if row > 0 && row % box_width == 0 {
                out.push('\n');
            }
            for col in 0..self.width {
                if col > 0 {
                    out.push(' ');
                    if col % box_width == 0 {
                        out.push(' ');
                    }
                }
                out.push(value_to_symbol(self.value(row, col), self.width));
            }
            out.push('\n');
        }
        out
    }
}

impl FromStr for PuzzleGrid {
    type Err = GridError;

    /// Parses one puzzle from its compact text form.
    ///
    /// Whitespace is ignored, so pretty-printed fixtures parse as well as
    /// single-line wire strings. The width is inferred as the square root
    /// of the cell count.
    fn from_str(s: &str) -> Result<Self, GridError> {
        let symbols: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        let width = symbols.len().isqrt();
        if width * width != symbols.len() {
            return Err(GridError::NotSquare { len: symbols.len() });
        }
        let values = symbols
            .into_iter()
            .map(|symbol| symbol_to_value(symbol, width))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_values(width, values)
    }
}

impl Display for PuzzleGrid {
    /// Emits the compact single-line form; round-trips with [`FromStr`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &value in &self.values {
            write!(f, "{}", value_to_symbol(value, self.width))?;
        }
        Ok(())
    }
}

/// Decodes one puzzle character for the given width.
#[expect(clippy::cast_possible_truncation)]
fn symbol_to_value(symbol: char, width: usize) -> Result<u8, GridError> {
    let invalid = GridError::InvalidSymbol { symbol, width };
    let value = if width <= 9 {
        match symbol {
            '.' | '0' => 0,
            '1'..='9' => symbol as u8 - b'0',
            _ => return Err(invalid),
        }
    } else if width <= MAX_SYMBOL_WIDTH {
        match symbol {
            '.' | '0' => 0,
            'A'..='Z' => symbol as u8 - b'A' + 1,
            '+' => 27,
            '1'..='9' => symbol as u8 - b'0' + 27,
            _ => return Err(invalid),
        }
    } else {
        return Err(GridError::WidthNotRepresentable { width });
    };
    if usize::from(value) > width {
        return Err(invalid);
    }
    Ok(value)
}

/// Encodes one value for the given width; unrepresentable widths fall back
/// to `?`, which only pretty output can hit (parsing rejects them first).
fn value_to_symbol(value: u8, width: usize) -> char {
    if value == 0 {
        return '.';
    }
    if width <= 9 {
        (b'0' + value) as char
    } else if width <= MAX_SYMBOL_WIDTH {
        match value {
            1..=26 => (b'A' + value - 1) as char,
            27 => '+',
            _ => (b'0' + value - 27) as char,
        }
    } else {
        '?'
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_9x9() {
        let text = "\
            53..7....\
            6..195...\
            .98....6.\
            8...6...3\
            4..8.3..1\
            7...2...6\
            .6....28.\
            ...419..5\
            ....8..79";
        let grid: PuzzleGrid = text.parse().unwrap();
        assert_eq!(grid.width(), 9);
        assert_eq!(grid.value(0, 0), 5);
        assert_eq!(grid.value(0, 4), 7);
        assert_eq!(grid.value(8, 8), 9);
        assert_eq!(grid.given_count(), 30);
    }

    #[test]
    fn test_parse_ignores_whitespace() {
        let grid: PuzzleGrid = "12 34\n.. ..\n43 21\n.. ..".parse().unwrap();
        assert_eq!(grid.width(), 4);
        assert_eq!(grid.value(2, 0), 4);
    }

    #[test]
    fn test_parse_16x16_symbols() {
        let mut text = String::from("ABCDEFGHIJKLMNOP");
        text.push_str(&".".repeat(16 * 15));
        let grid: PuzzleGrid = text.parse().unwrap();
        assert_eq!(grid.width(), 16);
        assert_eq!(grid.value(0, 0), 1);
        assert_eq!(grid.value(0, 15), 16);
    }

    #[test]
    fn test_parse_rejects_non_square_length() {
        let err = "12345678".parse::<PuzzleGrid>().unwrap_err();
        assert_eq!(err, GridError::NotSquare { len: 8 });
    }

    #[test]
    fn test_parse_rejects_non_perfect_square_width() {
        // Four cells parse to a 2×2 grid, but 2 has no box layout.
        let err = "1212".parse::<PuzzleGrid>().unwrap_err();
        assert_eq!(err, GridError::WidthNotPerfectSquare { width: 2 });
    }

    #[test]
    fn test_parse_rejects_out_of_range_symbol() {
        let err = "125.....4........".parse::<PuzzleGrid>().unwrap_err();
        // 17 cells is not square; fix to 16 with a bad digit for width 4.
        assert_eq!(err, GridError::NotSquare { len: 17 });

        let err = "125....4........".parse::<PuzzleGrid>().unwrap_err();
        assert_eq!(
            err,
            GridError::InvalidSymbol {
                symbol: '5',
                width: 4
            }
        );
    }

    #[test]
    fn test_from_values_validation() {
        assert!(PuzzleGrid::from_values(9, vec![0; 81]).is_ok());
        assert_eq!(
            PuzzleGrid::from_values(8, vec![0; 64]).unwrap_err(),
            GridError::WidthNotPerfectSquare { width: 8 }
        );
        assert_eq!(
            PuzzleGrid::from_values(81, vec![0; 81 * 81]).unwrap_err(),
            GridError::WidthTooLarge { width: 81 }
        );
        assert_eq!(
            PuzzleGrid::from_values(4, vec![0; 15]).unwrap_err(),
            GridError::NotSquare { len: 15 }
        );
        let mut values = vec![0; 16];
        values[6] = 5;
        assert_eq!(
            PuzzleGrid::from_values(4, values).unwrap_err(),
            GridError::ValueOutOfRange {
                value: 5,
                row: 1,
                col: 2,
                width: 4
            }
        );
    }

    #[test]
    fn test_display_round_trip() {
        let text = "1234....3.2...41";
        let grid: PuzzleGrid = text.parse().unwrap();
        assert_eq!(grid.to_string(), text);

        let mut wide = PuzzleGrid::empty(36).unwrap();
        wide.set_value(0, 0, 1);
        wide.set_value(0, 1, 26);
        wide.set_value(0, 2, 27);
        wide.set_value(0, 3, 36);
        let rendered = wide.to_string();
        assert!(rendered.starts_with("AZ+9"));
        assert_eq!(rendered.parse::<PuzzleGrid>().unwrap(), wide);
    }

    #[test]
    fn test_parse_batch() {
        let text = "1234....3.2...41~................\n\n1234....3.2...41";
        let grids = PuzzleGrid::parse_batch(text).unwrap();
        assert_eq!(grids.len(), 3);
        assert_eq!(grids[0], grids[2]);
        assert_eq!(grids[1], PuzzleGrid::empty(4).unwrap());
    }

    #[test]
    fn test_pretty_string_has_box_gaps() {
        let grid: PuzzleGrid = "1234....3.2...41".parse().unwrap();
        let pretty = grid.to_pretty_string();
        assert!(pretty.starts_with("1 2  3 4\n. .  . .\n\n"));
    }

    #[test]
    #[should_panic(expected = "value 5 is outside 0..=4")]
    fn test_set_value_range_checked() {
        let mut grid = PuzzleGrid::empty(4).unwrap();
        grid.set_value(0, 0, 5);
    }
}
