//! Line/column extents of text.
//!
//! A [`Length`] measured from the start of a document doubles as a position in it.

use std::fmt;
use std::ops::{Add, AddAssign};

use line_index::{LineCol, LineIndex};
use text_size::TextSize;

/// Extent of a piece of text as a number of line breaks plus the columns after the last one.
///
/// Columns are counted in UTF-8 bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Length {
    lines: u32,
    columns: u32,
}

impl Length {
    pub const ZERO: Self = Self { lines: 0, columns: 0 };

    pub const fn new(lines: u32, columns: u32) -> Self {
        Self { lines, columns }
    }

    pub fn of_str(text: &str) -> Self {
        match text.rfind('\n') {
            None => Self::new(0, text.len() as u32),
            Some(last) => {
                let lines = text.bytes().filter(|&b| b == b'\n').count() as u32;
                Self::new(lines, (text.len() - last - 1) as u32)
            }
        }
    }

    pub const fn lines(self) -> u32 {
        self.lines
    }

    pub const fn columns(self) -> u32 {
        self.columns
    }

    pub const fn is_zero(self) -> bool {
        self.lines == 0 && self.columns == 0
    }

    /// Returns the extent that takes `start` to `end`, or zero if `end` is not after `start`.
    pub fn diff_non_negative(start: Self, end: Self) -> Self {
        if end <= start {
            return Self::ZERO;
        }
        if start.lines == end.lines {
            Self::new(0, end.columns - start.columns)
        } else {
            Self::new(end.lines - start.lines, end.columns)
        }
    }
}

/// Concatenation of extents. Associative, but not commutative.
impl Add for Length {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        if other.lines == 0 {
            Self::new(self.lines, self.columns + other.columns)
        } else {
            Self::new(self.lines + other.lines, other.columns)
        }
    }
}

impl AddAssign for Length {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl std::iter::Sum for Length {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, length| acc + length)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.lines, self.columns)
    }
}

/// Converts between positions (lengths from the document start) and byte offsets.
#[derive(Debug)]
pub struct LineMap {
    index: LineIndex,
    len: TextSize,
}

impl LineMap {
    pub fn new(text: &str) -> Self {
        Self { index: LineIndex::new(text), len: TextSize::new(text.len() as u32) }
    }

    pub fn offset(&self, position: Length) -> Option<TextSize> {
        let offset =
            self.index.offset(LineCol { line: position.lines, col: position.columns })?;
        (offset <= self.len).then_some(offset)
    }

    pub fn position(&self, offset: TextSize) -> Option<Length> {
        if offset > self.len {
            return None;
        }
        let LineCol { line, col } = self.index.line_col(offset);
        Some(Length::new(line, col))
    }
}
