//! Fixed field positions of the payroll report record.
//!
//! All offsets are zero-based character positions into a decoded line and
//! every span is half-open: `[offset, offset + width)`.

use serde::{Deserialize, Serialize};

/// A fixed-width field position within a record.
///
/// # Example
///
/// ```
/// use contribution_rewriter::models::FieldSpan;
///
/// let span = FieldSpan::new(182, 8);
/// assert_eq!(span.end(), 190);
/// assert_eq!(span.slice("short"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldSpan {
    /// The zero-based character offset where the field starts.
    pub offset: usize,
    /// The field width in characters.
    pub width: usize,
}

impl FieldSpan {
    /// Creates a span starting at `offset` covering `width` characters.
    pub const fn new(offset: usize, width: usize) -> Self {
        Self { offset, width }
    }

    /// Returns the exclusive end offset of the span.
    pub const fn end(&self) -> usize {
        self.offset + self.width
    }

    /// Returns the byte range of this span within `line`, or `None` when the
    /// line has fewer than [`end`](Self::end) characters.
    pub fn byte_range(&self, line: &str) -> Option<std::ops::Range<usize>> {
        if line.is_ascii() {
            return (line.len() >= self.end()).then(|| self.offset..self.end());
        }

        let mut boundaries = line
            .char_indices()
            .map(|(index, _)| index)
            .chain(std::iter::once(line.len()));
        let start = boundaries.nth(self.offset)?;
        let end = if self.width == 0 {
            start
        } else {
            boundaries.nth(self.width - 1)?
        };
        Some(start..end)
    }

    /// Returns the text covered by this span, or `None` for a short line.
    pub fn slice<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.byte_range(line).map(|range| &line[range])
    }
}

/// Minimum number of characters a line needs for full processing.
///
/// This is the end of the unemployment insurance base field, the last field
/// the rewriter reads.
pub const MIN_PROCESSABLE_CHARS: usize = UNEMPLOYMENT_BASE.end();

/// Worker identifier digits.
pub const IDENTIFIER_DIGITS: FieldSpan = FieldSpan::new(0, 11);
/// Worker identifier check character.
pub const IDENTIFIER_CHECK: FieldSpan = FieldSpan::new(11, 1);
/// Pension regime code (`AFP`, `INP`, `SIP`).
pub const REGIME_CODE: FieldSpan = FieldSpan::new(118, 3);
/// Worker type code (`0` for an active worker).
pub const WORKER_TYPE: FieldSpan = FieldSpan::new(121, 1);
/// Line type indicator, `00` for the main record.
pub const LINE_INDICATOR: FieldSpan = FieldSpan::new(124, 2);
/// Personnel movement code.
pub const MOVEMENT_CODE: FieldSpan = FieldSpan::new(126, 2);
/// Movement start date, `dd-mm-yyyy`.
pub const MOVEMENT_FROM: FieldSpan = FieldSpan::new(128, 10);
/// Movement end date, `dd-mm-yyyy`.
pub const MOVEMENT_TO: FieldSpan = FieldSpan::new(138, 10);
/// Taxable pension income.
pub const TAXABLE_INCOME: FieldSpan = FieldSpan::new(174, 8);
/// Mandatory pension contribution (rewritten).
pub const PENSION_CONTRIBUTION: FieldSpan = FieldSpan::new(182, 8);
/// Unemployment insurance base as reported to the employer section (rewritten).
pub const UNEMPLOYMENT_BASE_OUT: FieldSpan = FieldSpan::new(740, 8);
/// Working schedule code (rewritten).
pub const SCHEDULE_CODE: FieldSpan = FieldSpan::new(748, 8);
/// Life-expectancy contribution (rewritten).
pub const LIFE_EXPECTANCY_CONTRIBUTION: FieldSpan = FieldSpan::new(756, 8);
/// Unemployment insurance taxable base.
pub const UNEMPLOYMENT_BASE: FieldSpan = FieldSpan::new(805, 8);

/// The four spans the rewriter may modify. Every other character of a line
/// is copied verbatim.
pub const WRITABLE_FIELDS: [FieldSpan; 4] = [
    PENSION_CONTRIBUTION,
    UNEMPLOYMENT_BASE_OUT,
    SCHEDULE_CODE,
    LIFE_EXPECTANCY_CONTRIBUTION,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_processable_chars_is_813() {
        assert_eq!(MIN_PROCESSABLE_CHARS, 813);
    }

    #[test]
    fn test_slice_ascii_line() {
        let line = "0123456789ABCDEF";
        assert_eq!(FieldSpan::new(10, 3).slice(line), Some("ABC"));
        assert_eq!(FieldSpan::new(14, 2).slice(line), Some("EF"));
        assert_eq!(FieldSpan::new(14, 3).slice(line), None);
    }

    #[test]
    fn test_slice_counts_characters_not_bytes() {
        // 'Ñ' is two bytes in UTF-8 but one character position.
        let line = "ABÑDE123";
        assert_eq!(FieldSpan::new(3, 2).slice(line), Some("DE"));
        assert_eq!(FieldSpan::new(2, 1).slice(line), Some("Ñ"));
        assert_eq!(FieldSpan::new(5, 3).slice(line), Some("123"));
        assert_eq!(FieldSpan::new(6, 3).slice(line), None);
    }

    #[test]
    fn test_zero_width_span() {
        assert_eq!(FieldSpan::new(3, 0).slice("abcÑ"), Some(""));
        assert_eq!(FieldSpan::new(4, 0).slice("abcÑ"), Some(""));
        assert_eq!(FieldSpan::new(5, 0).slice("abcÑ"), None);
    }

    #[test]
    fn test_writable_fields_do_not_overlap() {
        for (i, a) in WRITABLE_FIELDS.iter().enumerate() {
            for b in WRITABLE_FIELDS.iter().skip(i + 1) {
                assert!(a.end() <= b.offset || b.end() <= a.offset);
            }
        }
    }
}
