//! Fixed-width field replacement.
//!
//! A write replaces exactly the characters of one [`FieldSpan`] and nothing
//! else. When the line is too short or the rendered value does not have
//! exactly the field's width, the line is left as it was.

use serde::{Deserialize, Serialize};

use crate::models::FieldSpan;

/// The outcome of a single field write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldWrite {
    /// The field now holds the new value.
    Written,
    /// The line ends before the field does.
    SkippedShortLine,
    /// The value does not fit the field width.
    SkippedValueTooWide,
}

impl FieldWrite {
    /// Returns true if the line was modified.
    pub fn is_written(&self) -> bool {
        matches!(self, FieldWrite::Written)
    }
}

/// Renders an integer zero-padded to `width` characters, sign first.
///
/// Returns `None` when the value needs more than `width` characters.
///
/// # Example
///
/// ```
/// use contribution_rewriter::calculation::format_numeric;
///
/// assert_eq!(format_numeric(32_460, 8).as_deref(), Some("00032460"));
/// assert_eq!(format_numeric(-1_234, 8).as_deref(), Some("-0001234"));
/// assert_eq!(format_numeric(123_456_789, 8), None);
/// ```
pub fn format_numeric(value: i64, width: usize) -> Option<String> {
    let rendered = format!("{:0width$}", value, width = width);
    (rendered.chars().count() == width).then_some(rendered)
}

/// Writes a zero-padded integer into `line` at `span`, in place.
pub fn write_numeric_field(line: &mut String, span: FieldSpan, value: i64) -> FieldWrite {
    if span.byte_range(line).is_none() {
        return FieldWrite::SkippedShortLine;
    }
    match format_numeric(value, span.width) {
        Some(rendered) => splice(line, span, &rendered),
        None => FieldWrite::SkippedValueTooWide,
    }
}

fn splice(line: &mut String, span: FieldSpan, value: &str) -> FieldWrite {
    let Some(range) = span.byte_range(line) else {
        return FieldWrite::SkippedShortLine;
    };
    if value.chars().count() != span.width {
        return FieldWrite::SkippedValueTooWide;
    }
    line.replace_range(range, value);
    FieldWrite::Written
}
