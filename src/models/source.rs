//! Decoded input lines and files.

use serde::{Deserialize, Serialize};

/// The terminator that followed a line in its source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineTerminator {
    /// `\n`
    Lf,
    /// `\r\n`
    CrLf,
    /// Last line of a file without a trailing newline.
    #[default]
    None,
}

impl LineTerminator {
    /// The terminator bytes.
    pub fn as_str(&self) -> &'static str {
        match self {
            LineTerminator::Lf => "\n",
            LineTerminator::CrLf => "\r\n",
            LineTerminator::None => "",
        }
    }
}

/// One decoded line, without its terminator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLine {
    /// The line content.
    pub text: String,
    /// The terminator that followed it.
    #[serde(default)]
    pub terminator: LineTerminator,
}

impl SourceLine {
    /// Creates a line with the given terminator.
    pub fn new(text: impl Into<String>, terminator: LineTerminator) -> Self {
        Self {
            text: text.into(),
            terminator,
        }
    }
}

impl From<&str> for SourceLine {
    fn from(text: &str) -> Self {
        Self::new(text, LineTerminator::None)
    }
}

impl From<String> for SourceLine {
    fn from(text: String) -> Self {
        Self::new(text, LineTerminator::None)
    }
}

/// A named sequence of input lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// File name, used for output naming and error context.
    pub name: String,
    /// The lines in input order.
    pub lines: Vec<SourceLine>,
}

impl SourceFile {
    /// Creates a file from its name and lines.
    pub fn new(name: impl Into<String>, lines: Vec<SourceLine>) -> Self {
        Self {
            name: name.into(),
            lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminator_text() {
        assert_eq!(LineTerminator::Lf.as_str(), "\n");
        assert_eq!(LineTerminator::CrLf.as_str(), "\r\n");
        assert_eq!(LineTerminator::None.as_str(), "");
    }

    #[test]
    fn test_line_from_str_has_no_terminator() {
        let line = SourceLine::from("abc");
        assert_eq!(line.text, "abc");
        assert_eq!(line.terminator, LineTerminator::None);
    }
}
