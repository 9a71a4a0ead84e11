//! Worker identifier extraction and normalization.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::layout::{IDENTIFIER_CHECK, IDENTIFIER_DIGITS};

/// A normalized national worker identifier, rendered as `<digits>-<check>`.
///
/// The digit portion has its leading zeros stripped; an all-zero digit
/// field collapses to `"0"`. This is the join key into the schedule table.
///
/// # Example
///
/// ```
/// use contribution_rewriter::models::WorkerIdentifier;
///
/// let id = WorkerIdentifier::from_line("000123456789rest of line").unwrap();
/// assert_eq!(id.to_string(), "12345678-9");
///
/// assert!(WorkerIdentifier::from_line("too short").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "IdentifierParts")]
pub struct WorkerIdentifier {
    digits: String,
    check: char,
    #[serde(skip_serializing)]
    key: String,
}

#[derive(Deserialize)]
struct IdentifierParts {
    digits: String,
    check: char,
}

impl From<IdentifierParts> for WorkerIdentifier {
    fn from(parts: IdentifierParts) -> Self {
        Self::new(&parts.digits, parts.check)
    }
}

impl WorkerIdentifier {
    /// Extracts the identifier from the first twelve characters of a line.
    ///
    /// Returns `None` for lines shorter than twelve characters; whether that
    /// matters is the caller's decision.
    pub fn from_line(line: &str) -> Option<Self> {
        let digits = IDENTIFIER_DIGITS.slice(line)?;
        let check = IDENTIFIER_CHECK.slice(line)?.chars().next()?;
        Some(Self::new(digits, check))
    }

    /// Builds an identifier from a raw digit field and check character.
    pub fn new(raw_digits: &str, check: char) -> Self {
        let stripped = raw_digits.trim_start_matches('0');
        let digits = if stripped.is_empty() { "0" } else { stripped };
        Self {
            digits: digits.to_string(),
            check,
            key: format!("{}-{}", digits, check),
        }
    }

    /// The digit portion without leading zeros.
    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// The check character.
    pub fn check(&self) -> char {
        self.check
    }

    /// The rendered `digits-check` form, the schedule table key.
    pub fn as_str(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for WorkerIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

/// Returns the raw eleven-character identifier prefix used to group records
/// of the same worker, without normalization.
pub fn worker_key(line: &str) -> Option<&str> {
    IDENTIFIER_DIGITS.slice(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_leading_zeros() {
        let id = WorkerIdentifier::from_line("00012345678K").unwrap();
        assert_eq!(id.digits(), "12345678");
        assert_eq!(id.check(), 'K');
        assert_eq!(id.to_string(), "12345678-K");
    }

    #[test]
    fn test_all_zero_digits_collapse_to_single_zero() {
        let id = WorkerIdentifier::from_line("000000000000").unwrap();
        assert_eq!(id.to_string(), "0-0");
    }

    #[test]
    fn test_exactly_twelve_characters_is_enough() {
        assert!(WorkerIdentifier::from_line("000000000019").is_some());
        assert!(WorkerIdentifier::from_line("00000000001").is_none());
    }

    #[test]
    fn test_interior_zeros_are_kept() {
        let id = WorkerIdentifier::from_line("000100200305").unwrap();
        assert_eq!(id.digits(), "10020030");
        assert_eq!(id.to_string(), "10020030-5");

        let id = WorkerIdentifier::from_line("000010020035").unwrap();
        assert_eq!(id.to_string(), "1002003-5");
    }

    #[test]
    fn test_worker_key_is_raw_prefix() {
        assert_eq!(worker_key("00012345678K..."), Some("00012345678"));
        assert_eq!(worker_key("0001"), None);
    }

    #[test]
    fn test_serializes_as_struct() {
        let id = WorkerIdentifier::new("0042", '7');
        let json = serde_json::to_string(&id).unwrap();
        assert!(json.contains("\"digits\":\"42\""));
        assert!(!json.contains("key"));
    }

    #[test]
    fn test_rendered_key_matches_display() {
        let id = WorkerIdentifier::new("00007654321", 'K');
        assert_eq!(id.as_str(), "7654321-K");
        assert_eq!(id.as_str(), id.to_string());
    }

    #[test]
    fn test_deserialized_identifier_rebuilds_key() {
        let id: WorkerIdentifier =
            serde_json::from_str(r#"{"digits":"00042","check":"7"}"#).unwrap();
        assert_eq!(id, WorkerIdentifier::new("42", '7'));
        assert_eq!(id.as_str(), "42-7");
    }
}
