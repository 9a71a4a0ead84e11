//! Working schedule reference data.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::identifier::WorkerIdentifier;

/// A working schedule code from the reference table.
///
/// Valid codes are 1 (full-time) and 2 (part-time). Any other value is a
/// data-entry error that is carried through verbatim, not repaired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleCode(pub i64);

impl ScheduleCode {
    /// Full-time working schedule.
    pub const FULL_TIME: ScheduleCode = ScheduleCode(1);
    /// Part-time working schedule.
    pub const PART_TIME: ScheduleCode = ScheduleCode(2);

    /// Returns true for the two codes the report format defines.
    pub fn is_known(&self) -> bool {
        *self == Self::FULL_TIME || *self == Self::PART_TIME
    }

    /// A short label for logs and audit output.
    pub fn label(&self) -> &'static str {
        match *self {
            Self::FULL_TIME => "full_time",
            Self::PART_TIME => "part_time",
            _ => "unknown",
        }
    }
}

impl fmt::Display for ScheduleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mapping from normalized worker identifier to schedule code.
///
/// Loaded once before processing and read-only for the rest of the run.
///
/// # Example
///
/// ```
/// use contribution_rewriter::models::{ScheduleCode, ScheduleTable, WorkerIdentifier};
///
/// let mut table = ScheduleTable::new();
/// table.insert("12345678-9", ScheduleCode::PART_TIME);
///
/// let id = WorkerIdentifier::new("00012345678", '9');
/// assert_eq!(table.get(&id), Some(ScheduleCode::PART_TIME));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleTable {
    entries: HashMap<String, ScheduleCode>,
}

impl ScheduleTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the entry for an identifier written as `digits-check`.
    pub fn insert(&mut self, identifier: impl Into<String>, code: ScheduleCode) {
        self.entries.insert(identifier.into(), code);
    }

    /// Looks up the schedule code for a worker.
    pub fn get(&self, identifier: &WorkerIdentifier) -> Option<ScheduleCode> {
        self.entries.get(identifier.as_str()).copied()
    }

    /// Number of workers in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, ScheduleCode)> for ScheduleTable {
    fn from_iter<I: IntoIterator<Item = (String, ScheduleCode)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert!(ScheduleCode::FULL_TIME.is_known());
        assert!(ScheduleCode::PART_TIME.is_known());
        assert!(!ScheduleCode(3).is_known());
        assert!(!ScheduleCode(0).is_known());
    }

    #[test]
    fn test_labels() {
        assert_eq!(ScheduleCode::FULL_TIME.label(), "full_time");
        assert_eq!(ScheduleCode::PART_TIME.label(), "part_time");
        assert_eq!(ScheduleCode(7).label(), "unknown");
    }

    #[test]
    fn test_lookup_uses_normalized_identifier() {
        let table: ScheduleTable = vec![("1-9".to_string(), ScheduleCode::FULL_TIME)]
            .into_iter()
            .collect();
        assert_eq!(
            table.get(&WorkerIdentifier::new("00000000001", '9')),
            Some(ScheduleCode::FULL_TIME)
        );
        assert_eq!(table.get(&WorkerIdentifier::new("00000000001", 'K')), None);
        assert_eq!(table.len(), 1);
        assert!(!table.is_empty());
    }

    #[test]
    fn test_later_insert_replaces_entry() {
        let mut table = ScheduleTable::new();
        table.insert("5-5", ScheduleCode::FULL_TIME);
        table.insert("5-5", ScheduleCode::PART_TIME);
        assert_eq!(
            table.get(&WorkerIdentifier::new("5", '5')),
            Some(ScheduleCode::PART_TIME)
        );
    }

    #[test]
    fn test_code_serializes_as_number() {
        assert_eq!(serde_json::to_string(&ScheduleCode(2)).unwrap(), "2");
    }
}
