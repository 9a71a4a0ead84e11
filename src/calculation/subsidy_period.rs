//! Subsidy period duration.
//!
//! A subsidized main record carries a movement date range in `dd-mm-yyyy`
//! form. The duration feeds the proration of the unemployment base.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::AuditStep;

/// Format of the movement date fields.
pub const MOVEMENT_DATE_FORMAT: &str = "%d-%m-%Y";

/// A parsed movement date range. Either end may be unreadable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsidyPeriod {
    /// Start date, inclusive.
    pub from: Option<NaiveDate>,
    /// End date, inclusive.
    pub to: Option<NaiveDate>,
}

impl SubsidyPeriod {
    /// Inclusive day count, or 0 when either end is missing or the range is
    /// reversed.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use contribution_rewriter::calculation::SubsidyPeriod;
    ///
    /// let period = SubsidyPeriod {
    ///     from: NaiveDate::from_ymd_opt(2025, 8, 1),
    ///     to: NaiveDate::from_ymd_opt(2025, 8, 15),
    /// };
    /// assert_eq!(period.days(), 15);
    /// ```
    pub fn days(&self) -> i64 {
        match (self.from, self.to) {
            (Some(from), Some(to)) => ((to - from).num_days() + 1).max(0),
            _ => 0,
        }
    }
}

/// The result of evaluating a record's subsidy period.
#[derive(Debug, Clone)]
pub struct SubsidyPeriodResult {
    /// The parsed range.
    pub period: SubsidyPeriod,
    /// Inclusive day count.
    pub days: i64,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Parses a `dd-mm-yyyy` movement date.
///
/// The separators must sit at positions 2 and 5 of a ten-character field;
/// anything else, including calendar-invalid dates, yields `None`.
pub fn parse_movement_date(raw: &str) -> Option<NaiveDate> {
    let bytes = raw.as_bytes();
    if bytes.len() != 10 || bytes[2] != b'-' || bytes[5] != b'-' {
        return None;
    }
    NaiveDate::parse_from_str(raw, MOVEMENT_DATE_FORMAT).ok()
}

/// Computes the subsidy period of a main record from its raw date fields.
pub fn calculate_subsidy_period(
    raw_from: &str,
    raw_to: &str,
    step_number: u32,
) -> SubsidyPeriodResult {
    let period = SubsidyPeriod {
        from: parse_movement_date(raw_from),
        to: parse_movement_date(raw_to),
    };
    let days = period.days();

    let reasoning = match (period.from, period.to) {
        (Some(from), Some(to)) if days > 0 => {
            format!("{} to {} inclusive is {} days", from, to, days)
        }
        (Some(from), Some(to)) => {
            format!("{} is after {}; duration clamped to 0 days", from, to)
        }
        _ => format!(
            "Movement dates '{}' / '{}' are not both valid dd-mm-yyyy; duration is 0 days",
            raw_from, raw_to
        ),
    };

    SubsidyPeriodResult {
        period,
        days,
        audit_step: AuditStep {
            step_number,
            rule_id: "subsidy_period".to_string(),
            rule_name: "Subsidy Period".to_string(),
            field_ref: "128, 138".to_string(),
            input: serde_json::json!({
                "from": raw_from,
                "to": raw_to
            }),
            output: serde_json::json!({
                "from": period.from.map(|d| d.to_string()),
                "to": period.to.map(|d| d.to_string()),
                "days": days
            }),
            reasoning,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// SP-001: half month
    #[test]
    fn test_sp_001_fifteen_days() {
        let result = calculate_subsidy_period("01-08-2025", "15-08-2025", 1);
        assert_eq!(result.days, 15);
        assert_eq!(result.period.from, Some(date(2025, 8, 1)));
        assert_eq!(result.period.to, Some(date(2025, 8, 15)));
        assert_eq!(result.audit_step.output["days"], 15);
    }

    /// SP-002: single day counts as one
    #[test]
    fn test_sp_002_same_day_is_one() {
        assert_eq!(calculate_subsidy_period("10-08-2025", "10-08-2025", 1).days, 1);
    }

    /// SP-003: reversed range clamps to zero
    #[test]
    fn test_sp_003_reversed_range_is_zero() {
        let result = calculate_subsidy_period("20-08-2025", "10-08-2025", 1);
        assert_eq!(result.days, 0);
        assert!(result.audit_step.reasoning.contains("clamped"));
    }

    /// SP-004: unreadable dates give zero
    #[test]
    fn test_sp_004_invalid_dates_are_zero() {
        assert_eq!(calculate_subsidy_period("          ", "15-08-2025", 1).days, 0);
        assert_eq!(calculate_subsidy_period("01-08-2025", "00-00-0000", 1).days, 0);
        assert_eq!(calculate_subsidy_period("2025-08-01", "2025-08-15", 1).days, 0);
        assert_eq!(calculate_subsidy_period("31-02-2025", "15-03-2025", 1).days, 0);
    }

    /// SP-005: ranges spanning months and leap days
    #[test]
    fn test_sp_005_cross_month_and_leap_year() {
        assert_eq!(calculate_subsidy_period("25-01-2024", "05-02-2024", 1).days, 12);
        assert_eq!(calculate_subsidy_period("28-02-2024", "01-03-2024", 1).days, 3);
        assert_eq!(calculate_subsidy_period("28-02-2025", "01-03-2025", 1).days, 2);
    }

    #[test]
    fn test_parse_requires_separators_in_place() {
        assert_eq!(parse_movement_date("01-08-2025"), Some(date(2025, 8, 1)));
        assert_eq!(parse_movement_date("01/08/2025"), None);
        assert_eq!(parse_movement_date("1-08-2025"), None);
        assert_eq!(parse_movement_date("01-08-25"), None);
    }
}
