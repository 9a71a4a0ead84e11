//! Audit trail types recording every calculation and field write.

use serde::{Deserialize, Serialize};

/// A single step in the audit trail of a record rewrite.
///
/// Each step captures the input, output, and reasoning for a rule application.
///
/// # Example
///
/// ```
/// use contribution_rewriter::models::AuditStep;
///
/// let step = AuditStep {
///     step_number: 1,
///     rule_id: "schedule_resolution".to_string(),
///     rule_name: "Schedule Resolution".to_string(),
///     field_ref: "748".to_string(),
///     input: serde_json::json!({"identifier": "12345678-9"}),
///     output: serde_json::json!({"schedule_code": 1}),
///     reasoning: "Worker 12345678-9 is full_time".to_string(),
/// };
/// assert_eq!(step.field_ref, "748");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number within the record.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// Offset of the record field this rule feeds, or `-` when none.
    pub field_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A recovered anomaly observed while rewriting a record.
///
/// Warnings never stop processing; they describe a field that degraded to
/// a default or a write that was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
}

impl AuditWarning {
    /// Creates a warning.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_step_round_trips_through_json() {
        let step = AuditStep {
            step_number: 2,
            rule_id: "pension_contribution".to_string(),
            rule_name: "Pension Contribution".to_string(),
            field_ref: "182".to_string(),
            input: serde_json::json!({"taxable_income": 3000000}),
            output: serde_json::json!({"amount": 32460}),
            reasoning: "2460000 x 0.001 + 30000 = 32460".to_string(),
        };

        let json = serde_json::to_string(&step).unwrap();
        assert!(json.contains("\"rule_id\":\"pension_contribution\""));
        assert!(json.contains("\"field_ref\":\"182\""));
        let back: AuditStep = serde_json::from_str(&json).unwrap();
        assert_eq!(back, step);
    }

    #[test]
    fn test_warning_constructor() {
        let warning = AuditWarning::new("VALUE_TOO_WIDE", "does not fit");
        assert_eq!(warning.code, "VALUE_TOO_WIDE");
        assert_eq!(warning.message, "does not fit");
    }
}
