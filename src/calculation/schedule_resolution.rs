//! Strict schedule code lookup.

use crate::models::{AuditStep, ScheduleCode, ScheduleTable, WorkerIdentifier};

/// A main record's worker is absent from the schedule table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmappedWorker {
    /// The normalized identifier that was looked up.
    pub identifier: WorkerIdentifier,
}

/// The resolved schedule code of a worker.
#[derive(Debug, Clone)]
pub struct ScheduleResolution {
    /// The code to write into field 748.
    pub code: ScheduleCode,
    /// The audit step recording the lookup.
    pub audit_step: AuditStep,
}

/// Looks up a worker's schedule code.
///
/// There is no default: a worker without an entry is an [`UnmappedWorker`].
///
/// # Example
///
/// ```
/// use contribution_rewriter::calculation::resolve_schedule;
/// use contribution_rewriter::models::{ScheduleCode, ScheduleTable, WorkerIdentifier};
///
/// let mut table = ScheduleTable::new();
/// table.insert("12345678-9", ScheduleCode::FULL_TIME);
///
/// let mapped = WorkerIdentifier::new("00012345678", '9');
/// assert_eq!(resolve_schedule(&mapped, &table, 1).unwrap().code, ScheduleCode::FULL_TIME);
///
/// let unmapped = WorkerIdentifier::new("00000000001", '9');
/// assert!(resolve_schedule(&unmapped, &table, 1).is_err());
/// ```
pub fn resolve_schedule(
    identifier: &WorkerIdentifier,
    table: &ScheduleTable,
    step_number: u32,
) -> Result<ScheduleResolution, UnmappedWorker> {
    let code = table.get(identifier).ok_or_else(|| UnmappedWorker {
        identifier: identifier.clone(),
    })?;

    let reasoning = if code.is_known() {
        format!("Worker {} is {} (code {})", identifier, code.label(), code)
    } else {
        format!(
            "Worker {} has schedule code {}, which is neither 1 nor 2; written as-is",
            identifier, code
        )
    };

    Ok(ScheduleResolution {
        code,
        audit_step: AuditStep {
            step_number,
            rule_id: "schedule_resolution".to_string(),
            rule_name: "Schedule Resolution".to_string(),
            field_ref: "748".to_string(),
            input: serde_json::json!({ "identifier": identifier.to_string() }),
            output: serde_json::json!({
                "schedule_code": code,
                "label": code.label()
            }),
            reasoning,
        },
    })
}
