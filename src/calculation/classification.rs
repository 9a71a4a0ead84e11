//! Record classification.
//!
//! Decides whether a line is a main record, an auxiliary record of a worker,
//! or too short to process, and whether a main record's regime and worker
//! type make contribution recomputation applicable.

use crate::config::PipelineOptions;
use crate::models::{AuditStep, MainRecord, layout, worker_key};

/// Line indicator value of a main record.
pub const MAIN_RECORD_INDICATOR: &str = "00";

/// Movement codes that mark a subsidized period.
pub const SUBSIDY_MOVEMENT_CODES: [&str; 2] = ["03", "06"];

/// Regime code of the AFP pension system.
pub const AFP_REGIME_CODE: &str = "AFP";

/// Worker type code of an active, non-pensioner worker.
pub const ACTIVE_WORKER_TYPE: &str = "0";

/// The classification of one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordClass {
    /// Shorter than the processable minimum; copied verbatim and not grouped.
    Short,
    /// A processable line of a worker that is not the main record.
    Auxiliary {
        /// Raw identifier prefix.
        worker_key: String,
        /// Whether the movement code marks a subsidy.
        has_subsidy: bool,
    },
    /// The worker's main record, subject to rewriting.
    Main(MainRecord),
}

/// Classifies a line.
///
/// # Example
///
/// ```
/// use contribution_rewriter::calculation::{RecordClass, classify_line};
///
/// assert_eq!(classify_line("short line"), RecordClass::Short);
/// ```
pub fn classify_line(line: &str) -> RecordClass {
    let Some(indicator) = layout::LINE_INDICATOR.slice(line) else {
        return RecordClass::Short;
    };
    if layout::UNEMPLOYMENT_BASE.slice(line).is_none() {
        return RecordClass::Short;
    }

    if indicator == MAIN_RECORD_INDICATOR {
        if let Some(record) = MainRecord::parse(line) {
            return RecordClass::Main(record);
        }
    }

    RecordClass::Auxiliary {
        worker_key: worker_key(line).unwrap_or_default().to_string(),
        has_subsidy: layout::MOVEMENT_CODE
            .slice(line)
            .is_some_and(has_subsidy),
    }
}

/// Returns true when a movement code marks a subsidized period.
pub fn has_subsidy(movement_code: &str) -> bool {
    SUBSIDY_MOVEMENT_CODES.contains(&movement_code)
}

/// The outcome of the recomputation policy gate.
#[derive(Debug, Clone)]
pub struct RecomputeDecision {
    /// Whether fields 182 and 756 are recalculated.
    pub applies: bool,
    /// The audit step recording the decision.
    pub audit_step: AuditStep,
}

/// Applies the regime/worker-type gate to a main record.
///
/// Recomputation applies to active workers in the AFP regime. With
/// `gate_by_regime` switched off it applies to every main record.
pub fn recompute_contributions(
    record: &MainRecord,
    options: &PipelineOptions,
    step_number: u32,
) -> RecomputeDecision {
    let regime_matches = record.regime_code == AFP_REGIME_CODE;
    let worker_type_matches = record.worker_type == ACTIVE_WORKER_TYPE;
    let applies = !options.gate_by_regime || (regime_matches && worker_type_matches);

    let reasoning = if !options.gate_by_regime {
        "Regime gate disabled; contributions recomputed for every main record".to_string()
    } else if applies {
        format!(
            "Regime '{}' with worker type '{}' is an active AFP worker; contributions recomputed",
            record.regime_code, record.worker_type
        )
    } else {
        format!(
            "Regime '{}' with worker type '{}' is not an active AFP worker; fields 182 and 756 kept",
            record.regime_code, record.worker_type
        )
    };

    RecomputeDecision {
        applies,
        audit_step: AuditStep {
            step_number,
            rule_id: "recompute_gate".to_string(),
            rule_name: "Recomputation Gate".to_string(),
            field_ref: "182, 756".to_string(),
            input: serde_json::json!({
                "regime_code": record.regime_code,
                "worker_type": record.worker_type,
                "gate_enabled": options.gate_by_regime
            }),
            output: serde_json::json!({ "recompute": applies }),
            reasoning,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldSpan;
    use crate::models::layout::MIN_PROCESSABLE_CHARS;

    fn line_with(fields: &[(FieldSpan, &str)], len: usize) -> String {
        let mut chars = vec!['0'; len];
        for (span, value) in fields {
            for (i, c) in value.chars().enumerate() {
                chars[span.offset + i] = c;
            }
        }
        chars.into_iter().collect()
    }

    fn main_line(regime: &str, worker_type: &str, movement: &str) -> String {
        line_with(
            &[
                (layout::REGIME_CODE, regime),
                (layout::WORKER_TYPE, worker_type),
                (layout::LINE_INDICATOR, "00"),
                (layout::MOVEMENT_CODE, movement),
            ],
            MIN_PROCESSABLE_CHARS,
        )
    }

    fn main_record(regime: &str, worker_type: &str) -> MainRecord {
        match classify_line(&main_line(regime, worker_type, "00")) {
            RecordClass::Main(record) => record,
            other => panic!("expected main record, got {:?}", other),
        }
    }

    /// RC-001: indicator 00 on a full-length line is a main record
    #[test]
    fn test_rc_001_main_record() {
        assert!(matches!(
            classify_line(&main_line("AFP", "0", "00")),
            RecordClass::Main(_)
        ));
    }

    /// RC-002: any other indicator is auxiliary
    #[test]
    fn test_rc_002_auxiliary_record() {
        let line = line_with(
            &[(layout::LINE_INDICATOR, "01"), (layout::MOVEMENT_CODE, "06")],
            MIN_PROCESSABLE_CHARS,
        );
        match classify_line(&line) {
            RecordClass::Auxiliary {
                worker_key,
                has_subsidy,
            } => {
                assert_eq!(worker_key, "00000000000");
                assert!(has_subsidy);
            }
            other => panic!("expected auxiliary, got {:?}", other),
        }
    }

    /// RC-003: a line one character short of the minimum is never main
    #[test]
    fn test_rc_003_short_main_indicator_is_short() {
        let line = line_with(
            &[(layout::LINE_INDICATOR, "00")],
            MIN_PROCESSABLE_CHARS - 1,
        );
        assert_eq!(classify_line(&line), RecordClass::Short);
        assert_eq!(classify_line(""), RecordClass::Short);
    }

    #[test]
    fn test_subsidy_codes() {
        assert!(has_subsidy("03"));
        assert!(has_subsidy("06"));
        assert!(!has_subsidy("00"));
        assert!(!has_subsidy("3 "));
        assert!(!has_subsidy("01"));
    }

    /// RG-001: active AFP worker is recomputed
    #[test]
    fn test_rg_001_active_afp_recomputes() {
        let decision = recompute_contributions(
            &main_record("AFP", "0"),
            &PipelineOptions::default(),
            1,
        );
        assert!(decision.applies);
        assert_eq!(decision.audit_step.rule_id, "recompute_gate");
        assert_eq!(decision.audit_step.output["recompute"], true);
    }

    /// RG-002: other regimes and pensioners keep their contributions
    #[test]
    fn test_rg_002_gate_rejects_other_workers() {
        let options = PipelineOptions::default();
        assert!(!recompute_contributions(&main_record("INP", "0"), &options, 1).applies);
        assert!(!recompute_contributions(&main_record("SIP", "0"), &options, 1).applies);
        assert!(!recompute_contributions(&main_record("AFP", "1"), &options, 1).applies);

        let decision = recompute_contributions(&main_record("INP", "0"), &options, 1);
        assert!(decision.audit_step.reasoning.contains("kept"));
    }

    /// RG-003: disabling the gate recomputes everything
    #[test]
    fn test_rg_003_gate_disabled() {
        let options = PipelineOptions {
            gate_by_regime: false,
            ..PipelineOptions::default()
        };
        let decision = recompute_contributions(&main_record("INP", "3"), &options, 4);
        assert!(decision.applies);
        assert_eq!(decision.audit_step.step_number, 4);
        assert!(decision.audit_step.reasoning.contains("disabled"));
    }
}
