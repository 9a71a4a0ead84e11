//! Single-line rewriting.
//!
//! [`rewrite_line`] classifies one decoded line and, for a main record,
//! applies the schedule, subsidy and contribution rules and writes the
//! resulting fields. It never fails: a worker missing from the schedule
//! table is reported as [`LineOutcome::Fatal`] for the caller to act on.

use tracing::{debug, warn};

use crate::calculation::{
    ContributionInputs, FieldWrite, RecordClass, UnmappedWorker,
    calculate_life_expectancy_contribution, calculate_pension_contribution,
    calculate_subsidy_period, classify_line, has_subsidy, recompute_contributions,
    resolve_schedule, unemployment_base_field_value, write_numeric_field,
};
use crate::config::RunConfig;
use crate::models::{
    AuditStep, AuditWarning, FieldSpan, MainRecord, RecordOutcome, ScheduleTable, layout,
};

/// Where a line came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineContext {
    /// The file name.
    pub file: String,
    /// 1-based line number.
    pub line_number: usize,
}

/// Why a line stopped the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FatalReason {
    /// The main record's worker has no schedule entry.
    UnmappedWorker(UnmappedWorker),
}

/// A line after rewriting, with what was learned about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedLine {
    /// The output text, same character count as the input.
    pub text: String,
    /// Raw identifier prefix, for processable lines.
    pub worker_key: Option<String>,
    /// Whether the line carries a subsidy movement code.
    pub has_subsidy: bool,
    /// The rewrite report, for main records.
    pub record: Option<RecordOutcome>,
}

impl TransformedLine {
    fn passthrough(text: &str) -> Self {
        Self {
            text: text.to_string(),
            worker_key: None,
            has_subsidy: false,
            record: None,
        }
    }
}

/// The result of rewriting one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// Processing continues with this output line.
    Continue(TransformedLine),
    /// The run must stop; no output may be produced.
    Fatal(FatalReason, LineContext),
}

/// Rewrites a single line.
pub fn rewrite_line(
    text: &str,
    context: LineContext,
    config: &RunConfig,
    schedule: &ScheduleTable,
) -> LineOutcome {
    match classify_line(text) {
        RecordClass::Short => LineOutcome::Continue(TransformedLine::passthrough(text)),
        RecordClass::Auxiliary {
            worker_key,
            has_subsidy,
        } => LineOutcome::Continue(TransformedLine {
            text: text.to_string(),
            worker_key: Some(worker_key),
            has_subsidy,
            record: None,
        }),
        RecordClass::Main(record) => rewrite_main_record(text, &record, context, config, schedule),
    }
}

fn rewrite_main_record(
    text: &str,
    record: &MainRecord,
    context: LineContext,
    config: &RunConfig,
    schedule: &ScheduleTable,
) -> LineOutcome {
    let mut steps: Vec<AuditStep> = Vec::new();
    let mut warnings: Vec<AuditWarning> = Vec::new();
    let mut step_number: u32 = 1;

    let resolution = match resolve_schedule(&record.identifier, schedule, step_number) {
        Ok(resolution) => resolution,
        Err(unmapped) => {
            return LineOutcome::Fatal(FatalReason::UnmappedWorker(unmapped), context);
        }
    };
    let schedule_code = resolution.code;
    steps.push(resolution.audit_step);
    step_number += 1;

    let subsidy = has_subsidy(&record.movement_code);
    let subsidy_days = if subsidy && config.options.apply_subsidy_proration {
        let period =
            calculate_subsidy_period(&record.movement_from, &record.movement_to, step_number);
        if period.days == 0 {
            warnings.push(AuditWarning::new(
                "SUBSIDY_PERIOD_UNKNOWN",
                format!(
                    "Movement dates '{}' to '{}' give no usable duration; base is not prorated",
                    record.movement_from, record.movement_to
                ),
            ));
        }
        steps.push(period.audit_step);
        step_number += 1;
        period.days
    } else {
        0
    };

    let decision = recompute_contributions(record, &config.options, step_number);
    let recompute = decision.applies;
    steps.push(decision.audit_step);
    step_number += 1;

    let ceiling = config.effective_ceiling();
    let inputs = ContributionInputs {
        taxable_income: record.taxable_income,
        pension_contribution: record.pension_contribution,
        unemployment_base: record.unemployment_base,
        has_subsidy: subsidy,
        subsidy_days,
    };

    let mut pension = None;
    let mut life_expectancy = None;
    if recompute {
        let pension_result = calculate_pension_contribution(
            inputs.taxable_income,
            inputs.pension_contribution,
            ceiling,
            step_number,
        );
        pension = Some(pension_result.amount);
        steps.push(pension_result.audit_step);
        step_number += 1;

        let life_result = calculate_life_expectancy_contribution(&inputs, ceiling, step_number);
        life_expectancy = Some(life_result.amount);
        steps.push(life_result.audit_step);
        step_number += 1;
    }

    let unemployment_base = unemployment_base_field_value(&inputs);

    // Fields are written in ascending offset order.
    let planned = [
        (layout::PENSION_CONTRIBUTION, pension),
        (layout::UNEMPLOYMENT_BASE_OUT, unemployment_base),
        (layout::SCHEDULE_CODE, Some(schedule_code.0)),
        (layout::LIFE_EXPECTANCY_CONTRIBUTION, life_expectancy),
    ];

    let mut output = text.to_string();
    let mut written = [None; 4];
    for (slot, (span, value)) in planned.into_iter().enumerate() {
        let Some(value) = value else { continue };
        let (result, step) = write_field(&mut output, span, value, step_number);
        steps.push(step);
        step_number += 1;

        if result.is_written() {
            written[slot] = Some(value);
        } else {
            warn!(
                file = %context.file,
                line_number = context.line_number,
                identifier = %record.identifier,
                field = span.offset,
                value,
                outcome = ?result,
                "Field not written; original bytes kept"
            );
            warnings.push(AuditWarning::new(
                "FIELD_NOT_WRITTEN",
                format!(
                    "Value {} for field {} was not written ({:?})",
                    value, span.offset, result
                ),
            ));
        }
    }

    debug!(
        file = %context.file,
        line_number = context.line_number,
        identifier = %record.identifier,
        schedule_code = %schedule_code,
        has_subsidy = subsidy,
        subsidy_days,
        recomputed = recompute,
        "Main record rewritten"
    );

    let outcome = RecordOutcome {
        line_number: context.line_number,
        identifier: record.identifier.to_string(),
        schedule_code,
        has_subsidy: subsidy,
        subsidy_days,
        recomputed: recompute,
        original_pension_contribution: record.pension_contribution,
        pension_contribution: written[0],
        life_expectancy_contribution: written[3],
        unemployment_base_written: written[1],
        audit_steps: steps,
        warnings,
    };

    LineOutcome::Continue(TransformedLine {
        text: output,
        worker_key: Some(record.worker_key.clone()),
        has_subsidy: subsidy,
        record: Some(outcome),
    })
}

fn write_field(
    line: &mut String,
    span: FieldSpan,
    value: i64,
    step_number: u32,
) -> (FieldWrite, AuditStep) {
    let before = span.slice(line).unwrap_or_default().to_string();
    let result = write_numeric_field(line, span, value);
    let after = span.slice(line).unwrap_or_default().to_string();

    let reasoning = match result {
        FieldWrite::Written => format!("'{}' -> '{}'", before, after),
        FieldWrite::SkippedShortLine => "Line ends before the field; left unchanged".to_string(),
        FieldWrite::SkippedValueTooWide => format!(
            "{} needs more than {} characters; '{}' kept",
            value, span.width, before
        ),
    };

    let step = AuditStep {
        step_number,
        rule_id: "field_write".to_string(),
        rule_name: "Field Write".to_string(),
        field_ref: span.offset.to_string(),
        input: serde_json::json!({
            "offset": span.offset,
            "width": span.width,
            "value": value
        }),
        output: serde_json::json!({
            "result": result,
            "before": before,
            "after": after
        }),
        reasoning,
    };
    (result, step)
}
