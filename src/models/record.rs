//! Strongly-typed view of a main payroll record.
//!
//! A [`MainRecord`] is built once per processable main line and never
//! mutated. Malformed numeric sub-fields degrade to zero here, so nothing
//! downstream has to deal with parse failures.

use serde::{Deserialize, Serialize};

use super::identifier::{WorkerIdentifier, worker_key};
use super::layout::{
    FieldSpan, LIFE_EXPECTANCY_CONTRIBUTION, MOVEMENT_CODE, MOVEMENT_FROM, MOVEMENT_TO,
    PENSION_CONTRIBUTION, REGIME_CODE, TAXABLE_INCOME, UNEMPLOYMENT_BASE, WORKER_TYPE,
};

/// The fields of a main record the rewriter reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainRecord {
    /// Raw eleven-character identifier prefix, used for grouping.
    pub worker_key: String,
    /// Normalized identifier, the schedule table join key.
    pub identifier: WorkerIdentifier,
    /// Pension regime code (e.g. `AFP`).
    pub regime_code: String,
    /// Worker type code (`0` for active workers).
    pub worker_type: String,
    /// Personnel movement code.
    pub movement_code: String,
    /// Raw movement start date text.
    pub movement_from: String,
    /// Raw movement end date text.
    pub movement_to: String,
    /// Taxable pension income.
    pub taxable_income: i64,
    /// Pension contribution as reported.
    pub pension_contribution: i64,
    /// Life-expectancy contribution as reported.
    pub life_expectancy_contribution: i64,
    /// Unemployment insurance taxable base.
    pub unemployment_base: i64,
}

impl MainRecord {
    /// Reads the main record fields from a line.
    ///
    /// Returns `None` when the line is shorter than
    /// [`MIN_PROCESSABLE_CHARS`](super::layout::MIN_PROCESSABLE_CHARS).
    pub fn parse(line: &str) -> Option<Self> {
        UNEMPLOYMENT_BASE.slice(line)?;

        Some(Self {
            worker_key: worker_key(line)?.to_string(),
            identifier: WorkerIdentifier::from_line(line)?,
            regime_code: text_field(line, REGIME_CODE),
            worker_type: text_field(line, WORKER_TYPE),
            movement_code: text_field(line, MOVEMENT_CODE),
            movement_from: text_field(line, MOVEMENT_FROM),
            movement_to: text_field(line, MOVEMENT_TO),
            taxable_income: numeric_field(line, TAXABLE_INCOME),
            pension_contribution: numeric_field(line, PENSION_CONTRIBUTION),
            life_expectancy_contribution: numeric_field(line, LIFE_EXPECTANCY_CONTRIBUTION),
            unemployment_base: numeric_field(line, UNEMPLOYMENT_BASE),
        })
    }
}

fn text_field(line: &str, span: FieldSpan) -> String {
    span.slice(line).unwrap_or_default().to_string()
}

/// Reads a signed integer field, treating anything malformed as zero.
///
/// Surrounding whitespace and a leading sign are accepted.
///
/// # Example
///
/// ```
/// use contribution_rewriter::models::{FieldSpan, numeric_field};
///
/// assert_eq!(numeric_field("xx00001234", FieldSpan::new(2, 8)), 1234);
/// assert_eq!(numeric_field("xx  -12   ", FieldSpan::new(2, 8)), -12);
/// assert_eq!(numeric_field("xx12AB3456", FieldSpan::new(2, 8)), 0);
/// ```
pub fn numeric_field(line: &str, span: FieldSpan) -> i64 {
    span.slice(line)
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .unwrap_or(0)
}
