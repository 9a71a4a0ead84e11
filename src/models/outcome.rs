//! Results of a rewrite run.
//!
//! This module contains the [`BatchResult`] type and the per-record and
//! per-worker structures that describe what a run changed. None of these
//! feed back into the transformation; they exist for reporting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::audit::{AuditStep, AuditWarning};
use super::schedule::ScheduleCode;
use super::source::SourceLine;

/// What happened to one main record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordOutcome {
    /// 1-based line number within its file.
    pub line_number: usize,
    /// Normalized worker identifier.
    pub identifier: String,
    /// Schedule code written to field 748.
    pub schedule_code: ScheduleCode,
    /// Whether the movement code marks a subsidy.
    pub has_subsidy: bool,
    /// Inclusive subsidy day count (0 without a usable period).
    pub subsidy_days: i64,
    /// Whether the pension and life-expectancy fields were recomputed.
    pub recomputed: bool,
    /// Pension contribution as read from the input.
    pub original_pension_contribution: i64,
    /// Pension contribution written, when recomputed.
    pub pension_contribution: Option<i64>,
    /// Life-expectancy contribution written, when recomputed.
    pub life_expectancy_contribution: Option<i64>,
    /// Value written to field 740, when it was written.
    pub unemployment_base_written: Option<i64>,
    /// The calculation steps for this record.
    pub audit_steps: Vec<AuditStep>,
    /// Recovered anomalies for this record.
    pub warnings: Vec<AuditWarning>,
}

/// The rewritten form of one input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewrittenFile {
    /// The input file name.
    pub name: String,
    /// Output lines, one per input line, in input order.
    pub lines: Vec<SourceLine>,
    /// One entry per rewritten main record.
    pub records: Vec<RecordOutcome>,
}

/// One processable line seen for a worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupEntry {
    /// The file containing the line.
    pub file: String,
    /// 1-based line number.
    pub line_number: usize,
    /// Whether the line is the worker's main record.
    pub is_main: bool,
    /// Whether the line carries a subsidy movement code.
    pub has_subsidy: bool,
}

/// All processable lines sharing a raw identifier prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerGroup {
    /// The raw eleven-character identifier prefix.
    pub worker_key: String,
    /// Lines in first-seen order across the batch.
    pub entries: Vec<GroupEntry>,
}

impl WorkerGroup {
    /// Returns true when any line of the worker carries a subsidy code.
    pub fn has_subsidy(&self) -> bool {
        self.entries.iter().any(|entry| entry.has_subsidy)
    }

    /// Number of main records for the worker.
    pub fn main_records(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_main).count()
    }
}

/// Aggregated counts for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Distinct workers seen across all files.
    pub workers: usize,
    /// Workers with at least one subsidy line.
    pub workers_with_subsidy: usize,
    /// Main records rewritten.
    pub main_records_rewritten: usize,
    /// Files processed.
    pub files: usize,
}

impl BatchSummary {
    /// Derives the summary from the worker groups and file count.
    pub fn from_groups(groups: &[WorkerGroup], files: usize) -> Self {
        Self {
            workers: groups.len(),
            workers_with_subsidy: groups.iter().filter(|g| g.has_subsidy()).count(),
            main_records_rewritten: groups.iter().map(WorkerGroup::main_records).sum(),
            files,
        }
    }
}

/// The complete result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    /// Unique identifier for this run.
    pub run_id: Uuid,
    /// When the run completed.
    pub timestamp: DateTime<Utc>,
    /// The version of the rewriter that produced the output.
    pub engine_version: String,
    /// Rewritten files in input order.
    pub files: Vec<RewrittenFile>,
    /// Worker groups in first-seen order.
    pub groups: Vec<WorkerGroup>,
    /// Aggregated counts.
    pub summary: BatchSummary,
}
