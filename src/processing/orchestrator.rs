//! Batch orchestration.
//!
//! A [`BatchRewriter`] walks every line of every file in order, feeding
//! each through [`rewrite_line`]. The first fatal line ends the run with an
//! error and discards everything produced so far; otherwise the complete
//! [`BatchResult`] is returned for the caller to write out.

use std::collections::HashMap;

use chrono::Utc;
use tracing::{error, info};
use uuid::Uuid;

use crate::config::RunConfig;
use crate::error::{RewriteError, RewriteResult};
use crate::models::{
    BatchResult, BatchSummary, GroupEntry, RewrittenFile, ScheduleTable, SourceFile, SourceLine,
    WorkerGroup,
};

use super::record_rewrite::{FatalReason, LineContext, LineOutcome, rewrite_line};

/// Rewrites batches of files against one configuration and schedule table.
///
/// # Example
///
/// ```
/// use contribution_rewriter::config::{ContributionCeiling, Encoding, RunConfig};
/// use contribution_rewriter::models::{ScheduleTable, SourceFile, SourceLine};
/// use contribution_rewriter::processing::BatchRewriter;
///
/// let config = RunConfig::new(ContributionCeiling::new(2_460_000)?, Encoding::Utf8);
/// let schedule = ScheduleTable::new();
/// let rewriter = BatchRewriter::new(&config, &schedule);
///
/// let file = SourceFile::new("header.txt", vec![SourceLine::from("too short to process")]);
/// let result = rewriter.process_batch(vec![file])?;
/// assert_eq!(result.files[0].lines[0].text, "too short to process");
/// # Ok::<(), contribution_rewriter::error::RewriteError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BatchRewriter<'a> {
    config: &'a RunConfig,
    schedule: &'a ScheduleTable,
}

impl<'a> BatchRewriter<'a> {
    /// Creates a rewriter over read-only run inputs.
    pub fn new(config: &'a RunConfig, schedule: &'a ScheduleTable) -> Self {
        Self { config, schedule }
    }

    /// Rewrites every file, in order.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::UnmappedWorker`] for the first main record
    /// whose worker has no schedule entry. No partial result is returned.
    pub fn process_batch(&self, files: Vec<SourceFile>) -> RewriteResult<BatchResult> {
        let mut groups = GroupAccumulator::default();
        let mut rewritten = Vec::with_capacity(files.len());

        for file in &files {
            rewritten.push(self.process_file(file, &mut groups)?);
        }

        let groups = groups.into_groups();
        let summary = BatchSummary::from_groups(&groups, rewritten.len());

        info!(
            files = summary.files,
            workers = summary.workers,
            workers_with_subsidy = summary.workers_with_subsidy,
            main_records_rewritten = summary.main_records_rewritten,
            "Batch rewritten"
        );

        Ok(BatchResult {
            run_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            files: rewritten,
            groups,
            summary,
        })
    }

    fn process_file(
        &self,
        file: &SourceFile,
        groups: &mut GroupAccumulator,
    ) -> RewriteResult<RewrittenFile> {
        let mut lines = Vec::with_capacity(file.lines.len());
        let mut records = Vec::new();

        for (index, source) in file.lines.iter().enumerate() {
            let context = LineContext {
                file: file.name.clone(),
                line_number: index + 1,
            };

            match rewrite_line(&source.text, context, self.config, self.schedule) {
                LineOutcome::Continue(line) => {
                    if let Some(key) = line.worker_key {
                        groups.record(
                            key,
                            GroupEntry {
                                file: file.name.clone(),
                                line_number: index + 1,
                                is_main: line.record.is_some(),
                                has_subsidy: line.has_subsidy,
                            },
                        );
                    }
                    records.extend(line.record);
                    lines.push(SourceLine::new(line.text, source.terminator));
                }
                LineOutcome::Fatal(FatalReason::UnmappedWorker(unmapped), context) => {
                    error!(
                        identifier = %unmapped.identifier,
                        file = %context.file,
                        line_number = context.line_number,
                        "Worker has no schedule entry; run aborted, no output written"
                    );
                    return Err(RewriteError::UnmappedWorker {
                        identifier: unmapped.identifier.to_string(),
                        file: context.file,
                        line_number: context.line_number,
                    });
                }
            }
        }

        info!(
            file = %file.name,
            lines = lines.len(),
            main_records = records.len(),
            "File rewritten"
        );

        Ok(RewrittenFile {
            name: file.name.clone(),
            lines,
            records,
        })
    }
}

/// Worker groups in first-seen order.
#[derive(Debug, Default)]
struct GroupAccumulator {
    groups: Vec<WorkerGroup>,
    index: HashMap<String, usize>,
}

impl GroupAccumulator {
    fn record(&mut self, worker_key: String, entry: GroupEntry) {
        match self.index.get(&worker_key) {
            Some(&position) => self.groups[position].entries.push(entry),
            None => {
                self.index.insert(worker_key.clone(), self.groups.len());
                self.groups.push(WorkerGroup {
                    worker_key,
                    entries: vec![entry],
                });
            }
        }
    }

    fn into_groups(self) -> Vec<WorkerGroup> {
        self.groups
    }
}
