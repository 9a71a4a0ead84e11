//! Core data models for the contribution rewriter.
//!
//! This module contains the record layout, the strongly-typed record view,
//! the schedule reference data and the result types of a run.

mod audit;
mod identifier;
pub mod layout;
mod outcome;
mod record;
mod schedule;
mod source;

pub use audit::{AuditStep, AuditWarning};
pub use identifier::{WorkerIdentifier, worker_key};
pub use layout::FieldSpan;
pub use outcome::{
    BatchResult, BatchSummary, GroupEntry, RecordOutcome, RewrittenFile, WorkerGroup,
};
pub use record::{MainRecord, numeric_field};
pub use schedule::{ScheduleCode, ScheduleTable};
pub use source::{LineTerminator, SourceFile, SourceLine};
