//! Application state for the contribution rewriter API.

use std::sync::Arc;

use crate::config::{ContributionCeiling, PipelineOptions};
use crate::models::ScheduleTable;

/// Shared application state.
///
/// The schedule table is loaded once at startup and shared read-only by
/// every request. The ceiling may be left unset, in which case each request
/// must carry its own.
#[derive(Clone)]
pub struct AppState {
    schedule: Arc<ScheduleTable>,
    default_ceiling: Option<ContributionCeiling>,
    options: PipelineOptions,
}

impl AppState {
    /// Creates application state around a loaded schedule table.
    pub fn new(schedule: ScheduleTable) -> Self {
        Self {
            schedule: Arc::new(schedule),
            default_ceiling: None,
            options: PipelineOptions::default(),
        }
    }

    /// Sets the ceiling used when a request does not supply one.
    pub fn with_default_ceiling(mut self, ceiling: Option<ContributionCeiling>) -> Self {
        self.default_ceiling = ceiling;
        self
    }

    /// Sets the pipeline switches applied to every request.
    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// The schedule table.
    pub fn schedule(&self) -> &ScheduleTable {
        &self.schedule
    }

    /// The ceiling used when a request does not supply one.
    pub fn default_ceiling(&self) -> Option<ContributionCeiling> {
        self.default_ceiling
    }

    /// The pipeline switches.
    pub fn options(&self) -> PipelineOptions {
        self.options
    }
}
