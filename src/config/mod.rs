//! Configuration loading and management for the contribution rewriter.
//!
//! This module resolves the immutable [`RunConfig`] for a run, from a YAML
//! file plus command-line overrides, and loads the schedule reference table.
//!
//! # Example
//!
//! ```no_run
//! use contribution_rewriter::config::{ConfigLoader, ConfigOverrides, load_schedule_table};
//!
//! let config = ConfigLoader::load("./config/run.yaml")?.resolve(&ConfigOverrides::default())?;
//! let schedule = load_schedule_table("./jornadas/jornadasTrabajadores.csv")?;
//! println!("Ceiling {} for {} workers", config.ceiling, schedule.len());
//! # Ok::<(), contribution_rewriter::error::RewriteError>(())
//! ```

mod loader;
mod schedule_loader;
mod types;

pub use loader::{ConfigLoader, ConfigOverrides};
pub use schedule_loader::{load_schedule_table, read_schedule_table};
pub use types::{ContributionCeiling, Encoding, PipelineOptions, RunConfig, RunConfigFile};
