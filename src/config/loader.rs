//! Run configuration loading.
//!
//! This module provides the [`ConfigLoader`] type for reading a `run.yaml`
//! file and merging it with values supplied on the command line.

use std::fs;
use std::path::Path;

use crate::error::{RewriteError, RewriteResult};

use super::types::{ContributionCeiling, Encoding, PipelineOptions, RunConfig, RunConfigFile};

/// Values supplied by the caller that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Ceiling entered by the operator.
    pub ceiling: Option<ContributionCeiling>,
    /// Declared encoding.
    pub encoding: Option<Encoding>,
    /// Switch off ceiling capping.
    pub disable_ceiling: bool,
    /// Switch off subsidy proration.
    pub disable_proration: bool,
    /// Switch off the regime gate.
    pub disable_regime_gate: bool,
}

/// Loads and resolves run configuration.
///
/// # Example
///
/// ```no_run
/// use contribution_rewriter::config::{ConfigLoader, ConfigOverrides};
///
/// let loader = ConfigLoader::load("./config/run.yaml")?;
/// let config = loader.resolve(&ConfigOverrides::default())?;
/// println!("Ceiling: {}", config.ceiling);
/// # Ok::<(), contribution_rewriter::error::RewriteError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    file: RunConfigFile,
}

impl ConfigLoader {
    /// Loads configuration from a YAML file.
    ///
    /// Returns `ConfigNotFound` when the file cannot be read and
    /// `ConfigParseError` when it is not valid YAML for [`RunConfigFile`].
    pub fn load<P: AsRef<Path>>(path: P) -> RewriteResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| RewriteError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::from_yaml_str(&content).map_err(|message| RewriteError::ConfigParseError {
            path: path_str,
            message,
        })
    }

    /// Parses configuration from YAML text.
    fn from_yaml_str(content: &str) -> Result<Self, String> {
        // An empty file is a valid, empty configuration.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let file = serde_yaml::from_str::<RunConfigFile>(content).map_err(|e| e.to_string())?;
        Ok(Self { file })
    }

    /// Creates a loader with no file values.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Path of the schedule table named in the file, if any.
    pub fn schedule_table(&self) -> Option<&str> {
        self.file.schedule_table.as_deref()
    }

    /// Merges file values with overrides into a validated [`RunConfig`].
    ///
    /// The ceiling must come from one of the two sources; it has no default.
    pub fn resolve(&self, overrides: &ConfigOverrides) -> RewriteResult<RunConfig> {
        let ceiling = self
            .resolve_ceiling(overrides)?
            .ok_or_else(|| RewriteError::InvalidCeiling {
                value: "<missing>".to_string(),
            })?;

        let encoding = overrides
            .encoding
            .or(self.file.encoding)
            .unwrap_or_default();

        Ok(RunConfig::new(ceiling, encoding).with_options(self.resolve_options(overrides)))
    }

    /// Merges file switches with overrides. A switch is on only when the
    /// file leaves it on and no override turns it off.
    pub fn resolve_options(&self, overrides: &ConfigOverrides) -> PipelineOptions {
        let file_options = self.file.options;
        PipelineOptions {
            apply_ceiling: file_options.apply_ceiling && !overrides.disable_ceiling,
            apply_subsidy_proration: file_options.apply_subsidy_proration
                && !overrides.disable_proration,
            gate_by_regime: file_options.gate_by_regime && !overrides.disable_regime_gate,
        }
    }

    /// The ceiling from the overrides or the file, if either has one.
    pub fn resolve_ceiling(
        &self,
        overrides: &ConfigOverrides,
    ) -> RewriteResult<Option<ContributionCeiling>> {
        match overrides.ceiling {
            Some(ceiling) => Ok(Some(ceiling)),
            None => self.file.ceiling.map(ContributionCeiling::new).transpose(),
        }
    }
}
