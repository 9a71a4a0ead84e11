//! Configuration types for a rewrite run.
//!
//! This module contains the immutable [`RunConfig`] handed to the
//! orchestrator and the [`RunConfigFile`] structure deserialized from YAML.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RewriteError, RewriteResult};

/// The month's taxable income cap for contribution calculations.
///
/// Always strictly positive.
///
/// # Example
///
/// ```
/// use contribution_rewriter::config::ContributionCeiling;
///
/// let ceiling = ContributionCeiling::new(2_460_000).unwrap();
/// assert_eq!(ceiling.value(), 2_460_000);
/// assert!(ContributionCeiling::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct ContributionCeiling(i64);

impl ContributionCeiling {
    /// Creates a ceiling, rejecting zero and negative values.
    pub fn new(value: i64) -> RewriteResult<Self> {
        if value <= 0 {
            return Err(RewriteError::InvalidCeiling {
                value: value.to_string(),
            });
        }
        Ok(Self(value))
    }

    /// The ceiling amount.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for ContributionCeiling {
    type Error = RewriteError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ContributionCeiling> for i64 {
    fn from(ceiling: ContributionCeiling) -> Self {
        ceiling.0
    }
}

impl FromStr for ContributionCeiling {
    type Err = RewriteError;

    /// Parses an operator-entered amount. Thousands separators (`,` and `.`)
    /// are ignored, so `2.460.000` and `2,460,000` both read as 2460000.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits: String = s.trim().chars().filter(|c| *c != ',' && *c != '.').collect();
        let value = digits
            .parse::<i64>()
            .map_err(|_| RewriteError::InvalidCeiling {
                value: s.to_string(),
            })?;
        Self::new(value).map_err(|_| RewriteError::InvalidCeiling {
            value: s.to_string(),
        })
    }
}

impl fmt::Display for ContributionCeiling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Declared byte encoding of input files. Output uses the same encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Encoding {
    /// UTF-8, decoded strictly.
    #[default]
    #[serde(rename = "utf-8", alias = "utf8")]
    Utf8,
    /// ISO-8859-1; every byte is one character.
    #[serde(rename = "latin-1", alias = "latin1", alias = "iso-8859-1")]
    Latin1,
}

impl Encoding {
    /// The canonical encoding name.
    pub fn name(&self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf-8",
            Encoding::Latin1 => "latin-1",
        }
    }
}

impl FromStr for Encoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(Encoding::Utf8),
            "latin-1" | "latin1" | "iso-8859-1" => Ok(Encoding::Latin1),
            other => Err(format!("unsupported encoding: {}", other)),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Independent switches for the parts of the pipeline that differ between
/// deployments.
///
/// All default to `true`, the ceiling-aware, prorating, regime-gated
/// behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    /// Cap income and bases at the contribution ceiling.
    pub apply_ceiling: bool,
    /// Prorate the unemployment base by subsidy days.
    pub apply_subsidy_proration: bool,
    /// Only recompute contributions for active AFP-regime workers.
    pub gate_by_regime: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            apply_ceiling: true,
            apply_subsidy_proration: true,
            gate_by_regime: true,
        }
    }
}

/// The immutable configuration of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// The month's contribution ceiling.
    pub ceiling: ContributionCeiling,
    /// Declared input/output encoding.
    pub encoding: Encoding,
    /// Pipeline switches.
    pub options: PipelineOptions,
}

impl RunConfig {
    /// Creates a run configuration with default options.
    pub fn new(ceiling: ContributionCeiling, encoding: Encoding) -> Self {
        Self {
            ceiling,
            encoding,
            options: PipelineOptions::default(),
        }
    }

    /// Replaces the pipeline options.
    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// The ceiling to apply, or `None` when capping is switched off.
    pub fn effective_ceiling(&self) -> Option<i64> {
        self.options
            .apply_ceiling
            .then(|| self.ceiling.value())
    }
}

/// Run configuration file structure (`run.yaml`).
///
/// Every value may be absent; command-line values fill or override them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RunConfigFile {
    /// The month's contribution ceiling.
    #[serde(default)]
    pub ceiling: Option<i64>,
    /// Declared input/output encoding.
    #[serde(default)]
    pub encoding: Option<Encoding>,
    /// Path of the schedule reference table.
    #[serde(default)]
    pub schedule_table: Option<String>,
    /// Pipeline switches.
    #[serde(default)]
    pub options: PipelineOptions,
}
