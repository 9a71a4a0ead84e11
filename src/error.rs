//! Error types for the contribution rewriter.
//!
//! This module provides strongly-typed errors using the `thiserror` crate.
//! Only conditions that stop a run are errors: malformed numeric or date
//! sub-fields and short lines are recovered where they are detected and
//! never reach this type.

use thiserror::Error;

/// The main error type for the contribution rewriter.
///
/// # Example
///
/// ```
/// use contribution_rewriter::error::RewriteError;
///
/// let error = RewriteError::UnmappedWorker {
///     identifier: "12345678-9".to_string(),
///     file: "remuneraciones.txt".to_string(),
///     line_number: 4,
/// };
/// assert_eq!(
///     error.to_string(),
///     "Worker '12345678-9' has no schedule entry (file remuneraciones.txt, line 4)"
/// );
/// ```
#[derive(Debug, Error)]
pub enum RewriteError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The schedule reference table could not be opened or read.
    #[error("Schedule table not readable at '{path}': {message}")]
    ScheduleTableNotFound {
        /// The path of the schedule table.
        path: String,
        /// A description of the underlying failure.
        message: String,
    },

    /// The contribution ceiling was not a positive integer.
    #[error("Invalid contribution ceiling '{value}': must be a positive integer")]
    InvalidCeiling {
        /// The rejected value as supplied.
        value: String,
    },

    /// A line could not be decoded with the declared encoding.
    #[error("Line {line_number} of '{file}' is not valid {encoding}")]
    Decode {
        /// The file containing the line.
        file: String,
        /// The 1-based line number.
        line_number: usize,
        /// The declared encoding name.
        encoding: String,
    },

    /// An I/O failure while reading inputs or writing outputs.
    #[error("I/O error on '{path}': {source}")]
    Io {
        /// The path being read or written.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A main record's worker has no entry in the schedule table.
    ///
    /// This aborts the whole batch: no output is produced for any file.
    #[error("Worker '{identifier}' has no schedule entry (file {file}, line {line_number})")]
    UnmappedWorker {
        /// The normalized worker identifier that was looked up.
        identifier: String,
        /// The file containing the record.
        file: String,
        /// The 1-based line number of the record.
        line_number: usize,
    },
}

/// A type alias for Results that return RewriteError.
pub type RewriteResult<T> = Result<T, RewriteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = RewriteError::ConfigNotFound {
            path: "/missing/run.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/run.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = RewriteError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_invalid_ceiling_displays_value() {
        let error = RewriteError::InvalidCeiling {
            value: "-5".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid contribution ceiling '-5': must be a positive integer"
        );
    }

    #[test]
    fn test_unmapped_worker_displays_full_context() {
        let error = RewriteError::UnmappedWorker {
            identifier: "7654321-K".to_string(),
            file: "planilla.TXT".to_string(),
            line_number: 12,
        };
        let message = error.to_string();
        assert!(message.contains("7654321-K"));
        assert!(message.contains("planilla.TXT"));
        assert!(message.contains("line 12"));
    }

    #[test]
    fn test_decode_displays_encoding() {
        let error = RewriteError::Decode {
            file: "a.txt".to_string(),
            line_number: 3,
            encoding: "utf-8".to_string(),
        };
        assert_eq!(error.to_string(), "Line 3 of 'a.txt' is not valid utf-8");
    }

    #[test]
    fn test_io_error_exposes_source() {
        use std::error::Error as _;

        let error = RewriteError::Io {
            path: "out/a.txt".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(error.source().is_some());
        assert!(error.to_string().contains("out/a.txt"));
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<RewriteError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_invalid_ceiling() -> RewriteResult<()> {
            Err(RewriteError::InvalidCeiling {
                value: "0".to_string(),
            })
        }

        fn propagates_error() -> RewriteResult<()> {
            returns_invalid_ceiling()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
