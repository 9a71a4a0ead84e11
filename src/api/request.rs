//! Request types for the contribution rewriter API.
//!
//! This module defines the JSON request structures for the `/rewrite` endpoint.

use serde::{Deserialize, Serialize};

use crate::models::{SourceFile, SourceLine};

/// Request body for the `/rewrite` endpoint.
///
/// # Example
///
/// ```
/// use contribution_rewriter::api::RewriteRequest;
///
/// let request: RewriteRequest = serde_json::from_str(
///     r#"{"ceiling": 2460000, "files": [{"name": "a.txt", "lines": ["x"]}]}"#,
/// ).unwrap();
/// assert_eq!(request.ceiling, Some(2_460_000));
/// assert_eq!(request.files[0].lines, vec!["x"]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriteRequest {
    /// The month's contribution ceiling; the server default when absent.
    #[serde(default)]
    pub ceiling: Option<i64>,
    /// The files to rewrite as one batch.
    pub files: Vec<FileRequest>,
}

/// One input file in a rewrite request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRequest {
    /// File name, echoed in the response and in error context.
    pub name: String,
    /// Decoded lines, without terminators.
    pub lines: Vec<String>,
}

impl From<FileRequest> for SourceFile {
    fn from(req: FileRequest) -> Self {
        SourceFile::new(
            req.name,
            req.lines.into_iter().map(SourceLine::from).collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ceiling_is_optional() {
        let request: RewriteRequest =
            serde_json::from_str(r#"{"files": []}"#).unwrap();
        assert_eq!(request.ceiling, None);
        assert!(request.files.is_empty());
    }

    #[test]
    fn test_files_are_required() {
        let result = serde_json::from_str::<RewriteRequest>(r#"{"ceiling": 1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_file_request_converts_to_source_file() {
        let file: SourceFile = FileRequest {
            name: "a.txt".to_string(),
            lines: vec!["one".to_string(), "two".to_string()],
        }
        .into();
        assert_eq!(file.name, "a.txt");
        assert_eq!(file.lines.len(), 2);
        assert_eq!(file.lines[1].text, "two");
    }
}
