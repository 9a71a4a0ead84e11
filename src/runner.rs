//! File-level driver.
//!
//! Reads a list of input files, rewrites them as one batch and, only when
//! the whole batch succeeded, writes each rewritten file under the same
//! name into an output directory.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::{Encoding, RunConfig};
use crate::encoding::{decode_lines, encode_lines};
use crate::error::{RewriteError, RewriteResult};
use crate::models::{BatchResult, ScheduleTable, SourceFile};
use crate::processing::BatchRewriter;

/// Reads and decodes one input file.
///
/// The file name (without directories) becomes the [`SourceFile`] name.
pub fn read_source_file(path: &Path, encoding: Encoding) -> RewriteResult<SourceFile> {
    let bytes = fs::read(path).map_err(|source| RewriteError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let lines = decode_lines(&bytes, encoding, &name)?;
    Ok(SourceFile::new(name, lines))
}

/// Rewrites `paths` and writes the results into `output_dir`.
///
/// Nothing is written unless every file was rewritten; an unmapped worker
/// anywhere in the batch leaves the output directory untouched.
///
/// # Example
///
/// ```no_run
/// use std::path::{Path, PathBuf};
///
/// use contribution_rewriter::config::{ContributionCeiling, Encoding, RunConfig};
/// use contribution_rewriter::config::load_schedule_table;
/// use contribution_rewriter::runner::run_files;
///
/// let config = RunConfig::new(ContributionCeiling::new(2_460_000)?, Encoding::Latin1);
/// let schedule = load_schedule_table("jornadas/jornadasTrabajadores.csv")?;
/// let inputs = vec![PathBuf::from("remuneraciones.txt")];
///
/// let result = run_files(&inputs, &config, &schedule, Path::new("salida"))?;
/// println!("{} workers", result.summary.workers);
/// # Ok::<(), contribution_rewriter::error::RewriteError>(())
/// ```
pub fn run_files(
    paths: &[PathBuf],
    config: &RunConfig,
    schedule: &ScheduleTable,
    output_dir: &Path,
) -> RewriteResult<BatchResult> {
    let files = paths
        .iter()
        .map(|path| read_source_file(path, config.encoding))
        .collect::<RewriteResult<Vec<_>>>()?;

    let result = BatchRewriter::new(config, schedule).process_batch(files)?;

    fs::create_dir_all(output_dir).map_err(|source| RewriteError::Io {
        path: output_dir.display().to_string(),
        source,
    })?;

    for file in &result.files {
        let target = output_dir.join(&file.name);
        fs::write(&target, encode_lines(&file.lines, config.encoding)).map_err(|source| {
            RewriteError::Io {
                path: target.display().to_string(),
                source,
            }
        })?;
        info!(path = %target.display(), lines = file.lines.len(), "Output written");
    }

    Ok(result)
}
