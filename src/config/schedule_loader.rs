//! Schedule reference table loading.
//!
//! The table is a semicolon-delimited `identifier;scheduleCode` file with an
//! optional header row. Rows that cannot be read are skipped with a warning;
//! a missing file is an error, since every worker must be mapped.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ByteRecord, ReaderBuilder, Trim};
use tracing::{info, warn};

use crate::error::{RewriteError, RewriteResult};
use crate::models::{ScheduleCode, ScheduleTable};

/// Loads the schedule table from a file.
///
/// # Example
///
/// ```no_run
/// use contribution_rewriter::config::load_schedule_table;
///
/// let table = load_schedule_table("jornadas/jornadasTrabajadores.csv")?;
/// println!("{} workers mapped", table.len());
/// # Ok::<(), contribution_rewriter::error::RewriteError>(())
/// ```
pub fn load_schedule_table<P: AsRef<Path>>(path: P) -> RewriteResult<ScheduleTable> {
    let path = path.as_ref();
    let path_str = path.display().to_string();

    let file = File::open(path).map_err(|e| RewriteError::ScheduleTableNotFound {
        path: path_str.clone(),
        message: e.to_string(),
    })?;

    let table = read_schedule_table(file).map_err(|e| RewriteError::ScheduleTableNotFound {
        path: path_str.clone(),
        message: e.to_string(),
    })?;

    info!(path = %path_str, workers = table.len(), "Schedule table loaded");
    Ok(table)
}

/// Reads a schedule table from any reader.
///
/// The first row is treated as a header when it mentions `rut`
/// (case-insensitive). Later rows for the same identifier replace earlier
/// ones.
///
/// # Example
///
/// ```
/// use contribution_rewriter::config::read_schedule_table;
/// use contribution_rewriter::models::{ScheduleCode, WorkerIdentifier};
///
/// let data = "rut;jornada\n12345678-9;1\n7654321-K;2\n";
/// let table = read_schedule_table(data.as_bytes()).unwrap();
///
/// assert_eq!(table.len(), 2);
/// assert_eq!(
///     table.get(&WorkerIdentifier::new("7654321", 'K')),
///     Some(ScheduleCode::PART_TIME)
/// );
/// ```
pub fn read_schedule_table<R: Read>(reader: R) -> Result<ScheduleTable, csv::Error> {
    let mut csv_reader = ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut table = ScheduleTable::new();
    let mut record = ByteRecord::new();
    let mut first = true;

    while csv_reader.read_byte_record(&mut record)? {
        let row = record.position().map(|p| p.line()).unwrap_or_default();

        if std::mem::take(&mut first) && is_header(&record) {
            continue;
        }

        if record.iter().all(<[u8]>::is_empty) {
            continue;
        }

        match parse_row(&record) {
            Some((identifier, code)) => {
                if !code.is_known() {
                    warn!(
                        row,
                        identifier = %identifier,
                        code = code.0,
                        "Schedule code is neither 1 nor 2; it will be written as-is"
                    );
                }
                table.insert(identifier, code);
            }
            None => {
                warn!(
                    row,
                    content = %String::from_utf8_lossy(record.as_slice()),
                    "Skipping unreadable schedule table row"
                );
            }
        }
    }

    Ok(table)
}

fn is_header(record: &ByteRecord) -> bool {
    record
        .iter()
        .any(|field| String::from_utf8_lossy(field).to_lowercase().contains("rut"))
}

fn parse_row(record: &ByteRecord) -> Option<(String, ScheduleCode)> {
    if record.len() != 2 {
        return None;
    }
    let identifier = std::str::from_utf8(record.get(0)?).ok()?;
    let code = std::str::from_utf8(record.get(1)?).ok()?.parse::<i64>().ok()?;
    if identifier.is_empty() {
        return None;
    }
    Some((identifier.to_string(), ScheduleCode(code)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WorkerIdentifier;
    use std::io::Write;

    fn id(digits: &str, check: char) -> WorkerIdentifier {
        WorkerIdentifier::new(digits, check)
    }

    #[test]
    fn test_reads_rows_without_header() {
        let table = read_schedule_table("1-9;1\n2-7;2\n".as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(&id("1", '9')), Some(ScheduleCode::FULL_TIME));
        assert_eq!(table.get(&id("2", '7')), Some(ScheduleCode::PART_TIME));
    }

    #[test]
    fn test_skips_header_mentioning_rut() {
        let table = read_schedule_table("RUT;Jornada\n1-9;1\n".as_bytes()).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_header_check_only_applies_to_first_row() {
        let table = read_schedule_table("1-9;1\nrut;2\n".as_bytes()).unwrap();
        // "rut;2" is a well-formed row, just with an odd identifier.
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_trims_values_and_skips_blank_lines() {
        let table = read_schedule_table("  1-9 ; 2 \n\n\n3-5;1\n".as_bytes()).unwrap();
        assert_eq!(table.get(&id("1", '9')), Some(ScheduleCode::PART_TIME));
        assert_eq!(table.get(&id("3", '5')), Some(ScheduleCode::FULL_TIME));
    }

    #[test]
    fn test_skips_malformed_rows() {
        let data = "1-9;1\nno-code\n2-7;x\n3-5;1;extra\n4-4;2\n";
        let table = read_schedule_table(data.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(&id("2", '7')), None);
        assert_eq!(table.get(&id("3", '5')), None);
        assert_eq!(table.get(&id("4", '4')), Some(ScheduleCode::PART_TIME));
    }

    #[test]
    fn test_unknown_codes_are_kept_verbatim() {
        let table = read_schedule_table("1-9;3\n".as_bytes()).unwrap();
        assert_eq!(table.get(&id("1", '9')), Some(ScheduleCode(3)));
    }

    #[test]
    fn test_duplicate_identifier_last_wins() {
        let table = read_schedule_table("1-9;1\n1-9;2\n".as_bytes()).unwrap();
        assert_eq!(table.get(&id("1", '9')), Some(ScheduleCode::PART_TIME));
    }

    #[test]
    fn test_crlf_line_endings() {
        let table = read_schedule_table("rut;jornada\r\n1-9;2\r\n".as_bytes()).unwrap();
        assert_eq!(table.get(&id("1", '9')), Some(ScheduleCode::PART_TIME));
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let result = load_schedule_table("/nonexistent/jornadas.csv");
        assert!(matches!(
            result,
            Err(RewriteError::ScheduleTableNotFound { .. })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "rut;jornada\n12345678-9;1\n").unwrap();
        let table = load_schedule_table(file.path()).unwrap();
        assert_eq!(
            table.get(&id("12345678", '9')),
            Some(ScheduleCode::FULL_TIME)
        );
    }
}
