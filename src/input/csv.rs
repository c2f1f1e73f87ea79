// CSV roster reader.
//
// Header-mapped rather than positional: columns may appear in any order,
// and common header spellings are accepted. A sheet without a name column
// is unreadable; every other column is optional per row.

use std::path::Path;

use tracing::debug;

use crate::errors::RosterError;
use crate::input::{RawRow, TableReader};

const ID_HEADERS: &[&str] = &["student id", "id"];
const NAME_HEADERS: &[&str] = &["student name", "name"];
const GENDER_HEADERS: &[&str] = &["gender", "sex"];
const DOB_HEADERS: &[&str] = &["date of birth", "dob", "birth date"];

pub struct CsvTableReader;

impl CsvTableReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvTableReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Index of the first header matching one of the accepted spellings,
/// compared trimmed and case-insensitively.
fn find_column(headers: &csv::StringRecord, accepted: &[&str]) -> Option<usize> {
    headers.iter().position(|h| {
        let h = h.trim();
        accepted.iter().any(|a| h.eq_ignore_ascii_case(a))
    })
}

impl TableReader for CsvTableReader {
    fn read(&self, source: &Path) -> Result<Vec<RawRow>, RosterError> {
        let source_display = source.display().to_string();

        let mut reader = csv::Reader::from_path(source)
            .map_err(|e| RosterError::source_read(&source_display, e))?;

        let headers = reader
            .headers()
            .map_err(|e| RosterError::source_read(&source_display, e))?
            .clone();

        let name_col = find_column(&headers, NAME_HEADERS).ok_or_else(|| {
            RosterError::source_read(&source_display, "no student-name column in header row")
        })?;
        let id_col = find_column(&headers, ID_HEADERS);
        let gender_col = find_column(&headers, GENDER_HEADERS);
        let dob_col = find_column(&headers, DOB_HEADERS);

        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record.map_err(|e| RosterError::source_read(&source_display, e))?;

            let field = |col: Option<usize>| {
                col.and_then(|c| record.get(c))
                    .map(str::trim)
                    .unwrap_or_default()
                    .to_string()
            };

            let dob = field(dob_col);
            rows.push(RawRow {
                // Fall back to a positional id when the sheet has none.
                student_id: match field(id_col) {
                    id if id.is_empty() => format!("row-{}", index + 1),
                    id => id,
                },
                name: field(Some(name_col)),
                gender: field(gender_col),
                date_of_birth: if dob.is_empty() { None } else { Some(dob) },
            });
        }

        debug!(source = %source_display, rows = rows.len(), "read roster sheet");
        Ok(rows)
    }
}
