// Tabular input — the reader seam and the CSV implementation.
//
// The pipeline never touches a file format directly; it consumes ordered
// `RawRow`s from whatever `TableReader` the caller injects.

pub mod csv;

use std::path::Path;

use crate::errors::RosterError;

/// One row from a roster sheet, untyped. Typing (gender parsing, date
/// parsing) happens at the pipeline's ingest boundary.
#[derive(Debug, Clone)]
pub struct RawRow {
    pub student_id: String,
    pub name: String,
    pub gender: String,
    pub date_of_birth: Option<String>,
}

/// Reads ordered rows out of a tabular source.
pub trait TableReader {
    fn read(&self, source: &Path) -> Result<Vec<RawRow>, RosterError>;
}

/// Read several sources in the given order and concatenate their rows.
/// Row order is the assignment order, so source order matters: the first
/// sheet's collisions win the bare addresses.
pub fn read_all(reader: &dyn TableReader, sources: &[impl AsRef<Path>]) -> Result<Vec<RawRow>, RosterError> {
    let mut rows = Vec::new();
    for source in sources {
        rows.extend(reader.read(source.as_ref())?);
    }
    Ok(rows)
}
