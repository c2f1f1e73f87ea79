// Output writers — tabular, line-delimited, and plain-text renditions of
// the annotated batch, plus terminal display.

pub mod csv;
pub mod jsonl;
pub mod terminal;
pub mod text;

use std::path::{Path, PathBuf};

use crate::errors::RosterError;
use crate::roster::models::AnnotatedBatch;

/// Persists an annotated batch to a destination path.
pub trait RecordWriter {
    fn write(&self, batch: &AnnotatedBatch, dest: &Path) -> Result<(), RosterError>;
}

/// Run `write_to` against a temp sibling of `dest`, then rename into place.
/// An aborted or failed run never leaves a partial artifact at `dest`.
pub(crate) fn commit_atomically<F>(dest: &Path, write_to: F) -> Result<(), RosterError>
where
    F: FnOnce(&Path) -> Result<(), RosterError>,
{
    let mut tmp_name = dest
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "out".into());
    tmp_name.push(".tmp");
    let tmp: PathBuf = dest.with_file_name(tmp_name);

    let result = write_to(&tmp);
    if result.is_err() {
        let _ = std::fs::remove_file(&tmp);
        return result;
    }

    std::fs::rename(&tmp, dest)
        .map_err(|e| RosterError::sink_write(dest.display().to_string(), e))
}
