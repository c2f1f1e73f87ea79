// Line-delimited JSON writer — one record object per line.

use std::io::Write;
use std::path::Path;

use crate::errors::RosterError;
use crate::output::{commit_atomically, RecordWriter};
use crate::roster::models::AnnotatedBatch;

pub struct JsonlBatchWriter;

impl RecordWriter for JsonlBatchWriter {
    fn write(&self, batch: &AnnotatedBatch, dest: &Path) -> Result<(), RosterError> {
        let display = dest.display().to_string();

        commit_atomically(dest, |tmp| {
            let file =
                std::fs::File::create(tmp).map_err(|e| RosterError::sink_write(&display, e))?;
            let mut out = std::io::BufWriter::new(file);

            for record in &batch.records {
                let line = serde_json::to_string(record)
                    .map_err(|e| RosterError::sink_write(&display, e))?;
                writeln!(out, "{line}").map_err(|e| RosterError::sink_write(&display, e))?;
            }

            out.flush().map_err(|e| RosterError::sink_write(&display, e))
        })
    }
}
