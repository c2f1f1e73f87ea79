// Plain-text list writer — `Display Name <address>` per line, the format
// handed to registrars who just want a mailing list.

use std::io::Write;
use std::path::Path;

use crate::errors::RosterError;
use crate::output::{commit_atomically, RecordWriter};
use crate::roster::models::AnnotatedBatch;

pub struct TextListWriter;

impl RecordWriter for TextListWriter {
    fn write(&self, batch: &AnnotatedBatch, dest: &Path) -> Result<(), RosterError> {
        let display = dest.display().to_string();

        commit_atomically(dest, |tmp| {
            let file =
                std::fs::File::create(tmp).map_err(|e| RosterError::sink_write(&display, e))?;
            let mut out = std::io::BufWriter::new(file);

            for record in &batch.records {
                let line = match record.email.as_deref() {
                    Some(email) => format!("{} <{}>", record.name, email),
                    None => record.name.clone(),
                };
                writeln!(out, "{line}").map_err(|e| RosterError::sink_write(&display, e))?;
            }

            out.flush().map_err(|e| RosterError::sink_write(&display, e))
        })
    }
}

/// Write a bare list of names, one per line (gender partitions, the
/// special-character screen).
pub fn write_name_list(names: &[String], dest: &Path) -> Result<(), RosterError> {
    let display = dest.display().to_string();

    commit_atomically(dest, |tmp| {
        let joined = names.join("\n");
        let contents = if joined.is_empty() {
            joined
        } else {
            format!("{joined}\n")
        };
        std::fs::write(tmp, contents).map_err(|e| RosterError::sink_write(&display, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::models::{Gender, StudentRecord};

    #[test]
    fn mailing_list_format() {
        let batch = AnnotatedBatch {
            records: vec![StudentRecord {
                student_id: "s1".to_string(),
                name: "John Smith".to_string(),
                gender: Gender::Male,
                date_of_birth: None,
                email: Some("jsmith@gmail.com".to_string()),
                has_special_characters: false,
                has_similar_name: false,
            }],
            pairs: Vec::new(),
        };

        let dest = std::env::temp_dir().join("rollcall-list.txt");
        TextListWriter.write(&batch, &dest).unwrap();

        let contents = std::fs::read_to_string(&dest).unwrap();
        std::fs::remove_file(&dest).unwrap();

        assert_eq!(contents, "John Smith <jsmith@gmail.com>\n");
    }

    #[test]
    fn name_list_one_per_line() {
        let dest = std::env::temp_dir().join("rollcall-names.txt");
        write_name_list(&["Jo-Ann".to_string(), "D'Angelo".to_string()], &dest).unwrap();

        let contents = std::fs::read_to_string(&dest).unwrap();
        std::fs::remove_file(&dest).unwrap();

        assert_eq!(contents, "Jo-Ann\nD'Angelo\n");
    }
}
