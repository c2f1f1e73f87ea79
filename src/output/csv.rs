// CSV writers — the annotated record table and the ranked pair list.

use std::path::Path;

use crate::errors::RosterError;
use crate::output::{commit_atomically, RecordWriter};
use crate::roster::models::{AnnotatedBatch, SimilarityPair};

/// Writes the fused batch as a CSV table, one record per row. The email
/// column header matches the original sheets' "Email Address" convention.
pub struct CsvBatchWriter;

impl RecordWriter for CsvBatchWriter {
    fn write(&self, batch: &AnnotatedBatch, dest: &Path) -> Result<(), RosterError> {
        let display = dest.display().to_string();

        commit_atomically(dest, |tmp| {
            let mut writer =
                csv::Writer::from_path(tmp).map_err(|e| RosterError::sink_write(&display, e))?;

            writer
                .write_record([
                    "Student ID",
                    "Student Name",
                    "Gender",
                    "Date of Birth",
                    "Email Address",
                    "Special Characters",
                    "Similar Name",
                ])
                .map_err(|e| RosterError::sink_write(&display, e))?;

            for record in &batch.records {
                writer
                    .write_record([
                        record.student_id.as_str(),
                        record.name.as_str(),
                        record.gender.as_code(),
                        &record
                            .date_of_birth
                            .map(|d| d.to_string())
                            .unwrap_or_default(),
                        record.email.as_deref().unwrap_or_default(),
                        if record.has_special_characters { "yes" } else { "no" },
                        if record.has_similar_name { "yes" } else { "no" },
                    ])
                    .map_err(|e| RosterError::sink_write(&display, e))?;
            }

            writer
                .flush()
                .map_err(|e| RosterError::sink_write(&display, e))
        })
    }
}

/// Write the ranked similarity list as its own CSV artifact.
pub fn write_similarity_csv(pairs: &[SimilarityPair], dest: &Path) -> Result<(), RosterError> {
    let display = dest.display().to_string();

    commit_atomically(dest, |tmp| {
        let mut writer =
            csv::Writer::from_path(tmp).map_err(|e| RosterError::sink_write(&display, e))?;

        writer
            .write_record(["Name A", "Name B", "Similarity"])
            .map_err(|e| RosterError::sink_write(&display, e))?;

        for pair in pairs {
            writer
                .write_record([
                    pair.name_a.as_str(),
                    pair.name_b.as_str(),
                    &format!("{:.4}", pair.score),
                ])
                .map_err(|e| RosterError::sink_write(&display, e))?;
        }

        writer
            .flush()
            .map_err(|e| RosterError::sink_write(&display, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::models::{Gender, StudentRecord};

    fn sample_batch() -> AnnotatedBatch {
        AnnotatedBatch {
            records: vec![StudentRecord {
                student_id: "s1".to_string(),
                name: "John Smith".to_string(),
                gender: Gender::Male,
                date_of_birth: None,
                email: Some("jsmith@gmail.com".to_string()),
                has_special_characters: false,
                has_similar_name: true,
            }],
            pairs: vec![SimilarityPair {
                name_a: "John Smith".to_string(),
                name_b: "Jon Smith".to_string(),
                score: 0.9,
            }],
        }
    }

    #[test]
    fn batch_table_has_header_and_rows() {
        let dest = std::env::temp_dir().join("rollcall-batch.csv");
        CsvBatchWriter.write(&sample_batch(), &dest).unwrap();

        let contents = std::fs::read_to_string(&dest).unwrap();
        std::fs::remove_file(&dest).unwrap();

        let mut lines = contents.lines();
        assert!(lines.next().unwrap().starts_with("Student ID,Student Name"));
        let row = lines.next().unwrap();
        assert!(row.contains("jsmith@gmail.com"));
        assert!(row.contains("yes"));
    }

    #[test]
    fn pair_list_is_ranked_output() {
        let dest = std::env::temp_dir().join("rollcall-pairs.csv");
        write_similarity_csv(&sample_batch().pairs, &dest).unwrap();

        let contents = std::fs::read_to_string(&dest).unwrap();
        std::fs::remove_file(&dest).unwrap();

        assert!(contents.starts_with("Name A,Name B,Similarity"));
        assert!(contents.contains("John Smith,Jon Smith,0.9000"));
    }
}
