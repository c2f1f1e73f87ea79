// Record types that flow through the pipeline.
//
// These are separate from the input readers so the core stages can be used
// without depending on any particular tabular format.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::input::RawRow;

/// Gender category as recorded in the source sheet.
///
/// Only "M" and "F" cells (trimmed, case-insensitive) are recognized;
/// everything else — blanks included — is `Unrecognized` and excluded from
/// the gender partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Unrecognized,
}

impl Gender {
    pub fn parse(cell: &str) -> Self {
        match cell.trim() {
            c if c.eq_ignore_ascii_case("m") => Gender::Male,
            c if c.eq_ignore_ascii_case("f") => Gender::Female,
            _ => Gender::Unrecognized,
        }
    }

    /// Single-letter code for tabular output. Unrecognized renders empty.
    pub fn as_code(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
            Gender::Unrecognized => "",
        }
    }
}

/// One student row, typed. The email and the two derived flags start
/// unpopulated and are filled in by the pipeline stages; after fusion the
/// record is not touched again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentRecord {
    pub student_id: String,
    pub name: String,
    pub gender: Gender,
    pub date_of_birth: Option<NaiveDate>,
    pub email: Option<String>,
    pub has_special_characters: bool,
    pub has_similar_name: bool,
}

impl StudentRecord {
    /// Type a raw row. Gender cells that aren't M/F become `Unrecognized`;
    /// a date that doesn't parse as YYYY-MM-DD degrades to `None` with a
    /// warning rather than rejecting the record.
    pub fn from_row(row: &RawRow) -> Self {
        let date_of_birth = row.date_of_birth.as_deref().and_then(|raw| {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return None;
            }
            match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(_) => {
                    warn!(
                        student_id = %row.student_id,
                        raw = %trimmed,
                        "unparseable date of birth, dropping"
                    );
                    None
                }
            }
        });

        Self {
            student_id: row.student_id.clone(),
            name: row.name.clone(),
            gender: Gender::parse(&row.gender),
            date_of_birth,
            email: None,
            has_special_characters: false,
            has_similar_name: false,
        }
    }
}

/// A retained cross-group similarity hit. `name_a` comes from the male
/// list, `name_b` from the female list; the score is raw cosine in [-1, 1].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityPair {
    pub name_a: String,
    pub name_b: String,
    pub score: f64,
}

/// Terminal output of the pipeline: the fused record batch plus the ranked
/// pair list it was fused against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotatedBatch {
    pub records: Vec<StudentRecord>,
    pub pairs: Vec<SimilarityPair>,
}
