// The linear batch pipeline.
//
// Stages run strictly in order over the whole batch: every record has its
// email before classification starts, and scoring sees the complete gender
// partition rather than a streaming view. Writers only ever receive the
// terminal AnnotatedBatch, so a failed stage persists nothing.

use std::time::Duration;

use tracing::{info, warn};

use crate::email::assigner::{assign_email, DEFAULT_DOMAIN};
use crate::email::registry::EmailRegistry;
use crate::errors::RosterError;
use crate::input::RawRow;
use crate::roster::classify::{
    gender_partition, has_special_characters, DEFAULT_ALLOWED_PUNCTUATION,
};
use crate::roster::fuse::fuse;
use crate::roster::models::{AnnotatedBatch, StudentRecord};
use crate::similarity::scorer::{SimilarityScorer, DEFAULT_THRESHOLD};
use crate::similarity::traits::NameEmbedder;

/// What to do with a record whose name strips to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidNamePolicy {
    /// Log a warning and drop the record from the batch.
    Skip,
    /// Fail the whole batch.
    Fail,
}

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub domain: String,
    pub threshold: f64,
    pub allowed_punctuation: Vec<char>,
    pub invalid_names: InvalidNamePolicy,
    /// When the embedder is unavailable, emit the batch with an empty pair
    /// list and all similarity flags false instead of failing. The
    /// downgrade is logged — it is never silent.
    pub degraded_similarity: bool,
    pub embed_timeout: Option<Duration>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            domain: DEFAULT_DOMAIN.to_string(),
            threshold: DEFAULT_THRESHOLD,
            allowed_punctuation: DEFAULT_ALLOWED_PUNCTUATION.to_vec(),
            invalid_names: InvalidNamePolicy::Skip,
            degraded_similarity: false,
            embed_timeout: None,
        }
    }
}

/// Ingest, assign, and classify — the three synchronous stages shared by
/// full runs and assign-only runs. Records come back in input row order
/// with emails and special-character flags populated.
fn ingest_and_classify(
    rows: &[RawRow],
    opts: &PipelineOptions,
) -> Result<Vec<StudentRecord>, RosterError> {
    let mut registry = EmailRegistry::new();
    let mut records = Vec::with_capacity(rows.len());
    let mut skipped = 0usize;

    for row in rows {
        let mut record = StudentRecord::from_row(row);

        match assign_email(&record.name, &opts.domain, &mut registry) {
            Ok(email) => {
                record.email = Some(email);
            }
            Err(err @ RosterError::InvalidName { .. }) => match opts.invalid_names {
                InvalidNamePolicy::Skip => {
                    warn!(student_id = %record.student_id, error = %err, "skipping record");
                    skipped += 1;
                    continue;
                }
                InvalidNamePolicy::Fail => return Err(err),
            },
            Err(err) => return Err(err),
        }

        record.has_special_characters =
            has_special_characters(&record.name, &opts.allowed_punctuation);
        records.push(record);
    }

    info!(
        records = records.len(),
        skipped,
        "assigned and classified batch"
    );

    Ok(records)
}

/// Run the full pipeline over a batch of raw rows.
pub async fn run_batch(
    rows: &[RawRow],
    embedder: &dyn NameEmbedder,
    opts: &PipelineOptions,
) -> Result<AnnotatedBatch, RosterError> {
    let records = ingest_and_classify(rows, opts)?;

    let (male, female) = gender_partition(&records);
    info!(
        male = male.len(),
        female = female.len(),
        excluded = records.len() - male.len() - female.len(),
        "partitioned batch by gender"
    );

    let mut scorer = SimilarityScorer::new(embedder, opts.threshold);
    scorer.timeout = opts.embed_timeout;

    let pairs = match scorer.score(&male, &female).await {
        Ok(pairs) => pairs,
        Err(err @ RosterError::EmbeddingUnavailable { .. }) if opts.degraded_similarity => {
            warn!(
                error = %err,
                "similarity scoring unavailable — emitting batch without similarity flags"
            );
            Vec::new()
        }
        Err(err) => return Err(err),
    };

    Ok(fuse(records, pairs))
}

/// Assign-only variant: the same ingest/classify stages, no similarity
/// pass. The pair list is empty and every similarity flag is false.
pub fn assign_batch(
    rows: &[RawRow],
    opts: &PipelineOptions,
) -> Result<AnnotatedBatch, RosterError> {
    let records = ingest_and_classify(rows, opts)?;
    Ok(fuse(records, Vec::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, name: &str, gender: &str) -> RawRow {
        RawRow {
            student_id: id.to_string(),
            name: name.to_string(),
            gender: gender.to_string(),
            date_of_birth: None,
        }
    }

    #[test]
    fn assign_batch_populates_unique_emails() {
        let rows = vec![
            row("1", "John Smith", "M"),
            row("2", "Jon Smith", "F"),
            row("3", "Madonna", ""),
        ];
        let batch = assign_batch(&rows, &PipelineOptions::default()).unwrap();

        let emails: Vec<_> = batch
            .records
            .iter()
            .map(|r| r.email.clone().unwrap())
            .collect();
        assert_eq!(
            emails,
            vec!["jsmith@gmail.com", "jsmith1@gmail.com", "madonna@gmail.com"]
        );
    }

    #[test]
    fn skip_policy_drops_invalid_names() {
        let rows = vec![row("1", "John Smith", "M"), row("2", "???", "F")];
        let batch = assign_batch(&rows, &PipelineOptions::default()).unwrap();
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.records[0].student_id, "1");
    }

    #[test]
    fn fail_policy_rejects_the_batch() {
        let rows = vec![row("1", "John Smith", "M"), row("2", "???", "F")];
        let opts = PipelineOptions {
            invalid_names: InvalidNamePolicy::Fail,
            ..PipelineOptions::default()
        };
        let err = assign_batch(&rows, &opts).unwrap_err();
        assert!(matches!(err, RosterError::InvalidName { .. }));
    }

    #[test]
    fn special_character_flags_are_set_during_classify() {
        let rows = vec![row("1", "Jo-Ann Baker", "F"), row("2", "Jane Doe", "F")];
        let batch = assign_batch(&rows, &PipelineOptions::default()).unwrap();
        assert!(batch.records[0].has_special_characters);
        assert!(!batch.records[1].has_special_characters);
    }
}
