// Final annotation pass.
//
// Joins the ranked similarity list back onto the record batch. The join key
// is the exact raw display name as stored on the record — the same string
// the scorer was handed — so names differing only in case or whitespace do
// not merge.

use std::collections::HashSet;

use tracing::debug;

use crate::roster::models::{AnnotatedBatch, SimilarityPair, StudentRecord};

/// Set each record's `has_similar_name` flag and assemble the terminal
/// batch. A record is flagged when its display name appears as either
/// member of any retained pair.
pub fn fuse(mut records: Vec<StudentRecord>, pairs: Vec<SimilarityPair>) -> AnnotatedBatch {
    let flagged: HashSet<&str> = pairs
        .iter()
        .flat_map(|p| [p.name_a.as_str(), p.name_b.as_str()])
        .collect();

    let mut hits = 0usize;
    for record in &mut records {
        record.has_similar_name = flagged.contains(record.name.as_str());
        if record.has_similar_name {
            hits += 1;
        }
    }

    debug!(
        records = records.len(),
        pairs = pairs.len(),
        flagged = hits,
        "fused similarity flags onto batch"
    );

    AnnotatedBatch { records, pairs }
}
