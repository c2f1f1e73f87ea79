// Bipartite similarity scoring between the two gender partitions.
//
// One batched encode call per group (never per name), then the full A×B
// cosine cross product. Pairs at or above the threshold survive, ranked by
// score descending; the sort is stable, so equal scores keep the original
// (A-index, B-index) visit order. The relation is not deduplicated — A and
// B are different populations, so (i, j) appears at most once by
// construction.

use std::time::Duration;

use tracing::{debug, info};

use crate::errors::RosterError;
use crate::roster::models::SimilarityPair;
use crate::similarity::embeddings::cosine_similarity;
use crate::similarity::traits::NameEmbedder;

/// Pairs scoring below this are dropped unless configured otherwise.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

pub struct SimilarityScorer<'a> {
    embedder: &'a dyn NameEmbedder,
    /// Inclusive: a pair scoring exactly the threshold is retained.
    pub threshold: f64,
    /// Upper bound on each encode call. `None` waits indefinitely — only
    /// sensible for local backends.
    pub timeout: Option<Duration>,
}

impl<'a> SimilarityScorer<'a> {
    pub fn new(embedder: &'a dyn NameEmbedder, threshold: f64) -> Self {
        Self {
            embedder,
            threshold,
            timeout: None,
        }
    }

    /// Score every (A, B) combination and return the retained pairs,
    /// ranked. Either group empty means there is nothing to compare — an
    /// empty result, not an error.
    pub async fn score(
        &self,
        group_a: &[String],
        group_b: &[String],
    ) -> Result<Vec<SimilarityPair>, RosterError> {
        if group_a.is_empty() || group_b.is_empty() {
            debug!(
                a = group_a.len(),
                b = group_b.len(),
                "one group is empty, skipping similarity scoring"
            );
            return Ok(Vec::new());
        }

        let vectors_a = self.encode_group(group_a).await?;
        let vectors_b = self.encode_group(group_b).await?;

        let mut pairs = Vec::new();
        for (i, va) in vectors_a.iter().enumerate() {
            for (j, vb) in vectors_b.iter().enumerate() {
                let score = cosine_similarity(va, vb);
                if score >= self.threshold {
                    pairs.push(SimilarityPair {
                        name_a: group_a[i].clone(),
                        name_b: group_b[j].clone(),
                        score,
                    });
                }
            }
        }

        // sort_by is stable: ties keep A-major generation order.
        pairs.sort_by(|x, y| {
            y.score
                .partial_cmp(&x.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        info!(
            candidates = group_a.len() * group_b.len(),
            retained = pairs.len(),
            threshold = self.threshold,
            "ranked cross-group similarity"
        );

        Ok(pairs)
    }

    /// One batched embedder call for a whole group, bounded by the
    /// configured timeout. A timeout or a vector-count mismatch fails the
    /// whole scoring call — the result is never partially filled.
    async fn encode_group(&self, names: &[String]) -> Result<Vec<Vec<f64>>, RosterError> {
        let encode = self.embedder.encode(names);
        let vectors = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, encode).await.map_err(|_| {
                RosterError::EmbeddingUnavailable {
                    reason: format!("encode call exceeded {}ms", limit.as_millis()),
                }
            })??,
            None => encode.await?,
        };

        if vectors.len() != names.len() {
            return Err(RosterError::EmbeddingUnavailable {
                reason: format!(
                    "embedder returned {} vectors for {} names",
                    vectors.len(),
                    names.len()
                ),
            });
        }

        Ok(vectors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;

    /// Deterministic embedder: looks names up in a fixed table.
    struct TableEmbedder {
        table: HashMap<String, Vec<f64>>,
    }

    impl TableEmbedder {
        fn new(entries: &[(&str, Vec<f64>)]) -> Self {
            Self {
                table: entries
                    .iter()
                    .map(|(n, v)| (n.to_string(), v.clone()))
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl NameEmbedder for TableEmbedder {
        async fn encode(&self, names: &[String]) -> Result<Vec<Vec<f64>>, RosterError> {
            Ok(names
                .iter()
                .map(|n| self.table.get(n).cloned().unwrap_or(vec![0.0, 0.0]))
                .collect())
        }
    }

    /// Always returns the wrong number of vectors.
    struct TruncatingEmbedder;

    #[async_trait]
    impl NameEmbedder for TruncatingEmbedder {
        async fn encode(&self, _names: &[String]) -> Result<Vec<Vec<f64>>, RosterError> {
            Ok(vec![vec![1.0, 0.0]])
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn empty_group_yields_empty_result() {
        let embedder = TableEmbedder::new(&[("Alex", vec![1.0, 0.0])]);
        let scorer = SimilarityScorer::new(&embedder, DEFAULT_THRESHOLD);
        let pairs = scorer.score(&names(&["Alex"]), &[]).await.unwrap();
        assert!(pairs.is_empty());
    }

    #[tokio::test]
    async fn threshold_boundary_is_inclusive() {
        // cos([1,0], [3,4]) is exactly 3/5 = 0.6 in f64.
        let embedder =
            TableEmbedder::new(&[("A", vec![1.0, 0.0]), ("B", vec![3.0, 4.0])]);
        let scorer = SimilarityScorer::new(&embedder, 0.6);
        let pairs = scorer.score(&names(&["A"]), &names(&["B"])).await.unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].score, 0.6);
    }

    #[tokio::test]
    async fn below_threshold_is_dropped() {
        let embedder =
            TableEmbedder::new(&[("A", vec![1.0, 0.0]), ("B", vec![0.0, 1.0])]);
        let scorer = SimilarityScorer::new(&embedder, 0.5);
        let pairs = scorer.score(&names(&["A"]), &names(&["B"])).await.unwrap();
        assert!(pairs.is_empty());
    }

    #[tokio::test]
    async fn pairs_rank_by_score_descending() {
        let embedder = TableEmbedder::new(&[
            ("A1", vec![1.0, 0.0]),
            ("A2", vec![0.0, 1.0]),
            ("B1", vec![3.0, 4.0]), // cos with A1 = 0.6, with A2 = 0.8
        ]);
        let scorer = SimilarityScorer::new(&embedder, 0.5);
        let pairs = scorer
            .score(&names(&["A1", "A2"]), &names(&["B1"]))
            .await
            .unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].name_a, "A2");
        assert_eq!(pairs[1].name_a, "A1");
        assert!(pairs[0].score > pairs[1].score);
    }

    #[tokio::test]
    async fn ties_keep_generation_order() {
        // Both A names are identical vectors, so both pairs score the same.
        let embedder = TableEmbedder::new(&[
            ("A1", vec![1.0, 0.0]),
            ("A2", vec![2.0, 0.0]),
            ("B1", vec![1.0, 0.0]),
        ]);
        let scorer = SimilarityScorer::new(&embedder, 0.5);
        let pairs = scorer
            .score(&names(&["A1", "A2"]), &names(&["B1"]))
            .await
            .unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].name_a, "A1");
        assert_eq!(pairs[1].name_a, "A2");
    }

    #[tokio::test]
    async fn negative_scores_never_pass_default_threshold() {
        let embedder =
            TableEmbedder::new(&[("A", vec![1.0, 0.0]), ("B", vec![-1.0, 0.0])]);
        let scorer = SimilarityScorer::new(&embedder, DEFAULT_THRESHOLD);
        let pairs = scorer.score(&names(&["A"]), &names(&["B"])).await.unwrap();
        assert!(pairs.is_empty());
    }

    #[tokio::test]
    async fn vector_count_mismatch_is_unavailable() {
        let embedder = TruncatingEmbedder;
        let scorer = SimilarityScorer::new(&embedder, 0.5);
        let err = scorer
            .score(&names(&["A", "B"]), &names(&["C"]))
            .await
            .unwrap_err();
        assert!(matches!(err, RosterError::EmbeddingUnavailable { .. }));
    }

    #[tokio::test]
    async fn slow_embedder_times_out() {
        struct SlowEmbedder;

        #[async_trait]
        impl NameEmbedder for SlowEmbedder {
            async fn encode(&self, names: &[String]) -> Result<Vec<Vec<f64>>, RosterError> {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(vec![vec![1.0]; names.len()])
            }
        }

        let embedder = SlowEmbedder;
        let mut scorer = SimilarityScorer::new(&embedder, 0.5);
        scorer.timeout = Some(Duration::from_millis(10));
        let err = scorer
            .score(&names(&["A"]), &names(&["B"]))
            .await
            .unwrap_err();
        assert!(matches!(err, RosterError::EmbeddingUnavailable { .. }));
    }
}
