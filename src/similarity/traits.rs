// Name embedder trait — the swap-ready abstraction.
//
// The scorer only sees this trait, so it carries no compile-time dependency
// on any particular model runtime. The default implementation runs a local
// ONNX sentence transformer; tests inject deterministic fakes.

use async_trait::async_trait;

use crate::errors::RosterError;

/// Maps names to fixed-length numeric vectors. Implementations must be
/// async because a backend may sit behind an arbitrary-latency call, and
/// must return one vector per input name, index-aligned.
#[async_trait]
pub trait NameEmbedder: Send + Sync {
    async fn encode(&self, names: &[String]) -> Result<Vec<Vec<f64>>, RosterError>;
}

/// Placeholder embedder for runs without a usable model on disk. Errors if
/// actually called rather than producing fake vectors; degraded pipeline
/// runs turn that into an empty pair list.
pub struct NoopEmbedder;

#[async_trait]
impl NameEmbedder for NoopEmbedder {
    async fn encode(&self, _names: &[String]) -> Result<Vec<Vec<f64>>, RosterError> {
        Err(RosterError::EmbeddingUnavailable {
            reason: "no embedding backend configured for this run".to_string(),
        })
    }
}
