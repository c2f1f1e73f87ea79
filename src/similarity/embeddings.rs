// Local ONNX name embedder using all-MiniLM-L6-v2.
//
// Short person names carry little lexical context, but the sentence
// transformer still places spelling variants ("John Smith" / "Jon Smith")
// close together in vector space, which is exactly what the near-duplicate
// screen needs. The model runs locally via ONNX — no API calls, no rate
// limits. Token embeddings are mean-pooled over the attention mask,
// matching the model's training.

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use ort::session::Session;
use ort::value::Tensor;
use tokenizers::Tokenizer;
use tracing::debug;

use crate::errors::RosterError;
use crate::similarity::traits::NameEmbedder;

/// Embedding dimension for all-MiniLM-L6-v2.
pub const EMBEDDING_DIM: usize = 384;

/// Name embedder backed by a local ONNX session.
///
/// `Arc<Mutex<Session>>` for thread safety, `Arc<Tokenizer>` for shared
/// ownership across spawn_blocking.
pub struct OnnxNameEmbedder {
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
}

impl OnnxNameEmbedder {
    /// Load the model and tokenizer from the given directory. Expects
    /// `model.onnx` and `tokenizer.json`; run `rollcall download-model`
    /// first if they don't exist.
    pub fn load(model_dir: &Path) -> Result<Self> {
        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");

        for required in [&model_path, &tokenizer_path] {
            if !required.exists() {
                anyhow::bail!(
                    "embedding model file not found: {}\nRun `rollcall download-model` to fetch it.",
                    required.display()
                );
            }
        }

        let session = Session::builder()
            .context("failed to create ONNX session builder")?
            .commit_from_file(&model_path)
            .with_context(|| format!("failed to load model from {}", model_path.display()))?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("failed to load tokenizer: {e}"))?;

        debug!("loaded name embedding model from {}", model_dir.display());

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
        })
    }
}

#[async_trait]
impl NameEmbedder for OnnxNameEmbedder {
    /// Embed a batch of names in one inference call.
    ///
    /// CPU-bound work is offloaded to spawn_blocking to keep the async
    /// runtime responsive. Output vectors are index-aligned with the input.
    async fn encode(&self, names: &[String]) -> Result<Vec<Vec<f64>>, RosterError> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let session = Arc::clone(&self.session);
        let tokenizer = Arc::clone(&self.tokenizer);
        let names = names.to_vec();

        let joined = tokio::task::spawn_blocking(move || embed_sync(&session, &tokenizer, &names))
            .await
            .map_err(|e| RosterError::EmbeddingUnavailable {
                reason: format!("embedding task panicked: {e}"),
            })?;

        joined.map_err(|e| RosterError::EmbeddingUnavailable {
            reason: format!("{e:#}"),
        })
    }
}

/// Synchronous path: tokenization, padded tensor assembly, inference, and
/// mean pooling. Called from spawn_blocking.
fn embed_sync(
    session: &Arc<Mutex<Session>>,
    tokenizer: &Arc<Tokenizer>,
    names: &[String],
) -> Result<Vec<Vec<f64>>> {
    let encodings: Vec<_> = names
        .iter()
        .map(|n| {
            tokenizer
                .encode(n.as_str(), true)
                .map_err(|e| anyhow::anyhow!("tokenization failed: {e}"))
        })
        .collect::<Result<Vec<_>>>()?;

    let batch = encodings.len();
    let max_len = encodings
        .iter()
        .map(|e| e.get_ids().len())
        .max()
        .unwrap_or(0);

    if max_len == 0 {
        return Ok(vec![vec![0.0; EMBEDDING_DIM]; batch]);
    }

    // BERT-style inputs: token ids, attention mask (1 = real token), and
    // all-zero token type ids, each padded to max_len with zeros.
    let mut input_ids: Vec<i64> = Vec::with_capacity(batch * max_len);
    let mut attention_mask: Vec<i64> = Vec::with_capacity(batch * max_len);
    let mut token_type_ids: Vec<i64> = Vec::with_capacity(batch * max_len);

    for enc in &encodings {
        let ids = enc.get_ids();
        let pad = max_len - ids.len();

        input_ids.extend(ids.iter().map(|&id| id as i64));
        attention_mask.extend(enc.get_attention_mask().iter().map(|&m| m as i64));
        token_type_ids.extend(std::iter::repeat_n(0i64, ids.len()));

        input_ids.extend(std::iter::repeat_n(0i64, pad));
        attention_mask.extend(std::iter::repeat_n(0i64, pad));
        token_type_ids.extend(std::iter::repeat_n(0i64, pad));
    }

    let shape = [batch as i64, max_len as i64];
    let mask_copy = attention_mask.clone();

    let ids_tensor =
        Tensor::from_array((shape, input_ids)).context("failed to create input_ids tensor")?;
    let mask_tensor = Tensor::from_array((shape, attention_mask))
        .context("failed to create attention_mask tensor")?;
    let type_tensor = Tensor::from_array((shape, token_type_ids))
        .context("failed to create token_type_ids tensor")?;

    // last_hidden_state: [batch, max_len, EMBEDDING_DIM]
    let hidden = {
        let mut session = session
            .lock()
            .map_err(|e| anyhow::anyhow!("session lock poisoned: {e}"))?;

        let outputs = session
            .run(ort::inputs! {
                "input_ids" => ids_tensor,
                "attention_mask" => mask_tensor,
                "token_type_ids" => type_tensor
            })
            .context("embedding inference failed")?;

        let (_shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .context("failed to extract embedding output tensor")?;

        data.to_vec()
    };

    // Mean pooling: sum token embeddings weighted by the attention mask,
    // divide by the mask sum.
    let mut vectors = Vec::with_capacity(batch);
    for i in 0..batch {
        let mut pooled = vec![0.0_f64; EMBEDDING_DIM];
        let mut mask_sum = 0.0_f64;

        for j in 0..max_len {
            let mask = mask_copy[i * max_len + j] as f64;
            if mask > 0.0 {
                mask_sum += mask;
                let offset = (i * max_len + j) * EMBEDDING_DIM;
                for (k, slot) in pooled.iter_mut().enumerate() {
                    *slot += hidden[offset + k] as f64 * mask;
                }
            }
        }

        if mask_sum > 0.0 {
            for slot in &mut pooled {
                *slot /= mask_sum;
            }
        }

        vectors.push(pooled);
    }

    debug!(batch, dim = EMBEDDING_DIM, "computed name embeddings");

    Ok(vectors)
}

/// Cosine similarity between two vectors, in [-1, 1].
///
/// Opposite directions score -1, orthogonal 0, identical direction 1.
/// Mismatched lengths, empty input, or a zero vector score 0.0.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let mag_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    let denom = mag_a * mag_b;
    if denom < f64::EPSILON {
        0.0
    } else {
        dot / denom
    }
}
