use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Central configuration loaded from environment variables. The .env file
/// is loaded automatically at startup via dotenvy.
pub struct Config {
    /// Domain suffix appended to every derived local-part.
    pub email_domain: String,
    /// Inclusive cut-off for the cross-group similarity list.
    pub similarity_threshold: f64,
    /// Directory containing the ONNX embedding model files.
    pub model_dir: PathBuf,
    /// Upper bound on each embedding call; 0 disables the bound.
    pub embed_timeout: Option<Duration>,
    /// Punctuation tolerated by the special-character screen.
    pub allowed_punctuation: Vec<char>,
}

impl Config {
    /// Load configuration from environment variables. Everything has a
    /// default; only malformed values error.
    pub fn load() -> Result<Self> {
        let email_domain = env::var("ROLLCALL_EMAIL_DOMAIN")
            .unwrap_or_else(|_| crate::email::assigner::DEFAULT_DOMAIN.to_string());

        let similarity_threshold = match env::var("ROLLCALL_SIMILARITY_THRESHOLD") {
            Ok(raw) => raw
                .parse::<f64>()
                .with_context(|| format!("ROLLCALL_SIMILARITY_THRESHOLD is not a number: {raw}"))?,
            Err(_) => crate::similarity::scorer::DEFAULT_THRESHOLD,
        };

        let model_dir = env::var("ROLLCALL_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| crate::similarity::download::default_model_dir());

        let embed_timeout = match env::var("ROLLCALL_EMBED_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs = raw
                    .parse::<u64>()
                    .with_context(|| format!("ROLLCALL_EMBED_TIMEOUT_SECS is not a number: {raw}"))?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
            Err(_) => Some(Duration::from_secs(120)),
        };

        let allowed_punctuation = match env::var("ROLLCALL_ALLOWED_PUNCTUATION") {
            Ok(raw) => raw.chars().collect(),
            Err(_) => crate::roster::classify::DEFAULT_ALLOWED_PUNCTUATION.to_vec(),
        };

        Ok(Self {
            email_domain,
            similarity_threshold,
            model_dir,
            embed_timeout,
            allowed_punctuation,
        })
    }

    /// Check that the embedding model files are on disk. Call this before
    /// any operation that needs similarity scoring.
    pub fn require_embedder(&self) -> Result<()> {
        if !crate::similarity::download::model_files_present(&self.model_dir) {
            anyhow::bail!(
                "embedding model files not found in {}\n\
                 Run `rollcall download-model` to fetch them, or set\n\
                 ROLLCALL_MODEL_DIR to a directory that has them.",
                self.model_dir.display()
            );
        }
        Ok(())
    }
}
