// Error kinds the pipeline distinguishes.
//
// Per-record problems (a name that strips to nothing) are recoverable and
// handled by policy at the pipeline level. Registry conflicts and embedding
// failures are batch-fatal. I/O errors carry the path so the operator knows
// which sheet or artifact to look at.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RosterError {
    /// The display name had nothing left after stripping — no local-part
    /// can be derived from it.
    #[error("invalid name {raw:?}: empty after stripping")]
    InvalidName { raw: String },

    /// An address was reserved twice. The registry's check-and-insert is a
    /// single step, so this indicates a programming bug, not bad input.
    #[error("email registry conflict: {email:?} was already reserved")]
    RegistryConflict { email: String },

    /// The injected embedding backend failed or timed out. The whole
    /// similarity step fails with this — it never partially fills.
    #[error("embedding backend unavailable: {reason}")]
    EmbeddingUnavailable { reason: String },

    #[error("failed to read source {source_path:?}: {reason}")]
    SourceRead { source_path: String, reason: String },

    #[error("failed to write {dest:?}: {reason}")]
    SinkWrite { dest: String, reason: String },
}

impl RosterError {
    pub fn source_read(source_path: impl Into<String>, reason: impl ToString) -> Self {
        Self::SourceRead {
            source_path: source_path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn sink_write(dest: impl Into<String>, reason: impl ToString) -> Self {
        Self::SinkWrite {
            dest: dest.into(),
            reason: reason.to_string(),
        }
    }
}
