//! Error types for SPV envelope operations.

use thiserror::Error;

/// Errors produced while building or inspecting SPV envelopes.
#[derive(Debug, Error)]
pub enum SpvError {
    /// Malformed hex or a wrong-length header or hash
    #[error("format error: {0}")]
    Format(String),
    /// A freshly computed hash disagrees with the value asserted by the caller
    #[error("{field} mismatch: computed {computed}, expected {expected}")]
    Mismatch {
        field: &'static str,
        computed: String,
        expected: String,
    },
    /// Stored checksum disagrees with the recomputed one
    #[error("checksum mismatch: {0}")]
    Integrity(String),
}
