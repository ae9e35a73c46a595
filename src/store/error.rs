// Asset store error types

use thiserror::Error;

/// Errors surfaced by asset store lookups.
///
/// The request handler recovers from all of these locally: a failed
/// primary lookup degrades to the not-found page, and a failed fallback
/// degrades to a 500 response. Nothing is retried.
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("asset not found: {key}")]
    NotFound { key: String },

    #[error("asset read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("manifest parse failed: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("method not allowed: {method}")]
    MethodNotAllowed { method: String },
}

impl AssetError {
    /// Whether the error means the key simply has no entry (as opposed
    /// to an I/O failure reading one that might exist).
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
