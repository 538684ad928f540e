use thiserror::Error;

/// Errors arising from calibration bank persistence.
///
/// Nothing on the per-frame path can fail: missing joints, low
/// confidence, and implausible swings all degrade by omission. Only
/// the key-value round trip of the calibration bank has failure modes
/// worth surfacing, and even then a failed *load* silently yields an
/// empty bank (heuristic mode).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("calibration encode failed: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("key-value backend error for '{key}': {detail}")]
    Backend { key: String, detail: String },
}

impl StoreError {
    /// Wrap a backend failure for `key`. For [`KeyValueStore`]
    /// implementors whose underlying store has its own error type.
    ///
    /// [`KeyValueStore`]: crate::calibration::KeyValueStore
    pub fn backend(key: &str, detail: impl Into<String>) -> Self {
        Self::Backend { key: key.to_string(), detail: detail.into() }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
