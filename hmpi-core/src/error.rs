//! Error types for dataset ingestion and engine configuration.
//!
//! The projection engine itself is total; only the boundaries that turn
//! untyped JSON into samples, thresholds or a classifier can fail.

use thiserror::Error;

/// Result type alias for fallible engine operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The input is not valid JSON or does not match the expected shape.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Valid JSON that is neither a sample array nor an upload envelope.
    #[error("unrecognized dataset format: expected an array of samples or an object with a `GeoJSON` array")]
    UnrecognizedDataset,

    /// Two records share the same sample identifier.
    #[error("duplicate sample id `{0}`")]
    DuplicateSampleId(String),

    /// A concentration that is negative or not finite.
    #[error("sample `{sample}`: invalid concentration {value} for `{metric}`")]
    InvalidConcentration {
        sample: String,
        metric: String,
        value: f64,
    },

    /// A threshold limit that is not strictly positive and finite.
    #[error("invalid limit {limit} for `{metric}`: limits must be positive and finite")]
    InvalidLimit { metric: String, limit: f64 },

    /// A threshold value that is not a number at all.
    #[error("limit for `{0}` is not a number")]
    NonNumericLimit(String),

    /// Elevated-tier ratio outside (0, 1).
    #[error("invalid elevated ratio {0}: must lie strictly between 0 and 1")]
    InvalidRatio(f64),
}
