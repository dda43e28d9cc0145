//! # Rendering Error Types
//!
//! Construction and configuration errors. The per-frame path has no error
//! type: a full pool is reported as `None` from `add_particle`.

use thiserror::Error;

/// Errors that can occur while building particle pools.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// A pool was requested with room for zero particles.
    #[error("particle pool capacity must be greater than zero")]
    ZeroCapacity,

    /// Batch size outside `1..=MAX_QUADS_PER_BATCH`.
    #[error("max quads per batch must be in 1..={max}, got {requested}")]
    InvalidBatchSize {
        /// Requested quads per batch.
        requested: usize,
        /// Largest size 16-bit indices can address.
        max: usize,
    },

    /// Blend mode tag not in the known set.
    #[error("unknown blend mode: {0:?}")]
    UnknownBlendMode(String),

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;
