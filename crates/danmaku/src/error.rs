//! # Driver Error Types

use danmaku_rendering::RenderError;
use thiserror::Error;

/// Errors that can occur while managing emitters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DriverError {
    /// Every emitter slot is in use.
    #[error("too many emitters: limit is {max}")]
    TooManyEmitters {
        /// Configured emitter limit.
        max: usize,
    },

    /// The emitter was released or never existed.
    #[error("unknown emitter")]
    UnknownEmitter,

    /// The pool could not be built.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for driver operations.
pub type DriverResult<T> = Result<T, DriverError>;
