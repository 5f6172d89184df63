//! Error types for quizcard-core.

use thiserror::Error;

/// Result type alias using QuizcardError.
pub type Result<T> = std::result::Result<T, QuizcardError>;

/// Errors that can occur while configuring or building a document model.
///
/// Everything here is a construction-time failure; queries against a built
/// document never error and report absence with `Option` instead.
#[derive(Debug, Error)]
pub enum QuizcardError {
    #[error("invalid word exclusion pattern {pattern:?}: {source}")]
    InvalidExclusion {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid {name} pattern {pattern:?}: {source}")]
    InvalidPattern {
        name: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid frequency limit {value:?}")]
    InvalidLimit { value: String },

    #[error("probability {value} is outside [0, 1]")]
    InvalidProbability { value: f64 },
}
