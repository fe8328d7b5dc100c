//! Error taxonomy for the intake and planning core.
//!
//! Every core operation either returns a fully formed value or fails fast
//! with one of these; there is no partial-success variant.
use thiserror::Error;

/// Recoverable, user-reportable failures surfaced by the core.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    /// A precondition was not met (empty channel, no rows, missing S3
    /// destination). The reason is shown to the caller verbatim.
    #[error("{reason}")]
    Validation { reason: String },

    /// The bulk jobs payload could not be decoded; no partial rows are
    /// returned.
    #[error("failed to decode jobs payload: {reason}")]
    Decode { reason: String },
}

impl PipelineError {
    pub fn validation(reason: impl Into<String>) -> Self {
        PipelineError::Validation {
            reason: reason.into(),
        }
    }

    pub fn decode(reason: impl Into<String>) -> Self {
        PipelineError::Decode {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
