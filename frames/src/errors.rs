//! Shared error types for frame deserialization

use thiserror::Error;

/// Result type for frame operations
pub type FrameResult<T> = Result<T, FrameError>;

/// Errors raised while materializing frames from raw JSON.
///
/// Every variant aborts the whole load; no partial sequence ever reaches
/// a processor.
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("frame object has no `type` field")]
    MissingTypeTag,

    #[error("unknown frame type `{tag}`")]
    UnknownFrameType { tag: String },

    #[error("`{tag}` is missing required field `{field}`")]
    MissingField { tag: &'static str, field: &'static str },

    #[error("malformed field `{field}`: {reason}")]
    MalformedField { field: String, reason: String },

    #[error("frame at index {index}: {source}")]
    AtIndex {
        index: usize,
        #[source]
        source: Box<FrameError>,
    },
}

impl FrameError {
    /// Wrap this error with the sequence index it occurred at.
    pub fn at_index(self, index: usize) -> FrameError {
        FrameError::AtIndex {
            index,
            source: Box::new(self),
        }
    }

    pub(crate) fn malformed(field: impl Into<String>, reason: impl Into<String>) -> FrameError {
        FrameError::MalformedField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
