//! Harness error types

use thiserror::Error;

/// Result type for harness operations
pub type HarnessResult<T> = Result<T, HarnessError>;

/// Errors that abort a test run.
///
/// A failed comparison is never one of these: validation mismatches are
/// data, reported through [`TestReport`](crate::core::TestReport) with
/// `passed = false`. The variants here are infrastructure faults and bad
/// input, kept structurally separate from diagnostics.
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("frame error: {0}")]
    Frame(#[from] frames::FrameError),

    #[error("invalid test case: {message}")]
    InvalidTestCase { message: String },

    #[error("processor did not acknowledge frame {index} within {timeout_ms}ms")]
    ProcessorTimeout { index: usize, timeout_ms: u64 },

    #[error("processor failed on frame {index}: {source}")]
    ProcessorFailed {
        index: usize,
        #[source]
        source: anyhow::Error,
    },

    #[error("capture sink closed before the run finished")]
    SinkClosed,
}
