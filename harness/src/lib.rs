//! Declarative test harness for frame processors
//!
//! A test is plain data: an ordered sequence of input frames and an
//! optional ordered expectation. The harness materializes the data into
//! typed frames, drives them through a single caller-supplied processor
//! one at a time, captures everything it emits, and either reports the
//! capture (exploratory mode) or structurally compares it against the
//! expectation (validation mode).
//!
//! ```no_run
//! use harness::{TestCase, run_test};
//! # use harness::{FrameProcessor, FrameSink};
//! # use async_trait::async_trait;
//! # struct MyProcessor;
//! # #[async_trait]
//! # impl FrameProcessor for MyProcessor {
//! #     async fn process_frame(
//! #         &mut self,
//! #         frame: frames::Frame,
//! #         direction: frames::FrameDirection,
//! #         sink: &FrameSink,
//! #     ) -> anyhow::Result<()> { sink.push(frame, direction)?; Ok(()) }
//! # }
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let case = TestCase::parse(
//!     r#"{
//!         "input_frames": [{"type": "TextFrame", "text": "hello"}],
//!         "expected_output": [{"type": "TextFrame", "text": "HELLO"}]
//!     }"#,
//! )?;
//!
//! let mut processor = MyProcessor;
//! let report = run_test(&mut processor, &case).await?;
//! assert!(report.passed);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod error;
pub mod traits;

// Re-export main types
pub use crate::core::{
    CapturedFrame, CapturedOutput, Comparison, DEFAULT_FRAME_TIMEOUT, Diagnostic, ExecutionEngine,
    FieldDiff, TestCase, TestMode, TestReport, compare, run_test, run_test_with_engine,
};
pub use error::{HarnessError, HarnessResult};
pub use traits::{FrameProcessor, FrameSink};
