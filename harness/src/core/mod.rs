//! Core harness logic

pub mod compare;
pub mod engine;
pub mod report;
pub mod testcase;

pub use compare::{Comparison, Diagnostic, FieldDiff, compare};
pub use engine::{CapturedFrame, CapturedOutput, DEFAULT_FRAME_TIMEOUT, ExecutionEngine};
pub use report::{TestMode, TestReport, run_test, run_test_with_engine};
pub use testcase::TestCase;
