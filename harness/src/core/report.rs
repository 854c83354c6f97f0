//! Result assembly: run a test case end to end and bundle the verdict

use serde::Serialize;
use tracing::{debug, info};

use crate::core::compare::{Diagnostic, compare};
use crate::core::engine::{CapturedOutput, ExecutionEngine};
use crate::core::testcase::TestCase;
use crate::error::HarnessResult;
use crate::traits::FrameProcessor;

/// How the run's verdict was produced
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TestMode {
    /// No expectation supplied; the run reports what it captured
    Exploratory,
    /// Captured output was compared against the expectation
    Validation,
}

/// The artifact handed back across the harness boundary.
///
/// `passed` supports the conventional 0/1 exit-code mapping in callers;
/// in exploratory mode it is always true and `diagnostics` is empty.
#[derive(Clone, Debug, Serialize)]
pub struct TestReport {
    pub mode: TestMode,
    pub passed: bool,
    pub captured: CapturedOutput,
    pub diagnostics: Vec<Diagnostic>,
}

/// Run `case` against `processor` with the default per-frame timeout.
pub async fn run_test(
    processor: &mut dyn FrameProcessor,
    case: &TestCase,
) -> HarnessResult<TestReport> {
    run_test_with_engine(&ExecutionEngine::new(), processor, case).await
}

/// Run `case` against `processor`, driving delivery through `engine`.
///
/// Exploratory mode skips the comparator entirely and still returns the
/// captured output, so callers can persist it as a future expectation.
/// Validation mode compares the downstream capture sequence against the
/// expectation and surfaces the comparator's diagnostics verbatim.
pub async fn run_test_with_engine(
    engine: &ExecutionEngine,
    processor: &mut dyn FrameProcessor,
    case: &TestCase,
) -> HarnessResult<TestReport> {
    let captured = engine.run(processor, &case.input_frames).await?;

    match &case.expected_output {
        None => {
            debug!(
                "Exploratory run captured {} downstream / {} upstream frames",
                captured.downstream.len(),
                captured.upstream.len()
            );
            Ok(TestReport {
                mode: TestMode::Exploratory,
                passed: true,
                captured,
                diagnostics: Vec::new(),
            })
        }
        Some(expected) => {
            let comparison = compare(&captured.downstream_frames(), expected);
            info!(
                "Validation run {}: {} expected, {} captured downstream",
                if comparison.passed { "passed" } else { "failed" },
                expected.len(),
                captured.downstream.len()
            );
            Ok(TestReport {
                mode: TestMode::Validation,
                passed: comparison.passed,
                captured,
                diagnostics: comparison.diagnostics,
            })
        }
    }
}
