//! End-to-end harness tests: JSON test data in, structured report out


use std::time::Duration;

use fixtures::{
    AckingProcessor, PassthroughProcessor, SilentProcessor, StallingProcessor, UppercaseProcessor,
};
use frames::{Frame, TextFrame, frame_to_json};
use harness::{
    ExecutionEngine, HarnessError, TestCase, TestMode, run_test, run_test_with_engine,
};
use serde_json::{Value, json};

#[tokio::test]
async fn test_uppercase_end_to_end() {
    let case = TestCase::parse(
        r#"{
            "input_frames": [{"type": "TextFrame", "text": "hello"}],
            "expected_output": [{"type": "TextFrame", "text": "HELLO"}]
        }"#,
    )
    .unwrap();

    let mut processor = UppercaseProcessor;
    let report = run_test(&mut processor, &case).await.unwrap();

    assert_eq!(report.mode, TestMode::Validation);
    assert!(report.passed);
    assert_eq!(
        report.captured.downstream_frames(),
        vec![Frame::Text(TextFrame { text: "HELLO".to_string() })]
    );
}

#[tokio::test]
async fn test_validation_failure_is_a_verdict_not_an_error() {
    let case = TestCase::parse(
        r#"{
            "input_frames": [{"type": "TextFrame", "text": "hello"}],
            "expected_output": [{"type": "TextFrame", "text": "GOODBYE"}]
        }"#,
    )
    .unwrap();

    let mut processor = UppercaseProcessor;
    let report = run_test(&mut processor, &case).await.unwrap();

    assert!(!report.passed);
    assert_eq!(report.diagnostics.len(), 1);
    let diagnostic = &report.diagnostics[0];
    assert!(diagnostic.type_match);
    assert!(diagnostic.field_mismatches.contains_key("text"));
}

#[tokio::test]
async fn test_exploratory_mode_never_fails() {
    let case = TestCase::parse(
        r#"{"input_frames": [{"type": "TextFrame", "text": "ignored"}, {"type": "StartFrame"}]}"#,
    )
    .unwrap();

    let mut processor = SilentProcessor;
    let report = run_test(&mut processor, &case).await.unwrap();

    assert_eq!(report.mode, TestMode::Exploratory);
    assert!(report.passed);
    assert!(report.diagnostics.is_empty());
    assert_eq!(report.captured.total(), 0);
}

#[tokio::test]
async fn test_exploratory_capture_seeds_a_passing_expectation() {
    let input = json!({
        "input_frames": [
            {"type": "TextFrame", "text": "one"},
            {"type": "TextFrame", "text": "two"}
        ]
    });
    let case = TestCase::from_value(&input).unwrap();

    let mut processor = UppercaseProcessor;
    let report = run_test(&mut processor, &case).await.unwrap();
    assert_eq!(report.mode, TestMode::Exploratory);

    // Persist the capture as the expectation, the workflow the harness is
    // built around, and the rerun validates against it.
    let expected: Vec<Value> =
        report.captured.downstream_frames().iter().map(frame_to_json).collect();
    let validation_case = TestCase::from_value(&json!({
        "input_frames": input["input_frames"],
        "expected_output": expected,
    }))
    .unwrap();

    let mut processor = UppercaseProcessor;
    let rerun = run_test(&mut processor, &validation_case).await.unwrap();
    assert_eq!(rerun.mode, TestMode::Validation);
    assert!(rerun.passed);
}

#[tokio::test]
async fn test_partial_expectation_is_a_wildcard() {
    let case = TestCase::parse(
        r#"{
            "input_frames": [{"type": "TextFrame", "text": "whatever"}],
            "expected_output": [{"type": "TextFrame"}]
        }"#,
    )
    .unwrap();

    let mut processor = UppercaseProcessor;
    let report = run_test(&mut processor, &case).await.unwrap();
    assert!(report.passed);
}

#[tokio::test]
async fn test_length_mismatch_fails_with_trailing_marker() {
    let case = TestCase::parse(
        r#"{
            "input_frames": [{"type": "TextFrame", "text": "only"}],
            "expected_output": [{"type": "TextFrame"}, {"type": "EndFrame"}]
        }"#,
    )
    .unwrap();

    let mut processor = PassthroughProcessor;
    let report = run_test(&mut processor, &case).await.unwrap();

    assert!(!report.passed);
    let marker = report.diagnostics.last().unwrap();
    assert!(marker.is_length_marker());
    assert_eq!(marker.position, 1);
    assert_eq!(marker.expected_type.as_deref(), Some("EndFrame"));
    assert_eq!(marker.actual_type, None);
}

#[tokio::test]
async fn test_unknown_type_rejected_before_any_execution() {
    let err = TestCase::parse(r#"{"input_frames": [{"type": "BogusFrame"}]}"#).unwrap_err();

    let HarnessError::Frame(frame_err) = err else { panic!("expected frame error") };
    assert!(matches!(frame_err, frames::FrameError::AtIndex { index: 0, .. }));
}

#[tokio::test]
async fn test_hanging_processor_times_out() {
    let case = TestCase::parse(
        r#"{
            "input_frames": [{"type": "TextFrame", "text": "hello"}],
            "expected_output": [{"type": "TextFrame", "text": "HELLO"}]
        }"#,
    )
    .unwrap();

    let engine = ExecutionEngine::with_timeout(Duration::from_millis(20));
    let mut processor = StallingProcessor;
    let err = run_test_with_engine(&engine, &mut processor, &case).await.unwrap_err();

    // An unresponsive processor is an infrastructure fault, not a failed
    // validation verdict.
    assert!(matches!(err, HarnessError::ProcessorTimeout { index: 0, .. }));
}

#[tokio::test]
async fn test_audio_defaults_flow_through_to_validation() {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD as BASE64;

    let audio = BASE64.encode([0u8, 1, 2, 3]);
    let case = TestCase::parse(&format!(
        r#"{{
            "input_frames": [{{"type": "OutputAudioRawFrame", "audio": "{audio}"}}],
            "expected_output": [
                {{"type": "OutputAudioRawFrame", "audio": "{audio}", "sample_rate": 16000, "num_channels": 1}}
            ]
        }}"#,
    ))
    .unwrap();

    let mut processor = PassthroughProcessor;
    let report = run_test(&mut processor, &case).await.unwrap();
    assert!(report.passed);
}

#[tokio::test]
async fn test_timestamp_equality_is_on_decoded_values() {
    // Epoch seconds on the input side, ISO-8601 in the expectation; both
    // decode to the same instant.
    let case = TestCase::parse(
        r#"{
            "input_frames": [
                {"type": "TranscriptionFrame", "text": "hi", "user_id": "user_1", "timestamp": 1748779200}
            ],
            "expected_output": [
                {"type": "TranscriptionFrame", "timestamp": "2025-06-01T12:00:00+00:00"}
            ]
        }"#,
    )
    .unwrap();

    let mut processor = PassthroughProcessor;
    let report = run_test(&mut processor, &case).await.unwrap();
    assert!(report.passed);
}

#[tokio::test]
async fn test_end_marker_stops_the_run() {
    let case = TestCase::parse(
        r#"{
            "input_frames": [
                {"type": "StartFrame"},
                {"type": "TextFrame", "text": "spoken"},
                {"type": "EndFrame"},
                {"type": "TextFrame", "text": "never delivered"}
            ]
        }"#,
    )
    .unwrap();

    let mut processor = PassthroughProcessor;
    let report = run_test(&mut processor, &case).await.unwrap();

    let captured = report.captured.downstream_frames();
    assert_eq!(captured.len(), 3);
    assert_eq!(captured[2], Frame::End);
}

#[tokio::test]
async fn test_upstream_output_is_captured_but_not_validated() {
    let case = TestCase::parse(
        r#"{
            "input_frames": [{"type": "TextFrame", "text": "hello"}],
            "expected_output": [{"type": "TextFrame", "text": "hello"}]
        }"#,
    )
    .unwrap();

    let mut processor = AckingProcessor;
    let report = run_test(&mut processor, &case).await.unwrap();

    assert!(report.passed);
    assert_eq!(report.captured.upstream_frames(), vec![Frame::Start]);
    assert_eq!(report.captured.upstream[0].input_index, 0);
}

#[tokio::test]
async fn test_report_serializes_for_callers() {
    let case = TestCase::parse(
        r#"{
            "input_frames": [{"type": "TextFrame", "text": "hello"}],
            "expected_output": [{"type": "TextFrame", "text": "HELLO"}]
        }"#,
    )
    .unwrap();

    let mut processor = UppercaseProcessor;
    let report = run_test(&mut processor, &case).await.unwrap();

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["mode"], json!("validation"));
    assert_eq!(value["passed"], json!(true));
    assert_eq!(value["captured"]["downstream"][0]["frame"]["type"], json!("TextFrame"));
}

#[tokio::test]
async fn test_empty_input_validation_against_empty_expectation() {
    let case = TestCase::parse(r#"{"input_frames": [], "expected_output": []}"#).unwrap();

    let mut processor = PassthroughProcessor;
    let report = run_test(&mut processor, &case).await.unwrap();

    assert!(report.passed);
    assert!(report.diagnostics.is_empty());
}
