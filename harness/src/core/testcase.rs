//! Declarative test case model

use serde_json::Value;
use tracing::warn;

use crate::error::{HarnessError, HarnessResult};
use frames::codec;
use frames::{ExpectedFrame, Frame};

/// One declarative processor test: an ordered input sequence and an
/// optional ordered expectation.
///
/// Presence of `expected_output` is the sole switch between exploratory
/// and validation mode; there is no separate mode flag. Constructed once
/// per run from raw parsed JSON, immutable thereafter.
#[derive(Clone, Debug, PartialEq)]
pub struct TestCase {
    pub input_frames: Vec<Frame>,
    pub expected_output: Option<Vec<ExpectedFrame>>,
}

impl TestCase {
    /// Build a test case from a raw parsed JSON document:
    ///
    /// ```json
    /// {
    ///   "input_frames": [ { "type": "TextFrame", "text": "hello" } ],
    ///   "expected_output": [ { "type": "TextFrame", "text": "HELLO" } ]
    /// }
    /// ```
    pub fn from_value(value: &Value) -> HarnessResult<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| invalid("test case must be a JSON object"))?;

        let input = object
            .get("input_frames")
            .ok_or_else(|| invalid("missing `input_frames`"))?
            .as_array()
            .ok_or_else(|| invalid("`input_frames` must be an array"))?;
        let input_frames = codec::load_sequence(input)?;

        let expected_output = match object.get("expected_output") {
            None | Some(Value::Null) => None,
            Some(value) => {
                let array = value
                    .as_array()
                    .ok_or_else(|| invalid("`expected_output` must be an array"))?;
                Some(codec::load_expected_sequence(array)?)
            }
        };

        for key in object.keys() {
            if key != "input_frames" && key != "expected_output" {
                warn!("Ignoring unrecognized test case key `{key}`");
            }
        }

        Ok(Self { input_frames, expected_output })
    }

    /// Parse a JSON document and build a test case from it.
    pub fn parse(text: &str) -> HarnessResult<Self> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| invalid(&format!("invalid JSON: {e}")))?;
        Self::from_value(&value)
    }

    /// Whether the run will validate against an expectation.
    pub fn is_validation(&self) -> bool {
        self.expected_output.is_some()
    }
}

fn invalid(message: &str) -> HarnessError {
    HarnessError::InvalidTestCase { message: message.to_string() }
}
