//! Core frame data model and identifiers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::registry;

/// Direction a frame travels relative to a processor
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameDirection {
    /// Onward through the pipeline
    Downstream,
    /// Back toward the source
    Upstream,
}

impl fmt::Display for FrameDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameDirection::Downstream => write!(f, "downstream"),
            FrameDirection::Upstream => write!(f, "upstream"),
        }
    }
}

/// Text payload exchanged between pipeline stages
#[derive(Clone, Debug, PartialEq)]
pub struct TextFrame {
    pub text: String,
}

/// Raw audio payload with its format parameters
#[derive(Clone, Debug, PartialEq)]
pub struct OutputAudioRawFrame {
    /// Decoded PCM bytes (base64 text on the wire)
    pub audio: Vec<u8>,
    pub sample_rate: u32,
    pub num_channels: u16,
}

/// Finalized transcription attributed to a speaker
#[derive(Clone, Debug, PartialEq)]
pub struct TranscriptionFrame {
    pub text: String,
    pub user_id: String,
    /// Always explicit or absent; never defaulted from the wall clock
    pub timestamp: Option<DateTime<Utc>>,
}

/// An immutable, tagged unit of data exchanged between pipeline stages.
///
/// The variant set is closed: adding a frame type means adding a variant
/// here and a shape entry in [`registry`]. Unknown tags are rejected at
/// deserialization, never coerced.
#[derive(Clone, Debug, PartialEq)]
pub enum Frame {
    Text(TextFrame),
    Start,
    End,
    OutputAudioRaw(OutputAudioRawFrame),
    Transcription(TranscriptionFrame),
}

impl Frame {
    /// The wire tag identifying this variant.
    pub fn type_tag(&self) -> &'static str {
        match self {
            Frame::Text(_) => registry::TAG_TEXT,
            Frame::Start => registry::TAG_START,
            Frame::End => registry::TAG_END,
            Frame::OutputAudioRaw(_) => registry::TAG_OUTPUT_AUDIO_RAW,
            Frame::Transcription(_) => registry::TAG_TRANSCRIPTION,
        }
    }

    /// Whether this frame is the designated end marker that terminates a run.
    pub fn is_end(&self) -> bool {
        matches!(self, Frame::End)
    }

    /// Decoded field view of this frame, keyed by wire field name.
    ///
    /// Absent optional fields are omitted. This is the representation the
    /// comparator and the wire encoder both work from.
    pub fn field_map(&self) -> BTreeMap<&'static str, FieldValue> {
        let mut fields = BTreeMap::new();
        match self {
            Frame::Text(frame) => {
                fields.insert("text", FieldValue::Text(frame.text.clone()));
            }
            Frame::Start | Frame::End => {}
            Frame::OutputAudioRaw(frame) => {
                fields.insert("audio", FieldValue::Bytes(frame.audio.clone()));
                fields.insert("sample_rate", FieldValue::UInt(u64::from(frame.sample_rate)));
                fields.insert("num_channels", FieldValue::UInt(u64::from(frame.num_channels)));
            }
            Frame::Transcription(frame) => {
                fields.insert("text", FieldValue::Text(frame.text.clone()));
                fields.insert("user_id", FieldValue::Text(frame.user_id.clone()));
                if let Some(timestamp) = frame.timestamp {
                    fields.insert("timestamp", FieldValue::Timestamp(timestamp));
                }
            }
        }
        fields
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_tag())
    }
}

/// Decoded value of a single frame field.
///
/// Shapes use these for declared defaults; the comparator compares them
/// directly, so equality is on decoded values (bytes, not base64 text).
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Text(String),
    Bytes(Vec<u8>),
    UInt(u64),
    Timestamp(DateTime<Utc>),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => write!(f, "{text:?}"),
            FieldValue::Bytes(bytes) => write!(f, "<{} bytes>", bytes.len()),
            FieldValue::UInt(value) => write!(f, "{value}"),
            FieldValue::Timestamp(timestamp) => write!(f, "{}", timestamp.to_rfc3339()),
        }
    }
}

/// The JSON-origin form of one expectation entry.
///
/// Holds the resolved tag plus decoded values for exactly the fields the
/// test author declared. Fields left out of the expectation are wildcards
/// and never cause a comparison failure, which lets authors start with
/// just `{"type": ...}` and add fields as confidence grows.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpectedFrame {
    pub type_tag: &'static str,
    pub fields: BTreeMap<&'static str, FieldValue>,
}

impl ExpectedFrame {
    /// Expectation carrying a tag only; every field is a wildcard.
    pub fn of_type(type_tag: &'static str) -> Self {
        Self {
            type_tag,
            fields: BTreeMap::new(),
        }
    }

    /// Add a declared field to this expectation.
    pub fn with_field(mut self, name: &'static str, value: FieldValue) -> Self {
        self.fields.insert(name, value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tags() {
        let text = Frame::Text(TextFrame { text: "hello".to_string() });
        assert_eq!(text.type_tag(), "TextFrame");
        assert_eq!(Frame::Start.type_tag(), "StartFrame");
        assert_eq!(Frame::End.type_tag(), "EndFrame");
        assert!(Frame::End.is_end());
        assert!(!Frame::Start.is_end());
    }

    #[test]
    fn test_field_map_omits_absent_timestamp() {
        let frame = Frame::Transcription(TranscriptionFrame {
            text: "hi".to_string(),
            user_id: "user_1".to_string(),
            timestamp: None,
        });
        let fields = frame.field_map();
        assert_eq!(fields.get("text"), Some(&FieldValue::Text("hi".to_string())));
        assert!(!fields.contains_key("timestamp"));
    }

    #[test]
    fn test_field_map_audio() {
        let frame = Frame::OutputAudioRaw(OutputAudioRawFrame {
            audio: vec![1, 2, 3],
            sample_rate: 16000,
            num_channels: 1,
        });
        let fields = frame.field_map();
        assert_eq!(fields.get("audio"), Some(&FieldValue::Bytes(vec![1, 2, 3])));
        assert_eq!(fields.get("sample_rate"), Some(&FieldValue::UInt(16000)));
        assert_eq!(fields.get("num_channels"), Some(&FieldValue::UInt(1)));
    }

    #[test]
    fn test_direction_display() {
        assert_eq!(FrameDirection::Downstream.to_string(), "downstream");
        assert_eq!(FrameDirection::Upstream.to_string(), "upstream");
    }
}
