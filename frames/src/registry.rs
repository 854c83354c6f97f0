//! Frame type registry: the process-wide mapping from wire tag to shape
//!
//! The registry is read-only after initialization and exhaustive over the
//! [`Frame`](crate::types::Frame) variant set. There is no dynamic
//! registration; adding a frame type means adding a shape entry here.

use std::sync::OnceLock;

use crate::errors::{FrameError, FrameResult};
use crate::types::FieldValue;

pub const TAG_TEXT: &str = "TextFrame";
pub const TAG_START: &str = "StartFrame";
pub const TAG_END: &str = "EndFrame";
pub const TAG_OUTPUT_AUDIO_RAW: &str = "OutputAudioRawFrame";
pub const TAG_TRANSCRIPTION: &str = "TranscriptionFrame";

/// Substituted when `sample_rate` is omitted from an audio frame object
pub const DEFAULT_SAMPLE_RATE: u64 = 16000;
/// Substituted when `num_channels` is omitted from an audio frame object
pub const DEFAULT_NUM_CHANNELS: u64 = 1;

/// How a field's JSON value is decoded
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// Plain JSON string
    Text,
    /// Base64 text decoded to raw bytes
    Base64Bytes,
    /// Unsigned JSON integer
    UInt,
    /// ISO-8601 string or epoch-numeric seconds
    Timestamp,
}

/// What happens when a field is absent from the JSON object
#[derive(Clone, Debug, PartialEq)]
pub enum FieldDefault {
    /// Absence fails deserialization with `MissingField`
    Required,
    /// Absence substitutes this fixed value
    Value(FieldValue),
    /// Absence leaves the field unset
    Absent,
}

/// Declaration of one field in a frame shape
#[derive(Clone, Debug, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub default: FieldDefault,
}

impl FieldSpec {
    fn required(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind, default: FieldDefault::Required }
    }

    fn defaulted(name: &'static str, kind: FieldKind, value: FieldValue) -> Self {
        Self { name, kind, default: FieldDefault::Value(value) }
    }

    fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind, default: FieldDefault::Absent }
    }
}

/// Shape of one registered frame variant
#[derive(Clone, Debug, PartialEq)]
pub struct FrameShape {
    pub tag: &'static str,
    pub fields: Vec<FieldSpec>,
}

impl FrameShape {
    /// The declaration for `name`, if the shape carries that field.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }
}

fn shapes() -> &'static [FrameShape] {
    static SHAPES: OnceLock<Vec<FrameShape>> = OnceLock::new();
    SHAPES.get_or_init(|| {
        vec![
            FrameShape {
                tag: TAG_TEXT,
                fields: vec![FieldSpec::required("text", FieldKind::Text)],
            },
            FrameShape { tag: TAG_START, fields: vec![] },
            FrameShape { tag: TAG_END, fields: vec![] },
            FrameShape {
                tag: TAG_OUTPUT_AUDIO_RAW,
                fields: vec![
                    FieldSpec::required("audio", FieldKind::Base64Bytes),
                    FieldSpec::defaulted(
                        "sample_rate",
                        FieldKind::UInt,
                        FieldValue::UInt(DEFAULT_SAMPLE_RATE),
                    ),
                    FieldSpec::defaulted(
                        "num_channels",
                        FieldKind::UInt,
                        FieldValue::UInt(DEFAULT_NUM_CHANNELS),
                    ),
                ],
            },
            FrameShape {
                tag: TAG_TRANSCRIPTION,
                fields: vec![
                    FieldSpec::required("text", FieldKind::Text),
                    FieldSpec::required("user_id", FieldKind::Text),
                    FieldSpec::optional("timestamp", FieldKind::Timestamp),
                ],
            },
        ]
    })
}

/// Look up the shape for a wire tag.
pub fn shape_for(tag: &str) -> FrameResult<&'static FrameShape> {
    shapes()
        .iter()
        .find(|shape| shape.tag == tag)
        .ok_or_else(|| FrameError::UnknownFrameType { tag: tag.to_string() })
}

/// All registered wire tags, in registration order.
pub fn known_tags() -> Vec<&'static str> {
    shapes().iter().map(|shape| shape.tag).collect()
}
