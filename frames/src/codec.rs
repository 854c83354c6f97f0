//! JSON codec: wire objects to typed frames and back, driven by the registry

use std::collections::BTreeMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};
use tracing::warn;

use crate::errors::{FrameError, FrameResult};
use crate::registry::{self, FieldDefault, FieldKind, FrameShape};
use crate::types::{
    ExpectedFrame, FieldValue, Frame, OutputAudioRawFrame, TextFrame, TranscriptionFrame,
};

/// Materialize one typed frame from a raw JSON object.
///
/// Required fields must be present, optional fields fall back to their
/// declared defaults, and special encodings (base64 payloads, textual
/// timestamps) are decoded here. Fields not declared in the shape are
/// ignored with a warning. Deterministic: the same JSON always yields a
/// structurally identical frame.
pub fn to_frame(value: &Value) -> FrameResult<Frame> {
    let (shape, object) = resolve_shape(value)?;

    let mut fields = BTreeMap::new();
    for spec in &shape.fields {
        match object.get(spec.name) {
            Some(raw) => {
                fields.insert(spec.name, decode_field(spec.name, spec.kind, raw)?);
            }
            None => match &spec.default {
                FieldDefault::Required => {
                    return Err(FrameError::MissingField { tag: shape.tag, field: spec.name });
                }
                FieldDefault::Value(value) => {
                    fields.insert(spec.name, value.clone());
                }
                FieldDefault::Absent => {}
            },
        }
    }
    warn_undeclared(shape, object);

    build_frame(shape.tag, fields)
}

/// Materialize one expectation entry from a raw JSON object.
///
/// Same tag resolution and field decoding as [`to_frame`], but required
/// fields may be omitted and no defaults are substituted: only the fields
/// the author explicitly declared are recorded, everything else stays a
/// wildcard.
pub fn to_expected(value: &Value) -> FrameResult<ExpectedFrame> {
    let (shape, object) = resolve_shape(value)?;

    let mut fields = BTreeMap::new();
    for spec in &shape.fields {
        if let Some(raw) = object.get(spec.name) {
            fields.insert(spec.name, decode_field(spec.name, spec.kind, raw)?);
        }
    }
    warn_undeclared(shape, object);

    Ok(ExpectedFrame { type_tag: shape.tag, fields })
}

/// Materialize an ordered frame sequence, failing atomically on the first
/// bad element with its index attached.
pub fn load_sequence(values: &[Value]) -> FrameResult<Vec<Frame>> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| to_frame(value).map_err(|e| e.at_index(index)))
        .collect()
}

/// Materialize an ordered expectation sequence; same atomicity as
/// [`load_sequence`].
pub fn load_expected_sequence(values: &[Value]) -> FrameResult<Vec<ExpectedFrame>> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| to_expected(value).map_err(|e| e.at_index(index)))
        .collect()
}

/// Canonical wire form of a frame: tag plus encoded fields, with absent
/// optionals omitted. `to_frame(&frame_to_json(f))` reproduces `f` for
/// every variant.
pub fn frame_to_json(frame: &Frame) -> Value {
    let mut object = Map::new();
    object.insert("type".to_string(), Value::String(frame.type_tag().to_string()));
    for (name, value) in frame.field_map() {
        object.insert(name.to_string(), encode_field(&value));
    }
    Value::Object(object)
}

// Frames and field values serialize to their canonical wire form, so a
// captured report written with serde round-trips through `to_frame`.
impl serde::Serialize for Frame {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        frame_to_json(self).serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for Frame {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        to_frame(&value).map_err(serde::de::Error::custom)
    }
}

impl serde::Serialize for FieldValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        encode_field(self).serialize(serializer)
    }
}

fn resolve_shape(value: &Value) -> FrameResult<(&'static FrameShape, &Map<String, Value>)> {
    let object = value.as_object().ok_or_else(|| {
        FrameError::malformed("(frame)", format!("expected a JSON object, got {}", json_kind(value)))
    })?;
    let tag = match object.get("type") {
        None => return Err(FrameError::MissingTypeTag),
        Some(Value::String(tag)) => tag,
        Some(other) => {
            return Err(FrameError::malformed(
                "type",
                format!("expected a string, got {}", json_kind(other)),
            ));
        }
    };
    let shape = registry::shape_for(tag)?;
    Ok((shape, object))
}

fn decode_field(name: &str, kind: FieldKind, raw: &Value) -> FrameResult<FieldValue> {
    match kind {
        FieldKind::Text => match raw.as_str() {
            Some(text) => Ok(FieldValue::Text(text.to_string())),
            None => Err(FrameError::malformed(name, format!("expected a string, got {}", json_kind(raw)))),
        },
        FieldKind::Base64Bytes => {
            let text = raw.as_str().ok_or_else(|| {
                FrameError::malformed(name, format!("expected base64 text, got {}", json_kind(raw)))
            })?;
            BASE64
                .decode(text)
                .map(FieldValue::Bytes)
                .map_err(|e| FrameError::malformed(name, format!("invalid base64: {e}")))
        }
        FieldKind::UInt => match raw.as_u64() {
            Some(value) => Ok(FieldValue::UInt(value)),
            None => Err(FrameError::malformed(
                name,
                format!("expected an unsigned integer, got {}", json_kind(raw)),
            )),
        },
        FieldKind::Timestamp => decode_timestamp(name, raw).map(FieldValue::Timestamp),
    }
}

fn decode_timestamp(name: &str, raw: &Value) -> FrameResult<DateTime<Utc>> {
    if let Some(text) = raw.as_str() {
        return DateTime::parse_from_rfc3339(text)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| FrameError::malformed(name, format!("invalid ISO-8601 timestamp: {e}")));
    }
    if let Some(seconds) = raw.as_i64() {
        return Utc
            .timestamp_opt(seconds, 0)
            .single()
            .ok_or_else(|| FrameError::malformed(name, format!("epoch seconds out of range: {seconds}")));
    }
    if let Some(seconds) = raw.as_f64() {
        let millis = (seconds * 1000.0).round() as i64;
        return Utc
            .timestamp_millis_opt(millis)
            .single()
            .ok_or_else(|| FrameError::malformed(name, format!("epoch seconds out of range: {seconds}")));
    }
    Err(FrameError::malformed(
        name,
        format!("expected ISO-8601 text or epoch seconds, got {}", json_kind(raw)),
    ))
}

fn encode_field(value: &FieldValue) -> Value {
    match value {
        FieldValue::Text(text) => Value::String(text.clone()),
        FieldValue::Bytes(bytes) => Value::String(BASE64.encode(bytes)),
        FieldValue::UInt(value) => Value::from(*value),
        FieldValue::Timestamp(timestamp) => Value::String(timestamp.to_rfc3339()),
    }
}

fn warn_undeclared(shape: &FrameShape, object: &Map<String, Value>) {
    for key in object.keys() {
        if key != "type" && shape.field(key).is_none() {
            warn!("Ignoring field `{}` not declared in the {} shape", key, shape.tag);
        }
    }
}

fn build_frame(tag: &'static str, mut fields: BTreeMap<&'static str, FieldValue>) -> FrameResult<Frame> {
    match tag {
        registry::TAG_TEXT => Ok(Frame::Text(TextFrame { text: take_text(&mut fields, "text")? })),
        registry::TAG_START => Ok(Frame::Start),
        registry::TAG_END => Ok(Frame::End),
        registry::TAG_OUTPUT_AUDIO_RAW => {
            let sample_rate = take_uint(&mut fields, "sample_rate")?;
            let num_channels = take_uint(&mut fields, "num_channels")?;
            Ok(Frame::OutputAudioRaw(OutputAudioRawFrame {
                audio: take_bytes(&mut fields, "audio")?,
                sample_rate: u32::try_from(sample_rate)
                    .map_err(|_| FrameError::malformed("sample_rate", format!("out of range: {sample_rate}")))?,
                num_channels: u16::try_from(num_channels)
                    .map_err(|_| FrameError::malformed("num_channels", format!("out of range: {num_channels}")))?,
            }))
        }
        registry::TAG_TRANSCRIPTION => Ok(Frame::Transcription(TranscriptionFrame {
            text: take_text(&mut fields, "text")?,
            user_id: take_text(&mut fields, "user_id")?,
            timestamp: take_timestamp(&mut fields, "timestamp")?,
        })),
        other => Err(FrameError::UnknownFrameType { tag: other.to_string() }),
    }
}

fn take_text(fields: &mut BTreeMap<&'static str, FieldValue>, name: &'static str) -> FrameResult<String> {
    match fields.remove(name) {
        Some(FieldValue::Text(text)) => Ok(text),
        other => Err(FrameError::malformed(name, format!("decoded to unexpected value {other:?}"))),
    }
}

fn take_bytes(fields: &mut BTreeMap<&'static str, FieldValue>, name: &'static str) -> FrameResult<Vec<u8>> {
    match fields.remove(name) {
        Some(FieldValue::Bytes(bytes)) => Ok(bytes),
        other => Err(FrameError::malformed(name, format!("decoded to unexpected value {other:?}"))),
    }
}

fn take_uint(fields: &mut BTreeMap<&'static str, FieldValue>, name: &'static str) -> FrameResult<u64> {
    match fields.remove(name) {
        Some(FieldValue::UInt(value)) => Ok(value),
        other => Err(FrameError::malformed(name, format!("decoded to unexpected value {other:?}"))),
    }
}

fn take_timestamp(
    fields: &mut BTreeMap<&'static str, FieldValue>,
    name: &'static str,
) -> FrameResult<Option<DateTime<Utc>>> {
    match fields.remove(name) {
        Some(FieldValue::Timestamp(timestamp)) => Ok(Some(timestamp)),
        None => Ok(None),
        other => Err(FrameError::malformed(name, format!("decoded to unexpected value {other:?}"))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
