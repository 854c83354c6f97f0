//! Shared frame types for the processor test harness
//!
//! Contains the closed frame data model, the process-wide frame type
//! registry, and the JSON codec that materializes frames from raw test
//! data. Harness-internal types (execution capture, comparison
//! diagnostics) live in the `harness` crate.

pub mod codec;
pub mod errors;
pub mod logging;
pub mod registry;
pub mod types;

pub use errors::*;
pub use types::*;

// Re-export the codec and registry surface used across the crate boundary
pub use codec::{frame_to_json, load_expected_sequence, load_sequence, to_expected, to_frame};
pub use registry::{FieldDefault, FieldKind, FieldSpec, FrameShape, known_tags, shape_for};
