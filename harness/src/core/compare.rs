//! Structural comparison of captured output against an expectation

use std::collections::BTreeMap;

use serde::Serialize;

use frames::{ExpectedFrame, FieldValue, Frame};

/// Expected vs. actual value for one mismatched field
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldDiff {
    pub expected: FieldValue,
    /// `None` when the actual frame carries no value for the field
    pub actual: Option<FieldValue>,
}

/// Per-position comparison record.
///
/// A `None` type on either side means that sequence ended before this
/// position; such an entry marks the length discrepancy itself.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Diagnostic {
    pub position: usize,
    pub expected_type: Option<String>,
    pub actual_type: Option<String>,
    pub type_match: bool,
    pub field_mismatches: BTreeMap<String, FieldDiff>,
}

impl Diagnostic {
    pub fn passed(&self) -> bool {
        self.type_match && self.field_mismatches.is_empty()
    }

    /// Whether this entry marks a position past the end of one sequence.
    pub fn is_length_marker(&self) -> bool {
        self.expected_type.is_none() || self.actual_type.is_none()
    }
}

/// Verdict and per-position diagnostics for one comparison
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Comparison {
    pub passed: bool,
    pub diagnostics: Vec<Diagnostic>,
}

/// Compare captured frames against an expectation, position by position.
///
/// Types must match exactly at every position. Field checks are partial:
/// only fields declared in the expectation are compared, so authors can
/// start from bare `{"type": ...}` entries and tighten them over time.
/// Equality is on decoded values (bytes, not their base64 text). Pure and
/// deterministic; a diagnostic entry is produced for every compared
/// position, passing or not.
pub fn compare(actual: &[Frame], expected: &[ExpectedFrame]) -> Comparison {
    let overlap = actual.len().min(expected.len());
    let mut diagnostics = Vec::with_capacity(overlap + 1);

    for position in 0..overlap {
        diagnostics.push(compare_position(position, &actual[position], &expected[position]));
    }

    let lengths_match = actual.len() == expected.len();
    if !lengths_match {
        diagnostics.push(Diagnostic {
            position: overlap,
            expected_type: expected.get(overlap).map(|e| e.type_tag.to_string()),
            actual_type: actual.get(overlap).map(|f| f.type_tag().to_string()),
            type_match: false,
            field_mismatches: BTreeMap::new(),
        });
    }

    let passed = lengths_match && diagnostics.iter().all(Diagnostic::passed);
    Comparison { passed, diagnostics }
}

fn compare_position(position: usize, actual: &Frame, expected: &ExpectedFrame) -> Diagnostic {
    let type_match = actual.type_tag() == expected.type_tag;
    let mut field_mismatches = BTreeMap::new();

    // A tag mismatch fails the position outright; field values are only
    // meaningful between frames of the same type.
    if type_match {
        let actual_fields = actual.field_map();
        for (name, expected_value) in &expected.fields {
            let actual_value = actual_fields.get(name);
            if actual_value != Some(expected_value) {
                field_mismatches.insert(
                    name.to_string(),
                    FieldDiff {
                        expected: expected_value.clone(),
                        actual: actual_value.cloned(),
                    },
                );
            }
        }
    }

    Diagnostic {
        position,
        expected_type: Some(expected.type_tag.to_string()),
        actual_type: Some(actual.type_tag().to_string()),
        type_match,
        field_mismatches,
    }
}
