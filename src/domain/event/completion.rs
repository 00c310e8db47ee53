//! Completion evaluator - missing fields and the complete verdict.

use serde::{Deserialize, Serialize};

use super::fields::EventFields;
use super::schema::FieldKey;

/// Result of evaluating a set of fields against the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    missing_fields: Vec<FieldKey>,
}

impl Completion {
    /// Keys currently unset, in schema order.
    pub fn missing_fields(&self) -> &[FieldKey] {
        &self.missing_fields
    }

    /// True iff no field is missing.
    pub fn is_complete(&self) -> bool {
        self.missing_fields.is_empty()
    }

    pub fn into_missing_fields(self) -> Vec<FieldKey> {
        self.missing_fields
    }
}

/// Evaluates which schema fields are unset.
///
/// Every field is required; there are no optional keys.
pub fn evaluate(fields: &EventFields) -> Completion {
    let missing_fields = FieldKey::ALL
        .into_iter()
        .filter(|key| !fields.is_set(*key))
        .collect();
    Completion { missing_fields }
}
