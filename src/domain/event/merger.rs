//! Record merger - folds a round's partial field map into the cumulative fields.
//!
//! # Policy
//!
//! Applied per key, in schema order:
//!
//! 1. Placeholder values are ignored (the key is treated as not mentioned).
//! 2. Malformed values are dropped and reported; the prior value stays.
//! 3. A valid value for an unset field is adopted.
//! 4. A valid value that differs from the prior one is a correction and wins.
//!    An identical restatement is a no-op.
//! 5. Keys absent from the partial map are untouched.
//!
//! After all keys, `event_end_date >= event_start_date` is re-checked. A
//! violating end date is cleared and reported instead of keeping an
//! inconsistent pair.
//!
//! `merge` is pure: the result depends only on its two arguments, and
//! re-applying the same partial map to the result changes nothing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::fields::{EventFields, PartialFieldMap};
use super::schema::{validate, FieldKey, FieldValue};
use crate::domain::foundation::ValidationError;

/// A field-local validation failure recorded during a merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldFailure {
    pub key: FieldKey,
    /// The raw value that was rejected.
    pub raw: Value,
    /// Catalogue code of the validation error, e.g. `INVALID_FORMAT`.
    #[serde(default)]
    pub code: String,
    pub reason: String,
}

impl FieldFailure {
    fn new(key: FieldKey, raw: Value, error: &ValidationError) -> Self {
        Self {
            key,
            raw,
            code: error.code().to_string(),
            reason: error.to_string(),
        }
    }
}

/// A change applied to the fields by a merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldChange {
    /// A previously unset field was populated.
    Added { key: FieldKey, value: FieldValue },
    /// A set field was replaced by a different valid value.
    Corrected {
        key: FieldKey,
        previous: FieldValue,
        value: FieldValue,
    },
    /// A set field was reverted to unset by a consistency check.
    Cleared { key: FieldKey, previous: FieldValue },
}

impl FieldChange {
    pub fn key(&self) -> FieldKey {
        match self {
            FieldChange::Added { key, .. }
            | FieldChange::Corrected { key, .. }
            | FieldChange::Cleared { key, .. } => *key,
        }
    }
}

/// Result of merging a partial map into prior fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub fields: EventFields,
    pub failures: Vec<FieldFailure>,
    pub changes: Vec<FieldChange>,
}

impl MergeOutcome {
    /// True if any field was cleared by the consistency check.
    pub fn cleared_any(&self) -> bool {
        self.changes
            .iter()
            .any(|c| matches!(c, FieldChange::Cleared { .. }))
    }
}

/// Merges `partial` into `prior` under the deterministic conflict policy.
pub fn merge(prior: &EventFields, partial: &PartialFieldMap) -> MergeOutcome {
    let mut fields = prior.clone();
    let mut failures = Vec::new();
    let mut changes = Vec::new();

    for (key, extracted) in partial.iter() {
        let value = match validate(key, &extracted.raw) {
            Ok(Some(value)) => value,
            Ok(None) => continue,
            Err(error) => {
                failures.push(FieldFailure::new(key, extracted.raw.clone(), &error));
                continue;
            }
        };

        match fields.get(key) {
            None => {
                fields.set(key, value.clone());
                changes.push(FieldChange::Added { key, value });
            }
            Some(previous) if *previous == value => {}
            Some(previous) => {
                let previous = previous.clone();
                fields.set(key, value.clone());
                changes.push(FieldChange::Corrected {
                    key,
                    previous,
                    value,
                });
            }
        }
    }

    enforce_date_order(prior, &mut fields, &mut failures, &mut changes);

    MergeOutcome {
        fields,
        failures,
        changes,
    }
}

fn enforce_date_order(
    prior: &EventFields,
    fields: &mut EventFields,
    failures: &mut Vec<FieldFailure>,
    changes: &mut Vec<FieldChange>,
) {
    let start = fields.get(FieldKey::EventStartDate).and_then(FieldValue::as_date);
    let end = fields.get(FieldKey::EventEndDate).and_then(FieldValue::as_date);
    let (Some(start), Some(end)) = (start, end) else {
        return;
    };
    if end >= start {
        return;
    }

    let Some(rejected) = fields.clear(FieldKey::EventEndDate) else {
        return;
    };
    let error = ValidationError::inconsistent(
        FieldKey::EventEndDate.as_str(),
        FieldKey::EventStartDate.as_str(),
        format!("end date {} precedes start date {}", end, start),
    );
    failures.push(FieldFailure::new(
        FieldKey::EventEndDate,
        rejected.to_json(),
        &error,
    ));

    changes.retain(|c| c.key() != FieldKey::EventEndDate);
    if let Some(previous) = prior.get(FieldKey::EventEndDate) {
        changes.push(FieldChange::Cleared {
            key: FieldKey::EventEndDate,
            previous: previous.clone(),
        });
    }
}
