//! Field containers: the cumulative record fields and a round's partial map.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::schema::{FieldKey, FieldValue};

/// Validated field values of an event record.
///
/// A key absent from the map is "unset". Iteration is in schema order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventFields(BTreeMap<FieldKey, FieldValue>);

impl EventFields {
    /// Creates an all-unset field set.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: FieldKey) -> Option<&FieldValue> {
        self.0.get(&key)
    }

    pub fn is_set(&self, key: FieldKey) -> bool {
        self.0.contains_key(&key)
    }

    /// Number of fields currently set.
    pub fn set_count(&self) -> usize {
        self.0.len()
    }

    /// Iterates set fields in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &FieldValue)> {
        self.0.iter().map(|(k, v)| (*k, v))
    }

    /// All 11 keys as a JSON object, `null` for unset fields.
    pub fn to_json_map(&self) -> Map<String, Value> {
        FieldKey::ALL
            .iter()
            .map(|key| {
                let value = self.get(*key).map(FieldValue::to_json).unwrap_or(Value::Null);
                (key.as_str().to_string(), value)
            })
            .collect()
    }

    pub(crate) fn set(&mut self, key: FieldKey, value: FieldValue) -> Option<FieldValue> {
        self.0.insert(key, value)
    }

    pub(crate) fn clear(&mut self, key: FieldKey) -> Option<FieldValue> {
        self.0.remove(&key)
    }
}

#[cfg(test)]
impl FromIterator<(FieldKey, FieldValue)> for EventFields {
    fn from_iter<I: IntoIterator<Item = (FieldKey, FieldValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A raw value produced by the extraction capability for one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedValue {
    /// Raw value as extracted; validated during merge.
    pub raw: Value,
    /// Extractor confidence in `[0, 1]`, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    /// Where the value came from (e.g. model name or quoted span).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance: Option<String>,
}

impl ExtractedValue {
    pub fn new(raw: Value) -> Self {
        Self {
            raw,
            confidence: None,
            provenance: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence.clamp(0.0, 1.0));
        self
    }

    pub fn with_provenance(mut self, provenance: impl Into<String>) -> Self {
        self.provenance = Some(provenance.into());
        self
    }
}

/// Partial field map produced by one extraction call.
///
/// Keys absent from the map were not mentioned in the text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartialFieldMap(BTreeMap<FieldKey, ExtractedValue>);

impl PartialFieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert of a raw value.
    pub fn with(mut self, key: FieldKey, raw: impl Into<Value>) -> Self {
        self.insert(key, ExtractedValue::new(raw.into()));
        self
    }

    pub fn insert(&mut self, key: FieldKey, value: ExtractedValue) {
        self.0.insert(key, value);
    }

    pub fn get(&self, key: FieldKey) -> Option<&ExtractedValue> {
        self.0.get(&key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates entries in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &ExtractedValue)> {
        self.0.iter().map(|(k, v)| (*k, v))
    }

    /// Builds a partial map from a JSON object keyed by wire names.
    ///
    /// Returns the map and the keys that are not part of the schema.
    pub fn from_json_object(object: &Map<String, Value>) -> (Self, Vec<String>) {
        let mut map = Self::new();
        let mut unknown = Vec::new();
        for (name, raw) in object {
            match name.parse::<FieldKey>() {
                Ok(key) => map.insert(key, ExtractedValue::new(raw.clone())),
                Err(_) => unknown.push(name.clone()),
            }
        }
        (map, unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_fields_are_all_unset() {
        let fields = EventFields::new();
        assert_eq!(fields.set_count(), 0);
        assert!(FieldKey::ALL.iter().all(|k| !fields.is_set(*k)));
    }

    #[test]
    fn json_map_lists_all_keys_with_nulls() {
        let mut fields = EventFields::new();
        fields.set(FieldKey::Location, FieldValue::Text("Chennai".into()));
        let map = fields.to_json_map();
        assert_eq!(map.len(), 11);
        assert_eq!(map["location"], json!("Chennai"));
        assert_eq!(map["budget"], Value::Null);
    }

    #[test]
    fn iteration_follows_schema_order() {
        let mut fields = EventFields::new();
        fields.set(FieldKey::EventEndDate, FieldValue::Text("x".into()));
        fields.set(FieldKey::FullName, FieldValue::Text("y".into()));
        let keys: Vec<FieldKey> = fields.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![FieldKey::FullName, FieldKey::EventEndDate]);
    }

    #[test]
    fn partial_map_from_json_object_splits_unknown_keys() {
        let object = json!({
            "location": "Chennai",
            "company": "Acme",
            "number_of_attendees": 200
        });
        let (map, unknown) = PartialFieldMap::from_json_object(object.as_object().unwrap());
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(FieldKey::Location).unwrap().raw, json!("Chennai"));
        assert_eq!(unknown, vec!["company".to_string()]);
    }

    #[test]
    fn confidence_is_clamped() {
        let value = ExtractedValue::new(json!("x")).with_confidence(1.7);
        assert_eq!(value.confidence, Some(1.0));
    }

    #[test]
    fn event_fields_serde_round_trip() {
        let mut fields = EventFields::new();
        fields.set(FieldKey::NumberOfAttendees, FieldValue::Count(200));
        let json = serde_json::to_string(&fields).unwrap();
        let back: EventFields = serde_json::from_str(&json).unwrap();
        assert_eq!(back, fields);
    }
}
