//! Strongly-typed identifier value objects.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

const EVENT_ID_PREFIX: &str = "REQ";
const EVENT_ID_SUFFIX_LEN: usize = 6;

/// Unique identifier for an event request thread.
///
/// Formatted as `REQ-YYYYMMDD-XXXXXX`: the UTC creation date followed by
/// six uppercase hex characters drawn from a random UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EventId(String);

impl EventId {
    /// Creates a new EventId stamped with today's UTC date.
    pub fn new() -> Self {
        Self::for_date(Utc::now().date_naive())
    }

    /// Creates a new EventId stamped with the given date.
    pub fn for_date(date: NaiveDate) -> Self {
        let suffix: String = Uuid::new_v4()
            .simple()
            .to_string()
            .chars()
            .take(EVENT_ID_SUFFIX_LEN)
            .collect::<String>()
            .to_uppercase();
        Self(format!(
            "{}-{}-{}",
            EVENT_ID_PREFIX,
            date.format("%Y%m%d"),
            suffix
        ))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(s: &str) -> Result<(), ValidationError> {
        let mut parts = s.split('-');
        let (Some(prefix), Some(date), Some(suffix), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(ValidationError::invalid_format(
                "event_id",
                "expected REQ-YYYYMMDD-XXXXXX",
            ));
        };

        if prefix != EVENT_ID_PREFIX {
            return Err(ValidationError::invalid_format(
                "event_id",
                format!("prefix must be {}", EVENT_ID_PREFIX),
            ));
        }
        if NaiveDate::parse_from_str(date, "%Y%m%d").is_err() {
            return Err(ValidationError::invalid_format(
                "event_id",
                "date segment must be YYYYMMDD",
            ));
        }
        let suffix_ok = suffix.len() == EVENT_ID_SUFFIX_LEN
            && suffix
                .chars()
                .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c));
        if !suffix_ok {
            return Err(ValidationError::invalid_format(
                "event_id",
                "suffix must be 6 uppercase hex characters",
            ));
        }
        Ok(())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EventId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::validate(s)?;
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for EventId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::validate(&value)?;
        Ok(Self(value))
    }
}

impl From<EventId> for String {
    fn from(id: EventId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_id_uses_request_format() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        let id = EventId::for_date(date);
        let s = id.to_string();
        assert!(s.starts_with("REQ-20250701-"));
        assert_eq!(s.len(), "REQ-20250701-".len() + 6);
    }

    #[test]
    fn generated_event_ids_are_unique() {
        let a = EventId::new();
        let b = EventId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn event_id_parses_from_valid_string() {
        let id: EventId = "REQ-20250701-A1B2C3".parse().unwrap();
        assert_eq!(id.as_str(), "REQ-20250701-A1B2C3");
    }

    #[test]
    fn event_id_round_trips_generated_value() {
        let id = EventId::new();
        let parsed: EventId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn event_id_rejects_wrong_prefix() {
        assert!("EVT-20250701-A1B2C3".parse::<EventId>().is_err());
    }

    #[test]
    fn event_id_rejects_bad_date() {
        assert!("REQ-20251301-A1B2C3".parse::<EventId>().is_err());
    }

    #[test]
    fn event_id_rejects_lowercase_suffix() {
        assert!("REQ-20250701-a1b2c3".parse::<EventId>().is_err());
    }

    #[test]
    fn event_id_rejects_extra_segments() {
        assert!("REQ-20250701-A1B2C3-X".parse::<EventId>().is_err());
    }

    #[test]
    fn event_id_serializes_as_plain_string() {
        let id: EventId = "REQ-20250701-A1B2C3".parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"REQ-20250701-A1B2C3\"");
        let back: EventId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn event_id_deserialization_rejects_invalid() {
        let result: Result<EventId, _> = serde_json::from_str("\"nope\"");
        assert!(result.is_err());
    }
}
