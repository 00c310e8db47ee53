//! Email mode selector.
//!
//! Picks which kind of outbound email the drafting capability should write.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::completion::Completion;
use super::fields::EventFields;
use super::schema::FieldKey;

/// Drafting input for the outbound email of a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum EmailMode {
    /// Ask the client for the listed fields, in schema order.
    RequestMoreInfo { missing_fields: Vec<FieldKey> },
    /// Thank the client and summarise every field.
    ThankYou { fields: EventFields },
}

/// Name of an email mode without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailModeKind {
    RequestMoreInfo,
    ThankYou,
}

impl EmailMode {
    pub fn kind(&self) -> EmailModeKind {
        match self {
            EmailMode::RequestMoreInfo { .. } => EmailModeKind::RequestMoreInfo,
            EmailMode::ThankYou { .. } => EmailModeKind::ThankYou,
        }
    }
}

impl fmt::Display for EmailModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EmailModeKind::RequestMoreInfo => "request_more_info",
            EmailModeKind::ThankYou => "thank_you",
        })
    }
}

/// Selects the email mode from a completion verdict.
pub fn select_mode(completion: &Completion, fields: &EventFields) -> EmailMode {
    if completion.is_complete() {
        EmailMode::ThankYou {
            fields: fields.clone(),
        }
    } else {
        EmailMode::RequestMoreInfo {
            missing_fields: completion.missing_fields().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::completion::evaluate;
    use crate::domain::event::schema::FieldValue;

    #[test]
    fn incomplete_record_requests_more_info() {
        let fields = EventFields::new();
        let mode = select_mode(&evaluate(&fields), &fields);
        assert_eq!(
            mode,
            EmailMode::RequestMoreInfo {
                missing_fields: FieldKey::ALL.to_vec()
            }
        );
        assert_eq!(mode.kind(), EmailModeKind::RequestMoreInfo);
    }

    #[test]
    fn complete_record_gets_thank_you_with_all_fields() {
        let fields: EventFields = FieldKey::ALL
            .into_iter()
            .map(|key| (key, FieldValue::Text("x".into())))
            .collect();
        let mode = select_mode(&evaluate(&fields), &fields);
        match mode {
            EmailMode::ThankYou { fields: summary } => assert_eq!(summary.set_count(), 11),
            other => panic!("unexpected mode {:?}", other),
        }
    }

    #[test]
    fn kind_displays_as_wire_name() {
        assert_eq!(EmailModeKind::ThankYou.to_string(), "thank_you");
    }
}
