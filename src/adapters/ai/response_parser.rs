//! Parses LLM output into a partial field map.
//!
//! Models do not always follow "JSON only" instructions. The parser strips
//! Markdown code fences, tries the whole text, and falls back to the first
//! balanced `{...}` object embedded in surrounding prose.

use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::event::PartialFieldMap;
use crate::ports::ExtractionError;

/// Parses model output into a partial field map.
///
/// Keys outside the schema are ignored.
pub fn parse_extraction(output: &str) -> Result<PartialFieldMap, ExtractionError> {
    let object = parse_object(output)?;
    let (map, unknown) = PartialFieldMap::from_json_object(&object);
    if !unknown.is_empty() {
        debug!(keys = ?unknown, "Ignoring keys outside the field schema");
    }
    Ok(map)
}

fn parse_object(output: &str) -> Result<Map<String, Value>, ExtractionError> {
    let cleaned = strip_fences(output);

    if let Ok(Value::Object(object)) = serde_json::from_str::<Value>(cleaned) {
        return Ok(object);
    }

    let embedded = first_object(cleaned)
        .ok_or_else(|| ExtractionError::parse("no JSON object in model output"))?;
    match serde_json::from_str::<Value>(embedded) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(ExtractionError::parse("model output is not a JSON object")),
        Err(e) => Err(ExtractionError::parse(format!("invalid JSON in model output: {}", e))),
    }
}

fn strip_fences(output: &str) -> &str {
    let trimmed = output.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Slice of the first balanced `{...}` in `text`, honouring JSON strings.
fn first_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::FieldKey;
    use serde_json::json;

    #[test]
    fn parses_plain_json() {
        let map = parse_extraction(r#"{"location": "Chennai", "budget": null}"#).unwrap();
        assert_eq!(map.get(FieldKey::Location).unwrap().raw, json!("Chennai"));
        assert_eq!(map.get(FieldKey::Budget).unwrap().raw, Value::Null);
    }

    #[test]
    fn strips_code_fences() {
        let output = "```json\n{\"number_of_attendees\": 200}\n```";
        let map = parse_extraction(output).unwrap();
        assert_eq!(map.get(FieldKey::NumberOfAttendees).unwrap().raw, json!(200));
    }

    #[test]
    fn finds_object_inside_prose() {
        let output = "Sure! Here is the data: {\"email\": \"a@b.com\", \"note\": \"use {braces}\"} Hope it helps.";
        let map = parse_extraction(output).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(FieldKey::Email).unwrap().raw, json!("a@b.com"));
    }

    #[test]
    fn rejects_output_without_object() {
        assert!(matches!(
            parse_extraction("I could not find anything."),
            Err(ExtractionError::Parse(_))
        ));
        assert!(parse_extraction("[1, 2, 3]").is_err());
    }

    #[test]
    fn rejects_unbalanced_object() {
        assert!(parse_extraction("here: {\"email\": \"a@b.com\"").is_err());
    }
}
