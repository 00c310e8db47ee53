//! Prompt construction for LLM-backed extraction.

use crate::domain::event::FieldKey;
use crate::ports::ExtractionRequest;

const FIELD_GUIDE: &str = "\
- full_name: name of the person making the request (not a company)
- email: contact email address
- phone: contact phone number, keep the country code if given
- location: venue or city, with region or country when given
- event_name: title of the event
- event_type: kind of event (conference, workshop, retreat, wedding, ...)
- number_of_attendees: expected headcount as a number
- number_of_sleeping_rooms: hotel rooms needed as a number (0 if none)
- budget: amount with its currency symbol or code as written, e.g. \"$50000\" or \"25K EUR\"
- event_start_date: first day, formatted YYYY-MM-DD
- event_end_date: last day, formatted YYYY-MM-DD";

/// System prompt shared by initial and reply extraction.
pub fn system_prompt() -> String {
    format!(
        "You read event and meeting request emails and return the requested details \
as a single JSON object with exactly these keys:\n{}\n\n\
Rules:\n\
- Use null for anything the email does not state. Never guess.\n\
- Convert spelled-out numbers to digits and relative or written dates to YYYY-MM-DD.\n\
- Return only the JSON object, with no commentary and no code fences.",
        FIELD_GUIDE
    )
}

/// User prompt for one extraction request.
pub fn user_prompt(request: &ExtractionRequest) -> String {
    let mut prompt = format!("The email is written in {}.\n", request.language);
    if request.is_reply {
        prompt.push_str("This is a reply to our request for more details.\n");
        if !request.focus_fields.is_empty() {
            prompt.push_str(&format!(
                "We asked for: {}.\nAlso report any earlier detail the client corrects.\n",
                field_list(&request.focus_fields)
            ));
        }
    }
    prompt.push_str("\nEMAIL:\n");
    prompt.push_str(&request.text);
    prompt
}

fn field_list(keys: &[FieldKey]) -> String {
    keys.iter()
        .map(FieldKey::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Language;

    #[test]
    fn system_prompt_lists_every_field() {
        let prompt = system_prompt();
        for key in FieldKey::ALL {
            assert!(prompt.contains(key.as_str()), "missing {}", key);
        }
    }

    #[test]
    fn reply_prompt_names_focus_fields() {
        let request = ExtractionRequest::reply(
            "Budget is $5k",
            Language::French,
            vec![FieldKey::Budget, FieldKey::Phone],
        );
        let prompt = user_prompt(&request);
        assert!(prompt.contains("French"));
        assert!(prompt.contains("budget, phone"));
        assert!(prompt.ends_with("Budget is $5k"));
    }

    #[test]
    fn initial_prompt_has_no_focus_section() {
        let prompt = user_prompt(&ExtractionRequest::initial("Hi", Language::English));
        assert!(!prompt.contains("We asked for"));
    }
}
