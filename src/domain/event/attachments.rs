//! Attachment references mentioned in inbound text.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// Extensions recognised as attachment references.
pub const ATTACHMENT_EXTENSIONS: [&str; 6] = ["pdf", "docx", "xlsx", "pptx", "txt", "zip"];

static ATTACHMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b[\w][\w.\-]*\.(?:pdf|docx|xlsx|pptx|txt|zip)\b")
        .expect("attachment pattern is valid")
});

/// Collects file names such as `floorplan.pdf` mentioned in `text`.
///
/// Results are deduplicated case-insensitively and sorted.
pub fn extract_attachments(text: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut names = Vec::new();
    for m in ATTACHMENT.find_iter(text) {
        let name = m.as_str();
        if seen.insert(name.to_lowercase()) {
            names.push(name.to_string());
        }
    }
    names.sort_by_key(|name| name.to_lowercase());
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_known_extensions() {
        let text = "Please see agenda.pdf and Budget_2025.xlsx; the floor plan is in venue-map.PDF.";
        assert_eq!(
            extract_attachments(text),
            vec!["agenda.pdf", "Budget_2025.xlsx", "venue-map.PDF"]
        );
    }

    #[test]
    fn deduplicates_ignoring_case() {
        let text = "agenda.pdf again: AGENDA.PDF";
        assert_eq!(extract_attachments(text), vec!["agenda.pdf"]);
    }

    #[test]
    fn ignores_other_extensions_and_plain_words() {
        assert!(extract_attachments("photo.jpg, a pdf, script.exe").is_empty());
    }

    #[test]
    fn does_not_match_inside_longer_extensions() {
        assert!(extract_attachments("archive.zipx").is_empty());
    }
}
