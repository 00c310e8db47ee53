//! Language of an event request thread.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The requested language is not one of the supported set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported language: '{0}'")]
pub struct UnsupportedLanguage(pub String);

/// Supported correspondence languages.
///
/// Fixed at record creation; replies are assumed to be in the same language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    English,
    Spanish,
    German,
    French,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Language::English,
        Language::Spanish,
        Language::German,
        Language::French,
    ];

    /// Canonical name used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Spanish => "Spanish",
            Language::German => "German",
            Language::French => "French",
        }
    }

    /// Neural voice used by the text-to-speech collaborator.
    pub fn voice(&self) -> &'static str {
        match self {
            Language::English => "en-US-AriaNeural",
            Language::Spanish => "es-ES-ElviraNeural",
            Language::German => "de-DE-KatjaNeural",
            Language::French => "fr-FR-DeniseNeural",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = UnsupportedLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Language::ALL
            .into_iter()
            .find(|lang| lang.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnsupportedLanguage(s.to_string()))
    }
}
