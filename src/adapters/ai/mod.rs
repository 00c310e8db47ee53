//! AI Extraction Adapters.
//!
//! Implementations of the FieldExtractor port.
//!
//! ## Available Adapters
//!
//! - `OpenAiExtractor` - OpenAI-compatible chat completions (Groq, OpenAI)
//! - `MockFieldExtractor` - Configurable mock for testing

mod mock_extractor;
mod openai_extractor;
mod prompts;
mod response_parser;

pub use mock_extractor::{MockExtraction, MockFieldExtractor};
pub use openai_extractor::{
    ExtractorConfig, OpenAiExtractor, GROQ_BASE_URL, GROQ_DEFAULT_MODEL, OPENAI_BASE_URL,
    OPENAI_DEFAULT_MODEL,
};
pub use response_parser::parse_extraction;
