//! AI provider configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::ai::ExtractorConfig;

/// AI provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Backend serving the extraction model
    #[serde(default)]
    pub provider: AiProvider,

    /// API key for the selected provider
    pub api_key: Option<SecretString>,

    /// Model name; provider default when unset
    pub model: Option<String>,

    /// Base URL override, e.g. for a proxy
    pub base_url: Option<String>,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Per-request HTTP timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on transient failure
    #[serde(default = "default_retries")]
    pub max_retries: u32,

    /// Pause before the first retry, in milliseconds
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff_ms: u64,
}

/// AI provider type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    #[default]
    Groq,
    OpenAI,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    /// Check if an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().is_empty())
    }

    /// Builds the extractor settings for the configured provider.
    pub fn extractor_config(&self) -> Result<ExtractorConfig, ValidationError> {
        let api_key = self
            .api_key
            .as_ref()
            .filter(|_| self.has_api_key())
            .ok_or(ValidationError::MissingRequired("EVENT_INTAKE__AI__API_KEY"))?
            .expose_secret()
            .clone();

        let mut config = match self.provider {
            AiProvider::Groq => ExtractorConfig::groq(api_key),
            AiProvider::OpenAI => ExtractorConfig::openai(api_key),
        }
        .with_temperature(self.temperature)
        .with_timeout(self.timeout());

        if let Some(model) = &self.model {
            config = config.with_model(model.clone());
        }
        if let Some(url) = &self.base_url {
            config = config.with_base_url(url.clone());
        }
        Ok(config)
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_api_key() {
            return Err(ValidationError::MissingRequired("EVENT_INTAKE__AI__API_KEY"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidTemperature);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: AiProvider::default(),
            api_key: None,
            model: None,
            base_url: None,
            temperature: default_temperature(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
            retry_backoff_ms: default_retry_backoff(),
        }
    }
}

fn default_temperature() -> f32 {
    0.2
}

fn default_timeout() -> u64 {
    30
}

fn default_retries() -> u32 {
    2
}

fn default_retry_backoff() -> u64 {
    500
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{GROQ_DEFAULT_MODEL, OPENAI_BASE_URL};

    fn with_key() -> AiConfig {
        AiConfig {
            api_key: Some(SecretString::new("gsk-test".to_string())),
            ..Default::default()
        }
    }

    #[test]
    fn test_ai_config_defaults() {
        let config = AiConfig::default();
        assert_eq!(config.provider, AiProvider::Groq);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.max_retries, 2);
    }

    #[test]
    fn test_validation_requires_api_key() {
        assert_eq!(
            AiConfig::default().validate(),
            Err(ValidationError::MissingRequired("EVENT_INTAKE__AI__API_KEY"))
        );

        let empty = AiConfig {
            api_key: Some(SecretString::new(String::new())),
            ..Default::default()
        };
        assert!(empty.validate().is_err());
        assert!(with_key().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_temperature() {
        let config = AiConfig {
            temperature: 3.5,
            ..with_key()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidTemperature));
    }

    #[test]
    fn test_extractor_config_uses_provider_defaults() {
        let groq = with_key().extractor_config().unwrap();
        assert_eq!(groq.model, GROQ_DEFAULT_MODEL);

        let openai = AiConfig {
            provider: AiProvider::OpenAI,
            model: Some("gpt-4o".to_string()),
            ..with_key()
        }
        .extractor_config()
        .unwrap();
        assert_eq!(openai.base_url, OPENAI_BASE_URL);
        assert_eq!(openai.model, "gpt-4o");
    }

    #[test]
    fn test_debug_output_hides_api_key() {
        let rendered = format!("{:?}", with_key());
        assert!(!rendered.contains("gsk-test"));
    }
}
