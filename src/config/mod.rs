//! Environment-driven configuration.
//!
//! Three sections: `server` (listener, logging, CORS), `ai` (extraction
//! model) and `engine` (round processing, storage).
//!
//! ```no_run
//! use event_intake::config::AppConfig;
//!
//! let config = AppConfig::load().expect("configuration loads");
//! config.validate().expect("configuration is valid");
//! println!("listening on {:?}", config.server.socket_addr());
//! ```

mod ai;
mod engine;
mod error;
mod server;

pub use ai::{AiConfig, AiProvider};
pub use engine::{EngineConfig, StorageBackend};
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub ai: AiConfig,

    #[serde(default)]
    pub engine: EngineConfig,
}

impl AppConfig {
    /// Reads `.env` (when present) and then `EVENT_INTAKE__<SECTION>__<KEY>`
    /// variables, e.g. `EVENT_INTAKE__ENGINE__STORAGE=file`.
    ///
    /// Missing keys fall back to section defaults; only type errors fail here.
    /// Call [`AppConfig::validate`] before use.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("EVENT_INTAKE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Returns the first failing section's error.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        self.engine.validate()
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("EVENT_INTAKE__AI__API_KEY", "gsk-test");
    }

    fn clear_env() {
        for key in [
            "EVENT_INTAKE__AI__API_KEY",
            "EVENT_INTAKE__AI__PROVIDER",
            "EVENT_INTAKE__SERVER__PORT",
            "EVENT_INTAKE__SERVER__ENVIRONMENT",
            "EVENT_INTAKE__ENGINE__STORAGE",
            "EVENT_INTAKE__ENGINE__MAX_MESSAGE_BYTES",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("EVENT_INTAKE__AI__PROVIDER", "openai");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.ai.provider, AiProvider::OpenAI);
        assert!(config.ai.has_api_key());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_apply() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.engine.storage, StorageBackend::Memory);
        assert_eq!(config.engine.max_message_bytes, 100_000);
    }

    #[test]
    fn test_nested_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("EVENT_INTAKE__SERVER__PORT", "3000");
        env::set_var("EVENT_INTAKE__SERVER__ENVIRONMENT", "production");
        env::set_var("EVENT_INTAKE__ENGINE__STORAGE", "file");
        env::set_var("EVENT_INTAKE__ENGINE__MAX_MESSAGE_BYTES", "2048");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(config.is_production());
        assert_eq!(config.engine.storage, StorageBackend::File);
        assert_eq!(config.engine.max_message_bytes, 2048);
    }

    #[test]
    fn test_missing_api_key_fails_validation() {
        let config = AppConfig::default();
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("EVENT_INTAKE__AI__API_KEY"))
        );
    }
}
