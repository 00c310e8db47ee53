//! Intake engine configuration

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::ai::AiConfig;
use super::error::ValidationError;
use crate::application::IntakeConfig;

/// Where round snapshots are kept.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process memory; lost on restart
    #[default]
    Memory,
    /// One YAML file per round under `storage_path`
    File,
}

/// Intake engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Deadline for each extraction or drafting call, retries included
    #[serde(default = "default_capability_timeout")]
    pub capability_timeout_secs: u64,

    /// Largest accepted email or reply, in bytes
    #[serde(default = "default_max_message_bytes")]
    pub max_message_bytes: usize,

    #[serde(default)]
    pub storage: StorageBackend,

    #[serde(default = "default_storage_path")]
    pub storage_path: PathBuf,

    /// Signature line of drafted emails
    #[serde(default = "default_signature")]
    pub email_signature: String,
}

impl EngineConfig {
    pub fn capability_timeout(&self) -> Duration {
        Duration::from_secs(self.capability_timeout_secs)
    }

    /// Handler settings, taking retry policy from the AI section.
    pub fn intake_config(&self, ai: &AiConfig) -> IntakeConfig {
        IntakeConfig {
            capability_timeout: self.capability_timeout(),
            max_retries: ai.max_retries,
            retry_backoff: ai.retry_backoff(),
            max_message_bytes: self.max_message_bytes,
        }
    }

    /// Validate engine configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.capability_timeout_secs == 0 || self.capability_timeout_secs > 600 {
            return Err(ValidationError::InvalidCapabilityTimeout);
        }
        if self.max_message_bytes == 0 {
            return Err(ValidationError::InvalidMessageLimit);
        }
        if self.storage == StorageBackend::File && self.storage_path.as_os_str().is_empty() {
            return Err(ValidationError::MissingStoragePath);
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            capability_timeout_secs: default_capability_timeout(),
            max_message_bytes: default_max_message_bytes(),
            storage: StorageBackend::default(),
            storage_path: default_storage_path(),
            email_signature: default_signature(),
        }
    }
}

fn default_capability_timeout() -> u64 {
    45
}

fn default_max_message_bytes() -> usize {
    100_000
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("./data/events")
}

fn default_signature() -> String {
    "The Event Planning Team".to_string()
}
