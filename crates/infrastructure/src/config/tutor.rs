//! Request-flow limits.

use std::time::Duration;

use application::PronunciationConfig;
use serde::{Deserialize, Serialize};

/// Limits applied around provider calls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TutorConfig {
    /// Timeout for a single provider call in milliseconds
    #[serde(default = "default_port_timeout_ms")]
    pub port_timeout_ms: u64,

    /// Transcription/synthesis calls allowed to run at once
    #[serde(default = "default_max_concurrent_inference")]
    pub max_concurrent_inference: usize,
}

const fn default_port_timeout_ms() -> u64 {
    30_000
}

const fn default_max_concurrent_inference() -> usize {
    2
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            port_timeout_ms: default_port_timeout_ms(),
            max_concurrent_inference: default_max_concurrent_inference(),
        }
    }
}

impl TutorConfig {
    /// Limits for the pronunciation service
    #[must_use]
    pub const fn service_config(&self) -> PronunciationConfig {
        PronunciationConfig {
            port_timeout: Duration::from_millis(self.port_timeout_ms),
            max_concurrent_inference: self.max_concurrent_inference,
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.port_timeout_ms == 0 {
            return Err("port_timeout_ms must be greater than 0".to_string());
        }
        if self.max_concurrent_inference == 0 {
            return Err("max_concurrent_inference must be greater than 0".to_string());
        }
        Ok(())
    }
}
