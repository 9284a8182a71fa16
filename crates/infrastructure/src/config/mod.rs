//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings
//! - `providers`: Strategy provider selection
//! - `tutor`: Timeouts and inference concurrency for the request flows
//!
//! Provider backend sections reuse the config types of `ai_speech` and `ai_core`.

mod providers;
mod server;
mod tutor;

use std::path::{Path, PathBuf};

use ai_core::InferenceConfig;
use ai_speech::{
    CommandRecognizerConfig, EspeakConfig, HttpRecognizerConfig, OpenAiTtsConfig, PiperConfig,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use providers::{
    FeedbackProvider, PhonemizerProvider, ProvidersConfig, SynthesisProvider,
    TranscriptionProvider,
};
pub use server::{LogFormat, ServerConfig};
pub use tutor::TutorConfig;

use crate::telemetry::TelemetryConfig;

/// Environment variable overriding the config file location
pub const CONFIG_PATH_ENV: &str = "TUTOR_CONFIG";

/// Prefix of configuration environment variables (`TUTOR_SERVER__PORT`)
pub const ENV_PREFIX: &str = "TUTOR";

/// Config file read when `TUTOR_CONFIG` is unset
const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,

    /// Active strategy providers
    #[serde(default)]
    pub providers: ProvidersConfig,

    /// Request-flow limits
    #[serde(default)]
    pub tutor: TutorConfig,

    /// Local recognizer executable (`providers.transcription = "command"`)
    #[serde(default)]
    pub recognizer_command: CommandRecognizerConfig,

    /// Remote recognizer (`providers.transcription = "http"`)
    #[serde(default)]
    pub recognizer_http: HttpRecognizerConfig,

    /// eSpeak NG phonemizer
    #[serde(default)]
    pub espeak: EspeakConfig,

    /// Piper TTS (`providers.synthesis = "piper"`)
    #[serde(default)]
    pub piper: PiperConfig,

    /// OpenAI-compatible TTS (`providers.synthesis = "openai"`)
    #[serde(default)]
    pub openai_tts: OpenAiTtsConfig,

    /// LLM backend for the `ollama` and `llama-cpp` feedback providers
    ///
    /// When absent, the preset matching the selected provider is used.
    #[serde(default)]
    pub inference: Option<InferenceConfig>,
}

impl AppConfig {
    /// Load configuration from defaults, the config file and environment
    ///
    /// The file is `$TUTOR_CONFIG` if set, else `config.toml` in the working
    /// directory; a missing file is not an error. Environment variables use
    /// the `TUTOR_` prefix and `__` as section separator.
    pub fn load() -> Result<Self, config::ConfigError> {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from);
        Self::load_from(&path)
    }

    /// Load configuration with an explicit config file path
    pub fn load_from(path: &Path) -> Result<Self, config::ConfigError> {
        debug!(path = %path.display(), "Loading configuration");

        let builder = config::Config::builder()
            .add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins")
                    .with_list_parse_key("recognizer_command.extra_args")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Parse configuration from TOML text, without environment overrides
    pub fn from_toml_str(toml: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    /// Inference settings for the selected feedback provider
    #[must_use]
    pub fn inference_config(&self) -> InferenceConfig {
        self.inference.clone().unwrap_or_else(|| {
            if self.providers.feedback == FeedbackProvider::LlamaCpp {
                InferenceConfig::llama_cpp()
            } else {
                InferenceConfig::default()
            }
        })
    }

    /// Validate the sections used by the selected providers
    ///
    /// # Errors
    ///
    /// Returns the name of the failing section and the reason.
    pub fn validate(&self) -> Result<(), (&'static str, String)> {
        self.server.validate().map_err(|e| ("server", e))?;
        self.tutor.validate().map_err(|e| ("tutor", e))?;

        match self.providers.transcription {
            TranscriptionProvider::Command => self
                .recognizer_command
                .validate()
                .map_err(|e| ("recognizer_command", e))?,
            TranscriptionProvider::Http => self
                .recognizer_http
                .validate()
                .map_err(|e| ("recognizer_http", e))?,
        }

        match self.providers.phonemizer {
            PhonemizerProvider::Espeak => self.espeak.validate().map_err(|e| ("espeak", e))?,
        }

        if self.providers.feedback.uses_inference() {
            self.inference_config()
                .validate()
                .map_err(|e| ("inference", e))?;
        }

        match self.providers.synthesis {
            SynthesisProvider::Piper => self.piper.validate().map_err(|e| ("piper", e))?,
            SynthesisProvider::Openai => {
                self.openai_tts.validate().map_err(|e| ("openai_tts", e))?;
            },
        }

        Ok(())
    }
}
