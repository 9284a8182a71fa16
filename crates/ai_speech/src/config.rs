//! Configuration for speech providers

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Local phoneme recognizer executable
///
/// The executable is invoked as `<executable> --model <model> --input <wav>`
/// and must print the recognized phonemes on stdout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandRecognizerConfig {
    /// Recognizer executable
    #[serde(default = "default_recognizer_executable")]
    pub executable_path: PathBuf,

    /// Model identifier passed to the executable
    #[serde(default = "default_recognizer_model")]
    pub model: String,

    /// Extra arguments appended after the standard ones
    #[serde(default)]
    pub extra_args: Vec<String>,

    /// FFmpeg binary used to normalize uploads
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,
}

/// Remote phoneme recognition endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpRecognizerConfig {
    /// Base URL of the inference API
    #[serde(default = "default_recognizer_base_url")]
    pub base_url: String,

    /// Model identifier appended to `{base_url}/models/`
    #[serde(default = "default_recognizer_model")]
    pub model: String,

    /// Optional bearer token
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// FFmpeg binary used to normalize uploads
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,
}

/// eSpeak NG phonemizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EspeakConfig {
    /// espeak-ng executable
    #[serde(default = "default_espeak_executable")]
    pub executable_path: PathBuf,

    /// eSpeak voice, which selects the language
    #[serde(default = "default_espeak_voice")]
    pub voice: String,

    /// Separate phonemes with spaces (`--sep`)
    ///
    /// Off by default so reference IPA has the same shape as recognizer
    /// output and typed attempts.
    #[serde(default)]
    pub separate_phonemes: bool,
}

/// Piper local TTS
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PiperConfig {
    /// Piper executable
    #[serde(default = "default_piper_executable")]
    pub executable_path: PathBuf,

    /// Voice model (.onnx)
    #[serde(default = "default_piper_model")]
    pub model_path: PathBuf,

    /// Phoneme length scale, above 1.0 speaks slower
    #[serde(default = "default_length_scale")]
    pub length_scale: f32,

    /// Silence between sentences, in seconds
    #[serde(default = "default_sentence_silence")]
    pub sentence_silence: f32,
}

/// OpenAI-compatible TTS endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiTtsConfig {
    /// API key
    #[serde(default)]
    pub api_key: Option<String>,

    /// API base URL (for custom endpoints)
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    /// Text-to-speech model
    #[serde(default = "default_tts_model")]
    pub model: String,

    /// Voice
    #[serde(default = "default_voice")]
    pub voice: String,

    /// Speaking speed (0.25 to 4.0)
    #[serde(default = "default_speed")]
    pub speed: f32,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_recognizer_executable() -> PathBuf {
    PathBuf::from("phoneme-recognizer")
}

fn default_recognizer_model() -> String {
    "Cnam-LMSSC/wav2vec2-french-phonemizer".to_string()
}

fn default_recognizer_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}

fn default_espeak_executable() -> PathBuf {
    PathBuf::from("espeak-ng")
}

fn default_espeak_voice() -> String {
    "fr-fr".to_string()
}

fn default_piper_executable() -> PathBuf {
    PathBuf::from("piper")
}

fn default_piper_model() -> PathBuf {
    PathBuf::from("voices/fr_FR-siwis-medium.onnx")
}

const fn default_length_scale() -> f32 {
    1.0
}

const fn default_sentence_silence() -> f32 {
    0.2
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_tts_model() -> String {
    "tts-1".to_string()
}

fn default_voice() -> String {
    "nova".to_string()
}

const fn default_speed() -> f32 {
    1.0
}

const fn default_timeout_ms() -> u64 {
    30000 // 30 seconds
}

impl Default for CommandRecognizerConfig {
    fn default() -> Self {
        Self {
            executable_path: default_recognizer_executable(),
            model: default_recognizer_model(),
            extra_args: Vec::new(),
            ffmpeg_path: default_ffmpeg_path(),
        }
    }
}

impl Default for HttpRecognizerConfig {
    fn default() -> Self {
        Self {
            base_url: default_recognizer_base_url(),
            model: default_recognizer_model(),
            api_key: None,
            timeout_ms: default_timeout_ms(),
            ffmpeg_path: default_ffmpeg_path(),
        }
    }
}

impl Default for EspeakConfig {
    fn default() -> Self {
        Self {
            executable_path: default_espeak_executable(),
            voice: default_espeak_voice(),
            separate_phonemes: false,
        }
    }
}

impl Default for PiperConfig {
    fn default() -> Self {
        Self {
            executable_path: default_piper_executable(),
            model_path: default_piper_model(),
            length_scale: default_length_scale(),
            sentence_silence: default_sentence_silence(),
        }
    }
}

impl Default for OpenAiTtsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_openai_base_url(),
            model: default_tts_model(),
            voice: default_voice(),
            speed: default_speed(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl CommandRecognizerConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.executable_path.as_os_str().is_empty() {
            return Err("Recognizer executable path must not be empty".to_string());
        }
        if self.model.trim().is_empty() {
            return Err("Recognizer model must not be empty".to_string());
        }
        Ok(())
    }
}

impl HttpRecognizerConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(format!(
                "Recognizer base URL must be http(s), got '{}'",
                self.base_url
            ));
        }
        if self.model.trim().is_empty() {
            return Err("Recognizer model must not be empty".to_string());
        }
        if self.timeout_ms == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl EspeakConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.voice.trim().is_empty() {
            return Err("eSpeak voice must not be empty".to_string());
        }
        Ok(())
    }
}

impl PiperConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.model_path.as_os_str().is_empty() {
            return Err("Piper model path must not be empty".to_string());
        }
        if !(0.1..=5.0).contains(&self.length_scale) {
            return Err(format!(
                "Length scale must be between 0.1 and 5.0, got {}",
                self.length_scale
            ));
        }
        if self.sentence_silence < 0.0 {
            return Err("Sentence silence must not be negative".to_string());
        }
        Ok(())
    }
}

impl OpenAiTtsConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.as_deref().is_none_or(str::is_empty) {
            return Err("API key is required for the OpenAI TTS provider".to_string());
        }
        if !(0.25..=4.0).contains(&self.speed) {
            return Err(format!(
                "Speed must be between 0.25 and 4.0, got {}",
                self.speed
            ));
        }
        if self.timeout_ms == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}
