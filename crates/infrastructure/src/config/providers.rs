//! Strategy provider selection.
//!
//! Each capability is a closed enum; an unknown identifier fails
//! deserialization and therefore aborts startup.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Audio to phonemes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TranscriptionProvider {
    /// Local recognizer executable
    #[default]
    Command,
    /// Remote inference endpoint
    Http,
}

/// Text to reference IPA
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PhonemizerProvider {
    /// eSpeak NG command line
    #[default]
    #[serde(alias = "espeak-ng")]
    Espeak,
}

/// Coaching text generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeedbackProvider {
    /// Confusion rule tables
    #[default]
    #[serde(alias = "rb")]
    RuleBased,
    /// Ollama chat API
    #[serde(alias = "llama")]
    Ollama,
    /// llama.cpp server, OpenAI-compatible chat completions
    #[serde(alias = "llama_cpp", alias = "llamacpp")]
    LlamaCpp,
}

impl FeedbackProvider {
    /// Whether this provider needs the `inference` section
    #[must_use]
    pub const fn uses_inference(self) -> bool {
        matches!(self, Self::Ollama | Self::LlamaCpp)
    }
}

/// Text to speech
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SynthesisProvider {
    /// Local Piper CLI
    #[default]
    Piper,
    /// OpenAI-compatible `/audio/speech`
    #[serde(alias = "openai-tts")]
    Openai,
}

impl fmt::Display for TranscriptionProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command => write!(f, "command"),
            Self::Http => write!(f, "http"),
        }
    }
}

impl fmt::Display for PhonemizerProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Espeak => write!(f, "espeak"),
        }
    }
}

impl fmt::Display for FeedbackProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RuleBased => write!(f, "rule-based"),
            Self::Ollama => write!(f, "ollama"),
            Self::LlamaCpp => write!(f, "llama-cpp"),
        }
    }
}

impl fmt::Display for SynthesisProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Piper => write!(f, "piper"),
            Self::Openai => write!(f, "openai"),
        }
    }
}

/// Active provider per capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// Phoneme recognizer
    #[serde(default)]
    pub transcription: TranscriptionProvider,
    /// Reference phonemizer
    #[serde(default)]
    pub phonemizer: PhonemizerProvider,
    /// Feedback generator
    #[serde(default)]
    pub feedback: FeedbackProvider,
    /// Speech synthesizer
    #[serde(default)]
    pub synthesis: SynthesisProvider,
}
