//! AI Speech - phonetic capability providers
//!
//! Provides traits and implementations for the speech side of pronunciation
//! tutoring:
//! - `PhonemeRecognizer` - Recognize phonemes in a recorded clip
//! - `Phonemizer` - Produce the reference IPA for a text
//! - `TextToSpeech` - Synthesize reference audio from text
//!
//! # Architecture
//!
//! This crate follows the ports & adapters pattern:
//! - `ports` module defines the traits (ports)
//! - `providers` module contains concrete implementations (adapters)
//!
//! # Supported Providers
//!
//! - Local recognizer executable (e.g. a wav2vec2 phoneme CTC wrapper)
//! - HTTP inference endpoint for phoneme recognition
//! - eSpeak NG phonemizer
//! - Piper (local) and OpenAI-compatible TTS
//!
//! # Example
//!
//! ```ignore
//! use ai_speech::{AudioData, AudioFormat, CommandRecognizer, PhonemeRecognizer};
//!
//! let recognizer = CommandRecognizer::new(config)?;
//! let audio = AudioData::new(bytes, AudioFormat::Webm);
//! let transcription = recognizer.recognize(audio).await?;
//! println!("Phonemes: {}", transcription.text);
//! ```

pub mod config;
pub mod converter;
pub mod error;
pub mod ports;
pub mod providers;
pub mod types;

pub use config::{
    CommandRecognizerConfig, EspeakConfig, HttpRecognizerConfig, OpenAiTtsConfig, PiperConfig,
};
pub use converter::AudioConverter;
pub use error::SpeechError;
pub use ports::{PhonemeRecognizer, Phonemizer, TextToSpeech};
pub use providers::command::CommandRecognizer;
pub use providers::espeak::EspeakPhonemizer;
pub use providers::http::HttpRecognizer;
pub use providers::openai::OpenAiTtsProvider;
pub use providers::piper::PiperProvider;
pub use types::{AudioData, AudioFormat, Transcription};
