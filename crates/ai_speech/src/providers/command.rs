//! Local phoneme recognizer executable
//!
//! Implements `PhonemeRecognizer` by running a local program, typically a
//! small wrapper around a wav2vec2 CTC phoneme model.
//!
//! The program is called as
//!
//! ```text
//! <executable> --model <model> --input <clip.wav> [extra args...]
//! ```
//!
//! and must print the recognized phonemes on stdout. Clips are normalized
//! to 16 kHz mono WAV with FFmpeg before the call.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, error, instrument, warn};

use crate::config::CommandRecognizerConfig;
use crate::converter::AudioConverter;
use crate::error::SpeechError;
use crate::ports::PhonemeRecognizer;
use crate::types::{AudioData, Transcription};

/// Phoneme recognizer backed by a local executable
#[derive(Debug, Clone)]
pub struct CommandRecognizer {
    config: CommandRecognizerConfig,
    converter: AudioConverter,
}

impl CommandRecognizer {
    /// Create a new command recognizer
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is invalid.
    pub fn new(config: CommandRecognizerConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;
        let converter = AudioConverter::with_ffmpeg_path(config.ffmpeg_path.clone());
        Ok(Self { config, converter })
    }

    fn executable(&self) -> &Path {
        &self.config.executable_path
    }

    /// Run the recognizer on a WAV file
    #[instrument(skip(self, audio_path), fields(model = %self.config.model))]
    async fn run_recognizer(&self, audio_path: &Path) -> Result<String, SpeechError> {
        let mut cmd = Command::new(self.executable());
        cmd.arg("--model")
            .arg(&self.config.model)
            .arg("--input")
            .arg(audio_path)
            .args(&self.config.extra_args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!("Running recognizer: {:?}", cmd);

        let output = cmd.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SpeechError::NotAvailable(format!(
                    "Recognizer not found at '{}'",
                    self.executable().display()
                ))
            } else {
                SpeechError::RecognitionFailed(format!("Failed to run recognizer: {e}"))
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("Recognizer failed: {}", stderr);
            return Err(SpeechError::RecognitionFailed(format!(
                "Recognizer exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8(output.stdout).map_err(|e| {
            SpeechError::InvalidResponse(format!("Recognizer output is not UTF-8: {e}"))
        })?;
        Ok(text.trim().to_string())
    }

    /// Write audio data to a temporary WAV file
    async fn write_temp_audio(audio: &AudioData) -> Result<NamedTempFile, SpeechError> {
        let temp_file = NamedTempFile::with_suffix(".wav").map_err(|e| {
            SpeechError::RecognitionFailed(format!("Failed to create temp file: {e}"))
        })?;

        let mut file = tokio::fs::File::create(temp_file.path()).await.map_err(|e| {
            SpeechError::RecognitionFailed(format!("Failed to write temp file: {e}"))
        })?;
        file.write_all(audio.data()).await.map_err(|e| {
            SpeechError::RecognitionFailed(format!("Failed to write audio data: {e}"))
        })?;
        file.flush().await.map_err(|e| {
            SpeechError::RecognitionFailed(format!("Failed to flush temp file: {e}"))
        })?;

        Ok(temp_file)
    }
}

#[async_trait]
impl PhonemeRecognizer for CommandRecognizer {
    #[instrument(skip(self, audio), fields(format = %audio.format(), size = audio.size_bytes()))]
    async fn recognize(&self, audio: AudioData) -> Result<Transcription, SpeechError> {
        let wav = self.converter.to_recognition_wav(&audio).await?;

        // Removed when dropped
        let temp_file = Self::write_temp_audio(&wav).await?;
        let text = self.run_recognizer(temp_file.path()).await?;

        if text.is_empty() {
            warn!("Recognizer returned no phonemes");
        }

        Ok(Transcription::new(text).with_model(&self.config.model))
    }

    async fn is_available(&self) -> bool {
        let executable_exists = self.executable().exists()
            || Command::new(self.executable())
                .arg("--help")
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .await
                .is_ok_and(|s| s.success());

        let ffmpeg = self.converter.is_available().await;
        debug!(executable_exists, ffmpeg, "Recognizer availability");
        executable_exists && ffmpeg
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
