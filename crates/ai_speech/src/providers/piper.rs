//! Piper local text-to-speech
//!
//! Implements `TextToSpeech` with the Piper CLI. Text is written to stdin,
//! Piper writes a WAV file which is read back.
//!
//! French voices are published at
//! <https://huggingface.co/rhasspy/piper-voices/tree/main/fr/fr_FR>; each
//! voice needs the `.onnx` model and its `.onnx.json` next to it.

use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, instrument, warn};

use crate::config::PiperConfig;
use crate::error::SpeechError;
use crate::ports::TextToSpeech;
use crate::types::{AudioData, AudioFormat};

/// Local TTS provider using Piper
#[derive(Debug, Clone)]
pub struct PiperProvider {
    config: PiperConfig,
}

impl PiperProvider {
    /// Create a new Piper provider
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is invalid.
    pub fn new(config: PiperConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;
        Ok(Self { config })
    }

    fn executable(&self) -> &Path {
        &self.config.executable_path
    }

    /// Command-line arguments writing the WAV to `output`
    fn piper_args(&self, output: &Path) -> Vec<OsString> {
        vec![
            "--model".into(),
            self.config.model_path.clone().into_os_string(),
            "--output_file".into(),
            output.as_os_str().to_owned(),
            "--length_scale".into(),
            self.config.length_scale.to_string().into(),
            "--sentence_silence".into(),
            self.config.sentence_silence.to_string().into(),
        ]
    }

    fn spawn_error(&self, err: &std::io::Error) -> SpeechError {
        if err.kind() == std::io::ErrorKind::NotFound {
            SpeechError::NotAvailable(format!(
                "Piper not found at '{}'",
                self.executable().display()
            ))
        } else {
            SpeechError::SynthesisFailed(format!("Failed to run piper: {err}"))
        }
    }

    /// Run Piper and return the WAV bytes
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    async fn run_piper(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        let wav_file = NamedTempFile::with_suffix(".wav")
            .map_err(|e| SpeechError::SynthesisFailed(format!("No temp file for piper: {e}")))?;

        let mut child = Command::new(self.executable())
            .args(self.piper_args(wav_file.path()))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.spawn_error(&e))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .await
                .map_err(|e| SpeechError::SynthesisFailed(format!("Piper stdin closed: {e}")))?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| SpeechError::SynthesisFailed(format!("Piper did not finish: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(status = %output.status, stderr = %stderr.trim(), "Piper failed");
            return Err(SpeechError::SynthesisFailed(format!(
                "Piper exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let wav = tokio::fs::read(wav_file.path())
            .await
            .map_err(|e| SpeechError::SynthesisFailed(format!("Piper output unreadable: {e}")))?;
        if wav.is_empty() {
            return Err(SpeechError::SynthesisFailed(
                "Piper wrote an empty file".to_string(),
            ));
        }

        debug!(bytes = wav.len(), "Piper synthesis complete");
        Ok(wav)
    }
}

#[async_trait]
impl TextToSpeech for PiperProvider {
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    async fn synthesize(&self, text: &str) -> Result<AudioData, SpeechError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SpeechError::SynthesisFailed(
                "Cannot synthesize empty text".to_string(),
            ));
        }

        let wav = self.run_piper(text).await?;
        Ok(AudioData::new(wav, AudioFormat::Wav))
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

        let model_exists = self.config.model_path.exists();

        debug!(executable_exists, model_exists, "Piper availability");

        executable_exists && model_exists
    }

    fn model_name(&self) -> &str {
        self.config
            .model_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("piper")
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn test_config() -> PiperConfig {
        PiperConfig {
            executable_path: PathBuf::from("piper"),
            model_path: PathBuf::from("/models/fr_FR-siwis-medium.onnx"),
            length_scale: 1.0,
            sentence_silence: 0.2,
        }
    }

    #[test]
    fn model_name_extracts_from_path() {
        let provider = PiperProvider::new(test_config()).unwrap();
        assert_eq!(provider.model_name(), "fr_FR-siwis-medium");
    }

    #[test]
    fn args_carry_voice_settings() {
        let provider = PiperProvider::new(test_config()).unwrap();
        let args = provider.piper_args(Path::new("/tmp/out.wav"));
        let args: Vec<_> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(
            args,
            [
                "--model",
                "/models/fr_FR-siwis-medium.onnx",
                "--output_file",
                "/tmp/out.wav",
                "--length_scale",
                "1",
                "--sentence_silence",
                "0.2",
            ]
        );
    }

    #[test]
    fn rejects_invalid_config() {
        let mut config = test_config();
        config.length_scale = 0.0;
        assert!(PiperProvider::new(config).is_err());
    }

    #[tokio::test]
    async fn empty_text_is_rejected() {
        let provider = PiperProvider::new(test_config()).unwrap();
        let result = provider.synthesize("   ").await;
        assert!(matches!(result, Err(SpeechError::SynthesisFailed(_))));
    }

    #[tokio::test]
    async fn missing_executable_is_reported() {
        let mut config = test_config();
        config.executable_path = PathBuf::from("/nonexistent/piper");
        let provider = PiperProvider::new(config).unwrap();

        let result = provider.synthesize("Bonjour").await;
        assert!(matches!(result, Err(SpeechError::NotAvailable(_))));
        assert!(!provider.is_available().await);
    }
}
