//! Audio normalization for phoneme recognition
//!
//! Browser recordings usually arrive as WebM/Opus. Recognition models want
//! 16 kHz mono 16-bit PCM WAV, so every other clip is piped through FFmpeg.

use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, instrument};

use crate::error::SpeechError;
use crate::types::{AudioData, AudioFormat};

/// Sample rate expected by recognition models
pub const RECOGNITION_SAMPLE_RATE: u32 = 16_000;

/// FFmpeg output options for recognition input
const PCM_MONO_16K: [&str; 8] = [
    "-codec:a", "pcm_s16le", "-ar", "16000", "-ac", "1", "-f", "wav",
];

/// Normalizes clips with an FFmpeg subprocess
#[derive(Debug, Clone)]
pub struct AudioConverter {
    ffmpeg_path: String,
}

impl Default for AudioConverter {
    fn default() -> Self {
        Self::with_ffmpeg_path("ffmpeg")
    }
}

impl AudioConverter {
    /// Use the FFmpeg binary at `path`
    #[must_use]
    pub fn with_ffmpeg_path(path: impl Into<String>) -> Self {
        Self {
            ffmpeg_path: path.into(),
        }
    }

    /// Whether `ffmpeg -version` runs
    pub async fn is_available(&self) -> bool {
        Command::new(&self.ffmpeg_path)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .is_ok_and(|status| status.success())
    }

    /// Normalize a clip to 16 kHz mono WAV
    ///
    /// WAV input already tagged with the recognition sample rate is returned
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::InvalidAudio` for an empty clip and
    /// `SpeechError::AudioProcessing` if FFmpeg fails.
    #[instrument(skip(self, audio), fields(format = %audio.format(), size = audio.size_bytes()))]
    pub async fn to_recognition_wav(&self, audio: &AudioData) -> Result<AudioData, SpeechError> {
        if audio.is_empty() {
            return Err(SpeechError::InvalidAudio("audio clip is empty".to_string()));
        }
        if audio.format() == AudioFormat::Wav && audio.sample_rate() == Some(RECOGNITION_SAMPLE_RATE)
        {
            debug!("Clip already normalized");
            return Ok(audio.clone());
        }

        let wav = self.pipe_through_ffmpeg(audio.data()).await?;
        debug!(output_bytes = wav.len(), "Clip normalized");
        Ok(AudioData::new(wav, AudioFormat::Wav).with_sample_rate(RECOGNITION_SAMPLE_RATE))
    }

    async fn pipe_through_ffmpeg(&self, input: &[u8]) -> Result<Vec<u8>, SpeechError> {
        let mut child = Command::new(&self.ffmpeg_path)
            .args(["-hide_banner", "-loglevel", "error", "-i", "pipe:0"])
            .args(PCM_MONO_16K)
            .arg("pipe:1")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| processing_error("spawn FFmpeg", &e))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| SpeechError::AudioProcessing("FFmpeg stdin unavailable".to_string()))?;

        // stdin must be fed while stdout is drained; FFmpeg writes as it reads
        let feed = async move {
            let written = stdin.write_all(input).await;
            drop(stdin);
            written
        };
        let (written, output) = tokio::join!(feed, child.wait_with_output());
        let output = output.map_err(|e| processing_error("wait for FFmpeg", &e))?;

        if !output.status.success() {
            return Err(SpeechError::AudioProcessing(format!(
                "FFmpeg exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        written.map_err(|e| processing_error("write to FFmpeg", &e))?;
        if output.stdout.is_empty() {
            return Err(SpeechError::AudioProcessing(
                "FFmpeg produced no audio".to_string(),
            ));
        }

        Ok(output.stdout)
    }
}

fn processing_error(step: &str, err: &std::io::Error) -> SpeechError {
    SpeechError::AudioProcessing(format!("Failed to {step}: {err}"))
}
