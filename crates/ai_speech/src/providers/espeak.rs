//! eSpeak NG reference phonemizer
//!
//! Runs `espeak-ng -q --ipa -v <voice> [--sep] --stdin` with the text on
//! stdin and returns the IPA on a single line. Stress marks are dropped so reference transcriptions
//! line up with recognizer output, which carries none.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, error, instrument};

use crate::config::EspeakConfig;
use crate::error::SpeechError;
use crate::ports::Phonemizer;

const STRESS_MARKS: [char; 2] = ['ˈ', 'ˌ'];

/// Phonemizer backed by the espeak-ng command line
#[derive(Debug, Clone)]
pub struct EspeakPhonemizer {
    config: EspeakConfig,
}

impl EspeakPhonemizer {
    /// Create a new eSpeak phonemizer
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is invalid.
    pub fn new(config: EspeakConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;
        Ok(Self { config })
    }

    fn executable(&self) -> &Path {
        &self.config.executable_path
    }

    /// Join output lines and drop stress marks and surrounding whitespace
    fn clean_output(raw: &str) -> String {
        raw.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .chars()
            .filter(|c| !STRESS_MARKS.contains(c))
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
impl Phonemizer for EspeakPhonemizer {
    #[instrument(skip(self), fields(voice = %self.config.voice))]
    async fn phonemize(&self, text: &str) -> Result<String, SpeechError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(String::new());
        }

        let mut cmd = Command::new(self.executable());
        cmd.arg("-q").arg("--ipa").arg("-v").arg(&self.config.voice);
        if self.config.separate_phonemes {
            cmd.arg("--sep");
        }
        // Text goes through stdin so a leading '-' is never read as an option
        cmd.arg("--stdin")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!("Running espeak-ng: {:?}", cmd);

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SpeechError::NotAvailable(format!(
                    "espeak-ng not found at '{}'",
                    self.executable().display()
                ))
            } else {
                SpeechError::PhonemizationFailed(format!("Failed to run espeak-ng: {e}"))
            }
        })?;

        let mut stdin = child.stdin.take().ok_or_else(|| {
            SpeechError::PhonemizationFailed("espeak-ng stdin unavailable".to_string())
        })?;
        let input = format!("{text}\n");
        let feed = async move {
            let written = stdin.write_all(input.as_bytes()).await;
            drop(stdin);
            written
        };
        let (written, output) = tokio::join!(feed, child.wait_with_output());
        let output = output.map_err(|e| {
            SpeechError::PhonemizationFailed(format!("Failed to wait for espeak-ng: {e}"))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("espeak-ng failed: {}", stderr);
            return Err(SpeechError::PhonemizationFailed(format!(
                "espeak-ng exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        // A clean exit that left stdin unread is still a result
        if let Err(e) = written
            && e.kind() != std::io::ErrorKind::BrokenPipe
        {
            return Err(SpeechError::PhonemizationFailed(format!(
                "Failed to write to espeak-ng: {e}"
            )));
        }

        let raw = String::from_utf8(output.stdout).map_err(|e| {
            SpeechError::InvalidResponse(format!("espeak-ng output is not UTF-8: {e}"))
        })?;
        Ok(Self::clean_output(&raw))
    }

    async fn is_available(&self) -> bool {
        Command::new(self.executable())
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .is_ok_and(|s| s.success())
    }

    fn voice(&self) -> &str {
        &self.config.voice
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn provider(executable: &str, separate: bool) -> EspeakPhonemizer {
        EspeakPhonemizer::new(EspeakConfig {
            executable_path: PathBuf::from(executable),
            voice: "fr-fr".to_string(),
            separate_phonemes: separate,
        })
        .unwrap()
    }

    #[test]
    fn clean_output_strips_stress_and_joins_lines() {
        assert_eq!(
            EspeakPhonemizer::clean_output(" b ɔ̃ ʒ ˈu ʁ\n\n ˌa\n"),
            "b ɔ̃ ʒ u ʁ a"
        );
        assert_eq!(EspeakPhonemizer::clean_output("\n"), "");
    }

    /// Stand-in for espeak-ng that echoes stdin
    #[cfg(unix)]
    fn stdin_echo(dir: &tempfile::TempDir) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.path().join("espeak-ng");
        std::fs::write(&path, "#!/bin/sh\nexec cat\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[tokio::test]
    async fn passes_voice_and_separator() {
        // echo prints its arguments, standing in for espeak-ng
        let result = provider("echo", true).phonemize("bonjour").await.unwrap();
        assert_eq!(result, "-q --ipa -v fr-fr --sep --stdin");
    }

    #[tokio::test]
    async fn separator_is_off_by_default() {
        let phonemizer = EspeakPhonemizer::new(EspeakConfig {
            executable_path: PathBuf::from("echo"),
            ..Default::default()
        })
        .unwrap();
        let result = phonemizer.phonemize(" merci ").await.unwrap();
        assert_eq!(result, "-q --ipa -v fr-fr --stdin");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn text_is_written_to_stdin() {
        let dir = tempfile::tempdir().unwrap();
        let phonemizer = provider(&stdin_echo(&dir), false);

        assert_eq!(phonemizer.phonemize(" merci ").await.unwrap(), "merci");
        // would be an unknown option if passed as an argument
        assert_eq!(phonemizer.phonemize("-x").await.unwrap(), "-x");
    }

    #[tokio::test]
    async fn empty_text_yields_empty_ipa() {
        let result = provider("/nonexistent/espeak-ng", true)
            .phonemize("  ")
            .await
            .unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn missing_executable_is_not_available() {
        let phonemizer = provider("/nonexistent/espeak-ng", true);
        let result = phonemizer.phonemize("oui").await;
        assert!(matches!(result, Err(SpeechError::NotAvailable(_))));
        assert!(!phonemizer.is_available().await);
    }

    #[test]
    fn rejects_empty_voice() {
        let config = EspeakConfig {
            voice: String::new(),
            ..Default::default()
        };
        assert!(EspeakPhonemizer::new(config).is_err());
    }
}
