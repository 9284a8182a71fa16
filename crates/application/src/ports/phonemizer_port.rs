//! Phonemizer port - Interface for reference text to IPA conversion

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for producing the reference phonemic transcription of a text
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PhonemizerPort: Send + Sync {
    /// Convert text into an IPA string
    async fn phonemize(&self, text: &str) -> Result<String, ApplicationError>;

    /// Check if the phonemizer can currently be used
    async fn is_available(&self) -> bool;

    /// Provider identifier used in logs and readiness reports
    fn provider_name(&self) -> &'static str;
}
