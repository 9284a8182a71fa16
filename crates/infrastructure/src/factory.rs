//! Provider factory
//!
//! The single place where configured provider identifiers become live
//! strategy objects. Runs once at startup; any failure aborts startup.

use std::sync::Arc;

use ai_core::{InferenceError, LlamaCppInferenceEngine, OllamaInferenceEngine};
use ai_speech::{
    CommandRecognizer, EspeakPhonemizer, HttpRecognizer, OpenAiTtsProvider, PiperProvider,
    SpeechError,
};
use application::ports::{FeedbackPort, PhonemizerPort, SynthesisPort, TranscriptionPort};
use application::{Providers, RuleBasedFeedback};
use thiserror::Error;
use tracing::info;

use crate::adapters::{LlmFeedbackAdapter, PhonemizerAdapter, RecognizerAdapter, SynthesisAdapter};
use crate::config::{
    AppConfig, FeedbackProvider, PhonemizerProvider, SynthesisProvider, TranscriptionProvider,
};

/// Errors raised while constructing providers
#[derive(Debug, Error)]
pub enum ProviderError {
    /// A configuration section failed validation
    #[error("Invalid [{section}] configuration: {reason}")]
    InvalidConfig {
        section: &'static str,
        reason: String,
    },

    /// A speech provider could not be created
    #[error("Failed to create {provider} provider: {source}")]
    Speech {
        provider: &'static str,
        #[source]
        source: SpeechError,
    },

    /// An inference client could not be created
    #[error("Failed to create {provider} provider: {source}")]
    Inference {
        provider: &'static str,
        #[source]
        source: InferenceError,
    },
}

impl ProviderError {
    fn speech(provider: &'static str) -> impl FnOnce(SpeechError) -> Self {
        move |source| Self::Speech { provider, source }
    }

    fn inference(provider: &'static str) -> impl FnOnce(InferenceError) -> Self {
        move |source| Self::Inference { provider, source }
    }
}

/// Build every configured provider
///
/// Validates the relevant configuration sections first. When an LLM feedback
/// provider is selected and `inference.warm_up` is set, a warm-up request is
/// sent before returning; its failure does not abort startup.
pub async fn build_providers(config: &AppConfig) -> Result<Providers, ProviderError> {
    config
        .validate()
        .map_err(|(section, reason)| ProviderError::InvalidConfig { section, reason })?;

    let selection = &config.providers;
    let providers = Providers {
        transcription: build_transcription(config, selection.transcription)?,
        phonemizer: build_phonemizer(config, selection.phonemizer)?,
        feedback: build_feedback(config, selection.feedback).await?,
        synthesis: build_synthesis(config, selection.synthesis)?,
    };

    info!(
        transcription = %selection.transcription,
        phonemizer = %selection.phonemizer,
        feedback = %selection.feedback,
        synthesis = %selection.synthesis,
        "Providers initialized"
    );
    Ok(providers)
}

fn build_transcription(
    config: &AppConfig,
    provider: TranscriptionProvider,
) -> Result<Arc<dyn TranscriptionPort>, ProviderError> {
    Ok(match provider {
        TranscriptionProvider::Command => Arc::new(RecognizerAdapter::new(
            CommandRecognizer::new(config.recognizer_command.clone())
                .map_err(ProviderError::speech("command"))?,
            "command",
        )),
        TranscriptionProvider::Http => Arc::new(RecognizerAdapter::new(
            HttpRecognizer::new(config.recognizer_http.clone())
                .map_err(ProviderError::speech("http"))?,
            "http",
        )),
    })
}

fn build_phonemizer(
    config: &AppConfig,
    provider: PhonemizerProvider,
) -> Result<Arc<dyn PhonemizerPort>, ProviderError> {
    match provider {
        PhonemizerProvider::Espeak => Ok(Arc::new(PhonemizerAdapter::new(
            EspeakPhonemizer::new(config.espeak.clone())
                .map_err(ProviderError::speech("espeak"))?,
            "espeak",
        ))),
    }
}

async fn build_feedback(
    config: &AppConfig,
    provider: FeedbackProvider,
) -> Result<Arc<dyn FeedbackPort>, ProviderError> {
    let adapter = match provider {
        FeedbackProvider::RuleBased => return Ok(Arc::new(RuleBasedFeedback::new())),
        FeedbackProvider::Ollama => {
            let inference = config.inference_config();
            let max_tokens = inference.max_tokens;
            LlmFeedbackAdapter::new(
                OllamaInferenceEngine::new(inference)
                    .map_err(ProviderError::inference("ollama"))?,
                "ollama",
                max_tokens,
            )
        },
        FeedbackProvider::LlamaCpp => {
            let inference = config.inference_config();
            let max_tokens = inference.max_tokens;
            LlmFeedbackAdapter::new(
                LlamaCppInferenceEngine::new(inference)
                    .map_err(ProviderError::inference("llama-cpp"))?,
                "llama-cpp",
                max_tokens,
            )
        },
    };

    if config.inference_config().warm_up {
        adapter.warm_up().await;
    }
    Ok(Arc::new(adapter))
}

fn build_synthesis(
    config: &AppConfig,
    provider: SynthesisProvider,
) -> Result<Arc<dyn SynthesisPort>, ProviderError> {
    Ok(match provider {
        SynthesisProvider::Piper => Arc::new(SynthesisAdapter::new(
            PiperProvider::new(config.piper.clone()).map_err(ProviderError::speech("piper"))?,
            "piper",
        )),
        SynthesisProvider::Openai => Arc::new(SynthesisAdapter::new(
            OpenAiTtsProvider::new(config.openai_tts.clone())
                .map_err(ProviderError::speech("openai"))?,
            "openai",
        )),
    })
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn default_config_builds_rule_based_stack() {
        let providers = build_providers(&AppConfig::default()).await.unwrap();

        assert_eq!(providers.transcription.provider_name(), "command");
        assert_eq!(providers.phonemizer.provider_name(), "espeak");
        assert_eq!(providers.feedback.provider_name(), "rule-based");
        assert_eq!(providers.synthesis.provider_name(), "piper");
    }

    #[tokio::test]
    async fn rule_based_feedback_works_without_external_services() {
        let providers = build_providers(&AppConfig::default()).await.unwrap();

        let feedback = providers
            .feedback
            .generate_feedback("merci", "m ɛ ʁ s i", "m u ʁ s i")
            .await
            .unwrap();

        assert!(feedback.contains("Replace u with ɛ"));
    }

    #[tokio::test]
    async fn invalid_section_aborts() {
        let config = AppConfig::from_toml_str(
            r#"
            [providers]
            synthesis = "openai"
            "#,
        )
        .unwrap();

        let err = build_providers(&config).await.unwrap_err();

        assert!(matches!(
            err,
            ProviderError::InvalidConfig {
                section: "openai_tts",
                ..
            }
        ));
        assert!(err.to_string().starts_with("Invalid [openai_tts] configuration"));
    }

    #[tokio::test]
    async fn http_transcription_and_openai_synthesis() {
        let config = AppConfig::from_toml_str(
            r#"
            [providers]
            transcription = "http"
            synthesis = "openai"

            [openai_tts]
            api_key = "sk-test"
            "#,
        )
        .unwrap();

        let providers = build_providers(&config).await.unwrap();

        assert_eq!(providers.transcription.provider_name(), "http");
        assert_eq!(providers.synthesis.provider_name(), "openai");
    }

    #[tokio::test]
    async fn ollama_feedback_warms_up_against_server() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "model": "llama3.2:3b-instruct",
                "message": {"role": "assistant", "content": "Nice try!"},
                "done": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = AppConfig::from_toml_str(&format!(
            "[providers]\nfeedback = \"llama\"\n\n[inference]\nbase_url = \"{}\"\n",
            server.uri()
        ))
        .unwrap();

        let providers = build_providers(&config).await.unwrap();

        assert_eq!(providers.feedback.provider_name(), "ollama");
    }

    #[tokio::test]
    async fn failed_warm_up_does_not_abort() {
        let config = AppConfig::from_toml_str(
            "[providers]\nfeedback = \"llama-cpp\"\n\n[inference]\nbase_url = \"http://127.0.0.1:9\"\ntimeout_ms = 200\n",
        )
        .unwrap();

        let providers = build_providers(&config).await.unwrap();

        assert_eq!(providers.feedback.provider_name(), "llama-cpp");
    }
}
