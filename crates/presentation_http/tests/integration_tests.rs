//! Integration tests for HTTP handlers
#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use application::{
    ApplicationError, FeedbackPort, PERFECT_FEEDBACK, PhonemizerPort, PronunciationConfig,
    PronunciationService, Providers, RuleBasedFeedback, SynthesisPort, SynthesizedAudio,
    TranscriptionPort,
};
use async_trait::async_trait;
use axum_test::{
    TestServer,
    multipart::{MultipartForm, Part},
};
use domain::AudioFormat;
use infrastructure::ServerConfig;
use presentation_http::{AppState, apply_middleware, create_router};
use serde_json::{Value, json};

const WAV_BYTES: &[u8] = b"RIFF\x24\x00\x00\x00WAVEfmt ";

/// Phonemizer backed by a fixed dictionary
struct DictionaryPhonemizer {
    entries: HashMap<&'static str, &'static str>,
}

impl DictionaryPhonemizer {
    fn new() -> Self {
        Self {
            entries: HashMap::from([("merci", "mɛʁsi"), ("bonjour", "bɔ̃ʒuʁ")]),
        }
    }
}

#[async_trait]
impl PhonemizerPort for DictionaryPhonemizer {
    async fn phonemize(&self, text: &str) -> Result<String, ApplicationError> {
        self.entries
            .get(text)
            .map(|ipa| (*ipa).to_string())
            .ok_or_else(|| ApplicationError::model_failure(format!("no entry for {text}")))
    }

    async fn is_available(&self) -> bool {
        true
    }

    fn provider_name(&self) -> &'static str {
        "dictionary"
    }
}

/// Recognizer that always hears the same phonemes and records the formats it saw
struct FixedRecognizer {
    phonemes: &'static str,
    formats: std::sync::Mutex<Vec<AudioFormat>>,
}

impl FixedRecognizer {
    fn new(phonemes: &'static str) -> Self {
        Self {
            phonemes,
            formats: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TranscriptionPort for FixedRecognizer {
    async fn transcribe(
        &self,
        _audio_data: Vec<u8>,
        format: AudioFormat,
    ) -> Result<String, ApplicationError> {
        self.formats.lock().unwrap().push(format);
        Ok(format!(" {} ", self.phonemes))
    }

    async fn is_available(&self) -> bool {
        true
    }

    fn provider_name(&self) -> &'static str {
        "fixed"
    }
}

/// Recognizer whose model is missing
struct FailingRecognizer;

#[async_trait]
impl TranscriptionPort for FailingRecognizer {
    async fn transcribe(
        &self,
        _audio_data: Vec<u8>,
        _format: AudioFormat,
    ) -> Result<String, ApplicationError> {
        Err(ApplicationError::model_failure("ffmpeg exited with status 1"))
    }

    async fn is_available(&self) -> bool {
        false
    }

    fn provider_name(&self) -> &'static str {
        "failing"
    }
}

/// Feedback provider that counts its calls
#[derive(Default)]
struct CountingFeedback {
    calls: AtomicUsize,
}

#[async_trait]
impl FeedbackPort for CountingFeedback {
    async fn generate_feedback(
        &self,
        word: &str,
        _expected: &str,
        _attempt: &str,
    ) -> Result<String, ApplicationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("Try {word} again, slowly."))
    }

    async fn is_available(&self) -> bool {
        true
    }

    fn provider_name(&self) -> &'static str {
        "counting"
    }
}

/// Synthesizer returning a fixed WAV clip
struct WavSynthesizer;

#[async_trait]
impl SynthesisPort for WavSynthesizer {
    async fn synthesize(&self, _text: &str) -> Result<SynthesizedAudio, ApplicationError> {
        Ok(SynthesizedAudio::new(WAV_BYTES.to_vec(), AudioFormat::Wav))
    }

    async fn is_available(&self) -> bool {
        true
    }

    fn provider_name(&self) -> &'static str {
        "wav"
    }
}

struct TestProviders {
    recognizer: Arc<FixedRecognizer>,
    feedback: Arc<CountingFeedback>,
}

fn providers_with(
    transcription: Arc<dyn TranscriptionPort>,
    feedback: Arc<dyn FeedbackPort>,
) -> Providers {
    Providers {
        transcription,
        phonemizer: Arc::new(DictionaryPhonemizer::new()),
        feedback,
        synthesis: Arc::new(WavSynthesizer),
    }
}

fn server_for(providers: Providers) -> TestServer {
    let service = PronunciationService::new(providers, PronunciationConfig::default());
    let router = create_router(AppState::new(service));
    TestServer::new(router).expect("Failed to create test server")
}

fn create_test_server() -> (TestServer, TestProviders) {
    let recognizer = Arc::new(FixedRecognizer::new("muʁsi"));
    let feedback = Arc::new(CountingFeedback::default());
    let server = server_for(providers_with(recognizer.clone(), feedback.clone()));
    (
        server,
        TestProviders {
            recognizer,
            feedback,
        },
    )
}

fn create_failing_test_server() -> TestServer {
    server_for(providers_with(
        Arc::new(FailingRecognizer),
        Arc::new(RuleBasedFeedback::new()),
    ))
}

fn wav_part() -> Part {
    Part::bytes(WAV_BYTES.to_vec())
        .file_name("attempt.wav")
        .mime_type("audio/wav")
}

// ============ Health Endpoint Tests ============

#[tokio::test]
async fn health_endpoint_returns_ok() {
    let (server, _) = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn readiness_endpoint_lists_every_provider() {
    let (server, _) = create_test_server();

    let response = server.get("/ready").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["ready"], true);
    for capability in ["transcription", "phonemizer", "feedback", "synthesis"] {
        assert_eq!(body["providers"][capability]["healthy"], true, "{capability}");
    }
}

#[tokio::test]
async fn readiness_endpoint_returns_unavailable_when_a_provider_is_down() {
    let server = create_failing_test_server();

    let response = server.get("/ready").await;

    response.assert_status_service_unavailable();
    let body: Value = response.json();
    assert_eq!(body["ready"], false);
    assert_eq!(body["providers"]["transcription"]["healthy"], false);
    assert_eq!(body["providers"]["phonemizer"]["healthy"], true);
}

// ============ IPA and Score Tests ============

#[tokio::test]
async fn ipa_returns_reference_transcription() {
    let (server, _) = create_test_server();

    let response = server.get("/ipa").add_query_param("word", "merci").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["word"], "merci");
    assert_eq!(body["ipa"], "mɛʁsi");
}

#[tokio::test]
async fn ipa_rejects_missing_word() {
    let (server, _) = create_test_server();

    let response = server.get("/ipa").await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["code"], "bad_request");
    assert_eq!(body["error"], "word must not be empty");
}

#[tokio::test]
async fn ipa_reports_degraded_phonemizer() {
    let (server, _) = create_test_server();

    let response = server.get("/ipa").add_query_param("word", "chat").await;

    response.assert_status_service_unavailable();
    let body: Value = response.json();
    assert_eq!(body["error"], "Service temporarily unavailable");
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn score_compares_attempt_with_reference() {
    let (server, _) = create_test_server();

    let response = server
        .get("/score")
        .add_query_param("word", "merci")
        .add_query_param("attempt", "muʁsi")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["word"], "merci");
    assert_eq!(body["correct_ipa"], "mɛʁsi");
    assert_eq!(body["your_attempt"], "muʁsi");
    assert_eq!(body["score"], 0.8);
}

#[tokio::test]
async fn score_of_exact_attempt_is_perfect() {
    let (server, _) = create_test_server();

    let response = server
        .get("/score")
        .add_query_param("word", "bonjour")
        .add_query_param("attempt", "bɔ̃ʒuʁ")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["score"], 1.0);
}

#[tokio::test]
async fn score_of_empty_attempt_is_zero() {
    let (server, _) = create_test_server();

    let response = server.get("/score").add_query_param("word", "bonjour").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["score"], 0.0);
}

// ============ Audio Tests ============

#[tokio::test]
async fn audio_phonemes_returns_trimmed_recognition() {
    let (server, providers) = create_test_server();

    let form = MultipartForm::new().add_part("file", wav_part());
    let response = server.post("/audio-phonemes").multipart(form).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["phonemes"], "muʁsi");
    assert_eq!(
        *providers.recognizer.formats.lock().unwrap(),
        vec![AudioFormat::Wav]
    );
}

#[tokio::test]
async fn audio_format_falls_back_to_webm() {
    let (server, providers) = create_test_server();

    let form = MultipartForm::new().add_part("file", Part::bytes(vec![1, 2, 3]).file_name("blob"));
    let response = server.post("/audio-phonemes").multipart(form).await;

    response.assert_status_ok();
    assert_eq!(
        *providers.recognizer.formats.lock().unwrap(),
        vec![AudioFormat::Webm]
    );
}

#[tokio::test]
async fn audio_phonemes_requires_file() {
    let (server, _) = create_test_server();

    let form = MultipartForm::new().add_text("text", "merci");
    let response = server.post("/audio-phonemes").multipart(form).await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn audio_phonemes_rejects_empty_file() {
    let (server, _) = create_test_server();

    let form = MultipartForm::new().add_part("file", Part::bytes(Vec::new()).file_name("a.webm"));
    let response = server.post("/audio-phonemes").multipart(form).await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["error"], "file must not be empty");
}

#[tokio::test]
async fn audio_phonemes_degrades_when_recognizer_fails() {
    let server = create_failing_test_server();

    let form = MultipartForm::new().add_part("file", wav_part());
    let response = server.post("/audio-phonemes").multipart(form).await;

    response.assert_status_service_unavailable();
    let body: Value = response.json();
    assert_eq!(body["error"], "Could not process audio");
    assert_eq!(body["code"], "service_unavailable");
}

#[tokio::test]
async fn audio_score_scores_recording() {
    let (server, _) = create_test_server();

    let form = MultipartForm::new()
        .add_text("text", "merci")
        .add_part("file", wav_part());
    let response = server.post("/audio-score").multipart(form).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["text"], "merci");
    assert_eq!(body["correct_ipa"], "mɛʁsi");
    assert_eq!(body["attempt_ipa"], "muʁsi");
    assert_eq!(body["score"], 0.8);
}

#[tokio::test]
async fn audio_score_requires_text() {
    let (server, _) = create_test_server();

    let form = MultipartForm::new().add_part("file", wav_part());
    let response = server.post("/audio-score").multipart(form).await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["error"], "text must not be empty");
}

#[tokio::test]
async fn audio_score_degrades_when_recognizer_fails() {
    let server = create_failing_test_server();

    let form = MultipartForm::new()
        .add_text("text", "merci")
        .add_part("file", wav_part());
    let response = server.post("/audio-score").multipart(form).await;

    response.assert_status_service_unavailable();
    let body: Value = response.json();
    assert_eq!(body["error"], "Could not process audio");
}

// ============ Feedback Tests ============

#[tokio::test]
async fn llm_feedback_calls_provider_for_imperfect_score() {
    let (server, providers) = create_test_server();

    let response = server
        .post("/llm-feedback")
        .form(&[
            ("text", "merci"),
            ("correct_ipa", "mɛʁsi"),
            ("attempt_ipa", "muʁsi"),
            ("score", "0.8"),
        ])
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["feedback"], "Try merci again, slowly.");
    assert_eq!(providers.feedback.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn llm_feedback_short_circuits_perfect_score() {
    let (server, providers) = create_test_server();

    let response = server
        .post("/llm-feedback")
        .form(&[
            ("text", "merci"),
            ("correct_ipa", "mɛʁsi"),
            ("attempt_ipa", "mɛʁsi"),
            ("score", "1.0"),
        ])
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["feedback"], PERFECT_FEEDBACK);
    assert_eq!(providers.feedback.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn llm_feedback_rejects_missing_score() {
    let (server, _) = create_test_server();

    let response = server
        .post("/llm-feedback")
        .form(&[("text", "merci")])
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn llm_feedback_rejects_out_of_range_score() {
    let (server, providers) = create_test_server();

    let response = server
        .post("/llm-feedback")
        .form(&[("text", "merci"), ("score", "1.5")])
        .await;

    response.assert_status_bad_request();
    assert_eq!(providers.feedback.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn rule_feedback_reports_substitution() {
    let (server, providers) = create_test_server();

    let response = server
        .post("/feedback")
        .json(&json!({
            "word": "merci",
            "expected": "m ɛ ʁ s i",
            "attempt": "m u ʁ s i"
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["word"], "merci");
    assert!(body["summary"].is_string());
    assert_eq!(body["issues"][0]["kind"], "substitution");
    assert_eq!(body["issues"][0]["expected_index"], 1);
    assert_eq!(body["score"], 0.89);
    // The rule engine is used regardless of the configured provider
    assert_eq!(providers.feedback.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn rule_feedback_reports_extra_sound() {
    let (server, _) = create_test_server();

    let response = server
        .post("/feedback")
        .json(&json!({
            "word": "bonjour",
            "expected": "b ɔ̃ ʒ u ʁ",
            "attempt": "b o n ʒ u ʁ"
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(
        body["feedback"]
            .as_str()
            .is_some_and(|text| text.contains("Extra sound n"))
    );
}

#[tokio::test]
async fn rule_feedback_praises_exact_attempt() {
    let (server, _) = create_test_server();

    let response = server
        .post("/feedback")
        .json(&json!({
            "word": "merci",
            "expected": "m ɛ ʁ s i",
            "attempt": "m ɛ ʁ s i"
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["lines"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["issues"].as_array().map(Vec::len), Some(0));
    assert_eq!(body["score"], 1.0);
}

#[tokio::test]
async fn rule_feedback_rejects_missing_fields() {
    let (server, _) = create_test_server();

    let response = server
        .post("/feedback")
        .json(&json!({ "word": "merci" }))
        .await;

    response.assert_status_bad_request();
}

// ============ Synthesis Tests ============

#[tokio::test]
async fn tts_returns_wav_audio() {
    let (server, _) = create_test_server();

    let response = server.post("/tts").form(&[("text", "merci")]).await;

    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "audio/wav");
    assert_eq!(response.as_bytes().as_ref(), WAV_BYTES);
}

#[tokio::test]
async fn tts_rejects_empty_text() {
    let (server, _) = create_test_server();

    let response = server.post("/tts").form(&[("text", "  ")]).await;

    response.assert_status_bad_request();
}

// ============ Middleware Tests ============

#[tokio::test]
async fn middleware_sets_request_id() {
    let recognizer = Arc::new(FixedRecognizer::new("mɛʁsi"));
    let service = PronunciationService::new(
        providers_with(recognizer, Arc::new(RuleBasedFeedback::new())),
        PronunciationConfig::default(),
    );
    let router = apply_middleware(
        create_router(AppState::new(service)),
        &ServerConfig::default(),
    );
    let server = TestServer::new(router).expect("Failed to create test server");

    let response = server.get("/health").await;

    response.assert_status_ok();
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn middleware_rejects_oversized_upload() {
    let service = PronunciationService::new(
        providers_with(
            Arc::new(FixedRecognizer::new("mɛʁsi")),
            Arc::new(RuleBasedFeedback::new()),
        ),
        PronunciationConfig::default(),
    );
    let server_config = ServerConfig {
        max_upload_bytes: 64,
        ..Default::default()
    };
    let router = apply_middleware(create_router(AppState::new(service)), &server_config);
    let server = TestServer::new(router).expect("Failed to create test server");

    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(vec![0_u8; 4096]).file_name("long.wav"),
    );
    let response = server
        .post("/audio-phonemes")
        .multipart(form)
        .expect_failure()
        .await;

    assert!(response.status_code().is_client_error());
}
