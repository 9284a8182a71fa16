//! Pronunciation tutoring handlers

use application::RuleBasedFeedback;
use axum::{
    Form, Json,
    extract::{
        Multipart, Query, State,
        multipart::{Field, MultipartRejection},
        rejection::{FormRejection, JsonRejection, QueryRejection},
    },
    http::header,
    response::{IntoResponse, Response},
};
use domain::{AudioFormat, FeedbackReport, Score};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

/// Query for `/ipa`
#[derive(Debug, Deserialize)]
pub struct IpaQuery {
    #[serde(default)]
    pub word: String,
}

/// Reference transcription of a word
#[derive(Debug, Serialize, Deserialize)]
pub struct IpaResponse {
    pub word: String,
    pub ipa: String,
}

/// Look up the reference IPA of a word
pub async fn ipa(
    State(state): State<AppState>,
    query: Result<Query<IpaQuery>, QueryRejection>,
) -> Result<Json<IpaResponse>, ApiError> {
    let Query(query) = query?;
    let ipa = state.pronunciation.reference_ipa(&query.word).await?;

    Ok(Json(IpaResponse {
        word: query.word.trim().to_string(),
        ipa,
    }))
}

/// Query for `/score`
#[derive(Debug, Deserialize)]
pub struct ScoreQuery {
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub attempt: String,
}

/// Typed attempt scored against the reference
#[derive(Debug, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub word: String,
    pub correct_ipa: String,
    pub your_attempt: String,
    pub score: f64,
}

/// Score a typed IPA attempt
pub async fn score(
    State(state): State<AppState>,
    query: Result<Query<ScoreQuery>, QueryRejection>,
) -> Result<Json<ScoreResponse>, ApiError> {
    let Query(query) = query?;
    let scored = state
        .pronunciation
        .score_attempt(&query.word, &query.attempt)
        .await?;

    Ok(Json(ScoreResponse {
        word: scored.text,
        correct_ipa: scored.correct_ipa,
        your_attempt: scored.attempt_ipa,
        score: scored.score.rounded(),
    }))
}

/// Phonemes recognized in an uploaded clip
#[derive(Debug, Serialize, Deserialize)]
pub struct AudioPhonemesResponse {
    pub phonemes: String,
}

/// Recognize the phonemes in an uploaded clip
pub async fn audio_phonemes(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AudioPhonemesResponse>, ApiError> {
    let form = UploadForm::read(multipart?).await?;
    let upload = form.require_file()?;

    let phonemes = state
        .pronunciation
        .audio_phonemes(upload.data, upload.format)
        .await
        .map_err(ApiError::audio)?;

    Ok(Json(AudioPhonemesResponse { phonemes }))
}

/// Recorded attempt scored against the reference
#[derive(Debug, Serialize, Deserialize)]
pub struct AudioScoreResponse {
    pub text: String,
    pub correct_ipa: String,
    pub attempt_ipa: String,
    pub score: f64,
}

/// Score a recorded attempt at `text`
pub async fn audio_score(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AudioScoreResponse>, ApiError> {
    let mut form = UploadForm::read(multipart?).await?;
    let text = form.text.take().unwrap_or_default();
    let upload = form.require_file()?;

    let scored = state
        .pronunciation
        .score_audio(&text, upload.data, upload.format)
        .await
        .map_err(ApiError::audio)?;

    Ok(Json(AudioScoreResponse {
        text: scored.text,
        correct_ipa: scored.correct_ipa,
        attempt_ipa: scored.attempt_ipa,
        score: scored.score.rounded(),
    }))
}

/// Form for `/llm-feedback`
#[derive(Debug, Deserialize)]
pub struct FeedbackForm {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub correct_ipa: String,
    #[serde(default)]
    pub attempt_ipa: String,
    pub score: f64,
}

/// Coaching text from the configured feedback provider
#[derive(Debug, Serialize, Deserialize)]
pub struct FeedbackTextResponse {
    pub feedback: String,
}

/// Coaching feedback from the configured provider
pub async fn llm_feedback(
    State(state): State<AppState>,
    form: Result<Form<FeedbackForm>, FormRejection>,
) -> Result<Json<FeedbackTextResponse>, ApiError> {
    let Form(form) = form?;
    let score = Score::new(form.score)?;

    let feedback = state
        .pronunciation
        .feedback(&form.text, &form.correct_ipa, &form.attempt_ipa, score)
        .await?;

    Ok(Json(FeedbackTextResponse { feedback }))
}

/// Body for `/feedback`
#[derive(Debug, Deserialize)]
pub struct RuleFeedbackRequest {
    #[serde(default)]
    pub word: String,
    pub expected: String,
    pub attempt: String,
}

/// Structured rule-engine feedback
#[derive(Debug, Serialize)]
pub struct RuleFeedbackResponse {
    pub word: String,
    /// Rendered report, summary first
    pub feedback: String,
    #[serde(flatten)]
    pub report: FeedbackReport,
    pub score: f64,
}

/// Rule-engine feedback, regardless of the configured provider
pub async fn rule_feedback(
    body: Result<Json<RuleFeedbackRequest>, JsonRejection>,
) -> Result<Json<RuleFeedbackResponse>, ApiError> {
    let Json(body) = body?;
    let analysis = RuleBasedFeedback::analyze(&body.word, &body.expected, &body.attempt);

    Ok(Json(RuleFeedbackResponse {
        word: body.word,
        feedback: analysis.report.render(),
        report: analysis.report,
        score: analysis.score.rounded(),
    }))
}

/// Form for `/tts`
#[derive(Debug, Deserialize)]
pub struct TtsForm {
    #[serde(default)]
    pub text: String,
}

/// Synthesize reference audio for `text`
pub async fn tts(
    State(state): State<AppState>,
    form: Result<Form<TtsForm>, FormRejection>,
) -> Result<Response, ApiError> {
    let Form(form) = form?;
    let audio = state
        .pronunciation
        .synthesize(&form.text)
        .await
        .map_err(ApiError::audio)?;

    Ok(([(header::CONTENT_TYPE, audio.mime_type())], audio.data).into_response())
}

/// An uploaded clip, held in memory only
#[derive(Debug)]
struct AudioUpload {
    data: Vec<u8>,
    format: AudioFormat,
}

/// Fields of a multipart upload
#[derive(Debug, Default)]
struct UploadForm {
    text: Option<String>,
    file: Option<AudioUpload>,
}

impl UploadForm {
    async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().map(str::to_owned);
            match name.as_deref() {
                Some("text") => form.text = Some(field.text().await?),
                Some("file") => form.file = Some(read_audio(field).await?),
                _ => {},
            }
        }

        Ok(form)
    }

    fn require_file(self) -> Result<AudioUpload, ApiError> {
        self.file
            .ok_or_else(|| ApiError::BadRequest("Missing multipart field: file".to_string()))
    }
}

/// Format from the filename extension, then the MIME type, else WebM
fn detect_format(file_name: Option<&str>, content_type: Option<&str>) -> AudioFormat {
    file_name
        .and_then(AudioFormat::from_filename)
        .or_else(|| content_type.and_then(AudioFormat::from_mime_type))
        .unwrap_or_default()
}

async fn read_audio(field: Field<'_>) -> Result<AudioUpload, ApiError> {
    let format = detect_format(field.file_name(), field.content_type());
    let data = field.bytes().await?.to_vec();

    let upload_id = Uuid::new_v4();
    info!(%upload_id, %format, size = data.len(), "Audio upload received");

    Ok(AudioUpload { data, format })
}
