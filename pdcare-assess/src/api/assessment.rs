//! Assessment endpoints: health form, voice clip and history
//!
//! Anonymous callers get a score. Logged-in callers additionally get the
//! assessment stored in their history.

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, DefaultBodyLimit, Query, State},
    http::{header, HeaderMap},
    routing::{get, post},
    Extension, Json, Router,
};
use pdcare_common::db::{list_assessments, record_assessment};
use pdcare_common::{
    classify, recommend, AssessmentKind, AssessmentRecord, AudioSample, HealthForm,
    HealthMetrics, HealthRiskScorer, RiskScore, SeverityBand, SourceKind, VoiceAnalysis,
    VoiceRiskScorer, DISCLAIMER,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::auth::CurrentSession;
use crate::utils::audio_decoder::{decode_audio_bytes, extension_for_content_type};
use crate::{ApiError, ApiResult, AppState, MAX_VOICE_UPLOAD_BYTES};

/// Scored assessment returned to the client
#[derive(Debug, Serialize)]
pub struct AssessmentResponse {
    pub score: RiskScore,
    pub severity: SeverityBand,
    pub severity_label: &'static str,
    pub recommendations: &'static [&'static str],
    pub disclaimer: &'static str,
    /// Voice metric breakdown (voice assessments only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<VoiceAnalysis>,
    /// Id of the stored record (logged-in callers only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment_id: Option<Uuid>,
}

impl AssessmentResponse {
    fn new(score: RiskScore) -> Self {
        let severity = classify(score.value());
        Self {
            score,
            severity,
            severity_label: severity.label(),
            recommendations: recommend(severity),
            disclaimer: DISCLAIMER,
            analysis: None,
            assessment_id: None,
        }
    }
}

/// Query parameters for voice uploads
#[derive(Debug, Deserialize)]
pub struct VoiceQuery {
    /// `recorded` or `uploaded`
    pub source: Option<String>,
}

/// Recorded when explicitly requested or when the browser sent webm
///
/// In-browser recordings arrive as `audio/webm`, file uploads as whatever
/// the file is.
fn source_kind(query: &VoiceQuery, content_type: Option<&str>) -> ApiResult<SourceKind> {
    if let Some(source) = query.source.as_deref() {
        return Ok(source.parse::<SourceKind>()?);
    }

    let is_webm = content_type
        .map(|ct| ct.trim().to_ascii_lowercase().starts_with("audio/webm"))
        .unwrap_or(false);

    Ok(if is_webm {
        SourceKind::Recorded
    } else {
        SourceKind::Uploaded
    })
}

async fn store_if_logged_in(
    state: &AppState,
    current: &CurrentSession,
    kind: AssessmentKind,
    score: RiskScore,
) -> ApiResult<Option<Uuid>> {
    match &current.0 {
        Some(session) => {
            let record = record_assessment(&state.db, session.user.id, kind, score).await?;
            Ok(Some(record.id))
        }
        None => Ok(None),
    }
}

/// POST /api/assessments/health
pub async fn assess_health(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    payload: Result<Json<HealthForm>, JsonRejection>,
) -> ApiResult<Json<AssessmentResponse>> {
    let Json(form) = payload?;
    let metrics = HealthMetrics::try_from(form)?;
    let score = HealthRiskScorer::new().score(&metrics);

    let mut response = AssessmentResponse::new(score);
    response.assessment_id =
        store_if_logged_in(&state, &current, AssessmentKind::Health, score).await?;

    info!(
        score = score.value(),
        severity = response.severity.as_str(),
        stored = response.assessment_id.is_some(),
        "Health assessment"
    );

    Ok(Json(response))
}

/// POST /api/assessments/voice
///
/// Body is the raw audio file. Decoding and scoring run on the blocking pool.
pub async fn assess_voice(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Query(query): Query<VoiceQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<AssessmentResponse>> {
    if body.is_empty() {
        return Err(ApiError::BadRequest("Audio body is empty".to_string()));
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    let source = source_kind(&query, content_type)?;
    let extension = content_type.and_then(extension_for_content_type);

    let analysis = tokio::task::spawn_blocking(move || -> ApiResult<VoiceAnalysis> {
        let decoded = decode_audio_bytes(body.to_vec(), extension)
            .map_err(|e| ApiError::Unprocessable(format!("Could not decode audio: {:#}", e)))?;
        let clip = AudioSample::new(decoded.samples, decoded.sample_rate, source);
        Ok(VoiceRiskScorer::new().analyze(&clip)?)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Voice analysis task failed: {}", e)))??;

    let mut response = AssessmentResponse::new(analysis.score);
    response.analysis = Some(analysis);
    response.assessment_id =
        store_if_logged_in(&state, &current, AssessmentKind::Voice, analysis.score).await?;

    info!(
        source = source.as_str(),
        score = analysis.score.value(),
        severity = response.severity.as_str(),
        stored = response.assessment_id.is_some(),
        "Voice assessment"
    );

    Ok(Json(response))
}

/// GET /api/assessments
///
/// The caller's history, newest first.
pub async fn list_history(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
) -> ApiResult<Json<Vec<AssessmentRecord>>> {
    let session = current.require()?;
    let history = list_assessments(&state.db, session.user.id).await?;
    Ok(Json(history))
}

pub fn assessment_routes() -> Router<AppState> {
    Router::new()
        .route("/api/assessments", get(list_history))
        .route("/api/assessments/health", post(assess_health))
        .route(
            "/api/assessments/voice",
            post(assess_voice).layer(DefaultBodyLimit::max(MAX_VOICE_UPLOAD_BYTES)),
        )
}
