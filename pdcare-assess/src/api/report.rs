//! Assessment report download

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Extension, Router,
};
use chrono::Utc;
use pdcare_common::db::get_assessment;
use pdcare_common::report::AssessmentReport;
use uuid::Uuid;

use super::auth::CurrentSession;
use crate::{ApiResult, AppState};

/// GET /api/assessments/:id/report
///
/// Plain-text report served as an attachment. Only the owner of the
/// assessment can download it.
pub async fn download_report(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Path(assessment_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let session = current.require()?;
    let record = get_assessment(&state.db, session.user.id, assessment_id).await?;
    let report = AssessmentReport::from_record(&record, Utc::now());

    tracing::info!(
        assessment_id = %record.id,
        report_id = %report.report_id,
        "Generated assessment report"
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", report.file_name()),
            ),
        ],
        report.render_text(),
    ))
}

pub fn report_routes() -> Router<AppState> {
    Router::new().route("/api/assessments/:id/report", get(download_report))
}
