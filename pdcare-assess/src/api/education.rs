//! Educational content endpoints

use axum::{extract::Path, routing::get, Json, Router};
use pdcare_common::education::{self, EducationTopic};

use crate::{ApiError, ApiResult, AppState};

/// GET /api/education
///
/// All topics in display order.
pub async fn list_topics() -> Json<&'static [EducationTopic]> {
    Json(education::topics())
}

/// GET /api/education/:key
pub async fn get_topic(Path(key): Path<String>) -> ApiResult<Json<&'static EducationTopic>> {
    education::topic(&key)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Education topic '{}'", key)))
}

pub fn education_routes() -> Router<AppState> {
    Router::new()
        .route("/api/education", get(list_topics))
        .route("/api/education/:key", get(get_topic))
}
