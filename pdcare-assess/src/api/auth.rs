//! Account and session endpoints plus the session middleware
//!
//! Clients send `Authorization: Bearer <token>` with the token returned by
//! login or register.

use axum::{
    extract::{rejection::JsonRejection, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use pdcare_common::{Session, SessionManager};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::{ApiError, ApiResult, AppState};

/// Session attached to the request by [`session_middleware`]
#[derive(Debug, Clone, Default)]
pub struct CurrentSession(pub Option<Session>);

impl CurrentSession {
    /// The session, or 401 when the caller is anonymous
    pub fn require(&self) -> ApiResult<&Session> {
        self.0
            .as_ref()
            .ok_or_else(|| ApiError::Unauthorized("Login required".to_string()))
    }
}

/// Resolve the bearer token (if any) into a [`CurrentSession`] extension
///
/// No `Authorization` header means an anonymous request. A header that is
/// malformed, or a token that is unknown or expired, is rejected with 401.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let session = match bearer_token(request.headers())? {
        Some(token) => {
            let session = state.sessions.current_session(token).await?.ok_or_else(|| {
                ApiError::Unauthorized("Session is invalid or has expired".to_string())
            })?;
            Some(session)
        }
        None => None,
    };

    request.extensions_mut().insert(CurrentSession(session));
    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> ApiResult<Option<Uuid>> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let malformed = || ApiError::Unauthorized("Malformed Authorization header".to_string());
    let value = value.to_str().map_err(|_| malformed())?;
    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or_else(malformed)?;

    Uuid::parse_str(token).map(Some).map_err(|_| malformed())
}

/// Registration request body
///
/// Missing fields deserialize as empty so validation reports them.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// POST /api/auth/register
///
/// Creates the account and logs it in, returning the new session.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload?;
    let user = state
        .sessions
        .register(&req.username, &req.email, &req.password)
        .await?;
    let session = state.sessions.login(&user.email, &req.password).await?;

    Ok((StatusCode::CREATED, Json(session)))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<Session>> {
    let Json(req) = payload?;
    let session = state.sessions.login(&req.email, &req.password).await?;
    Ok(Json(session))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
) -> ApiResult<StatusCode> {
    let session = current.require()?;
    state.sessions.logout(session.token).await?;
    debug!(user_id = %session.user.id, "Session closed");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/auth/session
pub async fn current_session(
    Extension(current): Extension<CurrentSession>,
) -> ApiResult<Json<Session>> {
    Ok(Json(current.require()?.clone()))
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/session", get(current_session))
}
