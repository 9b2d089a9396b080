//! pdcare-assess library interface
//!
//! Exposes the router and shared state for the binary and for integration
//! tests.

pub mod api;
pub mod error;
pub mod utils;

pub use crate::error::{ApiError, ApiResult};

use axum::{middleware, Router};
use chrono::{DateTime, Utc};
use pdcare_common::db::SqliteSessionStore;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

/// Largest accepted voice upload
pub const MAX_VOICE_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Accounts and login sessions
    pub sessions: SqliteSessionStore,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, session_ttl_hours: u32) -> Self {
        Self {
            sessions: SqliteSessionStore::new(db.clone(), session_ttl_hours),
            db,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
///
/// Every `/api` route runs behind the session middleware, which rejects a
/// bad bearer token and otherwise attaches the caller's session (if any).
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(api::buildinfo_routes())
        .merge(api::education_routes())
        .merge(api::auth_routes())
        .merge(api::assessment_routes())
        .merge(api::report_routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::session_middleware,
        ));

    Router::new()
        .merge(api)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
