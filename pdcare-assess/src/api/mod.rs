//! HTTP API handlers for pdcare-assess

pub mod assessment;
pub mod auth;
pub mod buildinfo;
pub mod education;
pub mod health;
pub mod report;

pub use assessment::assessment_routes;
pub use auth::{auth_routes, session_middleware, CurrentSession};
pub use buildinfo::buildinfo_routes;
pub use education::education_routes;
pub use health::health_routes;
pub use report::report_routes;
