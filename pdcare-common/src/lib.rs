//! # PD Care Common Library
//!
//! Shared code for the PD Care assessment service including:
//! - Voice and health risk scorers
//! - Severity classification and recommendations
//! - Assessment report assembly
//! - Session management and assessment history (SQLite)
//! - Configuration loading
//! - Educational content

pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod education;
pub mod error;
pub mod models;
pub mod recommendations;
pub mod report;
pub mod scoring;
pub mod session;

pub use error::{Error, Result};
pub use models::{
    AssessmentKind, AssessmentRecord, AudioSample, HealthForm, HealthMetrics, RiskScore, SourceKind,
};
pub use recommendations::{classify, recommend, SeverityBand, DISCLAIMER};
pub use scoring::{HealthRiskScorer, VoiceAnalysis, VoiceRiskScorer};
pub use session::{Session, SessionManager, UserAccount};
