//! Per-user assessment history

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{format_timestamp, parse_timestamp, parse_uuid};
use crate::models::{AssessmentKind, AssessmentRecord, RiskScore};
use crate::recommendations::{classify, SeverityBand};
use crate::{Error, Result};

/// Store a completed assessment for a user
pub async fn record_assessment(
    pool: &SqlitePool,
    user_id: Uuid,
    kind: AssessmentKind,
    score: RiskScore,
) -> Result<AssessmentRecord> {
    let record = AssessmentRecord {
        id: Uuid::new_v4(),
        user_id,
        kind,
        score,
        severity: classify(score.value()),
        created_at: Utc::now(),
    };

    sqlx::query(
        r#"
        INSERT INTO assessments (guid, user_guid, kind, score, severity, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(record.id.to_string())
    .bind(record.user_id.to_string())
    .bind(record.kind.as_str())
    .bind(record.score.value())
    .bind(record.severity.as_str())
    .bind(format_timestamp(record.created_at))
    .execute(pool)
    .await?;

    tracing::debug!(
        assessment_id = %record.id,
        kind = record.kind.as_str(),
        score = record.score.value(),
        "Recorded assessment"
    );

    Ok(record)
}

/// All assessments of a user, newest first
pub async fn list_assessments(pool: &SqlitePool, user_id: Uuid) -> Result<Vec<AssessmentRecord>> {
    let rows = sqlx::query(
        r#"
        SELECT guid, user_guid, kind, score, severity, created_at
        FROM assessments
        WHERE user_guid = ?
        ORDER BY created_at DESC, rowid DESC
        "#,
    )
    .bind(user_id.to_string())
    .fetch_all(pool)
    .await?;

    rows.iter().map(record_from_row).collect()
}

/// One assessment belonging to a user
///
/// Another user's assessment is reported as not found.
pub async fn get_assessment(
    pool: &SqlitePool,
    user_id: Uuid,
    assessment_id: Uuid,
) -> Result<AssessmentRecord> {
    let row = sqlx::query(
        r#"
        SELECT guid, user_guid, kind, score, severity, created_at
        FROM assessments
        WHERE guid = ? AND user_guid = ?
        "#,
    )
    .bind(assessment_id.to_string())
    .bind(user_id.to_string())
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| Error::NotFound(format!("Assessment {} not found", assessment_id)))?;

    record_from_row(&row)
}

fn record_from_row(row: &SqliteRow) -> Result<AssessmentRecord> {
    let guid: String = row.get("guid");
    let user_guid: String = row.get("user_guid");
    let kind: String = row.get("kind");
    let score: f64 = row.get("score");
    let severity: String = row.get("severity");
    let created_at: String = row.get("created_at");

    Ok(AssessmentRecord {
        id: parse_uuid("assessments.guid", &guid)?,
        user_id: parse_uuid("assessments.user_guid", &user_guid)?,
        kind: kind.parse::<AssessmentKind>()?,
        score: RiskScore::clamped(score, 100.0),
        severity: severity.parse::<SeverityBand>()?,
        created_at: parse_timestamp("assessments.created_at", &created_at)?,
    })
}
