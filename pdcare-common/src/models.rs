//! Domain models shared by the scorers and the HTTP layer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::recommendations::SeverityBand;
use crate::{Error, Result};

/// Origin of an audio clip
///
/// Recorded clips come from the live microphone capture and score on a
/// reduced `[0, 20]` scale; uploaded files score on the full `[0, 100]` scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Recorded,
    Uploaded,
}

impl SourceKind {
    /// Upper bound of the voice risk score for this source
    pub fn score_ceiling(&self) -> f64 {
        match self {
            SourceKind::Recorded => 20.0,
            SourceKind::Uploaded => 100.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Recorded => "recorded",
            SourceKind::Uploaded => "uploaded",
        }
    }
}

impl std::str::FromStr for SourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recorded" => Ok(SourceKind::Recorded),
            "uploaded" => Ok(SourceKind::Uploaded),
            other => Err(Error::InvalidInput(format!(
                "Unknown audio source '{}' (expected 'recorded' or 'uploaded')",
                other
            ))),
        }
    }
}

/// Decoded mono audio clip, consumed by one voice analysis
#[derive(Debug, Clone)]
pub struct AudioSample {
    /// Mono samples in [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Where the clip came from
    pub source: SourceKind,
}

impl AudioSample {
    pub fn new(samples: Vec<f32>, sample_rate: u32, source: SourceKind) -> Self {
        Self {
            samples,
            sample_rate,
            source,
        }
    }

    /// Clip duration in seconds (0 for an empty clip or zero sample rate)
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Health metrics entered on the assessment form
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthMetrics {
    /// Age in years
    pub age: f64,
    /// Resting heart rate in bpm
    pub heart_rate: f64,
    /// Blood oxygen saturation in percent
    #[serde(rename = "spO2")]
    pub spo2: f64,
    /// Muscle stiffness on a 0-1 scale
    pub muscle_stiffness: f64,
    /// Calories burnt per day (kcal)
    pub calories_burnt: f64,
    /// Hours of sleep per night
    pub sleep: f64,
    /// Steps per day
    pub step_count: f64,
}

/// Raw health form as submitted, every field still text
///
/// Fields may arrive as JSON strings or numbers; numbers are kept in their
/// textual form so the same strict parsing applies. Converted with
/// `HealthMetrics::try_from`. Missing or unparseable fields are rejected
/// rather than treated as zero.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthForm {
    #[serde(default, deserialize_with = "string_or_number")]
    pub age: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub heart_rate: String,
    #[serde(default, rename = "spO2", deserialize_with = "string_or_number")]
    pub spo2: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub muscle_stiffness: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub calories_burnt: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub sleep: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub step_count: String,
}

/// Accept `"60"`, `60`, `6.5` or `null` (empty) for a form field
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawField {
        Text(String),
        Whole(i64),
        Decimal(f64),
    }

    Ok(match Option::<RawField>::deserialize(deserializer)? {
        Some(RawField::Text(text)) => text,
        Some(RawField::Whole(value)) => value.to_string(),
        Some(RawField::Decimal(value)) => value.to_string(),
        None => String::new(),
    })
}

fn parse_whole(field: &str, raw: &str) -> Result<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(Error::InvalidInput(format!("{} is required", field)));
    }
    raw.parse::<i64>()
        .map(|v| v as f64)
        .map_err(|_| {
            Error::InvalidInput(format!("{} must be a whole number, got '{}'", field, raw))
        })
}

fn parse_decimal(field: &str, raw: &str) -> Result<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(Error::InvalidInput(format!("{} is required", field)));
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(Error::InvalidInput(format!("{} must be a number, got '{}'", field, raw))),
    }
}

impl TryFrom<HealthForm> for HealthMetrics {
    type Error = Error;

    fn try_from(form: HealthForm) -> Result<Self> {
        Ok(Self {
            age: parse_whole("age", &form.age)?,
            heart_rate: parse_whole("heartRate", &form.heart_rate)?,
            spo2: parse_whole("spO2", &form.spo2)?,
            muscle_stiffness: parse_decimal("muscleStiffness", &form.muscle_stiffness)?,
            calories_burnt: parse_whole("caloriesBurnt", &form.calories_burnt)?,
            sleep: parse_decimal("sleep", &form.sleep)?,
            step_count: parse_whole("stepCount", &form.step_count)?,
        })
    }
}

/// Heuristic risk score in a bounded range
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiskScore(f64);

impl RiskScore {
    /// Create a score, clamping into `[0, ceiling]`
    pub fn clamped(value: f64, ceiling: f64) -> Self {
        Self(value.clamp(0.0, ceiling))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl From<RiskScore> for f64 {
    fn from(score: RiskScore) -> f64 {
        score.0
    }
}

impl fmt::Display for RiskScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.0)
    }
}

/// Which assessment produced a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssessmentKind {
    Voice,
    Health,
}

impl AssessmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssessmentKind::Voice => "voice",
            AssessmentKind::Health => "health",
        }
    }

    /// Description used in reports
    pub fn description(&self) -> &'static str {
        match self {
            AssessmentKind::Voice => "Voice Analysis",
            AssessmentKind::Health => "Health Metrics",
        }
    }
}

impl std::str::FromStr for AssessmentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "voice" => Ok(AssessmentKind::Voice),
            "health" => Ok(AssessmentKind::Health),
            other => Err(Error::Internal(format!("Unknown assessment kind '{}'", other))),
        }
    }
}

/// One completed assessment in a user's history
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: AssessmentKind,
    pub score: RiskScore,
    pub severity: SeverityBand,
    pub created_at: DateTime<Utc>,
}
