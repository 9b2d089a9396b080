//! Health-metrics risk scorer

use crate::models::{HealthMetrics, RiskScore};

/// SpO2 below this level adds risk
const SPO2_NORMAL: f64 = 95.0;
/// Daily calories below this level add risk
const CALORIES_NORMAL: f64 = 2000.0;
/// Reference resting heart rate
const HEART_RATE_REFERENCE: f64 = 80.0;

/// Scores a set of health metrics on a `[0, 100]` scale
///
/// Five weighted terms plus three flat additions are summed, divided by 5 and
/// clamped. Input is assumed to be validated numeric data; parsing happens at
/// the form boundary (`HealthMetrics::try_from`).
#[derive(Debug, Clone, Copy, Default)]
pub struct HealthRiskScorer;

impl HealthRiskScorer {
    pub fn new() -> Self {
        Self
    }

    /// Compute the health risk score
    pub fn score(&self, metrics: &HealthMetrics) -> RiskScore {
        let total = Self::spo2_term(metrics.spo2)
            + Self::calorie_term(metrics.calories_burnt)
            + metrics.muscle_stiffness * 10.0
            + (HEART_RATE_REFERENCE - metrics.heart_rate).abs() * 0.5
            + if metrics.age > 55.0 { 20.0 } else { 0.0 }
            + if metrics.step_count < 5000.0 { 15.0 } else { 0.0 }
            + if metrics.sleep < 6.0 { 10.0 } else { 0.0 };

        let score = RiskScore::clamped(total / 5.0, 100.0);

        tracing::debug!(
            spo2_term = Self::spo2_term(metrics.spo2),
            calorie_term = Self::calorie_term(metrics.calories_burnt),
            score = score.value(),
            "Health risk scored"
        );

        score
    }

    /// `(95 - spO2) * 5` below 95, otherwise 0
    pub fn spo2_term(spo2: f64) -> f64 {
        if spo2 < SPO2_NORMAL {
            (SPO2_NORMAL - spo2) * 5.0
        } else {
            0.0
        }
    }

    /// `(2000 - calories) * 0.015` below 2000, otherwise 0
    pub fn calorie_term(calories_burnt: f64) -> f64 {
        if calories_burnt < CALORIES_NORMAL {
            (CALORIES_NORMAL - calories_burnt) * 0.015
        } else {
            0.0
        }
    }
}
