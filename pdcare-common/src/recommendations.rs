//! Severity classification and canned recommendations

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Error;

/// Screening disclaimer shown alongside every result
pub const DISCLAIMER: &str = "Note: This assessment is for screening purposes only and should not be considered a medical diagnosis. Please consult with a healthcare professional for proper medical evaluation.";

/// Scores below this are Low
const MODERATE_THRESHOLD: f64 = 30.0;
/// Scores at or above this are High
const HIGH_THRESHOLD: f64 = 60.0;

/// Coarse three-level classification of a risk score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityBand {
    Low,
    Moderate,
    High,
}

impl SeverityBand {
    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            SeverityBand::Low => "Low Risk",
            SeverityBand::Moderate => "Moderate Risk",
            SeverityBand::High => "High Risk",
        }
    }

    /// Storage key
    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityBand::Low => "low",
            SeverityBand::Moderate => "moderate",
            SeverityBand::High => "high",
        }
    }
}

impl fmt::Display for SeverityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for SeverityBand {
    type Err = Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "low" => Ok(SeverityBand::Low),
            "moderate" => Ok(SeverityBand::Moderate),
            "high" => Ok(SeverityBand::High),
            other => Err(Error::Internal(format!("Unknown severity band '{}'", other))),
        }
    }
}

/// Map a score onto its severity band
///
/// `< 30` is Low, `< 60` is Moderate, everything else High.
pub fn classify(score: f64) -> SeverityBand {
    if score < MODERATE_THRESHOLD {
        SeverityBand::Low
    } else if score < HIGH_THRESHOLD {
        SeverityBand::Moderate
    } else {
        SeverityBand::High
    }
}

const LOW_ADVICE: &[&str] = &[
    "Exercise: 30-60 min of aerobic exercise (walking, cycling, swimming) & strength training 3-4x/week",
    "Diet: Mediterranean diet (rich in antioxidants, omega-3, whole grains, fruits, and vegetables)",
    "Sleep: 7-8 hours of quality sleep, avoid caffeine/alcohol before bed",
    "Stress Management: Yoga, meditation, and social engagement to reduce anxiety",
    "Medical Monitoring: Regular neurologist checkups, track symptoms with a wearable device",
    "Supplements: Consult a doctor about vitamin D, B12, and coenzyme Q10 for neuroprotection",
];

const MODERATE_ADVICE: &[&str] = &[
    "Exercise: Physical therapy + daily walking, stretching, balance exercises, tai chi",
    "Diet: High-protein meals timed correctly (protein can interfere with some medications)",
    "Sleep: Improve sleep hygiene, use weighted blankets, and consider melatonin if needed",
    "Medication: Start Parkinson's meds as prescribed, monitor for side effects",
    "Fall Prevention: Use handrails, non-slip mats, and supportive shoes",
    "Cognitive Health: Engage in brain-stimulating activities (reading, puzzles, learning new skills)",
];

const HIGH_ADVICE: &[&str] = &[
    "Physical Therapy: Daily mobility exercises, assistive devices (walkers, handrails, wheelchair if needed)",
    "Diet: Soft foods (if swallowing is difficult), high-fiber diet to prevent constipation",
    "Sleep Management: Adjustable beds, nighttime movement assistance, melatonin for sleep regulation",
    "Medication Adjustment: Monitor effectiveness of levodopa and adjust doses with a neurologist",
    "Speech Therapy: Work on voice strength and swallowing exercises",
    "Caregiver Support: Daily assistance with movement, hygiene, and emotional support",
];

/// Ordered advice for a severity band
pub fn recommend(band: SeverityBand) -> &'static [&'static str] {
    match band {
        SeverityBand::Low => LOW_ADVICE,
        SeverityBand::Moderate => MODERATE_ADVICE,
        SeverityBand::High => HIGH_ADVICE,
    }
}
