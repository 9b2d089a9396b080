//! Assessment report assembly and plain-text rendering

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use std::fmt;

use crate::models::{AssessmentKind, AssessmentRecord, RiskScore};
use crate::recommendations::{recommend, SeverityBand, DISCLAIMER};

/// Text column width for wrapped paragraphs
const REPORT_WIDTH: usize = 78;

/// Everything shown on a downloadable assessment report
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentReport {
    /// `PD` followed by the last six digits of the generation time in ms
    pub report_id: String,
    /// Long-form date, e.g. "October 18, 2026"
    pub report_date: String,
    pub kind: AssessmentKind,
    pub score: RiskScore,
    pub severity: SeverityBand,
    pub recommendations: Vec<String>,
    pub disclaimer: String,
    pub generated_at: DateTime<Utc>,
}

impl AssessmentReport {
    /// Build a report for a stored assessment
    pub fn from_record(record: &AssessmentRecord, generated_at: DateTime<Utc>) -> Self {
        let recommendations = recommend(record.severity)
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty() && !line.starts_with("Note:"))
            .map(str::to_string)
            .collect();

        Self {
            report_id: report_id(generated_at),
            report_date: assessment_date(record.created_at),
            kind: record.kind,
            score: record.score,
            severity: record.severity,
            recommendations,
            disclaimer: DISCLAIMER.to_string(),
            generated_at,
        }
    }

    /// Suggested download file name
    pub fn file_name(&self) -> String {
        format!("PD-Assessment-{}.txt", self.report_id)
    }

    /// Render the report as a fixed-layout text document
    pub fn render_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AssessmentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(REPORT_WIDTH);
        let divider = "-".repeat(REPORT_WIDTH);

        writeln!(f, "{}", rule)?;
        writeln!(f, "Parkinson's Disease Assessment Center")?;
        writeln!(f, "Advanced Neurological Assessment Division")?;
        writeln!(f, "{}", rule)?;
        writeln!(f)?;

        writeln!(f, "DIAGNOSTIC ASSESSMENT REPORT")?;
        writeln!(f, "Report Date: {:<30}Report ID: {}", self.report_date, self.report_id)?;
        writeln!(f, "Assessment Type: {}", self.kind.description())?;
        writeln!(f, "{}", divider)?;
        writeln!(f)?;

        writeln!(f, "RISK ASSESSMENT RESULTS")?;
        writeln!(f, "Risk Classification: {}", self.severity.label())?;
        writeln!(f, "Assessment Score:    {}", self.score)?;
        writeln!(f, "{}", divider)?;
        writeln!(f)?;

        writeln!(f, "CLINICAL RECOMMENDATIONS")?;
        for (idx, rec) in self.recommendations.iter().enumerate() {
            let prefix = format!("{:>2}. ", idx + 1);
            let indent = " ".repeat(prefix.len());
            for (line_idx, line) in wrap(rec, REPORT_WIDTH - prefix.len()).iter().enumerate() {
                let lead = if line_idx == 0 { &prefix } else { &indent };
                writeln!(f, "{}{}", lead, line)?;
            }
        }
        writeln!(f, "{}", divider)?;

        for line in wrap(&self.disclaimer, REPORT_WIDTH) {
            writeln!(f, "{}", line)?;
        }
        writeln!(f)?;

        writeln!(
            f,
            "© {} ParkinsonCare. All rights reserved. | Confidential - For Medical Use Only | Page 1 of 1",
            self.generated_at.year()
        )
    }
}

/// `PD` + last six digits of the epoch milliseconds
pub fn report_id(generated_at: DateTime<Utc>) -> String {
    format!("PD{:06}", generated_at.timestamp_millis().rem_euclid(1_000_000))
}

fn assessment_date(at: DateTime<Utc>) -> String {
    at.format("%B %-d, %Y").to_string()
}

/// Greedy word wrap; words longer than `width` get their own line
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
