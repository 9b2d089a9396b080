//! Voice clip risk scorer
//!
//! Derives four coarse metrics from a decoded mono waveform and folds them
//! into a bounded score:
//! - tremor: short-term amplitude jitter
//! - pitch stability: block-average energy
//! - speech rate: zero crossings per second
//! - voice breaks: silence onsets per second

use serde::Serialize;

use crate::models::{AudioSample, RiskScore};
use crate::{Error, Result};

/// Default amplitude at or below which a sample counts as silence
pub const DEFAULT_SILENCE_THRESHOLD: f32 = 0.01;

/// Samples per pitch-stability block
pub const PITCH_BLOCK_SIZE: usize = 1024;

/// Maximum raw sub-score total (10 + 10 + 5 + 5)
const MAX_RAW_TOTAL: f64 = 30.0;

/// Metrics and sub-scores from one voice analysis
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VoiceAnalysis {
    /// Mean absolute amplitude delta, scaled by 1000
    pub tremor: f64,
    /// 1 minus average block energy, floored at 0
    pub pitch_stability: f64,
    /// Zero crossings per second
    pub speech_rate: f64,
    /// Number of silence onsets
    pub voice_breaks: usize,
    /// Silence onsets per second
    pub voice_break_rate: f64,
    pub tremor_score: f64,
    pub pitch_score: f64,
    pub speech_rate_score: f64,
    pub voice_break_score: f64,
    /// Final score, `[0, 20]` for recorded clips and `[0, 100]` for uploads
    pub score: RiskScore,
}

impl VoiceAnalysis {
    /// Sum of the four sub-scores before rescaling (max 30)
    pub fn raw_total(&self) -> f64 {
        self.tremor_score + self.pitch_score + self.speech_rate_score + self.voice_break_score
    }
}

/// Voice risk scorer
#[derive(Debug, Clone)]
pub struct VoiceRiskScorer {
    /// Silence threshold (linear amplitude)
    silence_threshold: f32,
}

impl VoiceRiskScorer {
    /// Create scorer with the default silence threshold
    pub fn new() -> Self {
        Self {
            silence_threshold: DEFAULT_SILENCE_THRESHOLD,
        }
    }

    /// Set silence threshold as a linear amplitude in `[0, 1]`
    pub fn with_silence_threshold(mut self, threshold: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(Error::InvalidInput(format!(
                "Silence threshold must be within [0, 1], got {}",
                threshold
            )));
        }
        self.silence_threshold = threshold;
        Ok(self)
    }

    /// Score a clip
    pub fn score(&self, clip: &AudioSample) -> Result<RiskScore> {
        Ok(self.analyze(clip)?.score)
    }

    /// Analyze a clip and return the full metric breakdown
    ///
    /// Fails with `InvalidInput` when the sample rate is zero. Empty and
    /// single-sample clips are valid and yield zero for pairwise metrics.
    pub fn analyze(&self, clip: &AudioSample) -> Result<VoiceAnalysis> {
        if clip.sample_rate == 0 {
            return Err(Error::InvalidInput(
                "Sample rate must be greater than 0".to_string(),
            ));
        }

        let samples = &clip.samples;
        let duration = clip.duration_seconds();

        let mut jitter_sum = 0.0f64;
        let mut crossings = 0usize;
        let mut voice_breaks = 0usize;
        let mut in_silence = false;
        let mut previous: Option<f32> = None;

        for &sample in samples {
            let amplitude = sample.abs();

            if let Some(prev) = previous {
                jitter_sum += (amplitude - prev.abs()).abs() as f64;
                if sample * prev < 0.0 {
                    crossings += 1;
                }
            }

            // Count falling edges only
            if amplitude <= self.silence_threshold {
                if !in_silence {
                    voice_breaks += 1;
                    in_silence = true;
                }
            } else {
                in_silence = false;
            }

            previous = Some(sample);
        }

        let tremor = if samples.is_empty() {
            0.0
        } else {
            jitter_sum / samples.len() as f64 * 1000.0
        };
        let pitch_stability = Self::pitch_stability(samples);
        let (speech_rate, voice_break_rate) = if duration > 0.0 {
            (crossings as f64 / duration, voice_breaks as f64 / duration)
        } else {
            (0.0, 0.0)
        };

        let tremor_score = (tremor * 50.0).min(10.0);
        let pitch_score = ((1.0 - pitch_stability) * 50.0).min(10.0);
        let speech_rate_score = ((3.0 - speech_rate).abs() * 5.0).min(5.0);
        let voice_break_score = (voice_break_rate * 10.0).min(5.0);

        let raw_total = tremor_score + pitch_score + speech_rate_score + voice_break_score;
        let ceiling = clip.source.score_ceiling();
        let score = RiskScore::clamped(raw_total * (ceiling / MAX_RAW_TOTAL), ceiling);

        tracing::debug!(
            source = clip.source.as_str(),
            tremor = format!("{:.3}", tremor),
            pitch_stability = format!("{:.3}", pitch_stability),
            speech_rate = format!("{:.3}", speech_rate),
            voice_breaks = voice_breaks,
            voice_break_rate = format!("{:.3}", voice_break_rate),
            tremor_score = format!("{:.2}", tremor_score),
            pitch_score = format!("{:.2}", pitch_score),
            speech_rate_score = format!("{:.2}", speech_rate_score),
            voice_break_score = format!("{:.2}", voice_break_score),
            score = format!("{:.2}", score.value()),
            "Voice analysis complete"
        );

        Ok(VoiceAnalysis {
            tremor,
            pitch_stability,
            speech_rate,
            voice_breaks,
            voice_break_rate,
            tremor_score,
            pitch_score,
            speech_rate_score,
            voice_break_score,
            score,
        })
    }

    /// Average block energy subtracted from 1, floored at 0
    ///
    /// Only full blocks that end strictly before the last sample are summed,
    /// and the sum is divided by the fractional block count `len / 1024`.
    fn pitch_stability(samples: &[f32]) -> f64 {
        if samples.is_empty() {
            return 1.0;
        }

        let len = samples.len();
        let energy_sum: f64 = samples
            .chunks_exact(PITCH_BLOCK_SIZE)
            .enumerate()
            .take_while(|(idx, _)| idx * PITCH_BLOCK_SIZE + PITCH_BLOCK_SIZE < len)
            .map(|(_, block)| {
                block.iter().map(|s| s.abs() as f64).sum::<f64>() / PITCH_BLOCK_SIZE as f64
            })
            .sum();

        let block_count = len as f64 / PITCH_BLOCK_SIZE as f64;
        (1.0 - energy_sum / block_count).max(0.0)
    }
}

impl Default for VoiceRiskScorer {
    fn default() -> Self {
        Self::new()
    }
}
