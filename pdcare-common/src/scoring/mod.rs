//! Heuristic risk scorers
//!
//! Both scorers are pure, synchronous functions of their input. They carry
//! no state between calls and are safe to share across threads.

mod health;
mod voice;

pub use health::HealthRiskScorer;
pub use voice::{VoiceAnalysis, VoiceRiskScorer};
