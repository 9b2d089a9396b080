//! End-to-end scoring properties: scorer output through classification

use pdcare_common::{
    classify, recommend, AudioSample, HealthMetrics, HealthRiskScorer, SeverityBand, SourceKind,
    VoiceRiskScorer,
};

fn metrics(
    age: f64,
    heart_rate: f64,
    spo2: f64,
    stiffness: f64,
    calories: f64,
    sleep: f64,
    steps: f64,
) -> HealthMetrics {
    HealthMetrics {
        age,
        heart_rate,
        spo2,
        muscle_stiffness: stiffness,
        calories_burnt: calories,
        sleep,
        step_count: steps,
    }
}

#[test]
fn test_reference_health_form() {
    let score = HealthRiskScorer::new().score(&metrics(60.0, 80.0, 95.0, 0.0, 2000.0, 6.0, 5000.0));
    assert!((score.value() - 4.0).abs() < 1e-9);
    assert_eq!(classify(score.value()), SeverityBand::Low);
}

#[test]
fn test_health_score_bounded_over_grid() {
    let scorer = HealthRiskScorer::new();
    for age in [0.0, 30.0, 56.0, 90.0] {
        for heart_rate in [0.0, 40.0, 80.0, 220.0] {
            for spo2 in [50.0, 90.0, 95.0, 100.0] {
                for stiffness in [0.0, 0.5, 1.0] {
                    for calories in [0.0, 1500.0, 2500.0] {
                        let form =
                            metrics(age, heart_rate, spo2, stiffness, calories, 4.0, 1000.0);
                        let value = scorer.score(&form).value();
                        assert!((0.0..=100.0).contains(&value));
                    }
                }
            }
        }
    }
}

#[test]
fn test_poor_metrics_reach_high_band() {
    // spO2 80 -> 75, calories 0 -> 30, stiffness 1 -> 10, hr 140 -> 30, flats 45
    let score = HealthRiskScorer::new().score(&metrics(70.0, 140.0, 80.0, 1.0, 0.0, 4.0, 1000.0));
    assert!((score.value() - 38.0).abs() < 1e-9);
    assert_eq!(classify(score.value()), SeverityBand::Moderate);

    let score = HealthRiskScorer::new().score(&metrics(70.0, 140.0, 50.0, 1.0, 0.0, 4.0, 1000.0));
    assert_eq!(classify(score.value()), SeverityBand::High);
    assert!(recommend(SeverityBand::High)[0].starts_with("Physical Therapy"));
}

#[test]
fn test_recorded_voice_never_exceeds_twenty() {
    let scorer = VoiceRiskScorer::new();
    let patterns: Vec<Vec<f32>> = vec![
        vec![0.0; 4096],
        (0..4096).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect(),
        (0..4096).map(|i| ((i % 13) as f32 / 6.0) - 1.0).collect(),
    ];
    for samples in patterns {
        let recorded = scorer
            .score(&AudioSample::new(samples.clone(), 8000, SourceKind::Recorded))
            .unwrap();
        let uploaded = scorer
            .score(&AudioSample::new(samples, 8000, SourceKind::Uploaded))
            .unwrap();
        assert!(recorded.value() <= 20.0);
        assert!(uploaded.value() <= 100.0);
        assert!(recorded <= uploaded);
    }
}
