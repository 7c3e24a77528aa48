//! Synthetic profile generation
//!
//! This module samples labeled survey records and longitudinal sequences from
//! three archetypal risk profiles. All randomness flows through an explicitly
//! passed generator so dataset generation is reproducible by seed.

use crate::error::EngineError;
use crate::survey::SurveyFeatures;
use crate::types::{DailyRecord, ProfileKind, RiskLevel, Trend};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

/// Population mix used when no explicit weights are given
/// (healthy / moderate / at-risk)
pub const DEFAULT_PROFILE_WEIGHTS: ProfileWeights = ProfileWeights {
    healthy: 30,
    moderate: 45,
    at_risk: 25,
};

/// Relative population weights for profile selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileWeights {
    pub healthy: u32,
    pub moderate: u32,
    pub at_risk: u32,
}

impl Default for ProfileWeights {
    fn default() -> Self {
        DEFAULT_PROFILE_WEIGHTS
    }
}

/// Per-field sampling ranges for one profile.
///
/// Hour and minute fields are continuous uniform draws; the 1-10 scales are
/// integer draws with an exclusive upper bound, matching the reference
/// ranges. Fields are sampled independently within a profile.
struct ProfileRanges {
    sitting_hours: (f64, f64),
    screen_time: (f64, f64),
    sleep_hours: (f64, f64),
    exercise_minutes: (f64, f64),
    back_pain: (u8, u8),
    neck_pain: (u8, u8),
    eye_strain: (u8, u8),
    stress_level: (u8, u8),
    posture_quality: (u8, u8),
}

fn ranges_for(kind: ProfileKind) -> ProfileRanges {
    match kind {
        ProfileKind::Healthy => ProfileRanges {
            sitting_hours: (3.0, 6.0),
            screen_time: (2.0, 5.0),
            sleep_hours: (7.0, 9.0),
            exercise_minutes: (150.0, 300.0),
            back_pain: (1, 4),
            neck_pain: (1, 4),
            eye_strain: (1, 4),
            stress_level: (1, 4),
            posture_quality: (7, 10),
        },
        ProfileKind::Moderate => ProfileRanges {
            sitting_hours: (5.0, 8.0),
            screen_time: (5.0, 8.0),
            sleep_hours: (5.0, 7.0),
            exercise_minutes: (60.0, 150.0),
            back_pain: (3, 7),
            neck_pain: (3, 7),
            eye_strain: (4, 7),
            stress_level: (4, 7),
            posture_quality: (4, 7),
        },
        ProfileKind::AtRisk => ProfileRanges {
            sitting_hours: (8.0, 12.0),
            screen_time: (8.0, 14.0),
            sleep_hours: (4.0, 6.0),
            exercise_minutes: (0.0, 60.0),
            back_pain: (6, 10),
            neck_pain: (6, 10),
            eye_strain: (6, 10),
            stress_level: (6, 10),
            posture_quality: (1, 5),
        },
    }
}

/// Draw one survey record from a profile's per-field ranges.
pub fn sample_profile<R: Rng + ?Sized>(kind: ProfileKind, rng: &mut R) -> SurveyFeatures {
    let ranges = ranges_for(kind);

    SurveyFeatures {
        sitting_hours: rng.gen_range(ranges.sitting_hours.0..ranges.sitting_hours.1),
        screen_time: rng.gen_range(ranges.screen_time.0..ranges.screen_time.1),
        sleep_hours: rng.gen_range(ranges.sleep_hours.0..ranges.sleep_hours.1),
        exercise_minutes: rng.gen_range(ranges.exercise_minutes.0..ranges.exercise_minutes.1),
        back_pain: rng.gen_range(ranges.back_pain.0..ranges.back_pain.1) as f64,
        neck_pain: rng.gen_range(ranges.neck_pain.0..ranges.neck_pain.1) as f64,
        eye_strain: rng.gen_range(ranges.eye_strain.0..ranges.eye_strain.1) as f64,
        stress_level: rng.gen_range(ranges.stress_level.0..ranges.stress_level.1) as f64,
        posture_quality: rng.gen_range(ranges.posture_quality.0..ranges.posture_quality.1) as f64,
    }
}

/// Generate a labeled dataset from the weighted profile mix.
///
/// Labels follow the profile archetypes: healthy -> LOW, moderate -> MEDIUM,
/// at-risk -> HIGH.
pub fn generate_dataset<R: Rng + ?Sized>(
    n_samples: usize,
    weights: &ProfileWeights,
    rng: &mut R,
) -> Result<Vec<(SurveyFeatures, RiskLevel)>, EngineError> {
    let kinds = [ProfileKind::Healthy, ProfileKind::Moderate, ProfileKind::AtRisk];
    let index = WeightedIndex::new([weights.healthy, weights.moderate, weights.at_risk])
        .map_err(|e| EngineError::InvalidInput(format!("invalid profile weights: {e}")))?;

    let mut dataset = Vec::with_capacity(n_samples);
    for _ in 0..n_samples {
        let kind = kinds[index.sample(rng)];
        dataset.push((sample_profile(kind, rng), kind.risk_level()));
    }
    Ok(dataset)
}

/// Split a labeled dataset into parallel feature vectors and integer labels.
pub fn dataset_to_vectors(
    dataset: &[(SurveyFeatures, RiskLevel)],
) -> (Vec<[f64; 9]>, Vec<u8>) {
    let features = dataset.iter().map(|(f, _)| f.to_vector()).collect();
    let labels = dataset.iter().map(|(_, l)| l.label()).collect();
    (features, labels)
}

/// Linearly perturb a base record along a trend, proportionally to day/n_days.
///
/// Improving raises weekly exercise and lowers back pain and stress; declining
/// does the opposite. Pain and stress stay within [1,10] and exercise never
/// goes negative.
pub fn apply_trend(base: &SurveyFeatures, trend: Trend, day: u32, n_days: u32) -> SurveyFeatures {
    let mut features = *base;
    if n_days == 0 {
        return features;
    }

    let factor = day as f64 / n_days as f64 * 0.2;
    match trend {
        Trend::Improving => {
            features.exercise_minutes += factor * 50.0;
            features.back_pain = (features.back_pain - factor * 2.0).max(1.0);
            features.stress_level = (features.stress_level - factor * 2.0).max(1.0);
        }
        Trend::Declining => {
            features.exercise_minutes = (features.exercise_minutes - factor * 50.0).max(0.0);
            features.back_pain = (features.back_pain + factor * 2.0).min(10.0);
            features.stress_level = (features.stress_level + factor * 2.0).min(10.0);
        }
        Trend::Stable => {}
    }
    features
}

/// Generate multi-day sequences for `n_users`, one record per (user, day).
///
/// Each user gets a random base profile and trend; every day is a fresh draw
/// from the base profile with the trend perturbation applied.
pub fn generate_longitudinal<R: Rng + ?Sized>(
    n_users: u32,
    n_days: u32,
    rng: &mut R,
) -> Vec<DailyRecord> {
    let trends = [Trend::Improving, Trend::Stable, Trend::Declining];
    let profiles = [ProfileKind::Healthy, ProfileKind::Moderate, ProfileKind::AtRisk];

    let mut records = Vec::with_capacity(n_users as usize * n_days as usize);
    for user_id in 0..n_users {
        let trend = trends[rng.gen_range(0..trends.len())];
        let base_profile = profiles[rng.gen_range(0..profiles.len())];

        for day in 0..n_days {
            let base = sample_profile(base_profile, rng);
            let features = apply_trend(&base, trend, day, n_days);

            records.push(DailyRecord {
                user_id,
                day,
                sitting_hours: round1(features.sitting_hours),
                screen_time: round1(features.screen_time),
                sleep_hours: round1(features.sleep_hours),
                exercise_minutes: features.exercise_minutes as u32,
                back_pain: features.back_pain as u8,
                neck_pain: features.neck_pain as u8,
                eye_strain: features.eye_strain as u8,
                stress_level: features.stress_level as u8,
                posture_quality: features.posture_quality as u8,
                trend,
            });
        }
    }
    records
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::HealthScorer;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_healthy_samples_stay_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        for _ in 0..200 {
            let features = sample_profile(ProfileKind::Healthy, &mut rng);
            assert!((3.0..6.0).contains(&features.sitting_hours));
            assert!((2.0..5.0).contains(&features.screen_time));
            assert!((7.0..9.0).contains(&features.sleep_hours));
            assert!((150.0..300.0).contains(&features.exercise_minutes));
            assert!((1.0..=3.0).contains(&features.back_pain));
            assert!((1.0..=3.0).contains(&features.stress_level));
            assert!((7.0..=9.0).contains(&features.posture_quality));
        }
    }

    #[test]
    fn test_at_risk_samples_stay_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for _ in 0..200 {
            let features = sample_profile(ProfileKind::AtRisk, &mut rng);
            assert!((8.0..12.0).contains(&features.sitting_hours));
            assert!((0.0..60.0).contains(&features.exercise_minutes));
            assert!((6.0..=9.0).contains(&features.back_pain));
            assert!((1.0..=4.0).contains(&features.posture_quality));
        }
    }

    #[test]
    fn test_healthy_samples_score_low_risk() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let scorer = HealthScorer::new();

        for _ in 0..100 {
            let features = sample_profile(ProfileKind::Healthy, &mut rng);
            let result = scorer.analyze(&features, None);
            assert_eq!(result.risk_level, crate::types::RiskLevel::Low);
        }
    }

    #[test]
    fn test_dataset_is_deterministic_by_seed() {
        let mut rng_a = ChaCha8Rng::seed_from_u64(123);
        let mut rng_b = ChaCha8Rng::seed_from_u64(123);

        let a = generate_dataset(50, &DEFAULT_PROFILE_WEIGHTS, &mut rng_a).unwrap();
        let b = generate_dataset(50, &DEFAULT_PROFILE_WEIGHTS, &mut rng_b).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_dataset_labels_match_profiles() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let dataset = generate_dataset(300, &DEFAULT_PROFILE_WEIGHTS, &mut rng).unwrap();

        assert_eq!(dataset.len(), 300);
        // With a 30/45/25 mix every class should appear
        for level in [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High] {
            assert!(dataset.iter().any(|(_, l)| *l == level));
        }
    }

    #[test]
    fn test_zero_weights_are_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let weights = ProfileWeights {
            healthy: 0,
            moderate: 0,
            at_risk: 0,
        };
        assert!(generate_dataset(10, &weights, &mut rng).is_err());
    }

    #[test]
    fn test_vector_export_is_parallel() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let dataset = generate_dataset(20, &DEFAULT_PROFILE_WEIGHTS, &mut rng).unwrap();
        let (features, labels) = dataset_to_vectors(&dataset);

        assert_eq!(features.len(), labels.len());
        assert_eq!(features[3], dataset[3].0.to_vector());
        assert_eq!(labels[3], dataset[3].1.label());
    }

    #[test]
    fn test_trend_caps_hold_at_extremes() {
        let base = SurveyFeatures {
            exercise_minutes: 10.0,
            back_pain: 10.0,
            stress_level: 1.0,
            ..SurveyFeatures::default()
        };

        let declined = apply_trend(&base, Trend::Declining, 30, 30);
        assert_eq!(declined.exercise_minutes, 0.0);
        assert_eq!(declined.back_pain, 10.0);

        let improved = apply_trend(&base, Trend::Improving, 30, 30);
        assert_eq!(improved.stress_level, 1.0);
        assert!(improved.exercise_minutes > base.exercise_minutes);
    }

    #[test]
    fn test_stable_trend_is_identity() {
        let base = sample_profile(ProfileKind::Moderate, &mut ChaCha8Rng::seed_from_u64(3));
        assert_eq!(apply_trend(&base, Trend::Stable, 15, 30), base);
    }

    #[test]
    fn test_declining_trend_never_raises_score() {
        let scorer = HealthScorer::new();
        let base = sample_profile(ProfileKind::Moderate, &mut ChaCha8Rng::seed_from_u64(11));

        let mut previous = f64::INFINITY;
        for day in 0..30 {
            let features = apply_trend(&base, Trend::Declining, day, 30);
            let score = scorer.analyze(&features, None).overall_risk_score;
            assert!(score <= previous);
            previous = score;
        }
    }

    #[test]
    fn test_longitudinal_shape_and_tags() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let records = generate_longitudinal(5, 10, &mut rng);

        assert_eq!(records.len(), 50);
        for record in &records {
            assert!(record.user_id < 5);
            assert!(record.day < 10);
            assert!((1..=10).contains(&record.back_pain));
            assert!((1..=10).contains(&record.stress_level));
        }
        // All records of one user carry the same trend tag
        let user0: Vec<_> = records.iter().filter(|r| r.user_id == 0).collect();
        assert!(user0.iter().all(|r| r.trend == user0[0].trend));
    }
}
