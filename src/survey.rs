//! Survey feature resolution
//!
//! External callers submit a possibly partial mapping of the nine survey
//! fields. Default substitution happens exactly once, at the entry of
//! scoring, so every downstream stage operates on a fully-populated record.

use serde::{Deserialize, Serialize};

/// Number of survey features, fixed by the classifier feature-vector contract
pub const FEATURE_COUNT: usize = 9;

/// Survey field names in fixed feature-vector order
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "sitting_hours",
    "screen_time",
    "sleep_hours",
    "exercise_minutes",
    "back_pain",
    "neck_pain",
    "eye_strain",
    "stress_level",
    "posture_quality",
];

/// A raw survey submission; any field may be absent.
///
/// Range and type validation is the caller's responsibility; the engine only
/// guarantees graceful defaulting of missing fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurveyResponse {
    /// Hours seated per day [0,24]
    pub sitting_hours: Option<f64>,
    /// Hours on screen per day [0,24]
    pub screen_time: Option<f64>,
    /// Hours slept per night [0,24]
    pub sleep_hours: Option<f64>,
    /// Minutes exercised per week [0,1440]
    pub exercise_minutes: Option<f64>,
    /// Self-reported severity [1,10]
    pub back_pain: Option<f64>,
    /// Self-reported severity [1,10]
    pub neck_pain: Option<f64>,
    /// Self-reported severity [1,10]
    pub eye_strain: Option<f64>,
    /// Self-reported severity [1,10]
    pub stress_level: Option<f64>,
    /// Self-assessed, higher is better [1,10]
    pub posture_quality: Option<f64>,
}

impl SurveyResponse {
    /// Resolve missing fields to their documented neutral defaults.
    ///
    /// Defaults: counts (sitting, screen, exercise) -> 0; sleep -> 7;
    /// pain/strain/stress scales -> 1; posture_quality -> 5.
    pub fn resolve(&self) -> SurveyFeatures {
        SurveyFeatures {
            sitting_hours: self.sitting_hours.unwrap_or(0.0),
            screen_time: self.screen_time.unwrap_or(0.0),
            sleep_hours: self.sleep_hours.unwrap_or(7.0),
            exercise_minutes: self.exercise_minutes.unwrap_or(0.0),
            back_pain: self.back_pain.unwrap_or(1.0),
            neck_pain: self.neck_pain.unwrap_or(1.0),
            eye_strain: self.eye_strain.unwrap_or(1.0),
            stress_level: self.stress_level.unwrap_or(1.0),
            posture_quality: self.posture_quality.unwrap_or(5.0),
        }
    }
}

/// Fully-populated survey record consumed by the scorer and classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurveyFeatures {
    pub sitting_hours: f64,
    pub screen_time: f64,
    pub sleep_hours: f64,
    pub exercise_minutes: f64,
    pub back_pain: f64,
    pub neck_pain: f64,
    pub eye_strain: f64,
    pub stress_level: f64,
    pub posture_quality: f64,
}

impl Default for SurveyFeatures {
    fn default() -> Self {
        SurveyResponse::default().resolve()
    }
}

impl SurveyFeatures {
    /// Flatten to the fixed feature-vector order (see [`FEATURE_NAMES`])
    pub fn to_vector(&self) -> [f64; FEATURE_COUNT] {
        [
            self.sitting_hours,
            self.screen_time,
            self.sleep_hours,
            self.exercise_minutes,
            self.back_pain,
            self.neck_pain,
            self.eye_strain,
            self.stress_level,
            self.posture_quality,
        ]
    }

    /// Rebuild from a fixed-order feature vector
    pub fn from_vector(v: &[f64; FEATURE_COUNT]) -> Self {
        Self {
            sitting_hours: v[0],
            screen_time: v[1],
            sleep_hours: v[2],
            exercise_minutes: v[3],
            back_pain: v[4],
            neck_pain: v[5],
            eye_strain: v[6],
            stress_level: v[7],
            posture_quality: v[8],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_response_resolves_to_defaults() {
        let features = SurveyResponse::default().resolve();

        assert_eq!(features.sitting_hours, 0.0);
        assert_eq!(features.screen_time, 0.0);
        assert_eq!(features.sleep_hours, 7.0);
        assert_eq!(features.exercise_minutes, 0.0);
        assert_eq!(features.back_pain, 1.0);
        assert_eq!(features.neck_pain, 1.0);
        assert_eq!(features.eye_strain, 1.0);
        assert_eq!(features.stress_level, 1.0);
        assert_eq!(features.posture_quality, 5.0);
    }

    #[test]
    fn test_present_fields_pass_through() {
        let response = SurveyResponse {
            sitting_hours: Some(8.0),
            back_pain: Some(6.0),
            ..Default::default()
        };
        let features = response.resolve();

        assert_eq!(features.sitting_hours, 8.0);
        assert_eq!(features.back_pain, 6.0);
        // Untouched fields still default
        assert_eq!(features.sleep_hours, 7.0);
    }

    #[test]
    fn test_partial_json_deserializes() {
        let response: SurveyResponse =
            serde_json::from_str(r#"{"sitting_hours": 9, "stress_level": 8}"#).unwrap();
        let features = response.resolve();

        assert_eq!(features.sitting_hours, 9.0);
        assert_eq!(features.stress_level, 8.0);
        assert_eq!(features.posture_quality, 5.0);
    }

    #[test]
    fn test_vector_round_trip() {
        let features = SurveyFeatures {
            sitting_hours: 8.0,
            screen_time: 9.0,
            sleep_hours: 6.0,
            exercise_minutes: 45.0,
            back_pain: 6.0,
            neck_pain: 5.0,
            eye_strain: 7.0,
            stress_level: 7.0,
            posture_quality: 5.0,
        };

        let vector = features.to_vector();
        assert_eq!(vector[0], 8.0);
        assert_eq!(vector[3], 45.0);
        assert_eq!(SurveyFeatures::from_vector(&vector), features);
    }
}
