//! Rule-based health scoring
//!
//! This module converts a resolved survey record (optionally augmented with
//! posture metrics) into four domain scores, one weighted overall score, a
//! discrete risk level, alerts, and ranked recommendations.

use crate::survey::SurveyFeatures;
use crate::types::{
    Alert, AnalysisMethod, AnalysisResult, HealthCategory, PostureMetrics, Recommendation,
    RiskLevel,
};

/// Overall-score weights per domain (musculoskeletal, eye, mental, activity)
const DOMAIN_WEIGHTS: [f64; 4] = [0.30, 0.20, 0.25, 0.25];

/// Overall score at or above which the risk band is LOW
pub const LOW_RISK_THRESHOLD: f64 = 70.0;
/// Overall score at or above which the risk band is MEDIUM
pub const MEDIUM_RISK_THRESHOLD: f64 = 40.0;

/// Deterministic, side-effect-free health scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct HealthScorer;

impl HealthScorer {
    pub fn new() -> Self {
        Self
    }

    /// Score one survey, optionally augmented with camera posture metrics.
    ///
    /// Total over any resolved input: missing survey fields are defaulted
    /// upstream and every score is clamped to [0,100].
    pub fn analyze(
        &self,
        survey: &SurveyFeatures,
        posture: Option<&PostureMetrics>,
    ) -> AnalysisResult {
        let musculoskeletal = musculoskeletal_score(survey, posture);
        let eye_health = eye_health_score(survey);
        let mental_health = mental_health_score(survey);
        let physical_activity = physical_activity_score(survey);

        let overall = musculoskeletal * DOMAIN_WEIGHTS[0]
            + eye_health * DOMAIN_WEIGHTS[1]
            + mental_health * DOMAIN_WEIGHTS[2]
            + physical_activity * DOMAIN_WEIGHTS[3];
        let overall = round1(overall);

        AnalysisResult {
            overall_risk_score: overall,
            risk_level: risk_level_for(overall),
            musculoskeletal_score: round1(musculoskeletal),
            eye_health_score: round1(eye_health),
            mental_health_score: round1(mental_health),
            physical_activity_score: round1(physical_activity),
            alerts: generate_alerts(survey),
            recommendations: generate_recommendations(survey),
            analysis_method: AnalysisMethod::RuleBased,
        }
    }
}

/// Risk band for an overall score: LOW >= 70, MEDIUM >= 40, HIGH below
pub fn risk_level_for(overall_score: f64) -> RiskLevel {
    if overall_score >= LOW_RISK_THRESHOLD {
        RiskLevel::Low
    } else if overall_score >= MEDIUM_RISK_THRESHOLD {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

fn musculoskeletal_score(survey: &SurveyFeatures, posture: Option<&PostureMetrics>) -> f64 {
    let mut score = 100.0;

    score -= (survey.back_pain - 1.0) * 5.0;
    score -= (survey.neck_pain - 1.0) * 5.0;

    if survey.sitting_hours > 8.0 {
        score -= 20.0;
    } else if survey.sitting_hours > 6.0 {
        score -= 10.0;
    }

    score -= (10.0 - survey.posture_quality) * 2.0;

    if let Some(posture) = posture {
        if posture.neck_angle > 20.0 {
            score -= 10.0;
        }
        if posture.back_curvature > 15.0 {
            score -= 10.0;
        }
    }

    score.clamp(0.0, 100.0)
}

fn eye_health_score(survey: &SurveyFeatures) -> f64 {
    let mut score = 100.0;

    score -= (survey.eye_strain - 1.0) * 6.0;

    if survey.screen_time > 10.0 {
        score -= 25.0;
    } else if survey.screen_time > 8.0 {
        score -= 15.0;
    } else if survey.screen_time > 6.0 {
        score -= 10.0;
    }

    score.clamp(0.0, 100.0)
}

fn mental_health_score(survey: &SurveyFeatures) -> f64 {
    let mut score = 100.0;

    score -= (survey.stress_level - 1.0) * 6.0;

    if survey.sleep_hours < 5.0 {
        score -= 25.0;
    } else if survey.sleep_hours < 6.0 {
        score -= 15.0;
    } else if survey.sleep_hours < 7.0 {
        score -= 5.0;
    }

    score.clamp(0.0, 100.0)
}

fn physical_activity_score(survey: &SurveyFeatures) -> f64 {
    let mut score: f64 = 100.0;

    // WHO guideline: 150 minutes of moderate activity per week
    if survey.exercise_minutes < 30.0 {
        score -= 40.0;
    } else if survey.exercise_minutes < 60.0 {
        score -= 25.0;
    } else if survey.exercise_minutes < 150.0 {
        score -= 10.0;
    }

    if survey.sitting_hours > 8.0 && survey.exercise_minutes < 60.0 {
        score -= 15.0;
    }

    score.clamp(0.0, 100.0)
}

/// Independent alert rules, evaluated and returned in fixed order.
fn generate_alerts(survey: &SurveyFeatures) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if survey.back_pain >= 7.0 {
        alerts.push(Alert {
            category: HealthCategory::Posture,
            severity: RiskLevel::High,
            message: "High back pain level (>=7/10)".to_string(),
            recommendation: "Rest and do back stretching exercises. See a doctor if the pain \
                             persists."
                .to_string(),
        });
    }

    if survey.stress_level >= 7.0 && survey.sleep_hours < 6.0 {
        alerts.push(Alert {
            category: HealthCategory::Stress,
            severity: RiskLevel::High,
            message: "High stress combined with sleep deprivation".to_string(),
            recommendation: "Improve sleep and find ways to reduce stress. Consider talking to \
                             a mental health professional."
                .to_string(),
        });
    }

    if survey.screen_time > 8.0 && survey.eye_strain >= 6.0 {
        alerts.push(Alert {
            category: HealthCategory::Eye,
            severity: RiskLevel::Medium,
            message: "High screen time with eye strain".to_string(),
            recommendation: "Apply the 20-20-20 rule: every 20 minutes, look 20 feet away for \
                             20 seconds."
                .to_string(),
        });
    }

    if survey.sitting_hours > 6.0 && survey.exercise_minutes < 60.0 {
        alerts.push(Alert {
            category: HealthCategory::Activity,
            severity: RiskLevel::Medium,
            message: "Prolonged sitting with little exercise".to_string(),
            recommendation: "Stand up and walk around every 30-60 minutes. Build up to at \
                             least 150 minutes of activity per week."
                .to_string(),
        });
    }

    alerts
}

/// Independent recommendation rules, stably sorted ascending by priority.
fn generate_recommendations(survey: &SurveyFeatures) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if survey.posture_quality < 6.0 || survey.back_pain > 5.0 {
        recommendations.push(Recommendation {
            category: HealthCategory::Posture,
            title: "Improve your sitting posture".to_string(),
            description: "Adjust your chair and desk. Keep your back straight, shoulders \
                          relaxed, and the screen at eye level."
                .to_string(),
            priority: 1,
        });
    }

    if survey.eye_strain > 5.0 {
        recommendations.push(Recommendation {
            category: HealthCategory::Eye,
            title: "Protect your eyes".to_string(),
            description: "Use a blue-light filter, keep the room well lit, and rest your eyes \
                          regularly."
                .to_string(),
            priority: 2,
        });
    }

    if survey.exercise_minutes < 150.0 {
        recommendations.push(Recommendation {
            category: HealthCategory::Activity,
            title: "Increase physical activity".to_string(),
            description: "Aim for 150 minutes of moderate activity per week. Splitting it \
                          into 30 minutes on 5 days works well."
                .to_string(),
            priority: 2,
        });
    }

    if survey.sleep_hours < 7.0 {
        recommendations.push(Recommendation {
            category: HealthCategory::Sleep,
            title: "Improve your sleep".to_string(),
            description: "Aim for 7-9 hours per night. Avoid screens for an hour before bed."
                .to_string(),
            priority: 1,
        });
    }

    if survey.stress_level > 6.0 {
        recommendations.push(Recommendation {
            category: HealthCategory::Mental,
            title: "Manage your stress".to_string(),
            description: "Try relaxation techniques such as deep breathing, meditation, or \
                          yoga. Make time for personal hobbies."
                .to_string(),
            priority: 1,
        });
    }

    // Ties keep rule-evaluation order
    recommendations.sort_by_key(|r| r.priority);
    recommendations
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
