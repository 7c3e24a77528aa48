//! Core types for the ErgoScan engine
//!
//! This module defines the data structures that flow through each stage of the
//! engine: posture landmarks and metrics, survey features, scoring output,
//! synthetic profiles, and classifier predictions.

use serde::{Deserialize, Serialize};

/// A 2-D body-point coordinate in image pixels.
///
/// Image-space convention: x grows rightward, y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One frame of named body landmarks from an external pose-detection model.
///
/// The engine never stores or re-derives the originating image; only these
/// coordinates are consumed. Missing points resolve to the origin.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LandmarkSet {
    pub nose: Option<Point>,
    pub left_ear: Option<Point>,
    pub right_ear: Option<Point>,
    pub left_shoulder: Option<Point>,
    pub right_shoulder: Option<Point>,
    pub left_hip: Option<Point>,
    pub right_hip: Option<Point>,
}

/// Qualitative posture status, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostureStatus {
    Good,
    Warning,
    Bad,
}

impl PostureStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostureStatus::Good => "good",
            PostureStatus::Warning => "warning",
            PostureStatus::Bad => "bad",
        }
    }
}

/// Angular and alignment metrics derived from one landmark frame.
///
/// Computed fresh per frame; never persisted by the engine. All numeric
/// metrics are rounded to one decimal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostureMetrics {
    /// Angle between vertical and the shoulder-midpoint -> nose vector (degrees)
    pub neck_angle: f64,
    /// Angle between vertical and the hip-midpoint -> shoulder-midpoint vector (degrees)
    pub back_curvature: f64,
    /// Shoulder height balance (percent, 100 = level)
    pub shoulder_alignment: f64,
    /// Estimated forward head offset (cm)
    pub head_forward: f64,
    /// Worst severity across the threshold checks
    pub status: PostureStatus,
    /// Human-readable findings, in check order
    pub alerts: Vec<String>,
}

/// Discrete risk band derived from the overall risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }

    /// Integer label used for dataset export (0=LOW, 1=MEDIUM, 2=HIGH)
    pub fn label(&self) -> u8 {
        match self {
            RiskLevel::Low => 0,
            RiskLevel::Medium => 1,
            RiskLevel::High => 2,
        }
    }

    pub fn from_label(label: u8) -> Option<Self> {
        match label {
            0 => Some(RiskLevel::Low),
            1 => Some(RiskLevel::Medium),
            2 => Some(RiskLevel::High),
            _ => None,
        }
    }
}

/// Health dimension an alert or recommendation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthCategory {
    Posture,
    Stress,
    Eye,
    Activity,
    Sleep,
    Mental,
}

impl HealthCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthCategory::Posture => "POSTURE",
            HealthCategory::Stress => "STRESS",
            HealthCategory::Eye => "EYE",
            HealthCategory::Activity => "ACTIVITY",
            HealthCategory::Sleep => "SLEEP",
            HealthCategory::Mental => "MENTAL",
        }
    }
}

/// A triggered warning with a fixed message/recommendation template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub category: HealthCategory,
    pub severity: RiskLevel,
    pub message: String,
    pub recommendation: String,
}

/// A ranked improvement suggestion (priority 1 = most urgent, up to 5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: HealthCategory,
    pub title: String,
    pub description: String,
    pub priority: u8,
}

/// How an analysis result was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisMethod {
    RuleBased,
    Statistical,
}

impl AnalysisMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMethod::RuleBased => "RULE_BASED",
            AnalysisMethod::Statistical => "STATISTICAL",
        }
    }
}

/// Complete scoring output for one survey (optionally posture-augmented).
///
/// Every score is clamped to [0,100] and rounded to one decimal; risk_level
/// is a deterministic function of overall_risk_score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub overall_risk_score: f64,
    pub risk_level: RiskLevel,
    pub musculoskeletal_score: f64,
    pub eye_health_score: f64,
    pub mental_health_score: f64,
    pub physical_activity_score: f64,
    /// Triggered alerts in fixed rule-evaluation order
    pub alerts: Vec<Alert>,
    /// Recommendations sorted ascending by priority (stable)
    pub recommendations: Vec<Recommendation>,
    pub analysis_method: AnalysisMethod,
}

/// Archetypal risk profile used to synthesize labeled survey data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileKind {
    Healthy,
    Moderate,
    AtRisk,
}

impl ProfileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileKind::Healthy => "healthy",
            ProfileKind::Moderate => "moderate",
            ProfileKind::AtRisk => "at_risk",
        }
    }

    /// Risk band a profile is labeled with in generated datasets
    pub fn risk_level(&self) -> RiskLevel {
        match self {
            ProfileKind::Healthy => RiskLevel::Low,
            ProfileKind::Moderate => RiskLevel::Medium,
            ProfileKind::AtRisk => RiskLevel::High,
        }
    }
}

/// Direction a user's habits move across a longitudinal sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Stable,
    Declining,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Improving => "improving",
            Trend::Stable => "stable",
            Trend::Declining => "declining",
        }
    }
}

/// One synthesized (user, day) survey record with its originating trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub user_id: u32,
    pub day: u32,
    pub sitting_hours: f64,
    pub screen_time: f64,
    pub sleep_hours: f64,
    pub exercise_minutes: u32,
    pub back_pain: u8,
    pub neck_pain: u8,
    pub eye_strain: u8,
    pub stress_level: u8,
    pub posture_quality: u8,
    pub trend: Trend,
}

/// Probabilistic risk prediction from the statistical classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskPrediction {
    pub risk_level: RiskLevel,
    /// Highest class probability (0-1)
    pub confidence: f64,
    /// Per-class probabilities in label order [LOW, MEDIUM, HIGH]
    pub probabilities: [f64; 3],
}

/// Summary of one training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub n_samples: usize,
    /// Accuracy of the fitted model on its own training set (0-1)
    pub training_accuracy: f64,
    /// Sample counts in label order [LOW, MEDIUM, HIGH]
    pub class_counts: [usize; 3],
}
