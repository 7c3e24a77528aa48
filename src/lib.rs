//! ErgoScan - On-device screening engine for ergonomic health-risk signals
//!
//! ErgoScan converts self-reported habit surveys and camera-derived 2-D body
//! landmarks into calibrated multi-domain risk scores through a deterministic
//! pipeline: default substitution → posture geometry → rule-based scoring →
//! report encoding.
//!
//! ## Modules
//!
//! - **Posture**: Convert landmark frames into angular/alignment metrics
//! - **Scorer**: Convert survey records into domain scores, alerts, and
//!   ranked recommendations
//! - **Synthetic**: Seeded generation of labeled survey data and
//!   longitudinal sequences
//! - **Classifier**: Statistical risk prediction over the same feature space

pub mod classifier;
pub mod encoder;
pub mod error;
pub mod pipeline;
pub mod posture;
pub mod scorer;
pub mod survey;
pub mod synthetic;
pub mod types;

pub use classifier::{ClassifierConfig, RiskClassifier};
pub use encoder::{ReportEncoder, ScreeningReport};
pub use error::EngineError;
pub use pipeline::{analyze_frame_json, analyze_survey_json, ScreeningEngine};
pub use posture::PostureAnalyzer;
pub use scorer::HealthScorer;
pub use survey::{SurveyFeatures, SurveyResponse, FEATURE_COUNT, FEATURE_NAMES};
pub use types::{
    AnalysisMethod, AnalysisResult, Alert, DailyRecord, HealthCategory, LandmarkSet, Point,
    PostureMetrics, PostureStatus, ProfileKind, Recommendation, RiskLevel, RiskPrediction,
    TrainingReport, Trend,
};

/// Engine version embedded in all screening reports
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for screening reports
pub const PRODUCER_NAME: &str = "ergoscan";
