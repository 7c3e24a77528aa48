//! Screening orchestration
//!
//! This module provides the public API for ErgoScan: one-shot JSON entry
//! points and a reusable engine that holds the posture calibration state.
//!
//! Pipeline: survey JSON (+ optional landmark frame) -> default substitution
//! -> posture geometry -> rule-based scoring -> report encoding.

use crate::encoder::{ReportEncoder, ScreeningReport};
use crate::error::EngineError;
use crate::posture::PostureAnalyzer;
use crate::scorer::HealthScorer;
use crate::survey::SurveyResponse;
use crate::types::{AnalysisResult, LandmarkSet, PostureMetrics};

/// Analyze a survey JSON submission, optionally with a landmark frame.
///
/// # Arguments
/// * `survey_json` - Mapping with any subset of the nine survey fields
/// * `landmarks_json` - Optional mapping of the seven landmark names to
///   pixel coordinates
///
/// # Returns
/// Screening report JSON
///
/// # Example
/// ```ignore
/// let report = analyze_survey_json(
///     r#"{"sitting_hours": 8, "back_pain": 6}"#,
///     None,
/// )?;
/// ```
pub fn analyze_survey_json(
    survey_json: &str,
    landmarks_json: Option<&str>,
) -> Result<String, EngineError> {
    let engine = ScreeningEngine::new();
    let response: SurveyResponse = serde_json::from_str(survey_json)?;

    let landmarks = match landmarks_json {
        Some(json) => Some(serde_json::from_str::<LandmarkSet>(json)?),
        None => None,
    };

    let report = engine.screen(&response, landmarks.as_ref());
    serde_json::to_string_pretty(&report).map_err(EngineError::JsonError)
}

/// Analyze a landmark frame JSON into posture metrics JSON.
pub fn analyze_frame_json(landmarks_json: &str) -> Result<String, EngineError> {
    let landmarks: LandmarkSet = serde_json::from_str(landmarks_json)?;
    let metrics = PostureAnalyzer::new().analyze(&landmarks);
    serde_json::to_string_pretty(&metrics).map_err(EngineError::JsonError)
}

/// Reusable screening engine.
///
/// Holds the posture analyzer (the only stateful piece, via its optional
/// calibration baseline), the scorer, and the report encoder. Shared
/// immutable use is safe; calibration requires exclusive access.
pub struct ScreeningEngine {
    analyzer: PostureAnalyzer,
    scorer: HealthScorer,
    encoder: ReportEncoder,
}

impl Default for ScreeningEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreeningEngine {
    pub fn new() -> Self {
        Self {
            analyzer: PostureAnalyzer::new(),
            scorer: HealthScorer::new(),
            encoder: ReportEncoder::new(),
        }
    }

    /// Resolve defaults, analyze the optional frame, score, and encode.
    pub fn screen(
        &self,
        response: &SurveyResponse,
        landmarks: Option<&LandmarkSet>,
    ) -> ScreeningReport {
        let features = response.resolve();
        let posture = landmarks.map(|frame| self.analyzer.analyze(frame));
        let result = self.scorer.analyze(&features, posture.as_ref());
        self.encoder.encode(result, posture)
    }

    /// Score a survey without report wrapping
    pub fn analyze(
        &self,
        response: &SurveyResponse,
        posture: Option<&PostureMetrics>,
    ) -> AnalysisResult {
        self.scorer.analyze(&response.resolve(), posture)
    }

    /// Analyze one landmark frame
    pub fn analyze_frame(&self, landmarks: &LandmarkSet) -> PostureMetrics {
        self.analyzer.analyze(landmarks)
    }

    /// Calibrate the posture analyzer against a reference frame
    pub fn calibrate(&mut self, landmarks: &LandmarkSet) -> PostureMetrics {
        self.analyzer.calibrate(landmarks)
    }

    pub fn posture_baseline(&self) -> Option<&PostureMetrics> {
        self.analyzer.baseline()
    }
}
