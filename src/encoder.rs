//! Screening report encoding
//!
//! This module wraps an analysis result with producer and provenance
//! metadata and serializes it for external collaborators. No disclaimer
//! text is added here; presentation conventions belong to the caller.

use crate::error::EngineError;
use crate::types::{AnalysisResult, PostureMetrics};
use crate::{ENGINE_VERSION, PRODUCER_NAME};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Producer metadata stamped on every report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Complete screening report for one analyzed survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningReport {
    pub producer: ReportProducer,
    pub computed_at_utc: String,
    /// Posture metrics for the analyzed frame, when one was supplied
    pub posture: Option<PostureMetrics>,
    pub result: AnalysisResult,
}

/// Encoder stamping reports with a stable per-instance ID.
pub struct ReportEncoder {
    instance_id: String,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    /// Wrap an analysis result into a report
    pub fn encode(
        &self,
        result: AnalysisResult,
        posture: Option<PostureMetrics>,
    ) -> ScreeningReport {
        ScreeningReport {
            producer: ReportProducer {
                name: PRODUCER_NAME.to_string(),
                version: ENGINE_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            computed_at_utc: Utc::now().to_rfc3339(),
            posture,
            result,
        }
    }

    /// Encode directly to a JSON string
    pub fn encode_to_json(
        &self,
        result: AnalysisResult,
        posture: Option<PostureMetrics>,
    ) -> Result<String, EngineError> {
        serde_json::to_string_pretty(&self.encode(result, posture)).map_err(EngineError::JsonError)
    }
}
