//! Error types for ErgoScan

use thiserror::Error;

/// Errors that can occur during screening, generation, or classification
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Classifier has not been trained or loaded")]
    NotTrained,

    #[error("Unknown risk label: {0}")]
    UnknownLabel(u8),

    #[error("Model persistence error: {0}")]
    ModelPersistence(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
