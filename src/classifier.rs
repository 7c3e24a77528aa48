//! Statistical risk classification
//!
//! A nearest-centroid classifier over standardized survey features, with
//! softmax class probabilities. Trained on synthetic or real feature vectors
//! labeled 0=LOW, 1=MEDIUM, 2=HIGH; an alternative to the rule-based scorer.

use crate::error::EngineError;
use crate::survey::{SurveyFeatures, FEATURE_COUNT};
use crate::types::{RiskLevel, RiskPrediction, TrainingReport};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Number of risk classes (LOW / MEDIUM / HIGH)
const CLASS_COUNT: usize = 3;

/// Classifier configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Softmax temperature over negative squared centroid distances;
    /// lower values sharpen the probability distribution
    pub softmax_temperature: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            softmax_temperature: 1.0,
        }
    }
}

/// Per-feature standardization parameters, fitted at training time and
/// reused verbatim at prediction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Scaler {
    means: [f64; FEATURE_COUNT],
    stds: [f64; FEATURE_COUNT],
}

impl Scaler {
    fn fit(features: &[[f64; FEATURE_COUNT]]) -> Self {
        let n = features.len() as f64;
        let mut means = [0.0; FEATURE_COUNT];
        let mut stds = [0.0; FEATURE_COUNT];

        for row in features {
            for (mean, value) in means.iter_mut().zip(row) {
                *mean += value;
            }
        }
        for mean in &mut means {
            *mean /= n;
        }

        for row in features {
            for i in 0..FEATURE_COUNT {
                let diff = row[i] - means[i];
                stds[i] += diff * diff;
            }
        }
        for std in &mut stds {
            *std = (*std / n).sqrt();
            // A constant feature carries no signal; unit scale avoids
            // division by zero
            if *std == 0.0 {
                *std = 1.0;
            }
        }

        Self { means, stds }
    }

    fn transform(&self, row: &[f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
        let mut scaled = [0.0; FEATURE_COUNT];
        for i in 0..FEATURE_COUNT {
            scaled[i] = (row[i] - self.means[i]) / self.stds[i];
        }
        scaled
    }
}

/// Fitted model parameters: class centroids in standardized feature space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct FittedModel {
    scaler: Scaler,
    centroids: [[f64; FEATURE_COUNT]; CLASS_COUNT],
}

/// Supervised risk classifier over the fixed 9-feature survey vector.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RiskClassifier {
    config: ClassifierConfig,
    /// Present only after a successful train or load
    model: Option<FittedModel>,
}

impl RiskClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            config,
            model: None,
        }
    }

    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    /// Fit the scaler and class centroids on labeled feature vectors.
    ///
    /// Fails with `InvalidInput` before any state is mutated if the sample
    /// count is zero, the feature/label lengths differ, a label is out of
    /// range, or a class has no samples.
    pub fn train(
        &mut self,
        features: &[[f64; FEATURE_COUNT]],
        labels: &[u8],
    ) -> Result<TrainingReport, EngineError> {
        if features.is_empty() {
            return Err(EngineError::InvalidInput(
                "training set is empty".to_string(),
            ));
        }
        if features.len() != labels.len() {
            return Err(EngineError::InvalidInput(format!(
                "feature/label length mismatch: {} vs {}",
                features.len(),
                labels.len()
            )));
        }
        if let Some(&bad) = labels.iter().find(|&&l| l as usize >= CLASS_COUNT) {
            return Err(EngineError::UnknownLabel(bad));
        }

        let mut class_counts = [0usize; CLASS_COUNT];
        for &label in labels {
            class_counts[label as usize] += 1;
        }
        if let Some(missing) = class_counts.iter().position(|&c| c == 0) {
            return Err(EngineError::InvalidInput(format!(
                "no training samples for class {missing}"
            )));
        }

        let scaler = Scaler::fit(features);

        let mut centroids = [[0.0; FEATURE_COUNT]; CLASS_COUNT];
        for (row, &label) in features.iter().zip(labels) {
            let scaled = scaler.transform(row);
            for i in 0..FEATURE_COUNT {
                centroids[label as usize][i] += scaled[i];
            }
        }
        for (centroid, &count) in centroids.iter_mut().zip(&class_counts) {
            for value in centroid.iter_mut() {
                *value /= count as f64;
            }
        }

        let model = FittedModel { scaler, centroids };

        // Training-set accuracy for the report
        let mut correct = 0usize;
        for (row, &label) in features.iter().zip(labels) {
            let probabilities = class_probabilities(&model, self.config.softmax_temperature, row);
            if argmax(&probabilities) == label as usize {
                correct += 1;
            }
        }

        self.model = Some(model);

        Ok(TrainingReport {
            n_samples: labels.len(),
            training_accuracy: correct as f64 / labels.len() as f64,
            class_counts,
        })
    }

    /// Predict the risk band for one survey record.
    pub fn predict(&self, survey: &SurveyFeatures) -> Result<RiskPrediction, EngineError> {
        self.predict_vector(&survey.to_vector())
    }

    /// Predict from a raw fixed-order feature vector.
    pub fn predict_vector(
        &self,
        features: &[f64; FEATURE_COUNT],
    ) -> Result<RiskPrediction, EngineError> {
        let model = self.model.as_ref().ok_or(EngineError::NotTrained)?;

        let probabilities = class_probabilities(model, self.config.softmax_temperature, features);
        let best = argmax(&probabilities);
        let risk_level =
            RiskLevel::from_label(best as u8).ok_or(EngineError::UnknownLabel(best as u8))?;

        Ok(RiskPrediction {
            risk_level,
            confidence: probabilities[best],
            probabilities,
        })
    }

    /// Serialize config, scaler, and centroids as one unit.
    pub fn to_json(&self) -> Result<String, EngineError> {
        serde_json::to_string(self).map_err(EngineError::JsonError)
    }

    /// Deserialize a classifier saved with [`to_json`](Self::to_json).
    ///
    /// The model, scaler, and config travel in a single payload, so a
    /// partially written file fails to load as a whole.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let classifier: Self = serde_json::from_str(json)?;
        if !classifier.is_trained() {
            return Err(EngineError::ModelPersistence(
                "payload contains no fitted model".to_string(),
            ));
        }
        Ok(classifier)
    }

    /// Save the trained model to a file.
    pub fn save(&self, path: &Path) -> Result<(), EngineError> {
        if !self.is_trained() {
            return Err(EngineError::NotTrained);
        }
        let json = self.to_json()?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load a trained model from a file.
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// Softmax over negative squared centroid distances.
fn class_probabilities(
    model: &FittedModel,
    temperature: f64,
    features: &[f64; FEATURE_COUNT],
) -> [f64; CLASS_COUNT] {
    let scaled = model.scaler.transform(features);

    let mut scores = [0.0; CLASS_COUNT];
    for (score, centroid) in scores.iter_mut().zip(&model.centroids) {
        let mut distance_sq = 0.0;
        for i in 0..FEATURE_COUNT {
            let diff = scaled[i] - centroid[i];
            distance_sq += diff * diff;
        }
        *score = -distance_sq / temperature;
    }

    // Shift by the max score for numerical stability
    let max_score = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let mut probabilities = [0.0; CLASS_COUNT];
    let mut total = 0.0;
    for (p, score) in probabilities.iter_mut().zip(&scores) {
        *p = (score - max_score).exp();
        total += *p;
    }
    for p in &mut probabilities {
        *p /= total;
    }
    probabilities
}

fn argmax(values: &[f64; CLASS_COUNT]) -> usize {
    let mut best = 0;
    for i in 1..CLASS_COUNT {
        if values[i] > values[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::{dataset_to_vectors, generate_dataset, DEFAULT_PROFILE_WEIGHTS};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn training_data(n: usize, seed: u64) -> (Vec<[f64; FEATURE_COUNT]>, Vec<u8>) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let dataset = generate_dataset(n, &DEFAULT_PROFILE_WEIGHTS, &mut rng).unwrap();
        dataset_to_vectors(&dataset)
    }

    #[test]
    fn test_predict_before_train_fails() {
        let classifier = RiskClassifier::default();
        let result = classifier.predict(&SurveyFeatures::default());
        assert!(matches!(result, Err(EngineError::NotTrained)));
    }

    #[test]
    fn test_empty_training_set_is_invalid() {
        let mut classifier = RiskClassifier::default();
        let result = classifier.train(&[], &[]);
        assert!(matches!(result, Err(EngineError::InvalidInput(_))));
        assert!(!classifier.is_trained());
    }

    #[test]
    fn test_length_mismatch_is_invalid() {
        let mut classifier = RiskClassifier::default();
        let (features, _) = training_data(10, 1);
        let result = classifier.train(&features, &[0, 1]);
        assert!(matches!(result, Err(EngineError::InvalidInput(_))));
        // Failed training must not leave partial state behind
        assert!(!classifier.is_trained());
    }

    #[test]
    fn test_unknown_label_is_rejected() {
        let mut classifier = RiskClassifier::default();
        let (features, mut labels) = training_data(10, 2);
        labels[0] = 7;
        let result = classifier.train(&features, &labels);
        assert!(matches!(result, Err(EngineError::UnknownLabel(7))));
    }

    #[test]
    fn test_train_reports_class_counts() {
        let mut classifier = RiskClassifier::default();
        let (features, labels) = training_data(500, 42);
        let report = classifier.train(&features, &labels).unwrap();

        assert_eq!(report.n_samples, 500);
        assert_eq!(report.class_counts.iter().sum::<usize>(), 500);
        assert!(classifier.is_trained());
    }

    #[test]
    fn test_separable_profiles_classify_well() {
        let mut classifier = RiskClassifier::default();
        let (features, labels) = training_data(1000, 42);
        let report = classifier.train(&features, &labels).unwrap();

        // The three archetypes barely overlap in feature space
        assert!(report.training_accuracy > 0.95);

        // Held-out samples from the same distributions
        let (test_features, test_labels) = training_data(200, 1234);
        let mut correct = 0;
        for (row, &label) in test_features.iter().zip(&test_labels) {
            let prediction = classifier.predict_vector(row).unwrap();
            if prediction.risk_level.label() == label {
                correct += 1;
            }
        }
        assert!(correct as f64 / test_labels.len() as f64 > 0.9);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let mut classifier = RiskClassifier::default();
        let (features, labels) = training_data(300, 8);
        classifier.train(&features, &labels).unwrap();

        let prediction = classifier.predict(&SurveyFeatures::default()).unwrap();
        let total: f64 = prediction.probabilities.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!((0.0..=1.0).contains(&prediction.confidence));

        let best = prediction
            .probabilities
            .iter()
            .cloned()
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(prediction.confidence, best);
    }

    #[test]
    fn test_json_round_trip_preserves_predictions() {
        let mut classifier = RiskClassifier::default();
        let (features, labels) = training_data(300, 42);
        classifier.train(&features, &labels).unwrap();

        let json = classifier.to_json().unwrap();
        let loaded = RiskClassifier::from_json(&json).unwrap();

        let survey = SurveyFeatures::from_vector(&features[0]);
        let original = classifier.predict(&survey).unwrap();
        let restored = loaded.predict(&survey).unwrap();
        assert_eq!(original, restored);
    }

    #[test]
    fn test_untrained_payload_fails_to_load() {
        let untrained = RiskClassifier::default();
        let json = serde_json::to_string(&untrained).unwrap();
        assert!(RiskClassifier::from_json(&json).is_err());
    }

    #[test]
    fn test_save_untrained_fails() {
        let classifier = RiskClassifier::default();
        let result = classifier.save(Path::new("/tmp/ergoscan-untrained.json"));
        assert!(matches!(result, Err(EngineError::NotTrained)));
    }
}
