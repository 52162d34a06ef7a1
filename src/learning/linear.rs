//! Linear classifier with fixed weights
//!
//! Scores each class as `w·x + b` and turns the scores into probabilities
//! with a softmax. Weights come from an external training step and are
//! loaded from JSON; nothing here fits them.

use super::{ClassId, ConfidenceClassifier, ProbabilisticClassifier};
use crate::datapack::FeatureRow;
use crate::error::{DecoderError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearClassifier {
    classes: Vec<ClassId>,

    /// One weight vector per class
    weights: Vec<Vec<f64>>,

    /// One bias per class
    bias: Vec<f64>,
}

impl LinearClassifier {
    pub fn new(classes: Vec<ClassId>, weights: Vec<Vec<f64>>, bias: Vec<f64>) -> Result<Self> {
        let model = Self {
            classes,
            weights,
            bias,
        };
        model.validate()?;
        Ok(model)
    }

    /// Load weights from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let model: LinearClassifier = serde_json::from_str(&content)?;
        model.validate()?;
        debug!("Loaded linear model with {} classes from {:?}", model.classes.len(), path);
        Ok(model)
    }

    fn validate(&self) -> Result<()> {
        if self.classes.is_empty() {
            return Err(DecoderError::Config("linear model has no classes".into()));
        }
        if self.weights.len() != self.classes.len() || self.bias.len() != self.classes.len() {
            return Err(DecoderError::Config(format!(
                "linear model has {} classes but {} weight vectors and {} biases",
                self.classes.len(),
                self.weights.len(),
                self.bias.len()
            )));
        }
        Ok(())
    }

    fn class_scores(&self, row: &FeatureRow) -> Result<Vec<f64>> {
        self.weights
            .iter()
            .zip(&self.bias)
            .map(|(w, b)| {
                if w.len() != row.len() {
                    return Err(DecoderError::Datapack(format!(
                        "feature row has {} values, model expects {}",
                        row.len(),
                        w.len()
                    )));
                }
                Ok(w.iter().zip(row).map(|(wi, xi)| wi * xi).sum::<f64>() + b)
            })
            .collect()
    }
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

impl ProbabilisticClassifier for LinearClassifier {
    fn classes(&self) -> &[ClassId] {
        &self.classes
    }

    fn predict_proba(&self, data: &[FeatureRow]) -> Result<Vec<Vec<f64>>> {
        data.iter().map(|row| Ok(softmax(&self.class_scores(row)?))).collect()
    }

    fn predict(&self, data: &[FeatureRow]) -> Result<Vec<ClassId>> {
        data.iter()
            .map(|row| {
                let scores = self.class_scores(row)?;
                let best = scores
                    .iter()
                    .enumerate()
                    .fold(0, |best, (i, s)| if *s > scores[best] { i } else { best });
                Ok(self.classes[best])
            })
            .collect()
    }
}

impl ConfidenceClassifier for LinearClassifier {
    /// Margin of the attached class (`1`) over its best competitor
    fn decision_function(&self, data: &[FeatureRow]) -> Result<Vec<f64>> {
        let attached = self.classes.iter().position(|&c| c == 1).ok_or_else(|| {
            DecoderError::Capability("linear model has no attached class (1)".into())
        })?;
        data.iter()
            .map(|row| {
                let scores = self.class_scores(row)?;
                let rival = scores
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != attached)
                    .map(|(_, s)| *s)
                    .fold(f64::NEG_INFINITY, f64::max);
                Ok(if rival.is_finite() {
                    scores[attached] - rival
                } else {
                    scores[attached]
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary() -> LinearClassifier {
        LinearClassifier::new(vec![-1, 1], vec![vec![0.0, 0.0], vec![1.0, -1.0]], vec![0.0, 0.0]).unwrap()
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let model = binary();
        let probs = model.predict_proba(&[vec![2.0, 0.5], vec![0.0, 3.0]]).unwrap();
        for p in &probs {
            assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        }
        assert!(probs[0][1] > 0.5);
        assert!(probs[1][1] < 0.5);
    }

    #[test]
    fn test_predict_and_margin_agree() {
        let model = binary();
        let rows = vec![vec![2.0, 0.5], vec![0.0, 3.0]];
        assert_eq!(model.predict(&rows).unwrap(), vec![1, -1]);

        let margins = model.decision_function(&rows).unwrap();
        assert!((margins[0] - 1.5).abs() < 1e-9);
        assert!((margins[1] + 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_dimension_mismatch() {
        let model = binary();
        assert!(matches!(model.predict_proba(&[vec![1.0]]), Err(DecoderError::Datapack(_))));
    }

    #[test]
    fn test_invalid_shapes_rejected() {
        assert!(LinearClassifier::new(vec![1, 2], vec![vec![1.0]], vec![0.0, 0.0]).is_err());
        assert!(LinearClassifier::new(vec![], vec![], vec![]).is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("attach.json");
        std::fs::write(&path, r#"{"classes": [-1, 1], "weights": [[0.0], [2.0]], "bias": [0.0, -1.0]}"#)
            .unwrap();
        let model = LinearClassifier::from_file(&path).unwrap();
        assert_eq!(model.classes(), &[-1, 1]);
    }
}
