use serde::Deserialize;

use super::error::{ArtifactError, ScoringError};

/// A fitted binary classifier over a fixed-width feature vector.
pub trait Classifier: Send + Sync {
    /// Number of features the classifier was fitted on.
    fn n_features(&self) -> usize;

    /// Discrete class, 0 (legit) or 1 (fraud).
    fn predict(&self, features: &[f64]) -> Result<u8, ScoringError>;

    /// Probability assigned to class 1.
    fn predict_proba(&self, features: &[f64]) -> Result<f64, ScoringError>;
}

/// A fitted, deterministic feature transform.
pub trait FeatureScaler: Send + Sync {
    fn n_features(&self) -> usize;

    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, ScoringError>;
}

/// On-disk classifier document, tagged by `kind`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    LogisticRegression(LogisticRegression),
}

impl ClassifierArtifact {
    pub fn into_classifier(self) -> Result<Box<dyn Classifier>, ArtifactError> {
        match self {
            ClassifierArtifact::LogisticRegression(model) => {
                model.check()?;
                Ok(Box::new(model))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Logistic regression
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LogisticRegression {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LogisticRegression {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Result<Self, ArtifactError> {
        let model = Self {
            coefficients,
            intercept,
        };
        model.check()?;
        Ok(model)
    }

    fn check(&self) -> Result<(), ArtifactError> {
        if self.coefficients.is_empty() {
            return Err(ArtifactError::Inconsistent(
                "classifier has no coefficients".into(),
            ));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ArtifactError::Inconsistent(
                "classifier parameters must be finite".into(),
            ));
        }
        Ok(())
    }

    fn decision(&self, features: &[f64]) -> Result<f64, ScoringError> {
        check_width("classifier", self.coefficients.len(), features.len())?;

        let z = self
            .coefficients
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept;

        if z.is_nan() {
            return Err(ScoringError::Fault("classifier decision value is NaN".into()));
        }
        Ok(z)
    }
}

impl Classifier for LogisticRegression {
    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn predict(&self, features: &[f64]) -> Result<u8, ScoringError> {
        Ok(u8::from(self.decision(features)? > 0.0))
    }

    fn predict_proba(&self, features: &[f64]) -> Result<f64, ScoringError> {
        Ok(sigmoid(self.decision(features)?))
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

// ---------------------------------------------------------------------------
// Standard scaler
// ---------------------------------------------------------------------------

/// `(x - mean) / scale`, per column.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

/// On-disk scaler document.
#[derive(Debug, Deserialize)]
pub struct StandardScalerFile {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// A zero scale (constant column at fit time) is treated as 1.
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, ArtifactError> {
        if mean.len() != scale.len() {
            return Err(ArtifactError::Inconsistent(format!(
                "scaler mean has {} entries but scale has {}",
                mean.len(),
                scale.len()
            )));
        }
        if mean.iter().chain(&scale).any(|v| !v.is_finite()) {
            return Err(ArtifactError::Inconsistent(
                "scaler parameters must be finite".into(),
            ));
        }

        let scale = scale
            .into_iter()
            .map(|s| if s == 0.0 { 1.0 } else { s })
            .collect();

        Ok(Self { mean, scale })
    }
}

impl TryFrom<StandardScalerFile> for StandardScaler {
    type Error = ArtifactError;

    fn try_from(file: StandardScalerFile) -> Result<Self, Self::Error> {
        Self::new(file.mean, file.scale)
    }
}

impl FeatureScaler for StandardScaler {
    fn n_features(&self) -> usize {
        self.mean.len()
    }

    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, ScoringError> {
        check_width("scaler", self.mean.len(), features.len())?;

        features
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .enumerate()
            .map(|(i, (x, (mean, scale)))| {
                let scaled = (x - mean) / scale;
                if scaled.is_finite() {
                    Ok(scaled)
                } else {
                    Err(ScoringError::Fault(format!(
                        "scaled feature at position {i} is not finite"
                    )))
                }
            })
            .collect()
    }
}

fn check_width(stage: &str, expected: usize, actual: usize) -> Result<(), ScoringError> {
    if expected == actual {
        Ok(())
    } else {
        Err(ScoringError::Fault(format!(
            "{stage} expects {expected} features, got {actual}"
        )))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaler_standardizes_columns() {
        let scaler = StandardScaler::new(vec![10.0, 0.0], vec![2.0, 0.5]).unwrap();
        let out = scaler.transform(&[14.0, 1.0]).unwrap();
        assert_eq!(out, vec![2.0, 2.0]);
    }

    #[test]
    fn test_scaler_treats_zero_scale_as_one() {
        let scaler = StandardScaler::new(vec![1.0], vec![0.0]).unwrap();
        assert_eq!(scaler.transform(&[3.0]).unwrap(), vec![2.0]);
    }

    #[test]
    fn test_scaler_rejects_width_mismatch() {
        let scaler = StandardScaler::new(vec![0.0, 0.0], vec![1.0, 1.0]).unwrap();
        assert!(matches!(scaler.transform(&[1.0]), Err(ScoringError::Fault(_))));
        assert!(StandardScaler::new(vec![0.0], vec![1.0, 1.0]).is_err());
    }

    #[test]
    fn test_scaler_rejects_overflow() {
        let scaler = StandardScaler::new(vec![-f64::MAX], vec![1e-300]).unwrap();
        assert!(matches!(scaler.transform(&[f64::MAX]), Err(ScoringError::Fault(_))));
    }

    #[test]
    fn test_logistic_regression_probability_and_class() {
        let model = LogisticRegression::new(vec![1.0, -1.0], 0.0).unwrap();

        let p = model.predict_proba(&[0.0, 0.0]).unwrap();
        assert!((p - 0.5).abs() < 1e-12);
        // Exactly on the decision boundary falls to class 0.
        assert_eq!(model.predict(&[0.0, 0.0]).unwrap(), 0);

        assert_eq!(model.predict(&[3.0, 0.0]).unwrap(), 1);
        assert!(model.predict_proba(&[3.0, 0.0]).unwrap() > 0.95);
        assert_eq!(model.predict(&[0.0, 3.0]).unwrap(), 0);
    }

    #[test]
    fn test_sigmoid_saturates_without_nan() {
        let model = LogisticRegression::new(vec![1.0], 0.0).unwrap();
        assert_eq!(model.predict_proba(&[1e6]).unwrap(), 1.0);
        assert_eq!(model.predict_proba(&[-1e6]).unwrap(), 0.0);
    }

    #[test]
    fn test_classifier_artifact_is_tagged_by_kind() {
        let json = r#"{"kind":"logistic_regression","coefficients":[0.5,0.25],"intercept":-1.0}"#;
        let artifact: ClassifierArtifact = serde_json::from_str(json).unwrap();
        let classifier = artifact.into_classifier().unwrap();
        assert_eq!(classifier.n_features(), 2);

        let unknown = r#"{"kind":"random_forest","trees":[]}"#;
        assert!(serde_json::from_str::<ClassifierArtifact>(unknown).is_err());
    }

    #[test]
    fn test_empty_coefficients_rejected() {
        assert!(LogisticRegression::new(vec![], 0.0).is_err());
        assert!(LogisticRegression::new(vec![f64::NAN], 0.0).is_err());
    }
}
