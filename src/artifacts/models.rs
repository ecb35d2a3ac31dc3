use serde::{Deserialize, Serialize};

use crate::domain::model::{FeatureVector, FEATURE_COUNT};
use crate::domain::ports::{Classifier, Scaler};
use crate::utils::error::{PredictError, Result};

fn default_threshold() -> f64 {
    0.5
}

/// Exported binary classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    LogisticRegression(LogisticRegression),
}

/// Exported scaler for the age and fare columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerArtifact {
    StandardScaler(StandardScaler),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl LogisticRegression {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
            threshold: default_threshold(),
        }
    }

    fn decision(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.coefficients.len() {
            return Err(PredictError::inference(format!(
                "X has {} features, but LogisticRegression is expecting {} features as input",
                features.len(),
                self.coefficients.len()
            )));
        }
        Ok(self
            .coefficients
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept)
    }

    fn survival_probability(&self, features: &FeatureVector) -> Result<f64> {
        let z = self.decision(features.as_slice())?;
        Ok(1.0 / (1.0 + (-z).exp()))
    }
}

impl Classifier for LogisticRegression {
    fn predict(&self, features: &FeatureVector) -> Result<u8> {
        let p = self.survival_probability(features)?;
        Ok(u8::from(p >= self.threshold))
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<[f64; 2]> {
        let p = self.survival_probability(features)?;
        Ok([1.0 - p, p])
    }
}

impl Classifier for ClassifierArtifact {
    fn predict(&self, features: &FeatureVector) -> Result<u8> {
        match self {
            Self::LogisticRegression(model) => model.predict(features),
        }
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<[f64; 2]> {
        match self {
            Self::LogisticRegression(model) => model.predict_proba(features),
        }
    }
}

impl ClassifierArtifact {
    /// Layout checks run once at load time.
    pub fn check(&self) -> std::result::Result<(), String> {
        match self {
            Self::LogisticRegression(model) => {
                if model.coefficients.len() != FEATURE_COUNT {
                    return Err(format!(
                        "expected {} coefficients, found {}",
                        FEATURE_COUNT,
                        model.coefficients.len()
                    ));
                }
                if model.coefficients.iter().any(|w| !w.is_finite()) || !model.intercept.is_finite() {
                    return Err("coefficients must be finite".to_string());
                }
                if !(0.0..=1.0).contains(&model.threshold) {
                    return Err(format!("threshold {} is outside [0, 1]", model.threshold));
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl Scaler for StandardScaler {
    fn transform(&self, columns: &[f64]) -> Result<Vec<f64>> {
        if columns.len() != self.mean.len() {
            return Err(PredictError::inference(format!(
                "X has {} features, but StandardScaler is expecting {} features as input",
                columns.len(),
                self.mean.len()
            )));
        }
        Ok(columns
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| {
                // Constant columns are fit with a zero scale.
                let scale = if *scale == 0.0 { 1.0 } else { *scale };
                (x - mean) / scale
            })
            .collect())
    }
}

impl Scaler for ScalerArtifact {
    fn transform(&self, columns: &[f64]) -> Result<Vec<f64>> {
        match self {
            Self::StandardScaler(scaler) => scaler.transform(columns),
        }
    }
}

impl ScalerArtifact {
    pub fn check(&self) -> std::result::Result<(), String> {
        match self {
            Self::StandardScaler(scaler) => {
                if scaler.mean.len() != scaler.scale.len() {
                    return Err(format!(
                        "mean has {} columns but scale has {}",
                        scaler.mean.len(),
                        scaler.scale.len()
                    ));
                }
                if scaler.mean.len() != FeatureVector::SCALED.len() {
                    return Err(format!(
                        "expected {} scaled columns, found {}",
                        FeatureVector::SCALED.len(),
                        scaler.mean.len()
                    ));
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logistic_regression_probabilities() {
        let mut coefficients = vec![0.0; FEATURE_COUNT];
        coefficients[FeatureVector::IS_MALE] = -2.0;
        let model = LogisticRegression::new(coefficients, 1.0);

        let mut female = [0.0; FEATURE_COUNT];
        female[FeatureVector::TICKET_CLASS] = 1.0;
        let [lost, survived] = model.predict_proba(&FeatureVector::new(female)).unwrap();
        assert!((survived - 1.0 / (1.0 + (-1.0f64).exp())).abs() < 1e-12);
        assert!((lost + survived - 1.0).abs() < 1e-12);
        assert_eq!(model.predict(&FeatureVector::new(female)).unwrap(), 1);

        let mut male = female;
        male[FeatureVector::IS_MALE] = 1.0;
        assert_eq!(model.predict(&FeatureVector::new(male)).unwrap(), 0);
    }

    #[test]
    fn test_standard_scaler() {
        let scaler = StandardScaler {
            mean: vec![30.0, 32.0],
            scale: vec![10.0, 0.0],
        };
        assert_eq!(scaler.transform(&[40.0, 50.0]).unwrap(), vec![1.0, 18.0]);
        assert!(scaler.transform(&[40.0]).is_err());
    }

    #[test]
    fn test_artifact_json_layout() {
        let json = r#"{"kind":"logistic_regression","coefficients":[0,0,0,0,0,0,0,0,0,0,0,0,0],"intercept":0.5}"#;
        let artifact: ClassifierArtifact = serde_json::from_str(json).unwrap();
        assert!(artifact.check().is_ok());
        let ClassifierArtifact::LogisticRegression(model) = &artifact;
        assert_eq!(model.threshold, 0.5);

        let scaler: ScalerArtifact =
            serde_json::from_str(r#"{"kind":"standard_scaler","mean":[29.7],"scale":[14.5]}"#).unwrap();
        assert!(scaler.check().is_err());
    }

    #[test]
    fn test_check_rejects_wrong_width() {
        let artifact = ClassifierArtifact::LogisticRegression(LogisticRegression::new(vec![0.1; 14], 0.0));
        assert!(artifact.check().unwrap_err().contains("expected 13"));
    }
}
