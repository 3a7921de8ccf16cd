use crate::policy::domain::{FeatureName, FeatureVector, FEATURE_COUNT};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Scores a feature vector as a predicted AQI change. The seam lets tests
/// drive the simulator and handlers with canned predictions.
pub trait AqiPredictor: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> f64;
}

/// Pre-fit linear regression mapping a feature vector to an AQI change.
/// Loaded once at startup from a JSON artifact and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct ImpactModel {
    name: String,
    coefficients: [f64; FEATURE_COUNT],
    intercept: f64,
}

#[derive(Debug, Deserialize)]
struct ImpactModelArtifact {
    model: String,
    features: Vec<String>,
    coefficients: Vec<f64>,
    intercept: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("unable to read impact model artifact at {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("impact model artifact is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("impact model lists {found} features; expected {expected}")]
    FeatureArity { expected: usize, found: usize },
    #[error("impact model feature {position} is '{found}'; expected '{expected}'")]
    FeatureOrderMismatch {
        position: usize,
        expected: &'static str,
        found: String,
    },
    #[error("impact model lists {found} coefficients; expected {expected}")]
    CoefficientArity { expected: usize, found: usize },
    #[error("impact model coefficient for '{feature}' is not finite")]
    NonFiniteCoefficient { feature: &'static str },
}

impl ImpactModel {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ModelError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Parses and validates an artifact. The feature list must match the
    /// schema order exactly; a reordered or renamed artifact is a deployment
    /// inconsistency, never something to reconcile at runtime.
    pub fn from_json(raw: &str) -> Result<Self, ModelError> {
        let artifact: ImpactModelArtifact = serde_json::from_str(raw)?;

        if artifact.features.len() != FEATURE_COUNT {
            return Err(ModelError::FeatureArity {
                expected: FEATURE_COUNT,
                found: artifact.features.len(),
            });
        }
        for (expected, found) in FeatureName::ordered().iter().zip(&artifact.features) {
            if expected.key() != found.as_str() {
                return Err(ModelError::FeatureOrderMismatch {
                    position: expected.index(),
                    expected: expected.key(),
                    found: found.clone(),
                });
            }
        }

        if artifact.coefficients.len() != FEATURE_COUNT {
            return Err(ModelError::CoefficientArity {
                expected: FEATURE_COUNT,
                found: artifact.coefficients.len(),
            });
        }
        let mut coefficients = [0.0; FEATURE_COUNT];
        for (feature, (slot, value)) in FeatureName::ordered()
            .into_iter()
            .zip(coefficients.iter_mut().zip(&artifact.coefficients))
        {
            if !value.is_finite() {
                return Err(ModelError::NonFiniteCoefficient {
                    feature: feature.key(),
                });
            }
            *slot = *value;
        }

        Ok(Self {
            name: artifact.model,
            coefficients,
            intercept: artifact.intercept,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn coefficients(&self) -> &[f64; FEATURE_COUNT] {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

impl AqiPredictor for ImpactModel {
    fn predict(&self, features: &FeatureVector) -> f64 {
        let weighted: f64 = self
            .coefficients
            .iter()
            .zip(features.as_array())
            .map(|(coefficient, value)| coefficient * value)
            .sum();
        self.intercept + weighted
    }
}
