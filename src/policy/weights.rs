use super::domain::{WeightVector, FEATURE_COUNT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum WeightError {
    #[error("impact model coefficients are all zero; sensitivity weights are undefined")]
    DegenerateCoefficients,
}

/// Derives the per-feature sensitivity weights from the model coefficients:
/// absolute values, L1-normalized. The model never changes after load, so the
/// result is computed once at startup and shared read-only.
pub fn compute_weights(coefficients: &[f64; FEATURE_COUNT]) -> Result<WeightVector, WeightError> {
    let total: f64 = coefficients.iter().map(|coefficient| coefficient.abs()).sum();
    if total == 0.0 {
        return Err(WeightError::DegenerateCoefficients);
    }

    let mut values = [0.0; FEATURE_COUNT];
    for (slot, coefficient) in values.iter_mut().zip(coefficients) {
        *slot = coefficient.abs() / total;
    }
    Ok(WeightVector::new(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::domain::FeatureName;

    #[test]
    fn weights_are_nonnegative_and_sum_to_one() {
        let coefficients = [0.412, -0.187, 0.094, 0.031, -0.058, 0.102, -0.143, 0.076, -1.92];
        let weights = compute_weights(&coefficients).expect("weights derive");

        assert!((weights.sum() - 1.0).abs() < 1e-9);
        for (_, weight) in weights.iter() {
            assert!(weight >= 0.0);
        }
    }

    #[test]
    fn negative_coefficients_contribute_by_magnitude() {
        let mut coefficients = [0.0; FEATURE_COUNT];
        coefficients[FeatureName::Pm25.index()] = -3.0;
        coefficients[FeatureName::Pm10.index()] = 1.0;

        let weights = compute_weights(&coefficients).expect("weights derive");
        assert!((weights.get(FeatureName::Pm25) - 0.75).abs() < 1e-12);
        assert!((weights.get(FeatureName::Pm10) - 0.25).abs() < 1e-12);
        assert_eq!(weights.get(FeatureName::O3), 0.0);
    }

    #[test]
    fn all_zero_coefficients_are_rejected() {
        let err = compute_weights(&[0.0; FEATURE_COUNT]).expect_err("degenerate model rejected");
        assert_eq!(err, WeightError::DegenerateCoefficients);
    }
}
