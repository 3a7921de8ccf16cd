use super::domain::{FeatureVector, WeightVector};
use crate::model::AqiPredictor;
use tracing::warn;

/// Lower bound on the projected change from eliminating a single source.
/// A guard against model extrapolation artifacts rather than a physical
/// limit; no upper cap is applied.
pub const AQI_CHANGE_FLOOR: f64 = -60.0;

/// Projects the AQI change from removing `source_percent`% of one source's
/// contribution. Each feature is scaled down in proportion to its sensitivity
/// weight, and the hypothetical vector is scored by the predictor. The
/// original readings are never modified.
pub fn simulate<P>(
    pollutants: &FeatureVector,
    source_percent: f64,
    weights: &WeightVector,
    predictor: &P,
) -> f64
where
    P: AqiPredictor + ?Sized,
{
    let share = clamp_percent(source_percent) / 100.0;
    let simulated = FeatureVector::from_fn(|feature| {
        let reduction = share * weights.get(feature);
        pollutants.get(feature) * (1.0 - reduction)
    });

    predictor.predict(&simulated).max(AQI_CHANGE_FLOOR)
}

// Shares come from an untrusted upstream; clamp rather than reject.
fn clamp_percent(raw: f64) -> f64 {
    if (0.0..=100.0).contains(&raw) {
        return raw;
    }

    let clamped = raw.clamp(0.0, 100.0);
    warn!(raw, clamped, "attributed share outside [0, 100]; clamping");
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::domain::{FeatureName, FEATURE_COUNT};
    use crate::policy::weights::compute_weights;
    use std::sync::Mutex;

    struct FixedPredictor(f64);

    impl AqiPredictor for FixedPredictor {
        fn predict(&self, _features: &FeatureVector) -> f64 {
            self.0
        }
    }

    struct SpyPredictor {
        seen: Mutex<Option<FeatureVector>>,
        result: f64,
    }

    impl SpyPredictor {
        fn returning(result: f64) -> Self {
            Self {
                seen: Mutex::new(None),
                result,
            }
        }
    }

    impl AqiPredictor for SpyPredictor {
        fn predict(&self, features: &FeatureVector) -> f64 {
            *self.seen.lock().unwrap() = Some(*features);
            self.result
        }
    }

    fn sample_pollutants() -> FeatureVector {
        FeatureVector::new([120.0, 90.0, 40.0, 8.0, 0.9, 15.0, 31.0, 42.0, 1.5])
    }

    fn even_weights() -> WeightVector {
        compute_weights(&[1.0; FEATURE_COUNT]).expect("uniform weights derive")
    }

    #[test]
    fn zero_percent_leaves_readings_untouched() {
        let pollutants = sample_pollutants();
        let predictor = SpyPredictor::returning(-12.0);

        let change = simulate(&pollutants, 0.0, &even_weights(), &predictor);

        assert_eq!(change, -12.0);
        let seen = predictor.seen.lock().unwrap().expect("predictor invoked");
        assert_eq!(seen, pollutants);
    }

    #[test]
    fn full_reduction_of_a_fully_weighted_feature_zeroes_it() {
        let mut weight_values = [0.0; FEATURE_COUNT];
        weight_values[FeatureName::Pm25.index()] = 1.0;
        let weights = WeightVector::new(weight_values);

        let pollutants = sample_pollutants();
        let predictor = SpyPredictor::returning(-5.0);
        simulate(&pollutants, 100.0, &weights, &predictor);

        let seen = predictor.seen.lock().unwrap().expect("predictor invoked");
        assert_eq!(seen.get(FeatureName::Pm25), 0.0);
        assert_eq!(seen.get(FeatureName::Pm10), pollutants.get(FeatureName::Pm10));
    }

    #[test]
    fn change_is_floored_at_the_safety_cap() {
        let change = simulate(
            &sample_pollutants(),
            40.0,
            &even_weights(),
            &FixedPredictor(-1000.0),
        );
        assert_eq!(change, AQI_CHANGE_FLOOR);
    }

    #[test]
    fn worsening_predictions_pass_through_unmodified() {
        let change = simulate(
            &sample_pollutants(),
            40.0,
            &even_weights(),
            &FixedPredictor(17.5),
        );
        assert_eq!(change, 17.5);
    }

    #[test]
    fn out_of_range_shares_are_clamped() {
        let pollutants = sample_pollutants();
        let mut weight_values = [0.0; FEATURE_COUNT];
        weight_values[FeatureName::Pm25.index()] = 1.0;
        let weights = WeightVector::new(weight_values);

        let over = SpyPredictor::returning(0.0);
        simulate(&pollutants, 150.0, &weights, &over);
        let seen = over.seen.lock().unwrap().expect("predictor invoked");
        assert_eq!(seen.get(FeatureName::Pm25), 0.0, "150% behaves as 100%");

        let under = SpyPredictor::returning(0.0);
        simulate(&pollutants, -5.0, &weights, &under);
        let seen = under.seen.lock().unwrap().expect("predictor invoked");
        assert_eq!(seen, pollutants, "-5% behaves as 0%");
    }
}
