use super::domain::{
    EmissionSource, FeatureVector, PolicyAssessment, PolicyOutcome, PolicyRecommendation,
    PolicyResults, SourceAttribution, WeightVector, SOURCE_COUNT,
};
use super::simulator::simulate;
use crate::model::AqiPredictor;

/// Evaluates every emission source exhaustively and picks the policy with the
/// most negative projected change. The source set is small and fixed, and the
/// full outcome set is part of the response, so nothing is skipped or
/// discarded. Ties keep the first source in declaration order.
pub fn rank_policies<P>(
    pollutants: &FeatureVector,
    current_aqi: f64,
    sources: &SourceAttribution,
    weights: &WeightVector,
    predictor: &P,
) -> PolicyAssessment
where
    P: AqiPredictor + ?Sized,
{
    let ordered = EmissionSource::ordered();
    let mut outcomes = [PolicyOutcome {
        aqi_change: 0.0,
        estimated_aqi: current_aqi,
    }; SOURCE_COUNT];

    for source in ordered {
        let aqi_change = simulate(pollutants, sources.share(source), weights, predictor);
        outcomes[source.index()] = PolicyOutcome {
            aqi_change,
            estimated_aqi: current_aqi + aqi_change,
        };
    }

    let mut best_source = ordered[0];
    let mut best_outcome = outcomes[0];
    for source in ordered.into_iter().skip(1) {
        let outcome = outcomes[source.index()];
        if outcome.aqi_change < best_outcome.aqi_change {
            best_source = source;
            best_outcome = outcome;
        }
    }

    PolicyAssessment {
        results: PolicyResults::new(outcomes),
        recommendation: PolicyRecommendation {
            policy: best_source,
            expected_change: best_outcome.aqi_change,
            estimated_aqi: best_outcome.estimated_aqi,
        },
    }
}
