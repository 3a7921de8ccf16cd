pub mod domain;
pub mod ranker;
pub mod simulator;
pub mod weights;

pub use domain::{
    EmissionSource, FeatureName, FeatureVector, PolicyAssessment, PolicyOutcome,
    PolicyRecommendation, PolicyResults, SourceAttribution, WeightVector,
};
pub use ranker::rank_policies;
pub use simulator::{simulate, AQI_CHANGE_FLOOR};
pub use weights::{compute_weights, WeightError};
