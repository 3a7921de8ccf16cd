use crate::config::AppConfig;
use crate::error::AppError;
use crate::model::{AqiPredictor, ImpactModel};
use crate::policy::domain::WeightVector;
use crate::policy::weights::compute_weights;
use crate::providers::{shared_client, AirQualityClient, AttributionClient};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

/// Shared read-only request state. The predictor and weights are fixed at
/// startup; the clients hold a pooled connection with the configured timeout.
#[derive(Clone)]
pub struct AppState {
    pub readiness: Arc<AtomicBool>,
    pub metrics: Arc<PrometheusHandle>,
    pub predictor: Arc<dyn AqiPredictor>,
    pub weights: WeightVector,
    pub air_quality: AirQualityClient,
    pub attribution: AttributionClient,
}

/// Loads the model artifact, derives the sensitivity weights, and wires the
/// upstream clients. Any failure here aborts startup; nothing is retried or
/// degraded.
pub fn build_state(
    config: &AppConfig,
    metrics: PrometheusHandle,
    readiness: Arc<AtomicBool>,
) -> Result<AppState, AppError> {
    let model = ImpactModel::load(&config.model.artifact_path)?;
    let weights = compute_weights(model.coefficients())?;
    info!(
        model = model.name(),
        path = %config.model.artifact_path.display(),
        "impact model loaded"
    );

    let http = shared_client(config.providers.upstream_timeout)?;
    let air_quality = AirQualityClient::new(
        http.clone(),
        config.providers.aqi_feed_url.clone(),
        config.providers.aqi_feed_token.clone(),
    );
    let attribution = AttributionClient::new(http, config.providers.attribution_url.clone());

    Ok(AppState {
        readiness,
        metrics: Arc::new(metrics),
        predictor: Arc::new(model),
        weights,
        air_quality,
        attribution,
    })
}
