use crate::error::AppError;
use crate::infra::AppState;
use crate::policy::domain::{
    FeatureVector, PolicyRecommendation, PolicyResults, SourceAttribution, WeightVector,
};
use crate::policy::ranker::rank_policies;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use std::sync::atomic::Ordering;

#[derive(Debug, Serialize)]
pub struct PolicyImpactResponse {
    pub pollutants: FeatureVector,
    pub current_aqi: f64,
    pub sources: SourceAttribution,
    pub weights: WeightVector,
    pub policy_results: PolicyResults,
    pub top_recommendation: PolicyRecommendation,
    pub generated_at: DateTime<Utc>,
}

pub fn policy_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/policy-impact", get(policy_impact_endpoint))
        .with_state(state)
}

pub async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Fetches current conditions and the attribution breakdown, simulates the
/// elimination of each source's share, and returns the full ranking. Either
/// fetch failing fails the whole request; a partial ranking is never emitted.
pub async fn policy_impact_endpoint(
    State(state): State<AppState>,
) -> Result<Json<PolicyImpactResponse>, AppError> {
    let snapshot = state.air_quality.snapshot().await?;
    let sources = state.attribution.attribution().await?;

    let assessment = rank_policies(
        &snapshot.pollutants,
        snapshot.current_aqi,
        &sources,
        &state.weights,
        state.predictor.as_ref(),
    );

    Ok(Json(PolicyImpactResponse {
        pollutants: snapshot.pollutants,
        current_aqi: snapshot.current_aqi,
        sources,
        weights: state.weights,
        policy_results: assessment.results,
        top_recommendation: assessment.recommendation,
        generated_at: Utc::now(),
    }))
}
