use super::UpstreamError;
use crate::policy::domain::SourceAttribution;
use serde::Deserialize;
use std::collections::HashMap;

const PROVIDER: &str = "source attribution model";

/// Client for the source-attribution model. The response carries a flat
/// `probabilities` map; sources it omits score 0.
#[derive(Debug, Clone)]
pub struct AttributionClient {
    http: reqwest::Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct AttributionEnvelope {
    #[serde(default)]
    probabilities: HashMap<String, f64>,
}

impl AttributionClient {
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    pub async fn attribution(&self) -> Result<SourceAttribution, UpstreamError> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|source| UpstreamError::Request {
                provider: PROVIDER,
                source,
            })?;

        let envelope: AttributionEnvelope =
            response
                .json()
                .await
                .map_err(|source| UpstreamError::Payload {
                    provider: PROVIDER,
                    source,
                })?;

        Ok(decode_attribution(envelope))
    }
}

fn decode_attribution(envelope: AttributionEnvelope) -> SourceAttribution {
    SourceAttribution::from_fn(|source| {
        envelope
            .probabilities
            .get(source.key())
            .copied()
            .unwrap_or(0.0)
    })
}
