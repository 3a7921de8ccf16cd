use super::UpstreamError;
use crate::policy::domain::{FeatureName, FeatureVector};
use serde::Deserialize;
use std::collections::HashMap;

const PROVIDER: &str = "air quality feed";

/// Client for the live air-quality feed. The feed nests per-variable readings
/// under `data.iaqi` with single-letter keys for weather variables; anything
/// the feed omits takes the documented fallback value.
#[derive(Debug, Clone)]
pub struct AirQualityClient {
    http: reqwest::Client,
    url: String,
    token: String,
}

/// Current readings plus the overall index, captured in one fetch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirQualitySnapshot {
    pub pollutants: FeatureVector,
    pub current_aqi: f64,
}

#[derive(Debug, Deserialize)]
struct FeedEnvelope {
    data: FeedData,
}

#[derive(Debug, Deserialize)]
struct FeedData {
    aqi: f64,
    #[serde(default)]
    iaqi: HashMap<String, FeedReading>,
}

#[derive(Debug, Deserialize)]
struct FeedReading {
    v: f64,
}

impl AirQualityClient {
    pub fn new(http: reqwest::Client, url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
            token: token.into(),
        }
    }

    pub async fn snapshot(&self) -> Result<AirQualitySnapshot, UpstreamError> {
        let response = self
            .http
            .get(&self.url)
            .query(&[("token", self.token.as_str())])
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|source| UpstreamError::Request {
                provider: PROVIDER,
                source,
            })?;

        let envelope: FeedEnvelope =
            response
                .json()
                .await
                .map_err(|source| UpstreamError::Payload {
                    provider: PROVIDER,
                    source,
                })?;

        Ok(decode_snapshot(envelope))
    }
}

fn decode_snapshot(envelope: FeedEnvelope) -> AirQualitySnapshot {
    let FeedData { aqi, iaqi } = envelope.data;
    let pollutants = FeatureVector::from_fn(|feature| {
        iaqi.get(feature.feed_key())
            .map(|reading| reading.v)
            .unwrap_or_else(|| feature.fallback())
    });

    AirQualitySnapshot {
        pollutants,
        current_aqi: aqi,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(raw: &str) -> AirQualitySnapshot {
        let envelope: FeedEnvelope = serde_json::from_str(raw).expect("feed payload parses");
        decode_snapshot(envelope)
    }

    #[test]
    fn decodes_a_full_feed_payload() {
        let snapshot = decode(
            r#"{"data": {"aqi": 180, "iaqi": {
                "pm25": {"v": 120}, "pm10": {"v": 90}, "no2": {"v": 40},
                "so2": {"v": 8}, "co": {"v": 0.9}, "o3": {"v": 15},
                "t": {"v": 31}, "h": {"v": 42}, "w": {"v": 1.5}
            }}}"#,
        );

        assert_eq!(snapshot.current_aqi, 180.0);
        assert_eq!(snapshot.pollutants.get(FeatureName::Pm25), 120.0);
        assert_eq!(snapshot.pollutants.get(FeatureName::Temperature), 31.0);
        assert_eq!(snapshot.pollutants.get(FeatureName::WindSpeed), 1.5);
    }

    #[test]
    fn missing_readings_take_documented_fallbacks() {
        let snapshot = decode(r#"{"data": {"aqi": 95, "iaqi": {"pm25": {"v": 60}}}}"#);

        assert_eq!(snapshot.pollutants.get(FeatureName::Pm25), 60.0);
        assert_eq!(snapshot.pollutants.get(FeatureName::O3), 0.0);
        assert_eq!(snapshot.pollutants.get(FeatureName::Temperature), 25.0);
        assert_eq!(snapshot.pollutants.get(FeatureName::Humidity), 50.0);
        assert_eq!(snapshot.pollutants.get(FeatureName::WindSpeed), 2.0);
    }

    #[test]
    fn a_payload_without_iaqi_still_decodes() {
        let snapshot = decode(r#"{"data": {"aqi": 20}}"#);
        assert_eq!(snapshot.current_aqi, 20.0);
        assert_eq!(snapshot.pollutants.get(FeatureName::Pm25), 0.0);
    }

    #[test]
    fn extra_feed_fields_are_ignored() {
        let snapshot = decode(
            r#"{"data": {"aqi": 55, "iaqi": {"pm25": {"v": 30}, "dew": {"v": 12}},
                "city": {"name": "delhi"}}}"#,
        );
        assert_eq!(snapshot.pollutants.get(FeatureName::Pm25), 30.0);
    }
}
