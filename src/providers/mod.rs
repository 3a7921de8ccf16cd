mod air_quality;
mod attribution;

pub use air_quality::{AirQualityClient, AirQualitySnapshot};
pub use attribution::AttributionClient;

/// Failure of either upstream fetch. Both providers share the same contract:
/// one bounded-timeout GET, no retries, and any transport or payload problem
/// fails the whole request.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("{provider} request failed: {source}")]
    Request {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{provider} returned a malformed payload: {source}")]
    Payload {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("unable to construct the upstream http client: {0}")]
    Client(#[from] reqwest::Error),
}

pub(crate) fn shared_client(timeout: std::time::Duration) -> Result<reqwest::Client, UpstreamError> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}
