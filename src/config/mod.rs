use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_AQI_FEED_URL: &str = "https://api.waqi.info/feed/delhi/";
const DEFAULT_ATTRIBUTION_URL: &str =
    "https://cirealkiller-source-identification-waqi.hf.space/live";
const DEFAULT_MODEL_PATH: &str = "model/impact_model.json";

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub providers: ProvidersConfig,
    pub model: ModelConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let aqi_feed_url =
            env::var("AQI_FEED_URL").unwrap_or_else(|_| DEFAULT_AQI_FEED_URL.to_string());
        let aqi_feed_token = env::var("AQI_FEED_TOKEN").unwrap_or_else(|_| "demo".to_string());
        let attribution_url =
            env::var("SOURCE_MODEL_URL").unwrap_or_else(|_| DEFAULT_ATTRIBUTION_URL.to_string());
        let timeout_secs = env::var("UPSTREAM_TIMEOUT_SECS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidTimeout)?;

        let artifact_path = PathBuf::from(
            env::var("IMPACT_MODEL_PATH").unwrap_or_else(|_| DEFAULT_MODEL_PATH.to_string()),
        );

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            providers: ProvidersConfig {
                aqi_feed_url,
                aqi_feed_token,
                attribution_url,
                upstream_timeout: Duration::from_secs(timeout_secs),
            },
            model: ModelConfig { artifact_path },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Upstream endpoints and the shared fetch deadline.
///
/// Both providers are plain HTTP GET targets; the token rides along as a
/// query parameter on the live feed only.
#[derive(Debug, Clone)]
pub struct ProvidersConfig {
    pub aqi_feed_url: String,
    pub aqi_feed_token: String,
    pub attribution_url: String,
    pub upstream_timeout: Duration,
}

/// Location of the persisted impact-model artifact.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub artifact_path: PathBuf,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidTimeout,
    InvalidHost { source: std::net::AddrParseError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidTimeout => {
                write!(f, "UPSTREAM_TIMEOUT_SECS must be a whole number of seconds")
            }
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidTimeout => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("AQI_FEED_URL");
        env::remove_var("AQI_FEED_TOKEN");
        env::remove_var("SOURCE_MODEL_URL");
        env::remove_var("UPSTREAM_TIMEOUT_SECS");
        env::remove_var("IMPACT_MODEL_PATH");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.providers.aqi_feed_url, DEFAULT_AQI_FEED_URL);
        assert_eq!(config.providers.aqi_feed_token, "demo");
        assert_eq!(config.providers.attribution_url, DEFAULT_ATTRIBUTION_URL);
        assert_eq!(config.providers.upstream_timeout, Duration::from_secs(5));
        assert_eq!(
            config.model.artifact_path,
            PathBuf::from(DEFAULT_MODEL_PATH)
        );
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        env::remove_var("APP_HOST");
    }

    #[test]
    fn rejects_non_numeric_timeout() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("UPSTREAM_TIMEOUT_SECS", "soon");
        let err = AppConfig::load().expect_err("timeout must be numeric");
        assert!(matches!(err, ConfigError::InvalidTimeout));
        env::remove_var("UPSTREAM_TIMEOUT_SECS");
    }

    #[test]
    fn honors_provider_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("AQI_FEED_URL", "http://127.0.0.1:9000/feed");
        env::set_var("AQI_FEED_TOKEN", "secret");
        env::set_var("UPSTREAM_TIMEOUT_SECS", "2");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.providers.aqi_feed_url, "http://127.0.0.1:9000/feed");
        assert_eq!(config.providers.aqi_feed_token, "secret");
        assert_eq!(config.providers.upstream_timeout, Duration::from_secs(2));
        reset_env();
    }
}
