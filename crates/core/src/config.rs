use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Deserializer};

pub const DEFAULT_BASE_URL: &str = "http://192.168.0.31:3000";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid base url {url:?}: {reason}")]
    BaseUrl { url: String, reason: String },

    #[error("poll interval must be greater than zero")]
    ZeroInterval,

    #[error("invalid endpoint config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

/// How the route key is laid out after the base url.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathTemplate {
    /// `{base}/{route_number}`
    RouteOnly,
    /// `{base}/{transport_type}/{route_number}`
    #[default]
    TypeAndRoute,
}

/// Where positions are fetched from and how often.
///
/// Durations are given in milliseconds when loaded from JSON:
///
/// ```json
/// { "base_url": "https://example.org/api", "path_template": "route_only", "poll_interval_ms": 5000 }
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub base_url: String,
    pub path_template: PathTemplate,
    #[serde(rename = "poll_interval_ms", deserialize_with = "millis")]
    pub poll_interval: Duration,
    #[serde(rename = "request_timeout_ms", deserialize_with = "optional_millis")]
    pub request_timeout: Option<Duration>,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            path_template: PathTemplate::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: None,
        }
    }
}

impl EndpointConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.base()?;
        if self.poll_interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }

    /// The parsed base url. Must be able to carry path segments.
    pub fn base(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.base_url).map_err(|e| ConfigError::BaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;

        if url.cannot_be_a_base() {
            return Err(ConfigError::BaseUrl {
                url: self.base_url.clone(),
                reason: "url cannot carry a path".to_owned(),
            });
        }

        Ok(url)
    }
}

fn millis<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    u64::deserialize(deserializer).map(Duration::from_millis)
}

fn optional_millis<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Duration>, D::Error> {
    Option::<u64>::deserialize(deserializer).map(|ms| ms.map(Duration::from_millis))
}
