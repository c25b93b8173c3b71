//! InfluxDB v2 connection settings and HTTP client construction

use std::time::Duration;

use presence_common::config::{normalize_url, InfluxConfig};
use presence_common::ConfigError;

/// Everything needed to reach one bucket
#[derive(Debug, Clone)]
pub struct InfluxConnection {
    /// Base URL, scheme included, no trailing slash
    pub url: String,
    /// API token sent as `Authorization: Token ...`
    pub token: String,
    pub org: String,
    pub bucket: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for InfluxConnection {
    fn default() -> Self {
        Self {
            url: String::from("http://localhost:8086"),
            token: String::new(),
            org: String::new(),
            bucket: String::new(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl InfluxConnection {
    /// Build from the resolved application config
    pub fn from_config(config: &InfluxConfig) -> Self {
        Self {
            url: normalize_url(&config.url),
            token: config.token.clone(),
            org: config.org.clone(),
            bucket: config.bucket.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Read `INFLUX_URL`, `INFLUX_TOKEN`, `INFLUX_ORG`, `INFLUX_BUCKET`
    pub fn from_env() -> Result<Self, ConfigError> {
        let var = |key: &'static str| {
            std::env::var(key)
                .ok()
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::MissingVar(key))
        };

        Ok(Self {
            url: normalize_url(&var("INFLUX_URL")?),
            token: var("INFLUX_TOKEN")?,
            org: var("INFLUX_ORG")?,
            bucket: var("INFLUX_BUCKET")?,
            ..Default::default()
        })
    }

    pub fn write_url(&self) -> String {
        format!("{}/api/v2/write", self.url)
    }

    pub fn query_url(&self) -> String {
        format!("{}/api/v2/query", self.url)
    }

    pub fn health_url(&self) -> String {
        format!("{}/health", self.url)
    }

    pub fn auth_header(&self) -> String {
        format!("Token {}", self.token)
    }
}

/// Create the shared HTTP client for store calls
pub fn create_http_client(connection: &InfluxConnection) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(connection.timeout)
        .user_agent(concat!("presence-relay/", env!("CARGO_PKG_VERSION")))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_connection() {
        let conn = InfluxConnection::default();
        assert_eq!(conn.url, "http://localhost:8086");
        assert_eq!(conn.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_from_config_normalizes_url() {
        let conn = InfluxConnection::from_config(&InfluxConfig {
            url: "influx:8086/".to_string(),
            token: "t0k3n".to_string(),
            org: "home".to_string(),
            bucket: "discord".to_string(),
            timeout_secs: 3,
        });

        assert_eq!(conn.write_url(), "http://influx:8086/api/v2/write");
        assert_eq!(conn.query_url(), "http://influx:8086/api/v2/query");
        assert_eq!(conn.health_url(), "http://influx:8086/health");
        assert_eq!(conn.auth_header(), "Token t0k3n");
        assert_eq!(conn.timeout, Duration::from_secs(3));
    }
}
