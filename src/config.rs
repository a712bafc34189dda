//! Client configuration.

use serde::Deserialize;

/// Connection settings for a ClickHouse HTTP endpoint.
///
/// Every field is optional when deserializing; missing fields take the
/// defaults below.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Scheme and host, without port. Defaults to `http://localhost`.
    pub url: String,
    /// HTTP port. Defaults to `8123`.
    pub port: u16,
    /// Log request shaping and raw response chunks at debug level.
    pub debug: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost".to_string(),
            port: 8123,
            debug: false,
        }
    }
}

impl ClientConfig {
    /// Config for the given host URL, with the default port.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Set the port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Enable or disable debug logging.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// `{url}:{port}`.
    pub fn host(&self) -> String {
        format!("{}:{}", self.url.trim_end_matches('/'), self.port)
    }
}
