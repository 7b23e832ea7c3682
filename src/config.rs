//! Client configuration.

use std::time::Duration;
use uuid::Uuid;

/// Default bound on establishing a connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Default bound on a whole subscribe exchange.
pub const DEFAULT_SUBSCRIBE_TIMEOUT: Duration = Duration::from_secs(30);
/// Default bound on a whole unsubscribe exchange.
pub const DEFAULT_UNSUBSCRIBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for a [`BridgeClient`](crate::BridgeClient).
///
/// Use the builder methods to customize it.
///
/// # Example
///
/// ```
/// use chzzk_bridge_client::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::new("http://localhost:8080/")
///     .with_subscribe_timeout(Duration::from_secs(5));
/// assert_eq!(config.base_url, "http://localhost:8080");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Bridge base URL without a trailing slash
    pub base_url: String,
    /// Connection establishment timeout, also bounds stream opening
    pub connect_timeout: Duration,
    /// Timeout for the subscribe request (default: 30s)
    pub subscribe_timeout: Duration,
    /// Timeout for the unsubscribe request (default: 10s)
    pub unsubscribe_timeout: Duration,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl ClientConfig {
    /// Create a configuration with default timeouts.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(&base_url.into()),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            subscribe_timeout: DEFAULT_SUBSCRIBE_TIMEOUT,
            unsubscribe_timeout: DEFAULT_UNSUBSCRIBE_TIMEOUT,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Set the connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the subscribe timeout.
    pub fn with_subscribe_timeout(mut self, timeout: Duration) -> Self {
        self.subscribe_timeout = timeout;
        self
    }

    /// Set the unsubscribe timeout.
    pub fn with_unsubscribe_timeout(mut self, timeout: Duration) -> Self {
        self.unsubscribe_timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Full URL of a per-channel endpoint.
    pub fn endpoint(&self, path: &str, channel: Uuid) -> String {
        format!("{}{}?uuid={}", self.base_url, path, channel)
    }
}

/// Strip one trailing slash.
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.strip_suffix('/').unwrap_or(base_url).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new("http://localhost:8080");
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.subscribe_timeout, Duration::from_secs(30));
        assert_eq!(config.unsubscribe_timeout, Duration::from_secs(10));
        assert!(config.user_agent.starts_with("chzzk-bridge-client/"));
    }

    #[test]
    fn test_normalize_strips_one_slash() {
        assert_eq!(normalize_base_url("http://h:1/"), "http://h:1");
        assert_eq!(normalize_base_url("http://h:1"), "http://h:1");
        assert_eq!(normalize_base_url("http://h:1/base//"), "http://h:1/base/");
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::new("http://h")
            .with_connect_timeout(Duration::from_secs(1))
            .with_subscribe_timeout(Duration::from_secs(2))
            .with_unsubscribe_timeout(Duration::from_secs(3))
            .with_user_agent("test-agent");
        assert_eq!(config.connect_timeout, Duration::from_secs(1));
        assert_eq!(config.subscribe_timeout, Duration::from_secs(2));
        assert_eq!(config.unsubscribe_timeout, Duration::from_secs(3));
        assert_eq!(config.user_agent, "test-agent");
    }

    #[test]
    fn test_endpoint() {
        let channel = Uuid::nil();
        let config = ClientConfig::new("http://h:1/");
        assert_eq!(
            config.endpoint("/api/v1/sse", channel),
            "http://h:1/api/v1/sse?uuid=00000000-0000-0000-0000-000000000000"
        );
    }
}
