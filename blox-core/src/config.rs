//! Client configuration.

use crate::endpoints::DEFAULT_DOMAIN;
use std::time::Duration;

/// Environment variable holding the `.ROBLOSECURITY` session cookie.
pub const COOKIE_ENV: &str = "ROBLOSECURITY";

/// Environment variable overriding the base domain.
pub const DOMAIN_ENV: &str = "ROBLOX_DOMAIN";

/// How [`Client::connect`](crate::Client::connect) builds its transport.
#[derive(Clone)]
pub struct ClientConfig {
    /// Session cookie. Without one the client stays anonymous.
    pub cookie: Option<String>,
    /// Base domain every endpoint host is built on.
    pub domain: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            cookie: None,
            domain: DEFAULT_DOMAIN.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the cookie and optional domain override from the environment.
    pub fn from_env() -> Self {
        let cookie = std::env::var(COOKIE_ENV).ok().filter(|c| !c.is_empty());
        let domain = std::env::var(DOMAIN_ENV)
            .ok()
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| DEFAULT_DOMAIN.to_string());
        Self {
            cookie,
            domain,
            ..Self::default()
        }
    }

    pub fn with_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.cookie = Some(cookie.into());
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn has_cookie(&self) -> bool {
        self.cookie.is_some()
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("cookie", &self.cookie.as_ref().map(|_| "<redacted>"))
            .field("domain", &self.domain)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new();
        assert!(!config.has_cookie());
        assert_eq!(config.domain, "roblox.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::new()
            .with_cookie("secret")
            .with_domain("example.test")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.cookie.as_deref(), Some("secret"));
        assert_eq!(config.domain, "example.test");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_debug_hides_cookie() {
        let rendered = format!("{:?}", ClientConfig::new().with_cookie("secret"));
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
