//! Minimal Roblox web API transport.
//!
//! This crate provides the plumbing underneath the object graph in
//! `blox-core`:
//! - A [`Transport`] trait that turns a [`Request`] into a [`Response`]
//! - The reqwest-backed [`Roblox`] transport with cookie and CSRF session handling
//! - A [`Roblox::login`] handshake that obtains the CSRF token for a cookie

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE, SET_COOKIE};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

const DEFAULT_DOMAIN: &str = "roblox.com";
const CSRF_HEADER: &str = "x-csrf-token";
const SECURITY_COOKIE: &str = ".ROBLOSECURITY";

/// Errors that can occur when talking to the Roblox web API.
#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Anything that can carry a [`Request`] to the API and bring back a [`Response`].
///
/// Non-success statuses are not errors at this layer: they come back as an
/// `Ok(Response)` so the caller can decide between "not found" and failure.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and wait for the full response.
    async fn send(&self, request: Request) -> Result<Response, Error>;
}

/// HTTP method of a [`Request`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        }
    }
}

/// A single API call.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub body: Option<Value>,
}

impl Request {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    /// Attach a JSON body.
    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// The decoded answer to a [`Request`].
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: Value,
}

impl Response {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Default)]
struct Session {
    cookie: Option<String>,
    csrf_token: Option<String>,
}

/// Roblox web API transport.
pub struct Roblox {
    client: reqwest::Client,
    domain: String,
    session: RwLock<Session>,
}

impl Roblox {
    /// Create an unauthenticated transport with the given request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            domain: DEFAULT_DOMAIN.to_string(),
            session: RwLock::new(Session::default()),
        })
    }

    /// Point the transport at a different base domain (used for the login handshake).
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Authenticate with a `.ROBLOSECURITY` cookie.
    ///
    /// Stores the cookie, obtains a CSRF token from the logout endpoint (which
    /// refuses with 403 and hands one out when none is presented), then picks
    /// up a refreshed cookie from the auth metadata endpoint if one is issued.
    pub async fn login(&self, cookie: impl Into<String>) -> Result<(), Error> {
        {
            let mut session = self.session.write().await;
            session.cookie = Some(cookie.into());
            session.csrf_token = None;
        }

        let logout = Request::post(format!("https://auth.{}/v2/logout", self.domain));
        self.exchange(logout).await?;
        if self.session.read().await.csrf_token.is_none() {
            return Err(Error::Config("server did not issue an X-CSRF-TOKEN".to_string()));
        }

        let metadata = Request::get(format!("https://auth.{}/v2/metadata", self.domain));
        let (_, headers) = self.exchange(metadata).await?;
        if let Some(refreshed) = extract_security_cookie(&headers) {
            self.session.write().await.cookie = Some(refreshed);
        }

        info!(domain = %self.domain, "Logged in");
        Ok(())
    }

    async fn build_headers(&self) -> Result<HeaderMap, Error> {
        let session = self.session.read().await;
        let mut headers = HeaderMap::new();
        if let Some(cookie) = &session.cookie {
            headers.insert(
                COOKIE,
                HeaderValue::from_str(&format!("{SECURITY_COOKIE}={cookie};"))
                    .map_err(|e| Error::Config(format!("Invalid cookie: {e}")))?,
            );
        }
        if let Some(token) = &session.csrf_token {
            headers.insert(
                CSRF_HEADER,
                HeaderValue::from_str(token)
                    .map_err(|e| Error::Config(format!("Invalid CSRF token: {e}")))?,
            );
        }
        Ok(headers)
    }

    async fn exchange(&self, request: Request) -> Result<(Response, HeaderMap), Error> {
        let headers = self.build_headers().await?;
        let mut builder = self
            .client
            .request(request.method.into(), &request.url)
            .headers(headers);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        if let Some(token) = headers.get(CSRF_HEADER).and_then(|v| v.to_str().ok()) {
            self.session.write().await.csrf_token = Some(token.to_string());
        }

        let text = response
            .text()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        debug!(method = request.method.as_str(), url = %request.url, status, "API exchange");

        Ok((Response::new(status, decode_body(&text)), headers))
    }
}

#[async_trait]
impl Transport for Roblox {
    async fn send(&self, request: Request) -> Result<Response, Error> {
        let (response, _) = self.exchange(request).await?;
        Ok(response)
    }
}

/// Decode a response body: JSON when it parses, a JSON string otherwise, null when empty.
fn decode_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Pull a `.ROBLOSECURITY` value out of `set-cookie` headers.
fn extract_security_cookie(headers: &HeaderMap) -> Option<String> {
    let prefix = format!("{SECURITY_COOKIE}=");
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .map(str::trim)
        .find_map(|part| part.strip_prefix(prefix.as_str()))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_builder() {
        let request = Request::post("https://users.roblox.com/v1/usernames/users")
            .with_json(json!({ "usernames": ["builderman"] }));

        assert_eq!(request.method, Method::Post);
        assert_eq!(request.url, "https://users.roblox.com/v1/usernames/users");
        assert_eq!(request.body.unwrap()["usernames"][0], "builderman");
    }

    #[test]
    fn test_response_success_range() {
        assert!(Response::new(200, Value::Null).is_success());
        assert!(Response::new(204, Value::Null).is_success());
        assert!(!Response::new(403, Value::Null).is_success());
        assert!(!Response::new(404, Value::Null).is_success());
    }

    #[test]
    fn test_decode_body() {
        assert_eq!(decode_body(""), Value::Null);
        assert_eq!(decode_body("true"), Value::Bool(true));
        assert_eq!(decode_body("{\"id\": 1}"), json!({ "id": 1 }));
        assert_eq!(decode_body("<html>"), Value::String("<html>".to_string()));
    }

    #[test]
    fn test_extract_security_cookie() {
        let mut headers = HeaderMap::new();
        headers.append(SET_COOKIE, HeaderValue::from_static("RBXEventTrackerV2=abc; path=/"));
        headers.append(
            SET_COOKIE,
            HeaderValue::from_static(".ROBLOSECURITY=_|WARNING|_fresh; domain=.roblox.com"),
        );

        assert_eq!(
            extract_security_cookie(&headers).as_deref(),
            Some("_|WARNING|_fresh")
        );
        assert_eq!(extract_security_cookie(&HeaderMap::new()), None);
    }

    #[test]
    fn test_transport_domain() {
        let transport = Roblox::with_timeout(Duration::from_secs(5)).unwrap().with_domain("example.test");
        assert_eq!(transport.domain(), "example.test");
    }
}
