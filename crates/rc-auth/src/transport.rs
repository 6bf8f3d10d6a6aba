use std::fmt;
use std::sync::Arc;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::{self, AuthConfig, endpoints};
use crate::errors::Result;

/// Yggdrasil endpoints reachable through a [`Transport`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Authenticate,
    Refresh,
    Validate,
    SignOut,
    Invalidate,
}

impl Endpoint {
    /// Path segment under the server's base URL
    pub fn path(&self) -> &'static str {
        match self {
            Self::Authenticate => endpoints::AUTHENTICATE,
            Self::Refresh => endpoints::REFRESH,
            Self::Validate => endpoints::VALIDATE,
            Self::SignOut => endpoints::SIGNOUT,
            Self::Invalidate => endpoints::INVALIDATE,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Status code and JSON body of one exchange
///
/// An empty body is `Value::Null`; a body that is not JSON is kept verbatim as
/// `Value::String`.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Value,
}

impl TransportResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Blocking "POST JSON, get status + JSON back" exchange with the auth server
///
/// One call is one round trip: implementations must not retry.
pub trait Transport {
    fn post(&self, endpoint: Endpoint, body: &Value) -> Result<TransportResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn post(&self, endpoint: Endpoint, body: &Value) -> Result<TransportResponse> {
        (**self).post(endpoint, body)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn post(&self, endpoint: Endpoint, body: &Value) -> Result<TransportResponse> {
        (**self).post(endpoint, body)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn post(&self, endpoint: Endpoint, body: &Value) -> Result<TransportResponse> {
        (**self).post(endpoint, body)
    }
}

/// [`Transport`] over a blocking reqwest client
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    config: AuthConfig,
    http: Client,
}

impl ReqwestTransport {
    /// Create a new transport from the server configuration
    pub fn new(config: AuthConfig) -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(config.http_timeouts.connect)
            .timeout(config.http_timeouts.request)
            .user_agent(config.user_agent.as_deref().unwrap_or(config::DEFAULT_USER_AGENT))
            .build()?;

        Ok(Self { config, http })
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }
}

impl Transport for ReqwestTransport {
    #[instrument(skip(self, body))]
    fn post(&self, endpoint: Endpoint, body: &Value) -> Result<TransportResponse> {
        let url = self.config.endpoint_url(endpoint.path())?;

        debug!("POST {}", url);
        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, config::CONTENT_TYPE)
            .body(serde_json::to_vec(body)?)
            .send()?;

        let status = response.status().as_u16();
        let text = response.text()?;

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        debug!(status, "Received response");
        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn post_blocking(base: String, endpoint: Endpoint, body: Value) -> TransportResponse {
        tokio::task::spawn_blocking(move || {
            let transport = ReqwestTransport::new(AuthConfig::custom(&base)?)?;
            transport.post(endpoint, &body)
        })
        .await
        .unwrap()
        .unwrap()
    }

    #[test]
    fn test_endpoint_paths() {
        assert_eq!(Endpoint::Authenticate.path(), "authenticate");
        assert_eq!(Endpoint::Refresh.path(), "refresh");
        assert_eq!(Endpoint::Validate.path(), "validate");
        assert_eq!(Endpoint::SignOut.path(), "signout");
        assert_eq!(Endpoint::Invalidate.path(), "invalidate");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_post_sends_json_body() {
        let server = MockServer::start().await;
        let payload = json!({
            "Marie": "McGee",
            "George": 1,
            "Nestly": { "Nestling": "Nestling's tail" },
            "Listly": ["listling1", 2, "listling 3"]
        });

        Mock::given(method("POST"))
            .and(path("/authenticate"))
            .and(header("content-type", "application/json"))
            .and(header("user-agent", "rauncher-net"))
            .and(body_json(&payload))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "accessToken": "a", "clientToken": "c" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let response = post_blocking(server.uri(), Endpoint::Authenticate, payload).await;

        assert!(response.is_success());
        assert_eq!(response.body["accessToken"], "a");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_post_passes_error_status_through() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/refresh"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": "ForbiddenOperationException",
                "errorMessage": "Invalid token."
            })))
            .mount(&server)
            .await;

        let response = post_blocking(server.uri(), Endpoint::Refresh, json!({})).await;

        assert_eq!(response.status, 403);
        assert!(!response.is_success());
        assert_eq!(response.body["error"], "ForbiddenOperationException");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_post_empty_and_non_json_bodies() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/validate"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/signout"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let validate = post_blocking(server.uri(), Endpoint::Validate, json!({})).await;
        assert_eq!(validate.status, 204);
        assert_eq!(validate.body, Value::Null);

        let signout = post_blocking(server.uri(), Endpoint::SignOut, json!({})).await;
        assert_eq!(signout.status, 502);
        assert_eq!(signout.body, Value::String("Bad Gateway".to_string()));
    }
}
