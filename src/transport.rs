//! Single-attempt HTTP transport.
//!
//! [`Transport`] knows how to reach the API and authenticate, and nothing
//! about retries or error kinds. Each call to [`Transport::attempt`] issues
//! exactly one request.

use crate::{config::Config, Error, RequestDescriptor, Result};
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue, Method, StatusCode};
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Status reported for failures where no response arrived at all.
pub const NO_RESPONSE_STATUS: u16 = 500;

/// The body and headers of a 2xx response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The response headers.
    pub headers: HeaderMap,
    /// The decoded body. `Null` when the body was empty.
    pub body: Value,
}

/// A failed attempt.
///
/// Either the server answered with a non-2xx status, or no answer arrived
/// and `source` holds the underlying error.
#[derive(Debug)]
pub struct TransportFailure {
    /// The response status, or [`NO_RESPONSE_STATUS`] when there was none.
    pub status: u16,
    /// The response headers. Empty when there was no response.
    pub headers: HeaderMap,
    /// The decoded error body, if one was sent.
    pub body: Option<Value>,
    /// Method of the failed request.
    pub method: Method,
    /// Path of the failed request.
    pub path: String,
    /// The connection-level error when no response was received.
    pub source: Option<reqwest::Error>,
}

impl TransportFailure {
    /// Returns `true` if the server actually answered.
    pub fn has_response(&self) -> bool {
        self.source.is_none()
    }

    /// Returns a response header by name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }
}

/// Outcome of one attempt.
///
/// The outer `Result` carries failures that are not about the remote call
/// (a bad URL, a 2xx body that isn't JSON); the inner one carries the
/// attempt's own success or failure.
pub type AttemptResult = Result<std::result::Result<RawResponse, TransportFailure>>;

/// A configured HTTP client for the Toggl API.
#[derive(Debug, Clone)]
pub struct Transport {
    http_client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
    debug_api_errors: bool,
}

impl Transport {
    /// Builds a transport from a resolved configuration.
    ///
    /// The `Authorization` header is derived here, once.
    ///
    /// # Errors
    ///
    /// Returns an error if the token can't be used as a header value or the
    /// HTTP client can't be built.
    pub fn new(config: &Config) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(AUTHORIZATION, config.api_token().basic_auth_header()?);
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http_client = reqwest::Client::builder()
            .default_headers(default_headers)
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.base_url().clone(),
            timeout: config.timeout(),
            debug_api_errors: config.debug_api_errors(),
        })
    }

    /// The API root requests are sent to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves a request path against the API root, keeping the root's own path.
    ///
    /// # Errors
    ///
    /// Returns an error if the joined URL is invalid.
    pub fn url_for(&self, request: &RequestDescriptor) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = request.path.trim_start_matches('/');
        let mut url = Url::parse(&format!("{}/{}", base, path))?;

        if !request.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &request.query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// Performs exactly one HTTP attempt.
    ///
    /// # Errors
    ///
    /// The outer `Result` fails only for a bad URL, a 2xx body that couldn't
    /// be read ([`Error::Network`]) or one that isn't JSON.
    pub async fn attempt(&self, request: &RequestDescriptor) -> AttemptResult {
        let url = self.url_for(request)?;

        tracing::debug!(
            method = %request.method,
            url = %url,
            "Executing HTTP request"
        );

        let mut builder = self
            .http_client
            .request(request.method.clone(), url.clone())
            .timeout(self.timeout);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                let failure = TransportFailure {
                    status: NO_RESPONSE_STATUS,
                    headers: HeaderMap::new(),
                    body: None,
                    method: request.method.clone(),
                    path: request.path.clone(),
                    source: Some(e),
                };
                self.log_failure(&failure, &url, request);
                return Ok(Err(failure));
            }
        };

        let status = response.status();
        let headers = response.headers().clone();
        let text = response.text().await;

        if !status.is_success() {
            let failure = error_failure(status, headers, text, request);
            self.log_failure(&failure, &url, request);
            return Ok(Err(failure));
        }

        let text = text?;
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            match serde_json::from_str(&text) {
                Ok(body) => body,
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        raw_response = %text,
                        "Failed to deserialize response"
                    );
                    return Err(Error::Deserialization {
                        raw_response: text,
                        serde_error: e.to_string(),
                        status,
                    });
                }
            }
        };

        Ok(Ok(RawResponse {
            status,
            headers,
            body,
        }))
    }

    fn log_failure(&self, failure: &TransportFailure, url: &Url, request: &RequestDescriptor) {
        if !self.debug_api_errors {
            return;
        }

        let response_body = failure
            .body
            .as_ref()
            .map(Value::to_string)
            .unwrap_or_default();
        let request_body = request
            .body
            .as_ref()
            .map(Value::to_string)
            .unwrap_or_default();

        tracing::error!(
            status = failure.status,
            url = %url,
            method = %failure.method,
            response_body = %response_body,
            request_body = %request_body,
            "API error details"
        );
    }
}

/// Builds the failure for a non-2xx response. The status alone decides the
/// outcome, so a body that could not be read is simply absent.
fn error_failure(
    status: StatusCode,
    headers: HeaderMap,
    text: reqwest::Result<String>,
    request: &RequestDescriptor,
) -> TransportFailure {
    let body = match text {
        Ok(text) => decode_error_body(&text),
        Err(e) => {
            tracing::warn!(
                error = %e,
                status = status.as_u16(),
                "Failed to read error response body"
            );
            None
        }
    };

    TransportFailure {
        status: status.as_u16(),
        headers,
        body,
        method: request.method.clone(),
        path: request.path.clone(),
        source: None,
    }
}

/// Error bodies are JSON when the API produced them, but proxies may send
/// plain text or HTML.
fn decode_error_body(text: &str) -> Option<Value> {
    if text.trim().is_empty() {
        return None;
    }
    Some(serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ApiToken;
    use serde_json::json;

    fn transport(base: &str) -> Transport {
        let config = Config::new(ApiToken::new("t")).with_base_url(base).unwrap();
        Transport::new(&config).unwrap()
    }

    #[test]
    fn test_url_keeps_base_path() {
        let transport = transport("https://api.track.toggl.com/api/v9");
        let url = transport.url_for(&RequestDescriptor::get("/me")).unwrap();
        assert_eq!(url.as_str(), "https://api.track.toggl.com/api/v9/me");

        let transport = self::transport("https://api.track.toggl.com/api/v9/");
        let url = transport.url_for(&RequestDescriptor::get("me")).unwrap();
        assert_eq!(url.as_str(), "https://api.track.toggl.com/api/v9/me");
    }

    #[test]
    fn test_url_query_in_order() {
        let transport = transport("http://localhost:1234/api/v9");
        let request = RequestDescriptor::get("/me/time_entries")
            .with_query_param("start_date", "2024-01-01")
            .with_query_param("end_date", "2024-01-31");
        let url = transport.url_for(&request).unwrap();
        assert_eq!(
            url.query(),
            Some("start_date=2024-01-01&end_date=2024-01-31")
        );
    }

    #[test]
    fn test_decode_error_body() {
        assert_eq!(decode_error_body(""), None);
        assert_eq!(
            decode_error_body(r#"{"error":"nope"}"#),
            Some(json!({"error": "nope"}))
        );
        assert_eq!(
            decode_error_body("Bad Gateway"),
            Some(Value::String("Bad Gateway".to_string()))
        );
    }

    #[test]
    fn test_unreadable_error_body_keeps_status() {
        let read_error = reqwest::Client::new()
            .get("not a url")
            .build()
            .unwrap_err();
        let mut headers = HeaderMap::new();
        headers.insert("retry-after", HeaderValue::from_static("2"));
        let request = RequestDescriptor::get("/me");

        let failure = error_failure(
            StatusCode::TOO_MANY_REQUESTS,
            headers,
            Err(read_error),
            &request,
        );

        assert!(failure.has_response());
        assert_eq!(failure.status, 429);
        assert_eq!(failure.body, None);
        assert_eq!(failure.header("retry-after"), Some("2"));
        assert_eq!(failure.path, "/me");
    }

    #[test]
    fn test_error_failure_decodes_body() {
        let request = RequestDescriptor::delete("/workspaces/1/projects/2");
        let failure = error_failure(
            StatusCode::NOT_FOUND,
            HeaderMap::new(),
            Ok(r#"{"message":"gone"}"#.to_string()),
            &request,
        );

        assert!(failure.has_response());
        assert_eq!(failure.body, Some(json!({"message": "gone"})));
        assert_eq!(failure.method, Method::DELETE);
    }
}
