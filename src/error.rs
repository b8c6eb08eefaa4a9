//! Error types for Toggl API calls.
//!
//! Every failure surfaces as an [`Error`]. Failures the API itself reports
//! (a non-2xx response) are translated into the closed [`ApiError`] taxonomy;
//! everything else keeps its own variant so callers can tell a dropped
//! connection apart from a rejected request.

use crate::schema::SchemaError;
use http::StatusCode;
use serde_json::Value;

/// A single field-level problem reported with a validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// The offending field.
    pub field: String,
    /// What was wrong with it.
    pub message: String,
}

/// An error reported by the Toggl API through its HTTP status.
///
/// Each variant maps to one status code family. Use [`ApiError::code`] for a
/// stable machine-readable identifier and [`ApiError::message`] for text that
/// can be shown to a user.
///
/// # Examples
///
/// ```
/// use togglr::ApiError;
///
/// let err = ApiError::from_status(404, None);
/// assert_eq!(err.status_code(), 404);
/// assert_eq!(err.code(), "not_found");
/// assert_eq!(err.message(), "Resource not found");
/// ```
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Too many requests, and the retry budget is spent.
    #[error("{message}")]
    RateLimit {
        /// Seconds the server asked us to wait before trying again.
        retry_after: u64,
        /// The human-readable message.
        message: String,
    },

    /// The requested resource does not exist (404).
    #[error("{message}")]
    NotFound {
        /// The human-readable message.
        message: String,
    },

    /// The request was rejected as invalid (400).
    ///
    /// Toggl reports plain strings here, so `errors` is empty for responses
    /// coming off the wire.
    #[error("{message}")]
    Validation {
        /// Field-level details, if any.
        errors: Vec<FieldError>,
        /// The human-readable message.
        message: String,
    },

    /// The API token was missing or rejected (401).
    #[error("{message}")]
    Authentication {
        /// The human-readable message.
        message: String,
    },

    /// The token is valid but not allowed to do this (403).
    #[error("{message}")]
    Authorization {
        /// The human-readable message.
        message: String,
    },

    /// Any other non-2xx status.
    #[error("{message}")]
    Generic {
        /// The HTTP status code.
        status: u16,
        /// The human-readable message.
        message: String,
    },
}

impl ApiError {
    /// Builds a rate limit error carrying the server's retry hint.
    pub fn rate_limit(retry_after: u64) -> Self {
        ApiError::RateLimit {
            retry_after,
            message: "Rate limit exceeded".to_string(),
        }
    }

    /// Translates a terminal HTTP failure into the matching variant.
    ///
    /// The message is the body's `error` field, else its `message` field,
    /// else "Unknown API error". Only 404 and 429 have defaults of their own. A 429 passed here gets the default
    /// retry hint of one second; the client builds its own rate limit errors
    /// from the `Retry-After` header instead.
    pub fn from_status(status: u16, body: Option<&Value>) -> Self {
        let extracted = body.and_then(extract_message);
        let message = |default: &str| extracted.clone().unwrap_or_else(|| default.to_string());

        match status {
            429 => ApiError::RateLimit {
                retry_after: 1,
                message: message("Rate limit exceeded"),
            },
            404 => ApiError::NotFound {
                message: message("Resource not found"),
            },
            401 => ApiError::Authentication {
                message: message("Unknown API error"),
            },
            403 => ApiError::Authorization {
                message: message("Unknown API error"),
            },
            400 => ApiError::Validation {
                errors: Vec::new(),
                message: message("Unknown API error"),
            },
            status => ApiError::Generic {
                status,
                message: message("Unknown API error"),
            },
        }
    }

    /// The HTTP status code this error stands for.
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::RateLimit { .. } => 429,
            ApiError::NotFound { .. } => 404,
            ApiError::Validation { .. } => 400,
            ApiError::Authentication { .. } => 401,
            ApiError::Authorization { .. } => 403,
            ApiError::Generic { status, .. } => *status,
        }
    }

    /// A stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::RateLimit { .. } => "rate_limit_exceeded",
            ApiError::NotFound { .. } => "not_found",
            ApiError::Validation { .. } => "validation_error",
            ApiError::Authentication { .. } => "authentication_error",
            ApiError::Authorization { .. } => "authorization_error",
            ApiError::Generic { .. } => "api_error",
        }
    }

    /// The error category, matching the API's own naming.
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::RateLimit { .. } => "rate_limit_error",
            ApiError::NotFound { .. } => "not_found_error",
            ApiError::Validation { .. } => "validation_error",
            ApiError::Authentication { .. } => "authentication_error",
            ApiError::Authorization { .. } => "authorization_error",
            ApiError::Generic { .. } => "api_error",
        }
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        match self {
            ApiError::RateLimit { message, .. }
            | ApiError::NotFound { message }
            | ApiError::Validation { message, .. }
            | ApiError::Authentication { message }
            | ApiError::Authorization { message }
            | ApiError::Generic { message, .. } => message,
        }
    }

    /// Seconds to wait before retrying, for rate limit errors.
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            ApiError::RateLimit { retry_after, .. } => Some(*retry_after),
            _ => None,
        }
    }
}

/// Pulls `error`, then `message`, out of an error body. Empty strings don't count.
fn extract_message(body: &Value) -> Option<String> {
    ["error", "message"].iter().find_map(|key| {
        body.get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

/// The main error type for this crate.
///
/// # Examples
///
/// ```no_run
/// use togglr::{ApiError, Client, Config, Error};
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::new(Config::from_env(None, None)?)?;
///
/// match client.me().get(false).await {
///     Ok(user) => println!("Hello, {}", user.fullname),
///     Err(Error::Api(ApiError::RateLimit { retry_after, .. })) => {
///         eprintln!("Slow down, try again in {retry_after}s");
///     }
///     Err(e) => eprintln!("{e}"),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The API answered with a non-2xx status.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A successful response's body could not be read off the connection.
    ///
    /// Requests that never got a response are reported as
    /// [`ApiError::Generic`] with status 500 instead.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A 2xx response body was not valid JSON.
    #[error("Failed to deserialize response (status {status}): {serde_error}")]
    Deserialization {
        /// The raw response body
        raw_response: String,
        /// The serde error message
        serde_error: String,
        /// The HTTP status code
        status: StatusCode,
    },

    /// A decoded response did not match the shape declared for it.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Invalid configuration, such as a missing API token.
    #[error("{0}")]
    Configuration(String),

    /// An invalid URL was provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The request body could not be serialized.
    #[error("Failed to serialize request: {0}")]
    Serialization(String),
}

impl Error {
    /// Returns the HTTP status code if this error has one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api(api) => Some(api.status_code()),
            Error::Deserialization { status, .. } => Some(status.as_u16()),
            Error::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns the API error, if the server reported one.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Api(api) => Some(api),
            _ => None,
        }
    }

    /// Returns the retry hint in seconds for an exhausted rate limit.
    pub fn retry_after(&self) -> Option<u64> {
        self.api_error()?.retry_after()
    }
}

/// A specialized `Result` type for Toggl API calls.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_not_found_uses_body_error() {
        let err = ApiError::from_status(404, Some(&json!({"error": "Resource not found"})));
        assert_eq!(
            err,
            ApiError::NotFound {
                message: "Resource not found".to_string()
            }
        );
    }

    #[test]
    fn test_not_found_default_message() {
        let err = ApiError::from_status(404, None);
        assert_eq!(err.message(), "Resource not found");
        assert_eq!(err.code(), "not_found");
        assert_eq!(err.error_type(), "not_found_error");
    }

    #[test]
    fn test_bad_request_has_empty_field_list() {
        let err = ApiError::from_status(400, Some(&json!({"error": "Invalid request"})));
        match err {
            ApiError::Validation { errors, message } => {
                assert!(errors.is_empty());
                assert_eq!(message, "Invalid request");
            }
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_auth_statuses() {
        let err = ApiError::from_status(401, Some(&json!({"message": "Invalid API token"})));
        assert!(matches!(err, ApiError::Authentication { .. }));
        assert_eq!(err.message(), "Invalid API token");
        assert_eq!(err.status_code(), 401);

        let err = ApiError::from_status(403, Some(&json!({})));
        assert!(matches!(err, ApiError::Authorization { .. }));
        assert_eq!(err.message(), "Unknown API error");
        assert_eq!(err.code(), "authorization_error");
    }

    #[test]
    fn test_bodyless_client_errors_use_unknown_message() {
        let err = ApiError::from_status(401, None);
        assert_eq!(
            err,
            ApiError::Authentication {
                message: "Unknown API error".to_string()
            }
        );

        let err = ApiError::from_status(400, Some(&json!({"error": ""})));
        assert_eq!(err.message(), "Unknown API error");
        assert_eq!(err.error_type(), "validation_error");

        let err = ApiError::from_status(404, None);
        assert_eq!(err.message(), "Resource not found");
    }

    #[test]
    fn test_generic_default_message() {
        let err = ApiError::from_status(500, None);
        assert_eq!(
            err,
            ApiError::Generic {
                status: 500,
                message: "Unknown API error".to_string()
            }
        );
        assert_eq!(err.code(), "api_error");
    }

    #[test]
    fn test_error_field_wins_over_message() {
        let body = json!({"error": "first", "message": "second"});
        assert_eq!(ApiError::from_status(502, Some(&body)).message(), "first");

        let body = json!({"error": "", "message": "second"});
        assert_eq!(ApiError::from_status(502, Some(&body)).message(), "second");
    }

    #[test]
    fn test_non_object_body_falls_back_to_default() {
        let body = Value::String("<html>Bad Gateway</html>".to_string());
        assert_eq!(
            ApiError::from_status(502, Some(&body)).message(),
            "Unknown API error"
        );
    }

    #[test]
    fn test_rate_limit_accessors() {
        let err = Error::from(ApiError::rate_limit(7));
        assert_eq!(err.status(), Some(429));
        assert_eq!(err.retry_after(), Some(7));
        assert_eq!(err.to_string(), "Rate limit exceeded");
        assert_eq!(err.api_error().map(ApiError::code), Some("rate_limit_exceeded"));
    }
}
