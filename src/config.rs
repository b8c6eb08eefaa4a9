//! Client configuration and credentials.
//!
//! A [`Config`] is resolved once, up front, and handed to the client. Nothing
//! deeper in the crate reads the process environment.

use crate::{Error, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use http::HeaderValue;
use std::fmt;
use std::time::Duration;
use url::Url;

/// The versioned API root every request path is relative to.
pub const BASE_URL: &str = "https://api.track.toggl.com/api/v9";

/// Environment variable holding the API token.
pub const API_TOKEN_VAR: &str = "TOGGL_API_TOKEN";

/// Environment variable holding the default workspace id.
pub const WORKSPACE_ID_VAR: &str = "TOGGL_WORKSPACE_ID";

/// Set to `true` to dump failed request details through `tracing`.
pub const DEBUG_API_ERRORS_VAR: &str = "DEBUG_API_ERRORS";

/// Per-attempt request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A Toggl API token.
///
/// The token is never printed; `Debug` shows a placeholder.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    /// Wraps a raw token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Builds the `Authorization` header value, `Basic base64(<token>:api_token)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the token contains bytes that can't appear in a header.
    pub fn basic_auth_header(&self) -> Result<HeaderValue> {
        let encoded = STANDARD.encode(format!("{}:api_token", self.0));
        let mut value = HeaderValue::try_from(format!("Basic {encoded}"))
            .map_err(|e| Error::Configuration(format!("Invalid API token: {e}")))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(<redacted>)")
    }
}

/// Everything a [`Client`](crate::Client) needs, resolved ahead of time.
///
/// # Examples
///
/// ```
/// use togglr::{ApiToken, Config};
/// use std::time::Duration;
///
/// let config = Config::new(ApiToken::new("my-token"))
///     .with_timeout(Duration::from_secs(10))
///     .with_debug_api_errors(true);
///
/// assert_eq!(config.base_url().as_str(), "https://api.track.toggl.com/api/v9");
/// assert!(config.debug_api_errors());
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    api_token: ApiToken,
    base_url: Url,
    workspace_id: Option<String>,
    timeout: Duration,
    debug_api_errors: bool,
}

impl Config {
    /// Creates a configuration for the public API with default settings.
    pub fn new(api_token: ApiToken) -> Self {
        Self {
            api_token,
            base_url: default_base_url(),
            workspace_id: None,
            timeout: DEFAULT_TIMEOUT,
            debug_api_errors: false,
        }
    }

    /// Resolves configuration from overrides, then the environment.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when no token is available.
    pub fn from_env(token_override: Option<&str>, workspace_override: Option<&str>) -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!(error = %e, "Failed to load .env file");
            }
        }
        Self::from_lookup(token_override, workspace_override, |key| {
            std::env::var(key).ok()
        })
    }

    /// Resolves configuration from overrides, then `lookup`.
    ///
    /// Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when no token is available.
    pub fn from_lookup<F>(
        token_override: Option<&str>,
        workspace_override: Option<&str>,
        lookup: F,
    ) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());

        let token = non_empty(token_override.map(str::to_string))
            .or_else(|| non_empty(lookup(API_TOKEN_VAR)))
            .ok_or_else(|| {
                Error::Configuration(format!(
                    "{API_TOKEN_VAR} environment variable is not set. \
                     Please set it in your .env file, export it, or use --api-token option."
                ))
            })?;

        let workspace_id = non_empty(workspace_override.map(str::to_string))
            .or_else(|| non_empty(lookup(WORKSPACE_ID_VAR)));

        let debug_api_errors = lookup(DEBUG_API_ERRORS_VAR).as_deref() == Some("true");

        Ok(Self {
            workspace_id,
            debug_api_errors,
            ..Self::new(ApiToken::new(token))
        })
    }

    /// Points the client at a different API root.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn with_base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        self.base_url = Url::parse(url.as_ref())?;
        Ok(self)
    }

    /// Sets the per-attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the default workspace id.
    pub fn with_workspace_id(mut self, workspace_id: impl Into<String>) -> Self {
        self.workspace_id = Some(workspace_id.into());
        self
    }

    /// Enables or disables the failed-request dump.
    pub fn with_debug_api_errors(mut self, enabled: bool) -> Self {
        self.debug_api_errors = enabled;
        self
    }

    /// The API token.
    pub fn api_token(&self) -> &ApiToken {
        &self.api_token
    }

    /// The API root.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The default workspace id, if one was configured.
    pub fn workspace_id(&self) -> Option<&str> {
        self.workspace_id.as_deref()
    }

    /// The per-attempt timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether failed requests are dumped through `tracing`.
    pub fn debug_api_errors(&self) -> bool {
        self.debug_api_errors
    }
}

fn default_base_url() -> Url {
    Url::parse(BASE_URL).expect("BASE_URL is a valid URL")
}
