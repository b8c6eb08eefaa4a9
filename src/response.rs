//! Response wrapper that keeps the decoded body alongside call details.

use http::{HeaderMap, StatusCode};
use std::time::Duration;

/// A successful API response.
///
/// `data` starts out as the untyped JSON body returned by
/// [`Client::execute`](crate::Client::execute) and becomes a typed value once
/// it has passed validation.
///
/// # Examples
///
/// ```no_run
/// use togglr::{Client, Config, RequestDescriptor};
///
/// # async fn example() -> Result<(), togglr::Error> {
/// let client = Client::new(Config::from_env(None, None)?)?;
///
/// let response = client.execute(RequestDescriptor::get("/me")).await?;
/// println!("Status: {}", response.status);
/// println!("Attempts: {}", response.attempts);
/// println!("Body: {}", response.data);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Response<T> {
    /// The response body.
    pub data: T,

    /// The HTTP status code of the final attempt.
    pub status: StatusCode,

    /// The response headers of the final attempt.
    pub headers: HeaderMap,

    /// Time from the first attempt until the response arrived, including
    /// any rate limit waits.
    pub latency: Duration,

    /// The number of attempts made. `1` unless the call was rate limited.
    pub attempts: usize,
}

impl<T> Response<T> {
    /// Creates a new `Response`.
    pub fn new(
        data: T,
        status: StatusCode,
        headers: HeaderMap,
        latency: Duration,
        attempts: usize,
    ) -> Self {
        Self {
            data,
            status,
            headers,
            latency,
            attempts,
        }
    }

    /// Maps the data with a fallible function, keeping the call details.
    ///
    /// This is how a validated body replaces the raw JSON.
    ///
    /// # Examples
    ///
    /// ```
    /// # use togglr::Response;
    /// # use http::{HeaderMap, StatusCode};
    /// # use std::time::Duration;
    /// let response = Response::new("42", StatusCode::OK, HeaderMap::new(), Duration::ZERO, 1);
    ///
    /// let parsed = response.try_map(|s| s.parse::<u32>()).unwrap();
    /// assert_eq!(parsed.data, 42);
    /// ```
    pub fn try_map<U, E, F>(self, f: F) -> Result<Response<U>, E>
    where
        F: FnOnce(T) -> Result<U, E>,
    {
        Ok(Response {
            data: f(self.data)?,
            status: self.status,
            headers: self.headers,
            latency: self.latency,
            attempts: self.attempts,
        })
    }

    /// Returns `true` if the call had to wait out a rate limit.
    pub fn was_retried(&self) -> bool {
        self.attempts > 1
    }

    /// Returns a header value by name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }
}
