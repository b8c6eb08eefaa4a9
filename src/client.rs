//! The Toggl API client.
//!
//! [`Client::execute`] is the pipeline every call goes through: one
//! [`Transport`] attempt, a bounded wait-and-retry loop for rate limiting, and
//! translation of any other failure into an [`ApiError`].

use crate::{
    config::Config,
    resources::{MeEndpoints, ProjectEndpoints, Resource, TimeEntryEndpoints, WorkspaceEndpoints},
    retry::RetryPolicy,
    schema::{self, Shape},
    transport::Transport,
    ApiError, RequestDescriptor, Response, Result,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

/// A client for the Toggl Track API.
///
/// Cloning is cheap and clones share configuration and connections. Each
/// call keeps its own retry state, so concurrent calls never wait on each
/// other's rate limit backoff.
///
/// # Examples
///
/// ```no_run
/// use togglr::{Client, Config};
///
/// # async fn example() -> Result<(), togglr::Error> {
/// let client = Client::new(Config::from_env(None, None)?)?;
///
/// let me = client.me().get(false).await?;
/// println!("Logged in as {}", me.email);
///
/// if let Some(entry) = client.time_entries().current().await? {
///     println!("Running: {:?}", entry.description);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    transport: Transport,
    retry_policy: RetryPolicy,
    config: Config,
}

impl Client {
    /// Creates a client with the default retry policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client can't be built from `config`.
    pub fn new(config: Config) -> Result<Self> {
        Self::builder(config).build()
    }

    /// Creates a builder for a client using `config`.
    pub fn builder(config: Config) -> ClientBuilder {
        ClientBuilder::new(config)
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Sends `request`, waiting out rate limits, and returns the decoded body.
    ///
    /// A 429 is retried after the server's `Retry-After` (one second if
    /// absent) up to the policy's limit; the same descriptor is re-sent each
    /// time. Every other non-2xx status ends the call with the matching
    /// [`ApiError`]. A request that got no response at all is reported as
    /// [`ApiError::Generic`] with status 500; the underlying error is only
    /// logged.
    ///
    /// Write requests are re-sent as-is under rate limiting; nothing
    /// deduplicates them.
    pub async fn execute(&self, request: RequestDescriptor) -> Result<Response<Value>> {
        let start_time = Instant::now();
        let policy = &self.inner.retry_policy;
        let mut attempt = 0;

        loop {
            let failure = match self.inner.transport.attempt(&request).await? {
                Ok(raw) => {
                    let latency = start_time.elapsed();
                    tracing::info!(
                        status = raw.status.as_u16(),
                        latency_ms = latency.as_millis(),
                        attempts = attempt + 1,
                        "Received HTTP response"
                    );
                    return Ok(Response::new(
                        raw.body,
                        raw.status,
                        raw.headers,
                        latency,
                        attempt + 1,
                    ));
                }
                Err(failure) => failure,
            };

            // No response at all: the sentinel status goes through the same
            // translation as any server error.
            if let Some(source) = &failure.source {
                tracing::warn!(
                    error = %source,
                    status = failure.status,
                    method = %request.method,
                    path = %request.path,
                    "Request failed without a response"
                );
                return Err(ApiError::from_status(failure.status, None).into());
            }

            tracing::warn!(
                status = failure.status,
                attempt = attempt,
                method = %request.method,
                path = %request.path,
                "Request failed"
            );

            if failure.status != 429 {
                return Err(ApiError::from_status(failure.status, failure.body.as_ref()).into());
            }

            let retry_after = policy.retry_after(&failure.headers);
            match policy.delay_for(attempt, retry_after) {
                Some(delay) => {
                    tracing::info!(
                        rate_limit_delay_ms = delay.as_millis(),
                        attempt = attempt,
                        "Rate limited - waiting before retry"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                None => return Err(ApiError::rate_limit(retry_after).into()),
            }
        }
    }

    /// Sends `request` and validates the body against `shape`.
    ///
    /// # Errors
    ///
    /// Everything [`Client::execute`] can return, plus
    /// [`Error::Schema`](crate::Error::Schema) when the body doesn't match. Validation failures are never retried.
    pub async fn fetch_as<T>(&self, request: RequestDescriptor, shape: &Shape) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self
            .execute(request)
            .await?
            .try_map(|data| schema::validate(shape, data))?;
        Ok(response.data)
    }

    /// Sends `request` and validates the body as a `T`.
    pub async fn fetch<T: Resource>(&self, request: RequestDescriptor) -> Result<T> {
        self.fetch_as(request, &T::shape()).await
    }

    /// Sends `request` and validates the body as a list of `T`.
    pub async fn fetch_list<T: Resource>(&self, request: RequestDescriptor) -> Result<Vec<T>> {
        self.fetch_as(request, &Shape::array(T::shape())).await
    }

    /// GET `path` and return the raw body.
    pub async fn get(&self, path: impl Into<String>) -> Result<Value> {
        Ok(self.execute(RequestDescriptor::get(path)).await?.data)
    }

    /// POST `body` to `path` and return the raw body.
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: impl Into<String>,
        body: &B,
    ) -> Result<Value> {
        let request = RequestDescriptor::post(path).with_body(body)?;
        Ok(self.execute(request).await?.data)
    }

    /// PUT `body` to `path` and return the raw body.
    pub async fn put<B: Serialize + ?Sized>(
        &self,
        path: impl Into<String>,
        body: &B,
    ) -> Result<Value> {
        let request = RequestDescriptor::put(path).with_body(body)?;
        Ok(self.execute(request).await?.data)
    }

    /// PATCH `path` with an optional body and return the raw body.
    pub async fn patch<B: Serialize + ?Sized>(
        &self,
        path: impl Into<String>,
        body: Option<&B>,
    ) -> Result<Value> {
        let mut request = RequestDescriptor::patch(path);
        if let Some(body) = body {
            request = request.with_body(body)?;
        }
        Ok(self.execute(request).await?.data)
    }

    /// DELETE `path` and return the raw body.
    pub async fn delete(&self, path: impl Into<String>) -> Result<Value> {
        Ok(self.execute(RequestDescriptor::delete(path)).await?.data)
    }

    /// Endpoints for the authenticated user.
    pub fn me(&self) -> MeEndpoints<'_> {
        MeEndpoints::new(self)
    }

    /// Workspace endpoints.
    pub fn workspaces(&self) -> WorkspaceEndpoints<'_> {
        WorkspaceEndpoints::new(self)
    }

    /// Time entry endpoints.
    pub fn time_entries(&self) -> TimeEntryEndpoints<'_> {
        TimeEntryEndpoints::new(self)
    }

    /// Project endpoints.
    pub fn projects(&self) -> ProjectEndpoints<'_> {
        ProjectEndpoints::new(self)
    }
}

/// Builder for configuring and creating a [`Client`].
///
/// # Examples
///
/// ```
/// use togglr::{ApiToken, Client, Config, RetryPolicy};
///
/// # fn example() -> Result<(), togglr::Error> {
/// let client = Client::builder(Config::new(ApiToken::new("my-token")))
///     .retry_policy(RetryPolicy::none())
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    config: Config,
    retry_policy: RetryPolicy,
}

impl ClientBuilder {
    /// Creates a builder with the default retry policy.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            retry_policy: RetryPolicy::default(),
        }
    }

    /// Sets how rate limited calls are retried.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Builds the configured `Client`.
    ///
    /// # Errors
    ///
    /// Returns an error if the token can't be used in a header or the HTTP
    /// client can't be built.
    pub fn build(self) -> Result<Client> {
        let transport = Transport::new(&self.config)?;

        Ok(Client {
            inner: Arc::new(ClientInner {
                transport,
                retry_policy: self.retry_policy,
                config: self.config,
            }),
        })
    }
}
