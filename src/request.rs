//! Request descriptors.

use crate::{Error, Result};
use http::Method;
use serde::Serialize;
use serde_json::Value;

/// Everything needed to issue one API call.
///
/// A descriptor is cheap to clone; a rate-limited call re-sends the very same
/// descriptor on every attempt.
///
/// # Examples
///
/// ```
/// use togglr::RequestDescriptor;
/// use http::Method;
///
/// let request = RequestDescriptor::get("/me/time_entries")
///     .with_query_param("start_date", "2024-01-01")
///     .with_query_param("end_date", "2024-01-31");
///
/// assert_eq!(request.method, Method::GET);
/// assert_eq!(request.query[0].0, "start_date");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    /// The HTTP method.
    pub method: Method,

    /// The request path, relative to the API root.
    pub path: String,

    /// Query parameters, sent in insertion order.
    pub query: Vec<(String, String)>,

    /// The JSON body, if any.
    pub body: Option<Value>,
}

impl RequestDescriptor {
    /// Creates a descriptor with no query and no body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// A GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// A POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// A PUT request.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// A PATCH request.
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// A DELETE request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Appends a query parameter.
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Appends a query parameter when `value` is `Some`.
    pub fn with_optional_query_param<V: ToString>(
        self,
        key: impl Into<String>,
        value: Option<V>,
    ) -> Self {
        match value {
            Some(value) => self.with_query_param(key, value),
            None => self,
        }
    }

    /// Sets the JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if `body` cannot be represented as JSON.
    pub fn with_body<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        let value =
            serde_json::to_value(body).map_err(|e| Error::Serialization(e.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }
}
