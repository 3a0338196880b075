//! Boundary port for the vendor HTTP client
//!
//! The core never talks HTTP itself. Callers supply an [`ApiClient`] that
//! already handles authentication, signing, TLS and transport retries; the
//! capability modules only build paths and options and hand them over.
//!
//! # Example
//!
//! ```no_run
//! use sellerlink_core::{ApiClient, HttpMethod, RequestOptions};
//!
//! async fn list_orders(client: &dyn ApiClient) {
//!     let options = RequestOptions::new().query("limit", "50");
//!     let response = client.request(HttpMethod::Get, "/vendor/orders/v1/purchaseOrders", options).await;
//!     if let Ok(response) = response {
//!         println!("status {}", response.status);
//!     }
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use sellerlink_common::error::RawError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// HTTP method of a vendor request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Uppercase method name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query, body and headers of a vendor request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestOptions {
    /// Query parameters in insertion order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub query: Vec<(String, String)>,
    /// JSON request body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
    /// Extra request headers
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

impl RequestOptions {
    /// Empty options
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a query parameter
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Add a parameter only when a value is present
    pub fn query_opt<V: Into<String>>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Add a comma-separated list parameter; an empty list adds nothing
    pub fn query_list<I, V>(self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: AsRef<str>,
    {
        let joined = values.into_iter().map(|v| v.as_ref().to_string()).collect::<Vec<_>>();
        if joined.is_empty() {
            self
        } else {
            self.query(key, joined.join(","))
        }
    }

    /// Set the JSON body
    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Set a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Value of the first query parameter named `key`
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }
}

/// Successful response from the boundary client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Parsed JSON body
    pub data: serde_json::Value,
    /// HTTP status
    pub status: u16,
    /// Response headers
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl ApiResponse {
    /// Response with the given status
    pub fn new(status: u16, data: serde_json::Value) -> Self {
        Self { data, status, headers: BTreeMap::new() }
    }

    /// `200` response
    pub fn ok(data: serde_json::Value) -> Self {
        Self::new(200, data)
    }

    /// Add a response header
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Status is `2xx`
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Deserialize the payload
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.data)
    }
}

/// Caller-supplied "make request" capability
///
/// Implementations return `Err(RawError)` for any failure, including
/// non-success statuses (see [`RawError::from_response`]).
#[async_trait]
pub trait ApiClient: Send + Sync {
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse, RawError>;
}

#[async_trait]
impl<C: ApiClient + ?Sized> ApiClient for Arc<C> {
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse, RawError> {
        (**self).request(method, path, options).await
    }
}
