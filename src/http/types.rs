//! Request/response values exchanged with the executor

use crate::error::Result;
use crate::types::Method;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Response headers with lowercase names.
///
/// Built once per response; header names compare case-insensitively by
/// normalizing on insert and lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders {
    entries: BTreeMap<String, String>,
}

impl ResponseHeaders {
    /// Create an empty header map
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy the headers of a reqwest response; non-UTF-8 values are skipped
    pub fn from_header_map(headers: &HeaderMap) -> Self {
        headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect()
    }

    /// Insert a header, replacing any previous value
    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.entries
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
    }

    /// Raw header value
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Header value parsed as `T`; `None` when missing or unparseable
    pub fn parse<T: FromStr>(&self, name: &str) -> Option<T> {
        self.get(name).and_then(|value| value.trim().parse().ok())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for ResponseHeaders {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

/// One request handed to the executor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecRequest {
    pub method: Method,
    /// Full URL including any query parameters
    pub url: Url,
    /// Form-encoded body (POST only)
    pub body: Option<String>,
    pub timeout: Duration,
}

/// What came back from a request that reached the server.
///
/// Returned for every HTTP status; interpreting the body is the caller's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecResponse {
    pub status: u16,
    pub headers: ResponseHeaders,
    pub body: String,
}

impl ExecResponse {
    /// Create a 200 response with the given body
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            headers: ResponseHeaders::new(),
            body: body.into(),
        }
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set the status code
    #[must_use]
    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }
}

/// Executes a single request.
///
/// `Ok` means the transport succeeded (any HTTP status); `Err` means no
/// usable response was received. Implementations never retry.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    async fn execute(&self, request: &ExecRequest) -> Result<ExecResponse>;
}
