//! Run configuration
//!
//! `FetchConfig` is built once, validated, and never mutated. It owns
//! everything the loop needs to build requests and make waiting decisions.

use crate::classify::ClassifierConfig;
use crate::error::{Error, Result};
use crate::http::ExecRequest;
use crate::pagination::Cursor;
use crate::ratelimit::{DelayPolicy, RefillPolicy};
use crate::types::Method;
use std::time::Duration;
use url::{form_urlencoded, Url};

/// Default API root
pub const DEFAULT_BASE_URL: &str = "https://api.twitter.com/1.1";

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default request parameter carrying the cursor
pub const DEFAULT_CURSOR_PARAM: &str = "cursor";

/// Immutable parameters of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Full URL of the resource (base URL joined with the resource path)
    pub endpoint: Url,
    /// Resource path without its leading slash
    pub resource: String,
    pub method: Method,
    /// Extra request parameters, in order
    pub params: Vec<(String, String)>,
    /// Cursor to resume at; `None` for a fresh start
    pub start_cursor: Option<Cursor>,
    /// Maximum pages to emit; `None` for unbounded
    pub max_pages: Option<u64>,
    pub timeout: Duration,
    pub delay: DelayPolicy,
    /// Refill behaviour after waiting out an exhausted window
    pub refill: RefillPolicy,
    pub cursor_param: String,
    pub classifier: ClassifierConfig,
}

impl FetchConfig {
    /// Create a new config builder
    pub fn builder(resource: impl Into<String>) -> FetchConfigBuilder {
        FetchConfigBuilder::new(resource)
    }

    /// Build the request for the page at `cursor`.
    ///
    /// GET sends parameters in the query string; POST sends them as a
    /// form-encoded body. The cursor parameter is appended last, only when a
    /// cursor is present.
    pub fn build_request(&self, cursor: Option<&Cursor>) -> Result<ExecRequest> {
        let mut pairs: Vec<(&str, &str)> = self
            .params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        if let Some(cursor) = cursor {
            pairs.push((self.cursor_param.as_str(), cursor.as_str()));
        }

        let mut url = self.endpoint.clone();
        let body = match self.method {
            Method::GET => {
                if !pairs.is_empty() {
                    url.query_pairs_mut().extend_pairs(pairs);
                }
                None
            }
            Method::POST => Some(
                form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(pairs)
                    .finish(),
            ),
        };

        Ok(ExecRequest {
            method: self.method,
            url,
            body,
            timeout: self.timeout,
        })
    }
}

/// Parse a `key=value` request parameter
pub fn parse_param(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(Error::invalid_value(
            "params",
            format!("expected key=value, got '{raw}'"),
        )),
    }
}

/// Builder for [`FetchConfig`]
#[derive(Debug, Clone)]
pub struct FetchConfigBuilder {
    base_url: String,
    resource: String,
    method: Method,
    params: Vec<(String, String)>,
    start_cursor: Option<String>,
    max_pages: Option<u64>,
    timeout_secs: u64,
    delay: DelayPolicy,
    refill: RefillPolicy,
    cursor_param: String,
    classifier: ClassifierConfig,
}

impl FetchConfigBuilder {
    fn new(resource: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            resource: resource.into(),
            method: Method::GET,
            params: Vec::new(),
            start_cursor: None,
            max_pages: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            delay: DelayPolicy::default(),
            refill: RefillPolicy::default(),
            cursor_param: DEFAULT_CURSOR_PARAM.to_string(),
            classifier: ClassifierConfig::default(),
        }
    }

    /// Set the API root
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request method
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Add a request parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Add several request parameters
    pub fn params(mut self, params: impl IntoIterator<Item = (String, String)>) -> Self {
        self.params.extend(params);
        self
    }

    /// Resume at a cursor
    pub fn start_cursor(mut self, cursor: Option<String>) -> Self {
        self.start_cursor = cursor;
        self
    }

    /// Limit the number of pages
    pub fn max_pages(mut self, max: Option<u64>) -> Self {
        self.max_pages = max;
        self
    }

    /// Set the per-request timeout
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the delay bounds and abort switches
    pub fn delay(mut self, delay: DelayPolicy) -> Self {
        self.delay = delay;
        self
    }

    /// Set the refill behaviour after an exhausted-window wait
    pub fn refill(mut self, refill: RefillPolicy) -> Self {
        self.refill = refill;
        self
    }

    /// Set the request parameter carrying the cursor
    pub fn cursor_param(mut self, name: impl Into<String>) -> Self {
        self.cursor_param = name.into();
        self
    }

    /// Set the response field holding the next cursor
    pub fn cursor_field(mut self, name: impl Into<String>) -> Self {
        self.classifier.cursor_field = name.into();
        self
    }

    /// Set the error code meaning "rate limit exceeded"
    pub fn rate_limit_code(mut self, code: i64) -> Self {
        self.classifier.rate_limit_code = code;
        self
    }

    /// Validate and build the config
    pub fn build(self) -> Result<FetchConfig> {
        let resource = self.resource.trim_start_matches('/').to_string();
        if resource.is_empty() {
            return Err(Error::invalid_value("resource", "must not be empty"));
        }
        if self.timeout_secs == 0 {
            return Err(Error::invalid_value("timeout", "must be at least 1 second"));
        }
        if self.delay.fallback_secs == 0 {
            return Err(Error::invalid_value(
                "delay_fallback",
                "must be at least 1 second",
            ));
        }
        if self.delay.limit_secs == 0 {
            return Err(Error::invalid_value(
                "delay_limit",
                "must be at least 1 second",
            ));
        }
        if self.cursor_param.is_empty() {
            return Err(Error::invalid_value("cursor_param", "must not be empty"));
        }
        if self.classifier.cursor_field.is_empty() {
            return Err(Error::invalid_value("cursor_field", "must not be empty"));
        }
        if self.start_cursor.as_deref() == Some("") {
            return Err(Error::invalid_value("cursor", "must not be empty"));
        }

        let base = self.base_url.trim_end_matches('/');
        let endpoint = Url::parse(&format!("{base}/{resource}"))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(Error::invalid_value(
                "base_url",
                format!("unsupported scheme '{}'", endpoint.scheme()),
            ));
        }

        Ok(FetchConfig {
            endpoint,
            resource,
            method: self.method,
            params: self.params,
            start_cursor: self.start_cursor.map(Cursor::new),
            max_pages: self.max_pages,
            timeout: Duration::from_secs(self.timeout_secs),
            delay: self.delay,
            refill: self.refill,
            cursor_param: self.cursor_param,
            classifier: self.classifier,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builder_defaults() {
        let config = FetchConfig::builder("/followers/ids.json").build().unwrap();

        assert_eq!(config.resource, "followers/ids.json");
        assert_eq!(
            config.endpoint.as_str(),
            "https://api.twitter.com/1.1/followers/ids.json"
        );
        assert_eq!(config.method, Method::GET);
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.delay, DelayPolicy::default());
        assert_eq!(config.refill, RefillPolicy::Limit);
        assert_eq!(config.cursor_param, "cursor");
        assert_eq!(config.classifier.cursor_field, "next_cursor_str");
        assert_eq!(config.classifier.rate_limit_code, 88);
        assert!(config.start_cursor.is_none());
        assert!(config.max_pages.is_none());
    }

    #[test]
    fn test_builder_validation() {
        let err = FetchConfig::builder("/").build().unwrap_err();
        assert_eq!(err.exit_code(), 2);

        let err = FetchConfig::builder("users")
            .timeout_secs(0)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("timeout"));

        let err = FetchConfig::builder("users")
            .delay(DelayPolicy {
                limit_secs: 0,
                ..DelayPolicy::default()
            })
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("delay_limit"));

        let err = FetchConfig::builder("users")
            .base_url("not a url")
            .build()
            .unwrap_err();
        assert_eq!(err.exit_code(), 2);

        let err = FetchConfig::builder("users")
            .base_url("ftp://example.com")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn test_parse_param() {
        assert_eq!(
            parse_param("screen_name=rustlang").unwrap(),
            ("screen_name".to_string(), "rustlang".to_string())
        );
        assert_eq!(
            parse_param("q=a=b").unwrap(),
            ("q".to_string(), "a=b".to_string())
        );
        assert_eq!(
            parse_param("empty=").unwrap(),
            ("empty".to_string(), String::new())
        );
        assert_eq!(parse_param("novalue").unwrap_err().exit_code(), 2);
        assert_eq!(parse_param("=x").unwrap_err().exit_code(), 2);
    }

    #[test]
    fn test_get_request_without_cursor() {
        let config = FetchConfig::builder("friends/list.json")
            .base_url("https://api.example.com/1.1/")
            .param("screen_name", "rust lang")
            .param("count", "200")
            .build()
            .unwrap();

        let request = config.build_request(None).unwrap();
        assert_eq!(request.method, Method::GET);
        assert_eq!(
            request.url.as_str(),
            "https://api.example.com/1.1/friends/list.json?screen_name=rust+lang&count=200"
        );
        assert!(request.body.is_none());
        assert_eq!(request.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_get_request_appends_cursor() {
        let config = FetchConfig::builder("followers/ids.json")
            .base_url("https://api.example.com")
            .build()
            .unwrap();

        let request = config.build_request(Some(&Cursor::new("-1"))).unwrap();
        assert_eq!(
            request.url.as_str(),
            "https://api.example.com/followers/ids.json?cursor=-1"
        );

        let bare = config.build_request(None).unwrap();
        assert_eq!(bare.url.as_str(), "https://api.example.com/followers/ids.json");
    }

    #[test]
    fn test_post_request_uses_form_body() {
        let config = FetchConfig::builder("lists/members.json")
            .base_url("https://api.example.com")
            .method(Method::POST)
            .param("list_id", "42")
            .cursor_param("next")
            .build()
            .unwrap();

        let request = config.build_request(Some(&Cursor::new("abc"))).unwrap();
        assert_eq!(request.url.as_str(), "https://api.example.com/lists/members.json");
        assert_eq!(request.body.as_deref(), Some("list_id=42&next=abc"));
    }
}
