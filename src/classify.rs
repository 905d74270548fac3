//! Response classification
//!
//! Decides whether a response body is a page, the server's rate-limit error,
//! or some other API error that should be passed through untouched.

use crate::pagination::Cursor;
use crate::types::JsonValue;
use tracing::debug;

/// What the classifier looks for in a response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierConfig {
    /// Top-level field holding the next cursor
    pub cursor_field: String,
    /// Error code meaning "rate limit exceeded"
    pub rate_limit_code: i64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            cursor_field: "next_cursor_str".to_string(),
            rate_limit_code: 88,
        }
    }
}

/// Result of classifying one response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// A page of data, as one output line, and the cursor for the next one
    Success { page: String, next_cursor: Cursor },
    /// The server's rate-limit error; the body carries no data
    RateLimited,
    /// Any other error payload, as a single line to pass through
    OtherError(String),
}

impl Classification {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited)
    }
}

/// Classify a response body.
///
/// An `errors` list whose first entry carries the rate-limit code is
/// `RateLimited`. Any other `errors` list, a top-level `error` field, or a
/// body that is not JSON at all is `OtherError`. Everything else is a page;
/// its next cursor defaults to the terminal `"0"` when the field is absent.
///
/// Pages and errors keep the body text as received, see [`single_line`].
pub fn classify(body: &str, config: &ClassifierConfig) -> Classification {
    let value: JsonValue = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            debug!("Response body is not JSON: {e}");
            return Classification::OtherError(body.trim().to_string());
        }
    };

    if let Some(errors) = value.get("errors").and_then(JsonValue::as_array) {
        if let Some(first) = errors.first() {
            let code = first.get("code").and_then(JsonValue::as_i64);
            if code == Some(config.rate_limit_code) {
                return Classification::RateLimited;
            }
            return Classification::OtherError(single_line(body, &value));
        }
    }

    if value.get("error").is_some() {
        return Classification::OtherError(single_line(body, &value));
    }

    Classification::Success {
        page: single_line(body, &value),
        next_cursor: extract_cursor(&value, &config.cursor_field),
    }
}

/// The body as one output line.
///
/// A body that already fits on one line is only trimmed. A pretty-printed
/// body is compacted; key order and number text survive the round trip.
fn single_line(body: &str, value: &JsonValue) -> String {
    let trimmed = body.trim();
    if trimmed.contains(['\n', '\r']) {
        value.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Read the cursor field as a string or integer
fn extract_cursor(value: &JsonValue, field: &str) -> Cursor {
    match value.get(field) {
        Some(JsonValue::String(s)) => Cursor::new(s.as_str()),
        Some(JsonValue::Number(n)) => Cursor::new(n.to_string()),
        _ => Cursor::terminal(),
    }
}
