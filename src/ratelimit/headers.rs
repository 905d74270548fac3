//! Rate-limit header extraction

use crate::http::ResponseHeaders;
use crate::types::Epoch;

/// Requests left in the current window
pub const REMAINING_HEADER: &str = "x-rate-limit-remaining";
/// Requests permitted per window
pub const LIMIT_HEADER: &str = "x-rate-limit-limit";
/// Unix time at which the window resets
pub const RESET_HEADER: &str = "x-rate-limit-reset";

/// Rate-limit values reported by one response.
///
/// Missing or unparseable headers are `None`; endpoints that are not rate
/// limited produce an all-`None` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RateLimitHeaders {
    pub remaining: Option<u64>,
    pub limit: Option<u64>,
    pub reset_epoch: Option<Epoch>,
}

impl RateLimitHeaders {
    /// Extract the rate-limit values from a response's headers
    pub fn from_headers(headers: &ResponseHeaders) -> Self {
        Self {
            remaining: headers.parse(REMAINING_HEADER),
            limit: headers.parse(LIMIT_HEADER),
            reset_epoch: headers.parse(RESET_HEADER),
        }
    }

    /// True when the response carried none of the headers
    pub fn is_empty(&self) -> bool {
        self.remaining.is_none() && self.limit.is_none() && self.reset_epoch.is_none()
    }
}
