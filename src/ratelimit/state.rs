//! Rate-limit window snapshot

use super::headers::RateLimitHeaders;
use crate::types::Epoch;

/// What to do with `remaining` after waiting out an exhausted window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum RefillPolicy {
    /// Assume the window renewed: `remaining` becomes the last known `limit`
    #[default]
    Limit,
    /// Leave `remaining` at zero until the next response reports otherwise
    Keep,
}

/// The server's accounting for the active rate-limit window.
///
/// Every field is optional: an absent value means the server did not report
/// it (or it was never loaded), which the loop treats as "proceed without
/// waiting". `remaining` is a snapshot taken from the last response and is
/// only meaningful until the next request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RateLimitState {
    /// Requests left in the window
    pub remaining: Option<u64>,
    /// Window size; never persisted, re-derived from each response
    pub limit: Option<u64>,
    /// When the window resets
    pub reset_epoch: Option<Epoch>,
}

impl RateLimitState {
    /// Create a state with every field known
    pub fn new(remaining: u64, limit: u64, reset_epoch: Epoch) -> Self {
        Self {
            remaining: Some(remaining),
            limit: Some(limit),
            reset_epoch: Some(reset_epoch),
        }
    }

    /// Create a state with nothing known yet
    pub fn unknown() -> Self {
        Self::default()
    }

    /// True when the server reported that no requests are left
    pub fn is_exhausted(&self) -> bool {
        self.remaining == Some(0)
    }

    /// Replace the snapshot with freshly extracted header values
    pub fn apply(&mut self, headers: RateLimitHeaders) {
        self.remaining = headers.remaining;
        self.limit = headers.limit;
        self.reset_epoch = headers.reset_epoch;
    }

    /// Optimistically assume a full window after waiting
    pub fn refill(&mut self) {
        self.remaining = self.limit;
    }

    /// Refill according to `policy`
    pub fn refill_with(&mut self, policy: RefillPolicy) {
        match policy {
            RefillPolicy::Limit => self.refill(),
            RefillPolicy::Keep => {}
        }
    }
}

impl std::fmt::Display for RateLimitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn field<T: std::fmt::Display>(value: Option<T>) -> String {
            value.map_or_else(|| "?".to_string(), |v| v.to_string())
        }
        write!(
            f,
            "remaining={} limit={} reset={}",
            field(self.remaining),
            field(self.limit),
            field(self.reset_epoch)
        )
    }
}
