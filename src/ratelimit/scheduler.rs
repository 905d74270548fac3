//! Delay scheduling
//!
//! Turns a target resume time into a bounded wait, or decides that the run
//! should stop instead of waiting.

use crate::types::{exit_code, Epoch};
use std::time::Duration;

/// Bounds and abort switches for waiting on a rate-limit window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayPolicy {
    /// Wait used when the reset time is unknown or already in the past
    pub fallback_secs: u64,
    /// Longest wait allowed before clamping (or aborting)
    pub limit_secs: u64,
    /// Abort instead of waiting when the window is exhausted
    pub exit_on_limit: bool,
    /// Abort instead of clamping a wait longer than `limit_secs`
    pub exit_on_delay: bool,
}

impl Default for DelayPolicy {
    fn default() -> Self {
        Self {
            fallback_secs: 30,
            limit_secs: 900,
            exit_on_limit: false,
            exit_on_delay: false,
        }
    }
}

/// Why a delay is being computed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayTrigger {
    /// The last known `remaining` count is zero
    Exhausted,
    /// The server answered with its rate-limit error payload
    RateLimited,
}

/// Why the run stopped instead of waiting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// The window was exhausted and aborting on exhaustion is enabled
    WindowExhausted,
    /// The required wait exceeded the maximum and aborting on it is enabled
    DelayTooLong { required_secs: u64, limit_secs: u64 },
}

impl AbortReason {
    /// Process exit code for this abort
    pub fn exit_code(&self) -> i32 {
        match self {
            AbortReason::WindowExhausted => exit_code::WINDOW_EXHAUSTED,
            AbortReason::DelayTooLong { .. } => exit_code::DELAY_TOO_LONG,
        }
    }
}

impl std::fmt::Display for AbortReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AbortReason::WindowExhausted => f.write_str("rate-limit window exhausted"),
            AbortReason::DelayTooLong {
                required_secs,
                limit_secs,
            } => write!(
                f,
                "required delay of {required_secs}s exceeds the {limit_secs}s maximum"
            ),
        }
    }
}

/// A concrete wait
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Delay {
    pub seconds: u64,
}

impl Delay {
    pub fn from_secs(seconds: u64) -> Self {
        Self { seconds }
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(self.seconds)
    }
}

/// Compute how long to wait before the next request.
///
/// The wait runs until one second past `target` (or `fallback_secs` past
/// `now` when the target is unknown). Waits that would be zero or negative
/// fall back to `fallback_secs`; waits longer than `limit_secs` are clamped,
/// or abort when `exit_on_delay` is set. With `exit_on_limit`, an exhausted
/// window aborts before anything is computed.
pub fn compute_delay(
    target: Option<Epoch>,
    now: Epoch,
    trigger: DelayTrigger,
    policy: &DelayPolicy,
) -> Result<Delay, AbortReason> {
    if policy.exit_on_limit && trigger == DelayTrigger::Exhausted {
        return Err(AbortReason::WindowExhausted);
    }

    let fallback = Epoch::try_from(policy.fallback_secs).unwrap_or(Epoch::MAX);
    let target = target.unwrap_or_else(|| now.saturating_add(fallback));
    let raw = target.saturating_sub(now).saturating_add(1);

    let seconds = if raw < 1 {
        policy.fallback_secs
    } else {
        raw as u64
    };

    if seconds > policy.limit_secs {
        if policy.exit_on_delay {
            return Err(AbortReason::DelayTooLong {
                required_secs: seconds,
                limit_secs: policy.limit_secs,
            });
        }
        return Ok(Delay::from_secs(policy.limit_secs));
    }

    Ok(Delay::from_secs(seconds))
}
