//! Loop decisions
//!
//! Pure functions of the run configuration, progress, rate-limit snapshot
//! and current time. The fetcher performs whatever side effect they ask for.

use super::types::{Completion, Cursor, Decision, LoopState, Progress};
use crate::config::FetchConfig;
use crate::ratelimit::{compute_delay, DelayTrigger, RateLimitState};
use crate::types::Epoch;

/// Decide what happens before the next fetch.
///
/// Finishes once the page maximum is reached. A known-exhausted window asks
/// for a wait until its reset (or aborts under the abort policies); an
/// unknown or non-zero `remaining` proceeds straight away.
pub fn check_limit(
    config: &FetchConfig,
    progress: &Progress,
    limits: &RateLimitState,
    now: Epoch,
) -> Decision {
    if config.max_pages.is_some_and(|max| progress.pages >= max) {
        return Decision::Finish;
    }

    if !limits.is_exhausted() {
        return Decision::Proceed;
    }

    match compute_delay(limits.reset_epoch, now, DelayTrigger::Exhausted, &config.delay) {
        Ok(delay) => Decision::Wait(delay),
        Err(reason) => Decision::Abort(reason),
    }
}

/// Decide how to recover from the server's rate-limit error.
///
/// `limits` holds the values extracted from the rate-limited response.
pub fn on_rate_limited(config: &FetchConfig, limits: &RateLimitState, now: Epoch) -> Decision {
    match compute_delay(
        limits.reset_epoch,
        now,
        DelayTrigger::RateLimited,
        &config.delay,
    ) {
        Ok(delay) => Decision::Wait(delay),
        Err(reason) => Decision::Abort(reason),
    }
}

/// Record an emitted page and pick the next state
pub fn advance(progress: &mut Progress, next_cursor: Cursor) -> LoopState {
    progress.pages += 1;
    let done = next_cursor.is_terminal();
    progress.cursor = Some(next_cursor);

    if done {
        LoopState::Done(Completion::LastPage)
    } else {
        LoopState::CheckLimit
    }
}
