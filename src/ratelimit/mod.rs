//! Rate-limit window tracking
//!
//! Everything the pagination loop needs to honor a server-imposed rate-limit
//! window:
//!
//! - `RateLimitState` - snapshot of `{remaining, limit, reset}` for the active window
//! - `RateLimitHeaders` - typed view of the `x-rate-limit-*` response headers
//! - `compute_delay` - bounded wait computation with abort policies
//! - `StateStore` - persistence of the snapshot across invocations

mod headers;
mod scheduler;
mod state;
mod store;

pub use headers::{RateLimitHeaders, LIMIT_HEADER, REMAINING_HEADER, RESET_HEADER};
pub use scheduler::{compute_delay, AbortReason, Delay, DelayPolicy, DelayTrigger};
pub use state::{RateLimitState, RefillPolicy};
pub use store::{FileStateStore, MemoryStateStore, StateStore};

#[cfg(test)]
mod tests;
