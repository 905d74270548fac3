//! Cursor pagination
//!
//! The orchestrating state machine: for each page it decides whether to wait,
//! how long, when to give up, and whether a response is data, a rate-limit
//! error to retry, or another API error to pass through.
//!
//! # Overview
//!
//! ```text
//! START → CHECK_LIMIT → FETCH → CLASSIFY → EMIT_AND_ADVANCE → CHECK_LIMIT …
//!             │                    │
//!             │                    └→ RATE_LIMITED_RETRY → CHECK_LIMIT
//!             └→ DONE | ABORTED                 FETCH → FAILED
//! ```
//!
//! The decisions taken at `CHECK_LIMIT`, `RATE_LIMITED_RETRY` and
//! `EMIT_AND_ADVANCE` live in [`machine`] as plain functions so they can be
//! tested without a network or a real clock.

mod clock;
mod fetcher;
pub mod machine;
mod types;

pub use clock::{Clock, SystemClock};
pub use fetcher::Fetcher;
pub use machine::{advance, check_limit, on_rate_limited};
pub use types::{Completion, Cursor, Decision, LoopState, Outcome, Progress};
