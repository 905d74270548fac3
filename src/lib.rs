// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::needless_pass_by_value)]

//! # pagewalk
//!
//! Walks a cursor-paginated REST API while respecting the server's
//! rate-limit window.
//!
//! ## Features
//!
//! - **Cursor Pagination**: follows `next_cursor_str`-style cursors until the `"0"` sentinel
//! - **Rate-Limit Aware**: waits out exhausted windows using `x-rate-limit-*` headers
//! - **Retry on Rate-Limit Errors**: recognizes the API's rate-limit payload and retries
//! - **Persistent State**: remembers the window across invocations in a small state file
//! - **Abort Policies**: fail fast with distinct exit codes instead of waiting
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pagewalk::config::FetchConfig;
//! use pagewalk::http::{Credentials, HttpExecutor};
//! use pagewalk::pagination::{Fetcher, SystemClock};
//! use pagewalk::ratelimit::FileStateStore;
//!
//! #[tokio::main]
//! async fn main() -> pagewalk::Result<()> {
//!     let config = FetchConfig::builder("followers/ids.json")
//!         .param("screen_name", "rustlang")
//!         .start_cursor(Some("-1".to_string()))
//!         .build()?;
//!     let executor = HttpExecutor::new(Credentials::from_file("creds.yaml")?)?;
//!     let store = FileStateStore::new("limits.state");
//!
//!     let mut out = std::io::stdout().lock();
//!     let outcome = Fetcher::new(&config, &executor, &store, &SystemClock)
//!         .run(&mut out)
//!         .await?;
//!     std::process::exit(outcome.exit_code());
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                    Fetcher (pagination loop)                  │
//! │  CHECK_LIMIT → FETCH → CLASSIFY → EMIT_AND_ADVANCE / RETRY    │
//! └───────────────────────────────────────────────────────────────┘
//!          │                 │                │
//! ┌────────┴───────┬─────────┴───────┬────────┴────────┐
//! │   ratelimit    │      http       │    classify     │
//! ├────────────────┼─────────────────┼─────────────────┤
//! │ State/Headers  │ RequestExecutor │ Success         │
//! │ compute_delay  │ HttpExecutor    │ RateLimited     │
//! │ StateStore     │ Credentials     │ OtherError      │
//! └────────────────┴─────────────────┴─────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Rate-limit state, header extraction, delay scheduling and persistence
pub mod ratelimit;

/// Request executor seam and its HTTP implementation
pub mod http;

/// Response classification
pub mod classify;

/// Cursor pagination loop
pub mod pagination;

/// Run configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use config::FetchConfig;
pub use pagination::{Fetcher, Outcome};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
