//! Pagination types
//!
//! Cursor, loop progress, the loop's state enum and its final outcome.

use crate::error::Error;
use crate::http::ExecResponse;
use crate::ratelimit::{AbortReason, Delay};
use crate::types::exit_code;

/// Opaque pagination token; `"0"` means there are no more pages
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cursor(String);

impl Cursor {
    /// The terminal sentinel
    pub const TERMINAL: &'static str = "0";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The cursor that ends pagination
    pub fn terminal() -> Self {
        Self(Self::TERMINAL.to_string())
    }

    pub fn is_terminal(&self) -> bool {
        self.0 == Self::TERMINAL
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Cursor {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Cursor {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Where the loop is in the cursor chain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Progress {
    /// Cursor for the next request; `None` on a fresh start
    pub cursor: Option<Cursor>,
    /// Pages emitted so far
    pub pages: u64,
}

impl Progress {
    /// Start at `cursor` with no pages emitted
    pub fn new(cursor: Option<Cursor>) -> Self {
        Self { cursor, pages: 0 }
    }
}

/// Why a run finished normally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The terminal cursor was reached
    LastPage,
    /// The configured page maximum was reached
    PageLimit,
    /// A non-rate-limit API error was passed through
    ApiError,
}

/// What the loop should do next at a decision point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Fetch now
    Proceed,
    /// Wait, refill, then continue
    Wait(Delay),
    /// Stop normally
    Finish,
    /// Stop on a policy abort
    Abort(AbortReason),
}

/// States of the pagination loop
#[derive(Debug)]
pub enum LoopState {
    Start,
    CheckLimit,
    Fetch,
    Classify(ExecResponse),
    EmitAndAdvance { page: String, next_cursor: Cursor },
    RateLimitedRetry,
    Done(Completion),
    Aborted(AbortReason),
    Failed(Error),
}

impl LoopState {
    /// True for `Done`, `Aborted` and `Failed`
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            LoopState::Done(_) | LoopState::Aborted(_) | LoopState::Failed(_)
        )
    }
}

/// How a run ended, short of an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Completed {
        completion: Completion,
        pages: u64,
        cursor: Option<Cursor>,
    },
    Aborted {
        reason: AbortReason,
        pages: u64,
        /// Cursor of the page that was not fetched, for resuming
        cursor: Option<Cursor>,
    },
}

impl Outcome {
    /// Process exit code for this outcome
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Completed { .. } => exit_code::SUCCESS,
            Outcome::Aborted { reason, .. } => reason.exit_code(),
        }
    }

    /// Pages emitted during the run
    pub fn pages(&self) -> u64 {
        match self {
            Outcome::Completed { pages, .. } | Outcome::Aborted { pages, .. } => *pages,
        }
    }

    /// Last cursor the loop held
    pub fn cursor(&self) -> Option<&Cursor> {
        match self {
            Outcome::Completed { cursor, .. } | Outcome::Aborted { cursor, .. } => cursor.as_ref(),
        }
    }
}
