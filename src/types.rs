//! Common types used throughout pagewalk
//!
//! Shared type definitions, type aliases and process-level constants.

use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// Seconds since the Unix epoch
pub type Epoch = i64;

// ============================================================================
// HTTP Types
// ============================================================================

/// HTTP method used for every page request of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    GET,
    POST,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => reqwest::Method::GET,
            Method::POST => reqwest::Method::POST,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::GET => f.write_str("GET"),
            Method::POST => f.write_str("POST"),
        }
    }
}

// ============================================================================
// Exit Codes
// ============================================================================

/// Process exit codes
pub mod exit_code {
    /// Normal completion, including pass-through of a non-rate-limit API error
    pub const SUCCESS: i32 = 0;
    /// Request execution failed
    pub const FAILURE: i32 = 1;
    /// Invalid invocation
    pub const USAGE: i32 = 2;
    /// Aborted on an exhausted rate-limit window
    pub const WINDOW_EXHAUSTED: i32 = 3;
    /// Aborted because the required delay exceeded the configured maximum
    pub const DELAY_TOO_LONG: i32 = 4;
}
