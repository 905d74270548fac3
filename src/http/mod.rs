//! Request execution
//!
//! The pagination loop talks to the network only through the
//! [`RequestExecutor`] trait: one request in, status/headers/body out, no
//! internal retries.
//!
//! # Features
//!
//! - **Structured headers**: case-normalized `ResponseHeaders` with typed accessors
//! - **Credentials**: bearer token, API key, basic auth or raw headers from a file
//! - **reqwest executor**: `HttpExecutor`, GET with query or POST with form body

mod client;
mod credentials;
mod types;

pub use client::HttpExecutor;
pub use credentials::Credentials;
pub use types::{ExecRequest, ExecResponse, RequestExecutor, ResponseHeaders};
