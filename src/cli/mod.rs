//! CLI module
//!
//! Command-line interface for walking one paginated resource.
//!
//! ```text
//! pagewalk [-f CREDS] [-p] [-c CURSOR] [-m MAX] [-s STATE] [-t SECS]
//!          [-d SECS] [-T SECS] [-x] [-X] [-v] RESOURCE [KEY=VALUE]...
//! ```

mod commands;
mod runner;

pub use commands::{Cli, CREDENTIALS_ENV};
pub use runner::{abort_report, Runner};
