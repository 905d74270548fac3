//! CLI arguments

use crate::config::{DEFAULT_BASE_URL, DEFAULT_CURSOR_PARAM, DEFAULT_TIMEOUT_SECS};
use crate::ratelimit::RefillPolicy;
use clap::Parser;
use std::path::PathBuf;

/// Environment variable naming the default credentials file
pub const CREDENTIALS_ENV: &str = "PAGEWALK_CREDENTIALS";

/// Walk a cursor-paginated REST API, one JSON page per line
#[derive(Parser, Debug)]
#[command(name = "pagewalk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// API resource path (leading slash optional)
    pub resource: String,

    /// Request parameters as key=value
    pub params: Vec<String>,

    /// Credentials file (YAML or JSON)
    #[arg(short = 'f', long = "credentials", env = CREDENTIALS_ENV)]
    pub credentials: Option<PathBuf>,

    /// Use POST instead of GET
    #[arg(short = 'p', long)]
    pub post: bool,

    /// Resume pagination at this cursor
    #[arg(short = 'c', long, allow_hyphen_values = true)]
    pub cursor: Option<String>,

    /// Maximum pages to fetch this run
    #[arg(short = 'm', long = "max-pages")]
    pub max_pages: Option<u64>,

    /// Rate-limit state file
    #[arg(short = 's', long = "state")]
    pub state: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(short = 't', long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Delay in seconds when the reset time is unknown
    #[arg(short = 'd', long = "delay-fallback", default_value_t = 30)]
    pub delay_fallback: u64,

    /// Longest delay in seconds before clamping (or aborting with -X)
    #[arg(short = 'T', long = "delay-limit", default_value_t = 900)]
    pub delay_limit: u64,

    /// Exit with status 3 instead of waiting out an exhausted window
    #[arg(short = 'x', long = "exit-on-limit")]
    pub exit_on_limit: bool,

    /// Exit with status 4 instead of clamping an over-long delay
    #[arg(short = 'X', long = "exit-on-delay")]
    pub exit_on_delay: bool,

    /// Verbose progress logging on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// API root the resource is joined to
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Request parameter carrying the cursor
    #[arg(long, default_value = DEFAULT_CURSOR_PARAM)]
    pub cursor_param: String,

    /// Response field holding the next cursor
    #[arg(long, default_value = "next_cursor_str")]
    pub cursor_field: String,

    /// Error code meaning "rate limit exceeded"
    #[arg(long, default_value_t = 88)]
    pub rate_limit_code: i64,

    /// What to assume about the window after waiting out an exhaustion
    #[arg(long, value_enum, default_value = "limit")]
    pub proactive_refill: RefillPolicy,
}
