//! CLI runner - builds the run from arguments and executes it

use crate::cli::commands::Cli;
use crate::config::{parse_param, FetchConfig};
use crate::error::Result;
use crate::http::{Credentials, HttpExecutor};
use crate::pagination::{Fetcher, Outcome, SystemClock};
use crate::ratelimit::{DelayPolicy, FileStateStore, MemoryStateStore, StateStore};
use crate::types::Method;
use std::io::Write;
use tracing::debug;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Build the validated run configuration
    pub fn config(&self) -> Result<FetchConfig> {
        let params = self
            .cli
            .params
            .iter()
            .map(|raw| parse_param(raw))
            .collect::<Result<Vec<_>>>()?;

        FetchConfig::builder(self.cli.resource.as_str())
            .base_url(self.cli.base_url.as_str())
            .method(if self.cli.post {
                Method::POST
            } else {
                Method::GET
            })
            .params(params)
            .start_cursor(self.cli.cursor.clone())
            .max_pages(self.cli.max_pages)
            .timeout_secs(self.cli.timeout)
            .delay(DelayPolicy {
                fallback_secs: self.cli.delay_fallback,
                limit_secs: self.cli.delay_limit,
                exit_on_limit: self.cli.exit_on_limit,
                exit_on_delay: self.cli.exit_on_delay,
            })
            .refill(self.cli.proactive_refill)
            .cursor_param(self.cli.cursor_param.as_str())
            .cursor_field(self.cli.cursor_field.as_str())
            .rate_limit_code(self.cli.rate_limit_code)
            .build()
    }

    /// Load the credentials reference, if any
    pub fn credentials(&self) -> Result<Credentials> {
        match &self.cli.credentials {
            Some(path) => Credentials::from_file(path),
            None => Ok(Credentials::None),
        }
    }

    /// Build the state store: file-backed with `-s`, in-memory otherwise
    pub fn store(&self) -> Box<dyn StateStore> {
        match &self.cli.state {
            Some(path) => Box::new(FileStateStore::new(path)),
            None => Box::new(MemoryStateStore::new()),
        }
    }

    /// Run against stdout
    pub async fn run(&self) -> Result<Outcome> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        self.run_with_output(&mut out).await
    }

    /// Run, writing pages to `out`
    pub async fn run_with_output<W: Write>(&self, out: &mut W) -> Result<Outcome> {
        let config = self.config()?;
        let credentials = self.credentials()?;
        debug!("Using {} credentials", credentials.kind());

        let executor = HttpExecutor::new(credentials)?;
        let store = self.store();

        Fetcher::new(&config, &executor, store.as_ref(), &SystemClock)
            .run(out)
            .await
    }
}

/// Message for stderr when a run was aborted by policy
pub fn abort_report(outcome: &Outcome) -> Option<String> {
    match outcome {
        Outcome::Aborted { reason, cursor, .. } => Some(match cursor {
            Some(cursor) => format!("Aborted: {reason}; resume with -c {cursor}"),
            None => format!("Aborted: {reason}; nothing fetched, rerun without -c"),
        }),
        Outcome::Completed { .. } => None,
    }
}
