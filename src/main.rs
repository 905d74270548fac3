//! pagewalk CLI
//!
//! Walks a cursor-paginated resource and prints one JSON page per line.

use clap::Parser;
use pagewalk::cli::{abort_report, Cli, Runner};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging; -v raises the default level, RUST_LOG still wins
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .init();

    let runner = Runner::new(cli);

    let code = match runner.run().await {
        Ok(outcome) => {
            if let Some(report) = abort_report(&outcome) {
                eprintln!("{report}");
            }
            outcome.exit_code()
        }
        Err(e) => {
            eprintln!("Error: {e}");
            e.exit_code()
        }
    };

    std::process::exit(code);
}
