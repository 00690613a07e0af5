//! # glctl
//!
//! A command-line client for GitLab.
//!
//! ## Quick Start
//!
//! ```bash
//! # Store an OAuth token for a GitLab instance
//! glctl login --host https://gitlab.example.com --username jdoe
//!
//! # List your projects as a table, or every group as JSON
//! glctl get projects --owned
//! glctl get groups --all-pages -o json
//!
//! # Branch off main and protect the new branch
//! glctl create branch release-1.2 --project team/api --ref main
//! glctl edit branch release-1.2 --project team/api --protect
//! ```
//!
//! ## Configuration
//!
//! Credentials are taken, in order of preference, from:
//! - `GITLAB_URL` + `GITLAB_USERNAME` + `GITLAB_PASSWORD` (OAuth password grant)
//! - `GITLAB_URL` + `GITLAB_PRIVATE_TOKEN`
//! - `GITLAB_URL` + `GITLAB_OAUTH_TOKEN`
//! - the token saved by `glctl login` in `~/.glctl.yaml`
//!
//! Set `RUST_LOG=debug` to trace API requests on stderr.

use anyhow::Result;
use clap::Parser;
use glctl::{commands, Cli};
use tracing_subscriber::EnvFilter;

/// Main entry point for glctl
///
/// Parses command-line arguments and delegates to the appropriate command handler.
/// Any error, usage errors included, is reported on stderr and the process
/// exits with status 1.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::try_parse().unwrap_or_else(|e| {
        let _ = e.print();
        // help and version go to stdout and are not failures
        std::process::exit(if e.use_stderr() { 1 } else { 0 });
    });
    let cmd = cli.cmd.unwrap_or_else(|| {
        eprintln!("No command provided. Use --help to see available commands.");
        std::process::exit(1);
    });
    commands::run(cmd, cli.config).await
}
