//! # glctl Library
//!
//! Core library functionality for the glctl GitLab command-line client.

use std::path::PathBuf;

use clap::Parser;

pub mod auth;
pub mod commands;
pub mod config;
pub mod constants;
pub mod gitlab;
pub mod output;
pub mod pagination;

/// Command-line client for GitLab
///
/// `glctl` lists, creates, edits and deletes GitLab projects, groups, branches
/// and repository files. Credentials come from `GITLAB_*` environment variables
/// or from the token stored by `glctl login`.
#[derive(Parser)]
#[command(
    name = "glctl",
    version,
    about = "Command-line client for GitLab projects, groups, branches and files",
    long_about = "Command-line client for GitLab projects, groups, branches and repository files.\n\n\
                  Authenticate with GITLAB_URL plus GITLAB_USERNAME/GITLAB_PASSWORD, GITLAB_PRIVATE_TOKEN\n\
                  or GITLAB_OAUTH_TOKEN, or run `glctl login` to store an OAuth token."
)]
pub struct Cli {
    /// Credential file to use instead of ~/.glctl.yaml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Option<commands::Commands>,
}
