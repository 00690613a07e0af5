use std::{path::PathBuf, str::FromStr};

use anyhow::{anyhow, Context, Result};
use clap::{Args, Subcommand};
use tracing::debug;

use crate::{
    auth::{connect, AuthStrategy},
    config::AppConfig,
    constants::MAX_PER_PAGE,
    gitlab::{classify, ErrorKind, GitlabClient, GitlabError, ResourceRef},
    output::OutputFormat,
    pagination::ListCursor,
};

pub mod completions;
pub mod create;
pub mod delete;
pub mod edit;
pub mod get;
pub mod login;
pub mod logout;
pub mod replace;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "List projects, groups, branches or repository files")]
    Get {
        #[command(subcommand)]
        cmd: get::GetCommands,
    },
    #[command(about = "Create a project, group or branch")]
    Create {
        #[command(subcommand)]
        cmd: create::CreateCommands,
    },
    #[command(about = "Change settings of a project, group or branch")]
    Edit {
        #[command(subcommand)]
        cmd: edit::EditCommands,
    },
    #[command(about = "Delete a project, group, branch or repository files")]
    Delete {
        #[command(subcommand)]
        cmd: delete::DeleteCommands,
    },
    #[command(about = "Replace the content of a repository file")]
    Replace {
        #[command(subcommand)]
        cmd: replace::ReplaceCommands,
    },
    #[command(about = "Log in with username and password and store the OAuth token")]
    Login(login::LoginArgs),
    #[command(about = "Remove the stored credentials")]
    Logout,
    #[command(about = "Emit shell completion scripts (bash/zsh/fish/powershell/elvish)")]
    Completion { shell: String },
    #[command(about = "Print the version of glctl")]
    Version,
}

pub async fn run(cmd: Commands, config_path: Option<PathBuf>) -> Result<()> {
    match cmd {
        Commands::Completion { shell } => completions::run(shell),
        Commands::Version => version::run(),
        Commands::Login(args) => login::run(args, &AppConfig::load(config_path)?).await,
        Commands::Logout => logout::run(&AppConfig::load(config_path)?),
        Commands::Get { cmd } => get::run(cmd, &AppConfig::load(config_path)?).await,
        Commands::Create { cmd } => create::run(cmd, &AppConfig::load(config_path)?).await,
        Commands::Edit { cmd } => edit::run(cmd, &AppConfig::load(config_path)?).await,
        Commands::Delete { cmd } => delete::run(cmd, &AppConfig::load(config_path)?).await,
        Commands::Replace { cmd } => replace::run(cmd, &AppConfig::load(config_path)?).await,
    }
}

/// The three phases every resource command goes through
#[allow(async_fn_in_trait)]
pub trait CommandOptions {
    /// Bind positional arguments and flags into typed fields
    fn complete(&mut self) -> Result<()>;

    /// Check flag combinations and enumerated values. Never touches the network.
    fn validate(&self) -> Result<()>;

    /// Perform the API call(s) and print the result
    async fn run(&self, client: &GitlabClient) -> Result<()>;
}

/// Complete, resolve credentials, validate, connect, run
///
/// Credentials are resolved before validation but the client (and with it any
/// token exchange) is only built once the flags are known to be valid.
pub async fn execute<C: CommandOptions>(mut cmd: C, config: &AppConfig) -> Result<()> {
    cmd.complete()?;
    let strategy = AuthStrategy::resolve(&config.env, &config.persisted)?;
    cmd.validate()?;
    debug!(strategy = strategy.name(), "credentials resolved");
    let client = connect(&strategy)
        .await
        .with_context(|| format!("connecting to {}", strategy.url()))?;
    cmd.run(&client).await
}

/// Pagination flags shared by every `get` command
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Page to fetch
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    /// Results per page (1-100)
    #[arg(long)]
    pub per_page: Option<u32>,
    /// Fetch every page
    #[arg(short = 'a', long)]
    pub all_pages: bool,
}

impl ListArgs {
    pub fn cursor(&self, default_per_page: u32) -> ListCursor {
        ListCursor::new(self.page, self.per_page.unwrap_or(default_per_page))
    }

    pub fn validate(&self) -> Result<()> {
        if self.page == 0 {
            anyhow::bail!("--page must be at least 1");
        }
        if let Some(n) = self.per_page {
            if n == 0 || n > MAX_PER_PAGE {
                anyhow::bail!("--per-page must be between 1 and {MAX_PER_PAGE}, got {n}");
            }
        }
        Ok(())
    }
}

#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output format: simple, json or yaml
    #[arg(short = 'o', long = "out", default_value = "simple")]
    pub out: String,
}

impl OutputArgs {
    pub fn format(&self) -> OutputFormat {
        OutputFormat::from_flag(&self.out)
    }
}

/// Parse an optional enumerated flag value
pub fn parse_opt<T>(value: &Option<String>) -> Result<Option<T>>
where
    T: FromStr<Err = anyhow::Error>,
{
    value.as_deref().map(|v| v.parse::<T>()).transpose()
}

pub fn validate_order_by(value: &Option<String>, allowed: &[&str]) -> Result<()> {
    match value {
        Some(v) if !allowed.contains(&v.as_str()) => Err(anyhow!(
            "invalid order-by '{}', choose one of: {}",
            v,
            allowed.join(", ")
        )),
        _ => Ok(()),
    }
}

/// The reference bound in `complete`, or the raw argument parsed on the spot
pub fn bound(resolved: &Option<ResourceRef>, raw: &str) -> ResourceRef {
    resolved.clone().unwrap_or_else(|| ResourceRef::parse(raw))
}

/// Turn a client error into a user-facing one, naming what was being accessed
pub fn api_error(err: GitlabError, target: &str) -> anyhow::Error {
    match classify(&err) {
        ErrorKind::NotFound(kind) => anyhow!("{kind} not found: {target}"),
        ErrorKind::EmptyRef => {
            anyhow!("{target} has no files at the requested ref (empty repository or unknown ref)")
        }
        ErrorKind::Unauthorized => anyhow::Error::new(err).context(
            "GitLab rejected the credentials; run `glctl login` or check the GITLAB_* variables",
        ),
        ErrorKind::Forbidden => {
            anyhow::Error::new(err).context(format!("not allowed to access {target}"))
        }
        ErrorKind::Other => anyhow::Error::new(err).context(format!("request for {target} failed")),
    }
}
