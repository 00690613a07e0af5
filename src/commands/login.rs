use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use dialoguer::{Input, Password};
use tracing::info;

use crate::{
    auth::{is_blank, normalize_base_url},
    config::{save_credential, AppConfig, PersistedCredential},
    gitlab::oauth,
};

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// GitLab instance URL (prompted for when missing)
    #[arg(long)]
    pub host: Option<String>,
    /// Username (prompted for when missing)
    #[arg(short, long)]
    pub username: Option<String>,
    /// Password (prompted for, hidden, when missing)
    #[arg(long)]
    pub password: Option<String>,
}

fn prompt(msg: &str, default: &str) -> Result<String> {
    let mut input = Input::<String>::new().with_prompt(msg);
    if !default.is_empty() {
        input = input.default(default.to_string());
    }
    let val = input.interact_text()?.trim().to_string();
    if val.is_empty() {
        anyhow::bail!("{} cannot be empty", msg);
    }
    Ok(val)
}

pub async fn run(args: LoginArgs, config: &AppConfig) -> Result<()> {
    let default_host = if is_blank(&config.env.url) {
        config.persisted.host_url.as_str()
    } else {
        config.env.url.as_str()
    };

    let host = match args.host {
        Some(h) => h,
        None => prompt("GitLab URL", default_host)?,
    };
    let username = match args.username {
        Some(u) => u,
        None => prompt("Username", &config.env.username)?,
    };
    let password = match args.password {
        Some(p) => p,
        None => Password::new()
            .with_prompt("Password")
            .interact()
            .context("Failed to read password from input")?,
    };
    if is_blank(&password) {
        anyhow::bail!("password cannot be empty");
    }

    login(&host, &username, &password, &config.config_path).await?;
    println!("Login succeeded, credentials saved to {}", config.config_path.display());
    Ok(())
}

/// Exchange the credentials for a token and persist it
///
/// Nothing is written when the token endpoint refuses the grant.
pub async fn login(
    host: &str,
    username: &str,
    password: &str,
    config_path: &Path,
) -> Result<PersistedCredential> {
    let host = normalize_base_url(host.trim());
    let token = oauth::password_grant(&host, username, password).await?;

    let cred = PersistedCredential {
        access_token: token.access_token,
        refresh_token: token.refresh_token,
        host_url: host,
        scope: token.scope,
        token_type: token.token_type,
        user_name: username.to_string(),
        created_at: token.created_at,
    };
    save_credential(&cred, config_path)?;
    info!(user = %username, path = %config_path.display(), "credentials saved");
    Ok(cred)
}
