//! Configuration management for glctl
//!
//! Two disjoint sources of credentials feed the CLI:
//! - the persisted credential file (`~/.glctl.yaml`, or the path given with `--config`),
//!   written by `glctl login` and removed by `glctl logout`
//! - `GITLAB_*` environment variables, read once at startup
//!
//! Both are gathered into an [`AppConfig`] when a command starts and passed by
//! reference from there. Nothing in the crate looks configuration up ambiently.
//!
//! Optional fields are represented as empty strings, both in memory and on disk.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use crate::constants::{ENV_PREFIX, GLCTL_CONFIG};

/// Credential record written by `glctl login`
///
/// # Example
///
/// ```yaml
/// access_token: 3f0c...
/// refresh_token: 9ab1...
/// host_url: https://gitlab.example.com
/// scope: api
/// token_type: bearer
/// user_name: jdoe
/// created_at: 1712345678
/// ```
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct PersistedCredential {
    pub access_token: String,
    pub refresh_token: String,
    /// GitLab instance the token was issued by
    pub host_url: String,
    pub scope: String,
    pub token_type: String,
    pub user_name: String,
    /// Unix timestamp reported by the token endpoint
    pub created_at: i64,
}

/// Credentials supplied through `GITLAB_URL`, `GITLAB_USERNAME`, `GITLAB_PASSWORD`,
/// `GITLAB_PRIVATE_TOKEN` and `GITLAB_OAUTH_TOKEN`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvCredential {
    pub url: String,
    pub username: String,
    pub password: String,
    pub private_token: String,
    pub oauth_token: String,
}

impl EnvCredential {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the credential from an arbitrary key lookup. Keys are the
    /// `GITLAB_` prefix followed by the field suffix.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |suffix: &str| lookup(&format!("{ENV_PREFIX}_{suffix}")).unwrap_or_default();
        Self {
            url: get("URL"),
            username: get("USERNAME"),
            password: get("PASSWORD"),
            private_token: get("PRIVATE_TOKEN"),
            oauth_token: get("OAUTH_TOKEN"),
        }
    }
}

/// Process-wide configuration, built once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Location of the persisted credential file (may not exist yet)
    pub config_path: PathBuf,
    pub persisted: PersistedCredential,
    pub env: EnvCredential,
}

impl AppConfig {
    /// Load the persisted credential (if any) and the environment credential
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined or an existing
    /// credential file cannot be parsed
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => p,
            None => default_config_path()?,
        };
        let persisted = load_credential(&config_path)?.unwrap_or_default();
        Ok(Self {
            config_path,
            persisted,
            env: EnvCredential::from_env(),
        })
    }
}

pub fn default_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Failed to get home directory")?;
    Ok(home.join(GLCTL_CONFIG))
}

/// Read the credential file, returning `None` when it does not exist
pub fn load_credential(path: &Path) -> Result<Option<PersistedCredential>> {
    if !path.exists() {
        return Ok(None);
    }
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading credentials from {}", path.display()))?;
    if data.trim().is_empty() {
        return Ok(Some(PersistedCredential::default()));
    }
    let cred: PersistedCredential = serde_yaml::from_str(&data)
        .with_context(|| format!("parsing credentials in {}", path.display()))?;
    Ok(Some(cred))
}

/// Write the credential file, readable by the owner only
pub fn save_credential(cred: &PersistedCredential, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let data = serde_yaml::to_string(cred)?;
    fs::write(path, data)
        .with_context(|| format!("writing credentials to {}", path.display()))?;

    #[cfg(unix)]
    {
        let mut permissions = fs::metadata(path)
            .context("Failed to read file metadata")?
            .permissions();
        permissions.set_mode(0o600);
        fs::set_permissions(path, permissions).context("Failed to set file permissions")?;
    }

    Ok(())
}

/// Remove the credential file
///
/// # Errors
/// Fails without touching the filesystem if the file does not exist
pub fn delete_credential(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("config file {} does not exist", path.display());
    }
    fs::remove_file(path).with_context(|| format!("removing {}", path.display()))?;
    Ok(())
}
