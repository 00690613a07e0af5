//! Authorization resolution and client construction
//!
//! [`AuthStrategy::resolve`] picks exactly one way to authenticate from the
//! environment and persisted credentials, in a fixed priority order:
//!
//! 1. password grant (`GITLAB_URL` + `GITLAB_USERNAME` + `GITLAB_PASSWORD`)
//! 2. private token (`GITLAB_URL` + `GITLAB_PRIVATE_TOKEN`)
//! 3. static OAuth token (`GITLAB_URL` + `GITLAB_OAUTH_TOKEN`)
//! 4. persisted OAuth token (`access_token` + `host_url` from the credential file)
//!
//! [`connect`] then turns the strategy into an authenticated [`GitlabClient`].

use std::fmt;

use thiserror::Error;
use tracing::{debug, info};

use crate::config::{EnvCredential, PersistedCredential};
use crate::gitlab::{oauth, Credential, GitlabClient, GitlabError};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error(
        "no credentials configured: set GITLAB_URL together with GITLAB_USERNAME and \
         GITLAB_PASSWORD, GITLAB_PRIVATE_TOKEN or GITLAB_OAUTH_TOKEN, or run `glctl login`"
    )]
    NoCredentials,
}

/// A credential value that never shows up in `Debug` output
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStrategy {
    PasswordGrant {
        url: String,
        username: String,
        password: Secret,
    },
    PrivateToken {
        url: String,
        token: Secret,
    },
    StaticOAuthToken {
        url: String,
        token: Secret,
    },
    PersistedOAuthToken {
        url: String,
        token: Secret,
    },
}

/// True when the string is empty after trimming surrounding whitespace
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

impl AuthStrategy {
    /// Select the authentication strategy, first match wins
    ///
    /// # Errors
    /// [`AuthError::NoCredentials`] when no strategy has all of its fields set
    pub fn resolve(
        env: &EnvCredential,
        persisted: &PersistedCredential,
    ) -> Result<Self, AuthError> {
        let has_url = !is_blank(&env.url);

        if has_url && !is_blank(&env.username) && !is_blank(&env.password) {
            return Ok(AuthStrategy::PasswordGrant {
                url: env.url.clone(),
                username: env.username.clone(),
                password: Secret::new(env.password.clone()),
            });
        }
        if has_url && !is_blank(&env.private_token) {
            return Ok(AuthStrategy::PrivateToken {
                url: env.url.clone(),
                token: Secret::new(env.private_token.clone()),
            });
        }
        if has_url && !is_blank(&env.oauth_token) {
            return Ok(AuthStrategy::StaticOAuthToken {
                url: env.url.clone(),
                token: Secret::new(env.oauth_token.clone()),
            });
        }
        if !is_blank(&persisted.access_token) && !is_blank(&persisted.host_url) {
            return Ok(AuthStrategy::PersistedOAuthToken {
                url: persisted.host_url.clone(),
                token: Secret::new(persisted.access_token.clone()),
            });
        }
        Err(AuthError::NoCredentials)
    }

    pub fn name(&self) -> &'static str {
        match self {
            AuthStrategy::PasswordGrant { .. } => "password-grant",
            AuthStrategy::PrivateToken { .. } => "private-token",
            AuthStrategy::StaticOAuthToken { .. } => "oauth-token",
            AuthStrategy::PersistedOAuthToken { .. } => "persisted-oauth-token",
        }
    }

    pub fn url(&self) -> &str {
        match self {
            AuthStrategy::PasswordGrant { url, .. }
            | AuthStrategy::PrivateToken { url, .. }
            | AuthStrategy::StaticOAuthToken { url, .. }
            | AuthStrategy::PersistedOAuthToken { url, .. } => url,
        }
    }
}

/// Append `/v4` to a base URL that ends in the bare `/api` suffix
///
/// # Examples
/// - `https://git.example.com/api` → `https://git.example.com/api/v4`
/// - `https://git.example.com` → unchanged
pub fn normalize_base_url(url: &str) -> String {
    if url.ends_with("/api") {
        format!("{url}/v4")
    } else {
        url.to_string()
    }
}

/// Build an authenticated client for the resolved strategy
///
/// The password grant performs the OAuth token exchange here, so this call
/// may block on the network and fail before any command-level request.
pub async fn connect(strategy: &AuthStrategy) -> Result<GitlabClient, GitlabError> {
    let base_url = normalize_base_url(strategy.url());
    debug!(strategy = strategy.name(), base_url = %base_url, "building GitLab client");

    let credential = match strategy {
        AuthStrategy::PasswordGrant {
            username, password, ..
        } => {
            let token = oauth::password_grant(&base_url, username, password.expose()).await?;
            info!(user = %username, "obtained OAuth token via password grant");
            Credential::Bearer(token.access_token)
        }
        AuthStrategy::PrivateToken { token, .. } => {
            Credential::PrivateToken(token.expose().to_string())
        }
        AuthStrategy::StaticOAuthToken { token, .. }
        | AuthStrategy::PersistedOAuthToken { token, .. } => {
            Credential::Bearer(token.expose().to_string())
        }
    };

    GitlabClient::new(&base_url, credential)
}
