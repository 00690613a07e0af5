//! OAuth2 resource-owner password credentials grant

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{error::extract_message, instance_root, GitlabError, Result};

#[derive(Serialize)]
struct PasswordGrantRequest<'a> {
    grant_type: &'static str,
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub created_at: i64,
}

/// Exchange a username and password for an access token at `{instance}/oauth/token`
///
/// # Errors
/// [`GitlabError::TokenExchange`] carrying the server's `error_description`
/// and the username when the endpoint answers with anything but 200. The
/// password is never part of the error.
pub async fn password_grant(url: &str, username: &str, password: &str) -> Result<TokenResponse> {
    let endpoint = format!("{}/oauth/token", instance_root(url));
    debug!(%endpoint, user = %username, "requesting OAuth token");

    let resp = reqwest::Client::new()
        .post(&endpoint)
        .json(&PasswordGrantRequest {
            grant_type: "password",
            username,
            password,
        })
        .send()
        .await?;

    if resp.status() != reqwest::StatusCode::OK {
        let body = resp.text().await.unwrap_or_default();
        return Err(GitlabError::TokenExchange {
            username: username.to_string(),
            description: extract_message(&body),
        });
    }
    Ok(resp.json().await?)
}
