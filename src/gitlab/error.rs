use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GitlabError {
    /// Non-success response from the GitLab API
    #[error("GitLab API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The OAuth password grant was refused
    #[error("failed to obtain a token for user '{username}': {description}")]
    TokenExchange {
        username: String,
        description: String,
    },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("invalid credential header: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),
}

impl GitlabError {
    /// Build an API error from a response status and its raw body
    pub fn api(status: u16, body: &str) -> Self {
        GitlabError::Api {
            status,
            message: extract_message(body),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            GitlabError::Api { status, .. } => Some(*status),
            GitlabError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Pull a human readable message out of an error body
///
/// GitLab reports errors as `{"message": "..."}`, `{"message": {field: [..]}}`
/// or, for OAuth endpoints, `{"error": "...", "error_description": "..."}`.
pub fn extract_message(body: &str) -> String {
    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return body.trim().to_string();
    };
    if let Some(desc) = json.get("error_description").and_then(Value::as_str) {
        return desc.to_string();
    }
    match json.get("message") {
        Some(Value::String(s)) => return s.clone(),
        Some(Value::Object(fields)) => {
            let parts: Vec<String> = fields
                .iter()
                .map(|(field, errs)| match errs {
                    Value::Array(list) => {
                        let msgs: Vec<String> = list
                            .iter()
                            .map(|m| m.as_str().map(str::to_string).unwrap_or_else(|| m.to_string()))
                            .collect();
                        format!("{field} {}", msgs.join(", "))
                    }
                    other => format!("{field} {other}"),
                })
                .collect();
            return parts.join("; ");
        }
        Some(Value::Array(list)) => {
            let msgs: Vec<String> = list.iter().map(|m| m.to_string()).collect();
            return msgs.join("; ");
        }
        _ => {}
    }
    if let Some(err) = json.get("error").and_then(Value::as_str) {
        return err.to_string();
    }
    body.trim().to_string()
}

/// What went wrong, as far as the caller needs to know
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// 404, with the resource name the server reported (e.g. "Branch", "Project")
    NotFound(String),
    /// The repository has no commits at the requested ref
    EmptyRef,
    Unauthorized,
    Forbidden,
    Other,
}

fn not_found_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"404 ([A-Za-z ]+?) Not Found").expect("valid regex"))
}

/// Classify an error by status code and, where GitLab only offers free text,
/// by the server message
pub fn classify(err: &GitlabError) -> ErrorKind {
    let GitlabError::Api { status, message } = err else {
        return match err.status() {
            Some(401) => ErrorKind::Unauthorized,
            Some(403) => ErrorKind::Forbidden,
            _ => ErrorKind::Other,
        };
    };

    if message.contains("ref is empty") || message.contains("Tree Not Found") {
        return ErrorKind::EmptyRef;
    }
    if let Some(caps) = not_found_re().captures(message) {
        return ErrorKind::NotFound(caps[1].to_string());
    }
    match status {
        401 => ErrorKind::Unauthorized,
        403 => ErrorKind::Forbidden,
        404 => ErrorKind::NotFound("Resource".to_string()),
        _ => ErrorKind::Other,
    }
}
