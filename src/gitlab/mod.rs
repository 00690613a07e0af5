//! Minimal typed client for the GitLab REST API (v4)
//!
//! Each resource lives in its own module with its DTOs, option structs and
//! the `GitlabClient` methods that operate on it. Option structs only
//! serialize the fields that were set.

use std::{fmt, str::FromStr};

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION},
    Client, RequestBuilder, Response,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::pagination::{ListCursor, Page};

pub mod branches;
pub mod error;
pub mod files;
pub mod groups;
pub mod namespaces;
pub mod oauth;
pub mod projects;

pub use error::{classify, ErrorKind, GitlabError};

pub type Result<T> = std::result::Result<T, GitlabError>;

/// How requests authenticate against the API
#[derive(Clone)]
pub enum Credential {
    /// Sent as the `PRIVATE-TOKEN` header
    PrivateToken(String),
    /// Sent as `Authorization: Bearer <token>`
    Bearer(String),
}

/// Characters left untouched when a path or name is embedded in a URL segment
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode a value for use as a single URL path segment (`/` → `%2F`)
pub fn encode_segment(value: &str) -> String {
    utf8_percent_encode(value, SEGMENT).to_string()
}

/// Versioned API root for a configured URL
///
/// A URL already ending in `/api/v4` is used as-is and one ending in `/api`
/// (with or without a trailing slash) gets `/v4`; anything else is taken as
/// the instance root.
pub fn api_root(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    if trimmed.ends_with("/api/v4") {
        trimmed.to_string()
    } else if trimmed.ends_with("/api") {
        format!("{trimmed}/v4")
    } else {
        format!("{trimmed}/api/v4")
    }
}

/// Instance root for a configured URL, with any `/api` or `/api/v4` suffix removed
pub fn instance_root(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    trimmed
        .strip_suffix("/api/v4")
        .or_else(|| trimmed.strip_suffix("/api"))
        .unwrap_or(trimmed)
        .to_string()
}

/// A project, group or namespace given either by numeric ID or by full path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceRef {
    Id(u64),
    Path(String),
}

impl ResourceRef {
    /// All-digit values are IDs, everything else is a path
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(id) = value.parse() {
                return ResourceRef::Id(id);
            }
        }
        ResourceRef::Path(value.trim_matches('/').to_string())
    }

    /// The form used in API URLs
    pub fn to_segment(&self) -> String {
        match self {
            ResourceRef::Id(id) => id.to_string(),
            ResourceRef::Path(path) => encode_segment(path),
        }
    }
}

impl FromStr for ResourceRef {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(ResourceRef::parse(s))
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceRef::Id(id) => write!(f, "{id}"),
            ResourceRef::Path(path) => f.write_str(path),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
    Internal,
}

impl FromStr for Visibility {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "public" => Ok(Visibility::Public),
            "private" => Ok(Visibility::Private),
            "internal" => Ok(Visibility::Internal),
            other => anyhow::bail!(
                "invalid visibility '{other}', choose one of: public, private, internal"
            ),
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
            Visibility::Internal => "internal",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => anyhow::bail!("invalid sort order '{other}', choose one of: asc, desc"),
        }
    }
}

pub struct GitlabClient {
    pub base_url: String,
    client: Client,
}

impl GitlabClient {
    pub fn new(url: &str, credential: Credential) -> Result<Self> {
        let mut headers = HeaderMap::new();
        match credential {
            Credential::PrivateToken(token) => {
                let mut hv = HeaderValue::from_str(&token)?;
                hv.set_sensitive(true);
                headers.insert(HeaderName::from_static("private-token"), hv);
            }
            Credential::Bearer(token) => {
                let mut hv = HeaderValue::from_str(&format!("Bearer {token}"))?;
                hv.set_sensitive(true);
                headers.insert(AUTHORIZATION, hv);
            }
        }

        let client = Client::builder()
            .user_agent(concat!("glctl/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;
        Ok(GitlabClient {
            base_url: api_root(url),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub(crate) fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        let url = self.endpoint(path);
        debug!(%method, %url, "GitLab request");
        self.client.request(method, url)
    }

    pub(crate) async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        let resp = check(req.send().await?).await?;
        Ok(resp.json().await?)
    }

    pub(crate) async fn send_empty(&self, req: RequestBuilder) -> Result<()> {
        check(req.send().await?).await?;
        Ok(())
    }

    /// Fetch one page of a listing endpoint
    pub(crate) async fn get_page<T, Q>(&self, path: &str, query: &Q, cursor: ListCursor) -> Result<Page<T>>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let req = self
            .request(reqwest::Method::GET, path)
            .query(query)
            .query(&[("page", cursor.page), ("per_page", cursor.per_page)]);
        let resp = check(req.send().await?).await?;
        let no_next_page = resp
            .headers()
            .get("x-next-page")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim().is_empty());
        let items: Vec<T> = resp.json().await?;

        let mut page = Page::from_items(items, cursor.per_page);
        if no_next_page == Some(true) {
            page.is_last = true;
        }
        Ok(page)
    }
}

/// Turn a non-success response into [`GitlabError::Api`]
async fn check(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    debug!(status = status.as_u16(), "GitLab request failed");
    Err(GitlabError::api(status.as_u16(), &body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_ref_parse() {
        assert_eq!(ResourceRef::parse("42"), ResourceRef::Id(42));
        assert_eq!(
            ResourceRef::parse("group/sub/project"),
            ResourceRef::Path("group/sub/project".into())
        );
        assert_eq!(
            ResourceRef::parse("42-service"),
            ResourceRef::Path("42-service".into())
        );
    }

    #[test]
    fn test_resource_ref_segment_encodes_slashes() {
        assert_eq!(
            ResourceRef::parse("group/my.project").to_segment(),
            "group%2Fmy.project"
        );
        assert_eq!(ResourceRef::Id(7).to_segment(), "7");
    }

    #[test]
    fn test_api_root() {
        assert_eq!(api_root("https://gl.example.com"), "https://gl.example.com/api/v4");
        assert_eq!(api_root("https://gl.example.com/"), "https://gl.example.com/api/v4");
        assert_eq!(
            api_root("https://gl.example.com/api/v4"),
            "https://gl.example.com/api/v4"
        );
        assert_eq!(api_root("https://gl.example.com/api"), "https://gl.example.com/api/v4");
        assert_eq!(api_root("https://gl.example.com/api/"), "https://gl.example.com/api/v4");
    }

    #[test]
    fn test_client_root_for_api_url_with_trailing_slash() {
        let url = crate::auth::normalize_base_url("https://gl.example.com/api/");
        let client = GitlabClient::new(&url, Credential::PrivateToken("t".into())).unwrap();
        assert_eq!(client.base_url, "https://gl.example.com/api/v4");
    }

    #[test]
    fn test_instance_root() {
        assert_eq!(instance_root("https://gl.example.com/api/v4"), "https://gl.example.com");
        assert_eq!(instance_root("https://gl.example.com/api"), "https://gl.example.com");
        assert_eq!(instance_root("https://gl.example.com/"), "https://gl.example.com");
    }

    #[test]
    fn test_enumerated_flag_values() {
        assert_eq!("internal".parse::<Visibility>().unwrap(), Visibility::Internal);
        assert!("secret".parse::<Visibility>().is_err());
        assert_eq!("desc".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert!("up".parse::<SortOrder>().is_err());
    }
}
