use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use super::{GitlabClient, ResourceRef, Result, SortOrder, Visibility};
use crate::pagination::{ListCursor, Page};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: u64,
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub full_path: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub visibility: Option<Visibility>,
    #[serde(default)]
    pub web_url: String,
    #[serde(default)]
    pub parent_id: Option<u64>,
    #[serde(default)]
    pub lfs_enabled: Option<bool>,
    #[serde(default)]
    pub request_access_enabled: Option<bool>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Filters for `GET /groups` and `GET /groups/:id/subgroups`
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListGroupsOptions {
    pub owned: Option<bool>,
    pub all_available: Option<bool>,
    pub search: Option<String>,
    pub order_by: Option<String>,
    pub sort: Option<SortOrder>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateGroupOptions {
    pub name: String,
    pub path: String,
    pub parent_id: Option<u64>,
    pub description: Option<String>,
    pub visibility: Option<Visibility>,
    pub lfs_enabled: Option<bool>,
    pub request_access_enabled: Option<bool>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize)]
pub struct EditGroupOptions {
    pub name: Option<String>,
    pub path: Option<String>,
    pub description: Option<String>,
    pub visibility: Option<Visibility>,
    pub lfs_enabled: Option<bool>,
    pub request_access_enabled: Option<bool>,
}

impl EditGroupOptions {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.path.is_none()
            && self.description.is_none()
            && self.visibility.is_none()
            && self.lfs_enabled.is_none()
            && self.request_access_enabled.is_none()
    }
}

impl GitlabClient {
    pub async fn list_groups(
        &self,
        opts: &ListGroupsOptions,
        cursor: ListCursor,
    ) -> Result<Page<Group>> {
        self.get_page("groups", opts, cursor).await
    }

    pub async fn list_subgroups(
        &self,
        group: &ResourceRef,
        opts: &ListGroupsOptions,
        cursor: ListCursor,
    ) -> Result<Page<Group>> {
        let path = format!("groups/{}/subgroups", group.to_segment());
        self.get_page(&path, opts, cursor).await
    }

    pub async fn get_group(&self, group: &ResourceRef) -> Result<Group> {
        let path = format!("groups/{}", group.to_segment());
        self.send_json(self.request(Method::GET, &path)).await
    }

    pub async fn create_group(&self, opts: &CreateGroupOptions) -> Result<Group> {
        self.send_json(self.request(Method::POST, "groups").json(opts))
            .await
    }

    pub async fn edit_group(&self, group: &ResourceRef, opts: &EditGroupOptions) -> Result<Group> {
        let path = format!("groups/{}", group.to_segment());
        self.send_json(self.request(Method::PUT, &path).json(opts))
            .await
    }

    pub async fn delete_group(&self, group: &ResourceRef) -> Result<()> {
        let path = format!("groups/{}", group.to_segment());
        self.send_empty(self.request(Method::DELETE, &path)).await
    }

    /// Numeric ID for a group given by ID or full path
    pub async fn resolve_group_id(&self, group: &ResourceRef) -> Result<u64> {
        match group {
            ResourceRef::Id(id) => Ok(*id),
            ResourceRef::Path(_) => Ok(self.get_group(group).await?.id),
        }
    }
}
