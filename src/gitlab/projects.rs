use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use super::{GitlabClient, ResourceRef, Result, SortOrder, Visibility};
use crate::pagination::{ListCursor, Page};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectNamespace {
    pub id: u64,
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub full_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub path: String,
    pub path_with_namespace: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub visibility: Option<Visibility>,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub web_url: String,
    #[serde(default)]
    pub ssh_url_to_repo: Option<String>,
    #[serde(default)]
    pub http_url_to_repo: Option<String>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_activity_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub namespace: Option<ProjectNamespace>,
}

/// Filters for `GET /projects` and `GET /groups/:id/projects`
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListProjectsOptions {
    pub owned: Option<bool>,
    pub membership: Option<bool>,
    pub starred: Option<bool>,
    pub archived: Option<bool>,
    pub search: Option<String>,
    pub visibility: Option<Visibility>,
    pub order_by: Option<String>,
    pub sort: Option<SortOrder>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateProjectOptions {
    pub name: String,
    pub path: Option<String>,
    pub namespace_id: Option<u64>,
    pub description: Option<String>,
    pub visibility: Option<Visibility>,
    pub default_branch: Option<String>,
    pub issues_enabled: Option<bool>,
    pub merge_requests_enabled: Option<bool>,
    pub wiki_enabled: Option<bool>,
    pub lfs_enabled: Option<bool>,
}

/// Only the fields that are `Some` are changed on the server
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize)]
pub struct EditProjectOptions {
    pub name: Option<String>,
    pub path: Option<String>,
    pub description: Option<String>,
    pub visibility: Option<Visibility>,
    pub default_branch: Option<String>,
    pub issues_enabled: Option<bool>,
    pub merge_requests_enabled: Option<bool>,
    pub wiki_enabled: Option<bool>,
    pub lfs_enabled: Option<bool>,
}

impl EditProjectOptions {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.path.is_none()
            && self.description.is_none()
            && self.visibility.is_none()
            && self.default_branch.is_none()
            && self.issues_enabled.is_none()
            && self.merge_requests_enabled.is_none()
            && self.wiki_enabled.is_none()
            && self.lfs_enabled.is_none()
    }
}

impl GitlabClient {
    pub async fn list_projects(
        &self,
        opts: &ListProjectsOptions,
        cursor: ListCursor,
    ) -> Result<Page<Project>> {
        self.get_page("projects", opts, cursor).await
    }

    pub async fn list_group_projects(
        &self,
        group: &ResourceRef,
        opts: &ListProjectsOptions,
        cursor: ListCursor,
    ) -> Result<Page<Project>> {
        let path = format!("groups/{}/projects", group.to_segment());
        self.get_page(&path, opts, cursor).await
    }

    pub async fn create_project(&self, opts: &CreateProjectOptions) -> Result<Project> {
        self.send_json(self.request(Method::POST, "projects").json(opts))
            .await
    }

    pub async fn edit_project(
        &self,
        project: &ResourceRef,
        opts: &EditProjectOptions,
    ) -> Result<Project> {
        let path = format!("projects/{}", project.to_segment());
        self.send_json(self.request(Method::PUT, &path).json(opts))
            .await
    }

    pub async fn delete_project(&self, project: &ResourceRef) -> Result<()> {
        let path = format!("projects/{}", project.to_segment());
        self.send_empty(self.request(Method::DELETE, &path)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_options_are_not_serialized() {
        let opts = EditProjectOptions {
            description: Some("new".into()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_string(&opts).unwrap(),
            r#"{"description":"new"}"#
        );
        assert!(!opts.is_empty());
        assert!(EditProjectOptions::default().is_empty());
    }

    #[test]
    fn test_project_deserializes_minimal_payload() {
        let project: Project = serde_json::from_str(
            r#"{"id":1,"name":"api","path":"api","path_with_namespace":"team/api",
                "visibility":"internal","created_at":"2024-03-01T10:00:00.000Z"}"#,
        )
        .unwrap();
        assert_eq!(project.visibility, Some(Visibility::Internal));
        assert!(project.created_at.is_some());
        assert!(project.namespace.is_none());
    }
}
