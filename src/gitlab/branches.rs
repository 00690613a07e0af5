use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use super::{encode_segment, GitlabClient, ResourceRef, Result};
use crate::pagination::{ListCursor, Page};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commit {
    pub id: String,
    #[serde(default)]
    pub short_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    #[serde(default)]
    pub merged: bool,
    #[serde(default)]
    pub protected: bool,
    #[serde(default)]
    pub default: bool,
    #[serde(default)]
    pub developers_can_push: bool,
    #[serde(default)]
    pub developers_can_merge: bool,
    #[serde(default)]
    pub web_url: Option<String>,
    #[serde(default)]
    pub commit: Option<Commit>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListBranchesOptions {
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateBranchOptions {
    pub branch: String,
    #[serde(rename = "ref")]
    pub ref_name: String,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProtectBranchOptions {
    pub developers_can_push: Option<bool>,
    pub developers_can_merge: Option<bool>,
}

impl GitlabClient {
    pub async fn list_branches(
        &self,
        project: &ResourceRef,
        opts: &ListBranchesOptions,
        cursor: ListCursor,
    ) -> Result<Page<Branch>> {
        let path = format!("projects/{}/repository/branches", project.to_segment());
        self.get_page(&path, opts, cursor).await
    }

    pub async fn create_branch(
        &self,
        project: &ResourceRef,
        opts: &CreateBranchOptions,
    ) -> Result<Branch> {
        let path = format!("projects/{}/repository/branches", project.to_segment());
        self.send_json(self.request(Method::POST, &path).json(opts))
            .await
    }

    pub async fn delete_branch(&self, project: &ResourceRef, branch: &str) -> Result<()> {
        let path = branch_path(project, branch);
        self.send_empty(self.request(Method::DELETE, &path)).await
    }

    pub async fn protect_branch(
        &self,
        project: &ResourceRef,
        branch: &str,
        opts: &ProtectBranchOptions,
    ) -> Result<Branch> {
        let path = format!("{}/protect", branch_path(project, branch));
        self.send_json(self.request(Method::PUT, &path).json(opts))
            .await
    }

    pub async fn unprotect_branch(&self, project: &ResourceRef, branch: &str) -> Result<Branch> {
        let path = format!("{}/unprotect", branch_path(project, branch));
        self.send_json(self.request(Method::PUT, &path)).await
    }
}

fn branch_path(project: &ResourceRef, branch: &str) -> String {
    format!(
        "projects/{}/repository/branches/{}",
        project.to_segment(),
        encode_segment(branch)
    )
}
