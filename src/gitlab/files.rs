use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use super::{encode_segment, GitlabClient, ResourceRef, Result};
use crate::pagination::{ListCursor, Page};

/// Entry of a repository tree listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub path: String,
    #[serde(default)]
    pub mode: String,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListTreeOptions {
    #[serde(rename = "ref")]
    pub ref_name: Option<String>,
    pub path: Option<String>,
    pub recursive: Option<bool>,
}

/// Body of a file update. `content` is base64 when `encoding` says so.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateFileOptions {
    pub branch: String,
    pub content: String,
    pub encoding: Option<String>,
    pub commit_message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DeleteFileOptions {
    pub branch: String,
    pub commit_message: String,
}

/// Server acknowledgement of a file write
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileCommit {
    pub file_path: String,
    pub branch: String,
}

impl GitlabClient {
    pub async fn list_tree(
        &self,
        project: &ResourceRef,
        opts: &ListTreeOptions,
        cursor: ListCursor,
    ) -> Result<Page<TreeNode>> {
        let path = format!("projects/{}/repository/tree", project.to_segment());
        self.get_page(&path, opts, cursor).await
    }

    pub async fn update_file(
        &self,
        project: &ResourceRef,
        file_path: &str,
        opts: &UpdateFileOptions,
    ) -> Result<FileCommit> {
        let path = file_endpoint(project, file_path);
        self.send_json(self.request(Method::PUT, &path).json(opts))
            .await
    }

    pub async fn delete_file(
        &self,
        project: &ResourceRef,
        file_path: &str,
        opts: &DeleteFileOptions,
    ) -> Result<()> {
        let path = file_endpoint(project, file_path);
        self.send_empty(self.request(Method::DELETE, &path).query(opts))
            .await
    }
}

fn file_endpoint(project: &ResourceRef, file_path: &str) -> String {
    format!(
        "projects/{}/repository/files/{}",
        project.to_segment(),
        encode_segment(file_path.trim_start_matches('/'))
    )
}
