use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{GitlabClient, ResourceRef, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Namespace {
    pub id: u64,
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub full_path: String,
}

impl GitlabClient {
    pub async fn get_namespace(&self, namespace: &ResourceRef) -> Result<Namespace> {
        let path = format!("namespaces/{}", namespace.to_segment());
        self.send_json(self.request(Method::GET, &path)).await
    }

    /// Numeric ID for a user or group namespace given by ID or full path
    pub async fn resolve_namespace_id(&self, namespace: &ResourceRef) -> Result<u64> {
        match namespace {
            ResourceRef::Id(id) => Ok(*id),
            ResourceRef::Path(_) => Ok(self.get_namespace(namespace).await?.id),
        }
    }
}
