use crate::domain::{FileNode, RepositoryInfo};
use crate::structure::RepositoryStructure;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Error,
}

/// A structure response only exists on success; failures use [`ErrorResponse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureStatus {
    Success,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StructureRequest {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StructureResponse {
    pub status: StructureStatus,
    pub repo_info: RepositoryInfo,
    pub structure: Vec<FileNode>,
}

impl From<RepositoryStructure> for StructureResponse {
    fn from(resolved: RepositoryStructure) -> Self {
        Self {
            status: StructureStatus::Success,
            repo_info: resolved.repo_info,
            structure: resolved.structure,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}
