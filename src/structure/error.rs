use crate::domain::ParseError;
use crate::github::GitHubError;
use reqwest::StatusCode;
use thiserror::Error;

pub const REPOSITORY_NOT_FOUND_MESSAGE: &str = "Repository or specified branch not found. Please verify the repository and branch exist and are accessible.";
pub const ACCESS_DENIED_MESSAGE: &str = "GitHub API rate limit exceeded or authentication required";

/// Everything that can end a structure request without a tree.
#[derive(Debug, Error)]
pub enum StructureError {
    #[error(transparent)]
    InvalidUrl(#[from] ParseError),
    #[error("{message}")]
    InvalidRequest { status: StatusCode, message: String },
    #[error("Branch '{0}' not found in repository")]
    BranchNotFound(String),
    #[error("{}", REPOSITORY_NOT_FOUND_MESSAGE)]
    RepositoryNotFound,
    #[error("{}", ACCESS_DENIED_MESSAGE)]
    RateLimited,
    #[error("{}", ACCESS_DENIED_MESSAGE)]
    Unauthenticated,
    #[error("{message}")]
    Upstream { status: StatusCode, message: String },
    #[error("{0}")]
    Internal(String),
}

impl StructureError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidUrl(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequest { status, .. } => *status,
            Self::BranchNotFound(_) | Self::RepositoryNotFound => StatusCode::NOT_FOUND,
            Self::RateLimited | Self::Unauthenticated => StatusCode::FORBIDDEN,
            Self::Upstream { status, .. } => *status,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<GitHubError> for StructureError {
    fn from(error: GitHubError) -> Self {
        match error {
            // Only reached when the resolver did not absorb the miss itself.
            GitHubError::NotFound(_) => Self::RepositoryNotFound,
            GitHubError::RateLimited(_) => Self::RateLimited,
            GitHubError::Unauthenticated(_) | GitHubError::MissingToken => Self::Unauthenticated,
            GitHubError::Upstream { status, message } => Self::Upstream { status, message },
            error @ (GitHubError::Request(_) | GitHubError::InvalidBaseUrl(_)) => {
                Self::Internal(error.to_string())
            }
        }
    }
}
