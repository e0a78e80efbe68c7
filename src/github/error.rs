use reqwest::StatusCode;
use thiserror::Error;

/// Failures reported by [`GitHubClient`](crate::GitHubClient).
#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("GitHub resource not found: {0}")]
    NotFound(String),
    #[error("GitHub API rate limit exceeded: {0}")]
    RateLimited(String),
    #[error("GitHub API rejected the credentials: {0}")]
    Unauthenticated(String),
    #[error("GitHub API error {status}: {message}")]
    Upstream { status: StatusCode, message: String },
    #[error("GitHub request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("GitHub token not found in configuration")]
    MissingToken,
    #[error("Invalid GitHub API base URL: {0}")]
    InvalidBaseUrl(String),
}

impl GitHubError {
    /// Classifies a non-success response.
    pub fn from_status(status: StatusCode, message: String) -> Self {
        match status {
            StatusCode::NOT_FOUND => Self::NotFound(message),
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => Self::RateLimited(message),
            StatusCode::UNAUTHORIZED => Self::Unauthenticated(message),
            status => Self::Upstream { status, message },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
