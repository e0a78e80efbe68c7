use super::payload::{ContentsPayload, ErrorPayload, RepositoryPayload};
use crate::configuration::GitHubSettings;
use crate::domain::RepositoryInfo;
use crate::github::{ContentEntry, GitHubError};
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, Response, Url};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::{debug, instrument, warn};

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";
const GITHUB_API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const GITHUB_API_VERSION: &str = "2022-11-28";

/// Thin wrapper over the GitHub REST API.
///
/// The access token is injected once at construction and sent as a bearer
/// token with every request.
pub struct GitHubClient {
    http_client: Client,
    base_url: Url,
    token: SecretString,
}

impl GitHubClient {
    pub fn new(
        base_url: &str,
        token: SecretString,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, GitHubError> {
        if token.expose_secret().trim().is_empty() {
            return Err(GitHubError::MissingToken);
        }
        let base_url =
            Url::parse(base_url).map_err(|e| GitHubError::InvalidBaseUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(GitHubError::InvalidBaseUrl(base_url.to_string()));
        }
        let http_client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            http_client,
            base_url,
            token,
        })
    }

    pub fn from_settings(settings: &GitHubSettings) -> Result<Self, GitHubError> {
        Self::new(
            &settings.base_url,
            SecretString::from(settings.token.expose_secret().to_owned()),
            settings.timeout(),
            &settings.user_agent,
        )
    }

    /// Fetches name, description, counters and default branch of a repository.
    #[instrument(level = "debug", skip(self))]
    pub async fn fetch_info(&self, owner: &str, repo: &str) -> Result<RepositoryInfo, GitHubError> {
        let url = self.endpoint(["repos", owner, repo])?;
        let response = self.send(self.request(url)).await?;
        let payload = response.json::<RepositoryPayload>().await?;
        Ok(payload.into())
    }

    /// Lists a single directory level at `reference`. An empty `path` is the
    /// repository root.
    #[instrument(level = "debug", skip(self))]
    pub async fn fetch_directory(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        reference: &str,
    ) -> Result<Vec<ContentEntry>, GitHubError> {
        let segments = ["repos", owner, repo, "contents"]
            .into_iter()
            .chain(path.split('/').filter(|segment| !segment.is_empty()));
        let url = self.endpoint(segments)?;
        let response = self
            .send(self.request(url).query(&[("ref", reference)]))
            .await?;
        let payload = response.json::<ContentsPayload>().await?;
        let entries: Vec<ContentEntry> = payload.into();
        debug!(count = entries.len(), "listed directory");
        Ok(entries)
    }

    /// Succeeds when `branch` exists, fails with [`GitHubError::NotFound`] otherwise.
    #[instrument(level = "debug", skip(self))]
    pub async fn verify_branch(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<(), GitHubError> {
        let url = self.endpoint(["repos", owner, repo, "branches", branch])?;
        self.send(self.request(url)).await?;
        Ok(())
    }

    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url, GitHubError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GitHubError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, url: Url) -> RequestBuilder {
        self.http_client
            .get(url)
            .header(ACCEPT, GITHUB_MEDIA_TYPE)
            .header(GITHUB_API_VERSION_HEADER, GITHUB_API_VERSION)
            .bearer_auth(self.token.expose_secret())
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, GitHubError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorPayload>()
            .await
            .ok()
            .and_then(|payload| payload.message)
            .unwrap_or_else(|| "GitHub API error".to_string());
        warn!(%status, %message, "GitHub API request failed");
        Err(GitHubError::from_status(status, message))
    }
}
