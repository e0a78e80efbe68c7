use crate::domain::RepositoryInfo;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct RepositoryPayload {
    name: String,
    description: Option<String>,
    stargazers_count: u64,
    forks_count: u64,
    default_branch: String,
}

impl From<RepositoryPayload> for RepositoryInfo {
    fn from(payload: RepositoryPayload) -> Self {
        Self {
            name: payload.name,
            description: payload.description,
            stars: payload.stargazers_count,
            forks: payload.forks_count,
            default_branch: payload.default_branch,
        }
    }
}

/// One item of a directory listing from the contents API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContentEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default)]
    pub size: u64,
}

impl ContentEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
    Submodule,
    #[serde(other)]
    Other,
}

/// The contents API answers with an array for directories and a single
/// object when the path names a file.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ContentsPayload {
    Listing(Vec<ContentEntry>),
    Single(ContentEntry),
}

impl From<ContentsPayload> for Vec<ContentEntry> {
    fn from(payload: ContentsPayload) -> Self {
        match payload {
            ContentsPayload::Listing(entries) => entries,
            ContentsPayload::Single(entry) => vec![entry],
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorPayload {
    pub message: Option<String>,
}
