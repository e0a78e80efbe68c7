use crate::domain::FileNode;
use crate::github::{ContentEntry, GitHubClient, GitHubError};
use std::vec::IntoIter;
use tracing::{info, instrument};

/// Builds the nested file tree of a repository from per-directory listings.
pub struct TreeBuilder<'a> {
    client: &'a GitHubClient,
}

/// A directory whose listing is still being walked.
struct Frame {
    directory: Option<(String, String)>,
    entries: IntoIter<ContentEntry>,
    nodes: Vec<FileNode>,
}

impl Frame {
    fn new(directory: Option<(String, String)>, entries: Vec<ContentEntry>) -> Self {
        Self {
            directory,
            entries: entries.into_iter(),
            nodes: Vec::new(),
        }
    }
}

impl<'a> TreeBuilder<'a> {
    pub fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }

    /// Walks `path` depth-first at `reference` and returns its sorted children.
    ///
    /// A directory is fully expanded before its next sibling is visited, one
    /// upstream request at a time. The walk keeps its own stack of open
    /// directories, so very deep trees do not grow the call stack. Any listing
    /// failure aborts the whole build.
    #[instrument(level = "info", skip(self))]
    pub async fn build(
        &self,
        owner: &str,
        repo: &str,
        reference: &str,
        path: &str,
    ) -> Result<Vec<FileNode>, GitHubError> {
        let root = self
            .client
            .fetch_directory(owner, repo, path, reference)
            .await?;
        let mut stack = vec![Frame::new(None, root)];
        let mut requests = 1usize;

        while let Some(frame) = stack.last_mut() {
            match frame.entries.next() {
                Some(entry) if entry.is_dir() => {
                    let listing = self
                        .client
                        .fetch_directory(owner, repo, &entry.path, reference)
                        .await?;
                    requests += 1;
                    stack.push(Frame::new(Some((entry.name, entry.path)), listing));
                }
                Some(entry) => {
                    frame
                        .nodes
                        .push(FileNode::file(entry.name, entry.path, entry.size));
                }
                None => {
                    let Some(Frame {
                        directory,
                        mut nodes,
                        ..
                    }) = stack.pop()
                    else {
                        break;
                    };
                    sort_level(&mut nodes);

                    match (directory, stack.last_mut()) {
                        (Some((name, path)), Some(parent)) => {
                            parent.nodes.push(FileNode::directory(name, path, nodes));
                        }
                        _ => {
                            info!(requests, top_level = nodes.len(), "built repository tree");
                            return Ok(nodes);
                        }
                    }
                }
            }
        }

        Ok(Vec::new())
    }
}

/// Directories first, then case-insensitive by name. The sort is stable.
pub fn sort_level(nodes: &mut [FileNode]) {
    nodes.sort_by_cached_key(|node| (!node.is_directory(), node.name.to_lowercase()));
}
