use crate::domain::{FileNode, RepositoryInfo, RepositoryReference};
use crate::github::{GitHubClient, GitHubError};
use crate::structure::{StructureError, TreeBuilder};
use tracing::{info, instrument, warn};

/// Branches probed, in order, when neither the URL nor the default branch
/// lead to a tree.
pub const COMMON_BRANCHES: [&str; 3] = ["main", "master", "develop"];

/// Metadata and full tree of one repository at one branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryStructure {
    pub repo_info: RepositoryInfo,
    pub structure: Vec<FileNode>,
}

enum Attempt {
    Resolved(RepositoryStructure),
    Missing,
}

/// Resolves `url` to a repository tree.
///
/// An explicit `/tree/<branch>` or `/blob/<branch>` must exist, otherwise the
/// request fails with [`StructureError::BranchNotFound`]. Without one, the
/// default branch is used; if the repository or that branch cannot be found,
/// each of [`COMMON_BRANCHES`] is tried before giving up with
/// [`StructureError::RepositoryNotFound`]. Errors other than not-found are
/// returned as soon as they happen.
#[instrument(level = "info", skip(client))]
pub async fn resolve_structure(
    client: &GitHubClient,
    url: &str,
) -> Result<RepositoryStructure, StructureError> {
    let reference = RepositoryReference::parse(url)?;
    info!(%reference, "resolving repository structure");

    if let Attempt::Resolved(structure) = attempt(client, &reference).await? {
        return Ok(structure);
    }

    if reference.branch().is_none() && !url.contains("/tree/") && !url.contains("/blob/") {
        for branch in COMMON_BRANCHES {
            let candidate = reference.with_branch(branch);
            info!(%candidate, "trying common branch");
            match attempt(client, &candidate).await {
                Ok(Attempt::Resolved(structure)) => return Ok(structure),
                Ok(Attempt::Missing) | Err(StructureError::BranchNotFound(_)) => continue,
                Err(error) => return Err(error),
            }
        }
    }

    warn!(%reference, "repository or branch not found");
    Err(StructureError::RepositoryNotFound)
}

async fn attempt(
    client: &GitHubClient,
    reference: &RepositoryReference,
) -> Result<Attempt, StructureError> {
    // A missing repository also falls through to the common branches.
    let repo_info = match client.fetch_info(reference.owner(), reference.name()).await {
        Ok(repo_info) => repo_info,
        Err(error) if error.is_not_found() => {
            info!(%reference, "repository not found");
            return Ok(Attempt::Missing);
        }
        Err(error) => return Err(error.into()),
    };

    let branch = reference
        .branch()
        .unwrap_or(&repo_info.default_branch)
        .to_string();

    match fetch_tree(client, reference, &branch).await {
        Ok(structure) => {
            info!(%reference, %branch, "resolved repository structure");
            Ok(Attempt::Resolved(RepositoryStructure {
                repo_info,
                structure,
            }))
        }
        Err(error) if error.is_not_found() => match reference.branch() {
            Some(_) => Err(StructureError::BranchNotFound(branch)),
            None => {
                info!(%reference, %branch, "default branch not found");
                Ok(Attempt::Missing)
            }
        },
        Err(error) => Err(error.into()),
    }
}

async fn fetch_tree(
    client: &GitHubClient,
    reference: &RepositoryReference,
    branch: &str,
) -> Result<Vec<FileNode>, GitHubError> {
    client
        .verify_branch(reference.owner(), reference.name(), branch)
        .await?;
    TreeBuilder::new(client)
        .build(reference.owner(), reference.name(), branch, "")
        .await
}
