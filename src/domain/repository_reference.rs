use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// `/tree/<ref>` is tried before `/blob/<ref>`. Anything after the ref is dropped.
static REF_PATTERNS: Lazy<[Regex; 2]> = Lazy::new(|| {
    [
        Regex::new(r"/tree/([^/]+)(?:/.*)?$").expect("valid tree pattern"),
        Regex::new(r"/blob/([^/]+)(?:/.*)?$").expect("valid blob pattern"),
    ]
});

static REPOSITORY_PATTERNS: Lazy<[Regex; 2]> = Lazy::new(|| {
    [
        Regex::new(r"(?:https?://)?github\.com[:/]([^/]+)/([^/]+)").expect("valid url pattern"),
        Regex::new(r"^([^/]+)/([^/]+)$").expect("valid shorthand pattern"),
    ]
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Invalid GitHub repository URL. Please provide a URL in the format 'https://github.com/owner/repo' or 'owner/repo'"
)]
pub struct ParseError {
    input: String,
}

impl ParseError {
    /// The raw string that failed to parse.
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// Owner, name and optional branch of a GitHub repository.
///
/// Accepts full URLs (`https://github.com/{owner}/{repo}`, with or without
/// scheme, `.git` suffix or trailing slashes), SSH-style `github.com:{owner}/{repo}`,
/// `/tree/{branch}` and `/blob/{branch}` browse URLs, and the bare
/// `{owner}/{repo}` shorthand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryReference {
    owner: String,
    name: String,
    branch: Option<String>,
}

impl RepositoryReference {
    /// Parses a user supplied repository URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use gitnest::RepositoryReference;
    ///
    /// let reference = RepositoryReference::parse("https://github.com/owner/repo/tree/dev/src").unwrap();
    /// assert_eq!(reference.owner(), "owner");
    /// assert_eq!(reference.name(), "repo");
    /// assert_eq!(reference.branch(), Some("dev"));
    /// ```
    pub fn parse(url: &str) -> Result<Self, ParseError> {
        let mut remainder = strip_git_suffix(url.trim().trim_end_matches('/'));

        let mut branch = None;
        for pattern in REF_PATTERNS.iter() {
            if let Some(captures) = pattern.captures(remainder)
                && let (Some(whole), Some(reference)) = (captures.get(0), captures.get(1))
            {
                branch = Some(reference.as_str().to_string());
                remainder = &remainder[..whole.start()];
                break;
            }
        }

        for pattern in REPOSITORY_PATTERNS.iter() {
            let Some(captures) = pattern.captures(remainder) else {
                continue;
            };
            let (Some(owner), Some(name)) = (captures.get(1), captures.get(2)) else {
                continue;
            };
            let owner = owner.as_str();
            let name = strip_git_suffix(name.as_str());
            if owner.trim().is_empty() || name.trim().is_empty() {
                continue;
            }
            return Ok(Self {
                owner: owner.to_string(),
                name: name.to_string(),
                branch,
            });
        }

        Err(ParseError {
            input: url.to_string(),
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    /// Same repository pinned to `branch`.
    pub fn with_branch(&self, branch: impl Into<String>) -> Self {
        Self {
            owner: self.owner.clone(),
            name: self.name.clone(),
            branch: Some(branch.into()),
        }
    }
}

impl FromStr for RepositoryReference {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RepositoryReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.branch {
            Some(branch) => write!(f, "{}/{}@{}", self.owner, self.name, branch),
            None => write!(f, "{}/{}", self.owner, self.name),
        }
    }
}

fn strip_git_suffix(value: &str) -> &str {
    value.strip_suffix(".git").unwrap_or(value)
}
