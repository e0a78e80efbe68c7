use serde::{Deserialize, Serialize};

/// One entry of a repository tree.
///
/// Serialized as `{"name", "path", "type": "file", "size"}` for files and
/// `{"name", "path", "type": "directory", "children"}` for directories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    pub name: String,
    pub path: String,
    #[serde(flatten)]
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeKind {
    File { size: u64 },
    Directory { children: Vec<FileNode> },
}

impl FileNode {
    pub fn file(name: impl Into<String>, path: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: NodeKind::File { size },
        }
    }

    pub fn directory(
        name: impl Into<String>,
        path: impl Into<String>,
        children: Vec<FileNode>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: NodeKind::Directory { children },
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }

    pub fn size(&self) -> Option<u64> {
        match self.kind {
            NodeKind::File { size } => Some(size),
            NodeKind::Directory { .. } => None,
        }
    }

    pub fn children(&self) -> Option<&[FileNode]> {
        match &self.kind {
            NodeKind::File { .. } => None,
            NodeKind::Directory { children } => Some(children),
        }
    }
}
