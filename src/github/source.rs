// src/github/source.rs
// =============================================================================
// The two collaborators the browser core depends on:
//
// - a Listing API:     list_contents(path) -> [Entry]
// - a Raw Content API: fetch_raw(path)     -> String
//
// plus an optional download link for a file.
//
// Both are expressed as one trait so the tree builder and the content
// resolver can run against GitHub in production and an in-memory source in
// tests.
// =============================================================================

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::FetchError;

/// Whether a listed entry is a directory or something we treat as a file.
///
/// The contents API also reports "symlink" and "submodule"; those cannot be
/// expanded, so they land in `File` via `#[serde(other)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Dir,
    #[serde(other)]
    File,
}

/// One item of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    /// Repository-relative path, e.g. "Flames/H001.md".
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl Entry {
    #[cfg(test)]
    pub fn file(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            kind: EntryKind::File,
        }
    }

    #[cfg(test)]
    pub fn dir(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            kind: EntryKind::Dir,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

/// Read-only access to one repository at one branch.
///
/// Paths are repository-relative; the empty string is the root.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Lists the immediate children of a directory, in the order the
    /// remote returns them.
    async fn list_contents(&self, path: &str) -> Result<Vec<Entry>, FetchError>;

    /// Fetches the text of a file.
    async fn fetch_raw(&self, path: &str) -> Result<String, FetchError>;

    /// Where a user can download the file directly, if the source has such
    /// a place.
    fn download_url(&self, _path: &str) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_deserializes_from_contents_api() {
        let json = r#"[
            {"name": "Flames", "path": "Flames", "type": "dir", "sha": "abc"},
            {"name": "README.md", "path": "README.md", "type": "file", "size": 12},
            {"name": "vendor", "path": "vendor", "type": "submodule"},
            {"name": "link", "path": "link", "type": "symlink"}
        ]"#;

        let entries: Vec<Entry> = serde_json::from_str(json).unwrap();

        assert_eq!(entries[0], Entry::dir("Flames", "Flames"));
        assert_eq!(entries[1], Entry::file("README.md", "README.md"));
        assert_eq!(entries[2].kind, EntryKind::File);
        assert_eq!(entries[3].kind, EntryKind::File);
    }
}
