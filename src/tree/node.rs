// src/tree/node.rs
// =============================================================================
// The in-memory tree model: a plain recursive data structure with no
// knowledge of how it is displayed.
//
// Children keep the order the listing API returned them in, so instead of a
// HashMap we store (name, node) pairs in a Vec. Directories are small (a few
// dozen entries) which keeps linear lookup cheap.
// =============================================================================

use serde::ser::{Serialize, SerializeMap, Serializer};

/// A file or a directory inside the tree model.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeNode {
    /// Children are only filled for directories within the two eagerly
    /// expanded levels; anything deeper is an empty directory node.
    Directory { children: NodeMap },
    /// `path` is the repository-relative path used to fetch the file.
    File { path: String },
}

impl TreeNode {
    pub fn file(path: impl Into<String>) -> Self {
        TreeNode::File { path: path.into() }
    }

    pub fn empty_dir() -> Self {
        TreeNode::Directory {
            children: NodeMap::new(),
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, TreeNode::Directory { .. })
    }

    pub fn children(&self) -> Option<&NodeMap> {
        match self {
            TreeNode::Directory { children } => Some(children),
            TreeNode::File { .. } => None,
        }
    }
}

/// Name -> node mapping that remembers insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeMap {
    entries: Vec<(String, TreeNode)>,
}

impl NodeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces `name`. A replaced entry keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, node: TreeNode) {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = node,
            None => self.entries.push((name, node)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&TreeNode> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, node)| node)
    }

    #[cfg(test)]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    #[cfg(test)]
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TreeNode)> {
        self.entries.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, TreeNode)> for NodeMap {
    fn from_iter<T: IntoIterator<Item = (String, TreeNode)>>(iter: T) -> Self {
        let mut map = NodeMap::new();
        for (name, node) in iter {
            map.insert(name, node);
        }
        map
    }
}

// Serialized as a JSON object, in insertion order.
impl Serialize for NodeMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, node) in &self.entries {
            map.serialize_entry(name, node)?;
        }
        map.end()
    }
}

/// One row of a depth-first walk over the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow<'a> {
    /// Ancestor names joined with '/'.
    pub path: String,
    pub name: &'a str,
    /// 0 for top-level entries.
    pub depth: usize,
    pub node: &'a TreeNode,
}

/// The repository as seen by the browser: built once, then read only.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct TreeModel {
    root: NodeMap,
}

impl TreeModel {
    pub fn new(root: NodeMap) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &NodeMap {
        &self.root
    }

    pub fn get(&self, name: &str) -> Option<&TreeNode> {
        self.root.get(name)
    }

    /// Finds the node at a '/'-joined path such as "Flames/H001.md".
    /// Leading, trailing and doubled slashes are ignored.
    pub fn lookup(&self, path: &str) -> Option<&TreeNode> {
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let mut node = self.get(segments.next()?)?;

        for segment in segments {
            node = node.children()?.get(segment)?;
        }

        Some(node)
    }

    /// Every node, parents before children, in listing order.
    pub fn walk(&self) -> Vec<TreeRow<'_>> {
        let mut rows = Vec::new();
        walk_into(&self.root, "", 0, &mut rows);
        rows
    }

    pub fn file_count(&self) -> usize {
        self.walk().iter().filter(|row| !row.node.is_dir()).count()
    }

    pub fn dir_count(&self) -> usize {
        self.walk().iter().filter(|row| row.node.is_dir()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

fn walk_into<'a>(map: &'a NodeMap, prefix: &str, depth: usize, rows: &mut Vec<TreeRow<'a>>) {
    for (name, node) in map.iter() {
        let path = if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", prefix, name)
        };

        rows.push(TreeRow {
            path: path.clone(),
            name,
            depth,
            node,
        });

        if let Some(children) = node.children() {
            walk_into(children, &path, depth + 1, rows);
        }
    }
}
