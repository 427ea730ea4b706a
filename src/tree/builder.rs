// src/tree/builder.rs
// =============================================================================
// Builds the two-level tree model from the listing API.
//
// How it works:
// 1. List the repository root
// 2. Drop excluded names
// 3. For each remaining directory, list it once more and keep its
//    non-excluded children as shallow nodes (grandchildren are NOT listed)
// 4. Files become file nodes holding their repository path
//
// Directory listings run concurrently, but through an ORDERED buffer: the
// result always comes out in root-listing order no matter which request
// finishes first.
//
// Any failed listing aborts the whole build. A partially built tree would
// silently hide content, so the caller gets the error and can retry.
// =============================================================================

use futures::stream::{self, StreamExt, TryStreamExt};
use thiserror::Error;
use tracing::{debug, info};

use super::{ExclusionFilter, NodeMap, TreeModel, TreeNode};
use crate::config::LISTING_CONCURRENCY;
use crate::github::{ContentSource, Entry, EntryKind, FetchError};

#[derive(Debug, Error)]
pub enum BuildError {
    /// The root or one of the directory listings could not be fetched.
    #[error("could not list repository contents: {0}")]
    Fetch(#[from] FetchError),

    /// The root listing worked but came back with nothing in it.
    #[error("repository is empty")]
    EmptyRepository,
}

/// Lists the repository and assembles the tree model.
pub async fn build_tree(
    source: &dyn ContentSource,
    filter: &ExclusionFilter,
) -> Result<TreeModel, BuildError> {
    let root = source.list_contents("").await?;

    if root.is_empty() {
        return Err(BuildError::EmptyRepository);
    }

    let visible: Vec<Entry> = root
        .into_iter()
        .filter(|entry| {
            let excluded = filter.is_excluded(&entry.name);
            if excluded {
                debug!(name = %entry.name, "excluded at root");
            }
            !excluded
        })
        .collect();

    // `buffered` (not `buffer_unordered`) yields results in input order.
    let nodes: Vec<(String, TreeNode)> = stream::iter(visible)
        .map(|entry| build_entry(source, filter, entry))
        .buffered(LISTING_CONCURRENCY)
        .try_collect()
        .await?;

    let tree = TreeModel::new(nodes.into_iter().collect());
    info!(
        top_level = tree.root().len(),
        files = tree.file_count(),
        dirs = tree.dir_count(),
        "built repository tree"
    );

    Ok(tree)
}

// Turns one top-level entry into its node, listing it if it is a directory.
async fn build_entry(
    source: &dyn ContentSource,
    filter: &ExclusionFilter,
    entry: Entry,
) -> Result<(String, TreeNode), FetchError> {
    match entry.kind {
        EntryKind::File => Ok((entry.name, TreeNode::file(entry.path))),
        EntryKind::Dir => {
            let listing = source.list_contents(&entry.path).await?;

            let children: NodeMap = listing
                .into_iter()
                .filter(|child| !filter.is_excluded(&child.name))
                .map(|child| {
                    let node = match child.kind {
                        EntryKind::Dir => TreeNode::empty_dir(),
                        EntryKind::File => TreeNode::file(child.path),
                    };
                    (child.name, node)
                })
                .collect();

            debug!(dir = %entry.path, children = children.len(), "expanded directory");
            Ok((entry.name, TreeNode::Directory { children }))
        }
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. buffered vs buffer_unordered
//    - Both keep up to N futures running at once
//    - buffer_unordered yields results as they finish
//    - buffered yields them in the order the futures were created, holding
//      early finishers back until their turn
//
// 2. try_collect
//    - Collects a stream of Result into Result<Vec<_>>
//    - Stops at the first Err, which is how one failed listing aborts the
//      whole build
// -----------------------------------------------------------------------------
