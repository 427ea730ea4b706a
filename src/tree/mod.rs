// src/tree/mod.rs
// =============================================================================
// The repository tree: which entries are hidden, what a node is, and how the
// two-level model is built from the listing API.
// =============================================================================

mod builder;
mod exclude;
mod node;

pub use builder::{build_tree, BuildError};
pub use exclude::ExclusionFilter;
pub use node::{NodeMap, TreeModel, TreeNode};
