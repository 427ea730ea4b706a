// src/content/mod.rs
// =============================================================================
// Content resolution and display.
//
// Submodules:
// - resolver: selection -> fetched text + Markdown/plain flag (never fails)
// - render: resolved text -> what gets printed in the terminal
// =============================================================================

mod render;
mod resolver;

pub use render::render;
pub use resolver::{ContentResolver, ResolvedContent};
