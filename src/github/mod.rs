// src/github/mod.rs
// =============================================================================
// This module talks to the repository host.
//
// It exposes:
// - ContentSource: the listing + raw-content interface the core depends on
// - GitHubClient: the production implementation over reqwest
// - FetchError: what either call returns when a request goes wrong
//
// Tests get an in-memory MockSource instead of the network.
// =============================================================================

mod error;
mod fetch;
mod source;

#[cfg(test)]
pub mod mock;

pub use error::FetchError;
pub use fetch::GitHubClient;
pub use source::{ContentSource, Entry, EntryKind};
