// src/content/resolver.rs
// =============================================================================
// Turns a selection (path + is it a directory?) into text to display.
//
// Decision table:
//   file ending in .md (any case)  -> raw bytes, rendered as Markdown
//   any other file                 -> raw bytes, shown as plain text
//   directory with a README.md     -> that README, rendered as Markdown
//   directory without README.md    -> a synthesized bullet list of children
//
// A file selection whose raw fetch comes back 404 is tried once more as a
// directory. Paths below the two expanded levels are not in the tree model,
// so "Flames/2023" typed without a trailing '/' still drills down.
//
// resolve() never fails. A failed request becomes SENTINEL_TEXT so the
// caller always gets something to show and browsing keeps working.
// =============================================================================

use std::sync::Arc;

use tracing::{debug, warn};

use crate::github::{ContentSource, Entry, FetchError};
use crate::tree::ExclusionFilter;

/// Shown in place of content whenever a fetch fails.
pub const SENTINEL_TEXT: &str = "Error loading content.";

const README_NAME: &str = "README.md";

/// What the content view receives for one selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedContent {
    pub text: String,
    pub render_as_markdown: bool,
    /// True when `text` is the sentinel substituted for a failed fetch.
    pub failed: bool,
    /// Repository path of the file whose bytes are in `text`. None for
    /// synthesized listings and the sentinel.
    pub file: Option<String>,
}

impl ResolvedContent {
    pub fn markdown(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            render_as_markdown: true,
            failed: false,
            file: None,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            render_as_markdown: false,
            failed: false,
            file: None,
        }
    }

    pub fn sentinel() -> Self {
        Self {
            text: SENTINEL_TEXT.to_string(),
            render_as_markdown: false,
            failed: true,
            file: None,
        }
    }

    pub fn with_file(mut self, path: impl Into<String>) -> Self {
        self.file = Some(path.into());
        self
    }
}

/// Resolves selections against a content source.
///
/// Cheap to clone; the browse loop hands a clone to every spawned fetch.
#[derive(Clone)]
pub struct ContentResolver {
    source: Arc<dyn ContentSource>,
    filter: ExclusionFilter,
}

impl ContentResolver {
    pub fn new(source: Arc<dyn ContentSource>, filter: ExclusionFilter) -> Self {
        Self { source, filter }
    }

    pub async fn resolve(&self, path: &str, is_directory: bool) -> ResolvedContent {
        if is_directory {
            return self.resolve_directory(path).await;
        }

        match self.fetch_file(path).await {
            Ok(content) => content,
            Err(e) if e.status() == Some(404) => {
                debug!(path, "no such file, trying it as a directory");
                self.resolve_directory(path).await
            }
            Err(e) => sentinel_for(path, &e),
        }
    }

    async fn fetch_file(&self, path: &str) -> Result<ResolvedContent, FetchError> {
        let text = self.source.fetch_raw(path).await?;

        let content = if is_markdown_path(path) {
            ResolvedContent::markdown(text)
        } else {
            ResolvedContent::plain(text)
        };
        Ok(content.with_file(path))
    }

    async fn resolve_directory(&self, path: &str) -> ResolvedContent {
        let listing = match self.source.list_contents(path).await {
            Ok(listing) => listing,
            Err(e) => return sentinel_for(path, &e),
        };

        let readme = listing
            .iter()
            .find(|entry| !entry.is_dir() && entry.name.eq_ignore_ascii_case(README_NAME));

        match readme {
            Some(readme) => {
                debug!(dir = path, readme = %readme.path, "directory has a README");
                self.fetch_file(&readme.path)
                    .await
                    .unwrap_or_else(|e| sentinel_for(&readme.path, &e))
            }
            None => {
                let visible: Vec<&Entry> = listing
                    .iter()
                    .filter(|entry| !self.filter.is_excluded(&entry.name))
                    .collect();
                ResolvedContent::markdown(synthesize_listing(path, &visible))
            }
        }
    }
}

/// True for paths ending in ".md", ignoring case.
fn is_markdown_path(path: &str) -> bool {
    path.to_ascii_lowercase().ends_with(".md")
}

fn sentinel_for(path: &str, error: &FetchError) -> ResolvedContent {
    warn!(path, error = %error, "showing sentinel instead of content");
    ResolvedContent::sentinel()
}

// Markdown bullet list of a directory's children, directories marked "/".
fn synthesize_listing(path: &str, entries: &[&Entry]) -> String {
    let title = path
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or("/");

    let mut text = format!("# {}\n\n", escape_markdown(title));

    if entries.is_empty() {
        text.push_str("_This directory is empty._\n");
        return text;
    }

    for entry in entries {
        let suffix = if entry.is_dir() { "/" } else { "" };
        text.push_str(&format!("- {}{}\n", escape_markdown(&entry.name), suffix));
    }

    text
}

// File names like "H_001_*.md" must not turn into emphasis, "a&amp;b" must
// not become an entity, and "1. intro" or "-draft" must not start a list.
fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 4);

    if text.starts_with('-') || text.starts_with('+') {
        escaped.push('\\');
    }

    // Digits directly followed by '.' or ')' read as an ordered-list marker.
    let digits = text.chars().take_while(|c| c.is_ascii_digit()).count();
    let ordered_marker = digits > 0 && matches!(text[digits..].chars().next(), Some('.' | ')'));

    for (i, c) in text.chars().enumerate() {
        if matches!(
            c,
            '\\' | '`' | '*' | '_' | '[' | ']' | '<' | '>' | '#' | '|' | '!' | '&'
        ) || (ordered_marker && i == digits)
        {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
