// src/session/state.rs
// =============================================================================
// Session state owned by the presentation layer.
//
// The tree model is shared read-only. Everything that changes while the user
// browses (current selection, what the content pane shows) lives here and is
// only changed through `select` and `complete`.
//
// Ordering: every selection gets the next sequence number. A resolved result
// is applied only if it carries the CURRENT number; anything older is
// dropped. Both methods take `&mut self`, so the check and the update can
// never interleave with another selection.
// =============================================================================

use std::sync::Arc;

use tracing::debug;

use crate::content::ResolvedContent;
use crate::tree::TreeModel;

/// What the user picked in the tree view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub path: String,
    pub is_dir: bool,
}

impl Selection {
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_dir: false,
        }
    }

    pub fn dir(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_dir: true,
        }
    }
}

/// Sequence number handed out for one selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SelectionTicket(u64);

impl SelectionTicket {
    pub fn sequence(self) -> u64 {
        self.0
    }
}

/// What the content pane currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentState {
    /// Nothing selected yet.
    Idle,
    /// A fetch for the current selection is in flight. Prior content is not
    /// kept around; the pane shows a loading placeholder instead.
    Loading,
    Resolved(ResolvedContent),
}

#[derive(Debug)]
pub struct SessionState {
    tree: Arc<TreeModel>,
    selection: Option<Selection>,
    content: ContentState,
    sequence: u64,
}

impl SessionState {
    pub fn new(tree: Arc<TreeModel>) -> Self {
        Self {
            tree,
            selection: None,
            content: ContentState::Idle,
            sequence: 0,
        }
    }

    pub fn tree(&self) -> &TreeModel {
        &self.tree
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn content(&self) -> &ContentState {
        &self.content
    }

    /// Records a new selection and returns its ticket.
    pub fn select(&mut self, selection: Selection) -> SelectionTicket {
        self.sequence += 1;
        debug!(seq = self.sequence, path = %selection.path, dir = selection.is_dir, "selected");

        self.selection = Some(selection);
        self.content = ContentState::Loading;
        SelectionTicket(self.sequence)
    }

    pub fn is_current(&self, ticket: SelectionTicket) -> bool {
        ticket.0 == self.sequence
    }

    /// Applies a resolved result if it belongs to the current selection.
    /// Returns false (and leaves the state alone) for stale results.
    pub fn complete(&mut self, ticket: SelectionTicket, content: ResolvedContent) -> bool {
        if !self.is_current(ticket) {
            debug!(
                stale = ticket.0,
                current = self.sequence,
                "discarding result of an older selection"
            );
            return false;
        }

        self.content = ContentState::Resolved(content);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> SessionState {
        SessionState::new(Arc::new(TreeModel::default()))
    }

    #[test]
    fn test_starts_idle() {
        let state = state();
        assert_eq!(state.content(), &ContentState::Idle);
        assert_eq!(state.selection(), None);
    }

    #[test]
    fn test_select_switches_to_loading() {
        let mut state = state();
        let ticket = state.select(Selection::file("notes.md"));

        assert_eq!(ticket.sequence(), 1);
        assert_eq!(state.content(), &ContentState::Loading);
        assert_eq!(state.selection(), Some(&Selection::file("notes.md")));
    }

    #[test]
    fn test_current_result_is_applied() {
        let mut state = state();
        let ticket = state.select(Selection::file("notes.md"));

        assert!(state.complete(ticket, ResolvedContent::markdown("hi")));
        assert_eq!(
            state.content(),
            &ContentState::Resolved(ResolvedContent::markdown("hi"))
        );
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let mut state = state();
        let first = state.select(Selection::file("a.md"));
        let second = state.select(Selection::dir("B"));

        assert!(state.complete(second, ResolvedContent::markdown("B")));
        assert!(!state.complete(first, ResolvedContent::markdown("A")));

        assert_eq!(
            state.content(),
            &ContentState::Resolved(ResolvedContent::markdown("B"))
        );
        assert_eq!(state.selection(), Some(&Selection::dir("B")));
    }

    #[test]
    fn test_stale_result_does_not_end_loading() {
        let mut state = state();
        let first = state.select(Selection::file("a.md"));
        let _second = state.select(Selection::file("b.md"));

        assert!(!state.complete(first, ResolvedContent::plain("a")));
        assert_eq!(state.content(), &ContentState::Loading);
    }
}
