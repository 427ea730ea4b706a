// src/session/browse.rs
// =============================================================================
// Wires the tree view to the content resolver with two channels:
//
//   tree view --(ticket, selection)--> resolver worker
//   resolver worker --(ContentEvent)--> tree view / content view
//
// The worker spawns one task per selection and never cancels anything. The
// receiving side runs every event through SessionState::complete, so a slow
// answer to an old selection can never replace the answer to a newer one.
// =============================================================================

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use super::{ContentState, SelectionTicket, Selection, SessionState};
use crate::content::{ContentResolver, ResolvedContent};
use crate::tree::TreeModel;

const CHANNEL_CAPACITY: usize = 32;

/// A resolved selection travelling back to the view. The selection itself
/// stays in SessionState; the ticket says which one this answers.
#[derive(Debug, Clone)]
pub struct ContentEvent {
    pub ticket: SelectionTicket,
    pub content: ResolvedContent,
}

#[derive(Debug, Error)]
pub enum BrowseError {
    #[error("resolver worker has stopped")]
    WorkerStopped,
}

/// A running browsing session.
pub struct Browser {
    state: SessionState,
    requests: mpsc::Sender<(SelectionTicket, Selection)>,
    events: mpsc::Receiver<ContentEvent>,
    worker: JoinHandle<()>,
}

impl Browser {
    /// Starts the resolver worker. Must be called inside a tokio runtime.
    pub fn start(tree: Arc<TreeModel>, resolver: ContentResolver) -> Self {
        let (requests, request_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (event_tx, events) = mpsc::channel(CHANNEL_CAPACITY);

        let worker = tokio::spawn(run_worker(resolver, request_rx, event_tx));

        Self {
            state: SessionState::new(tree),
            requests,
            events,
            worker,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Records the selection and hands it to the worker.
    pub async fn select(&mut self, selection: Selection) -> Result<SelectionTicket, BrowseError> {
        let ticket = self.state.select(selection.clone());
        self.requests
            .send((ticket, selection))
            .await
            .map_err(|_| BrowseError::WorkerStopped)?;
        Ok(ticket)
    }

    /// Next event from the worker, applied or not. None once the worker is
    /// gone and nothing is left in the channel.
    pub async fn recv(&mut self) -> Option<ContentEvent> {
        self.events.recv().await
    }

    /// Runs an event through the ordering check. True if it is now shown.
    pub fn apply(&mut self, event: ContentEvent) -> bool {
        self.state.complete(event.ticket, event.content)
    }

    /// Waits until the current selection is resolved, dropping stale events
    /// on the way.
    pub async fn wait_current(&mut self) -> Option<ResolvedContent> {
        loop {
            if let ContentState::Resolved(content) = self.state.content() {
                return Some(content.clone());
            }

            let event = self.recv().await?;
            self.apply(event);
        }
    }
}

impl Drop for Browser {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

/// Maps a line typed by the user to a selection.
///
/// Paths known to the tree model take their kind from it; a trailing '/'
/// forces a directory (useful below the two expanded levels); anything else
/// is treated as a file.
pub fn parse_selection(tree: &TreeModel, input: &str) -> Option<Selection> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if input == "/" {
        return Some(Selection::dir(""));
    }

    let path = input.trim_matches('/').to_string();

    if input.ends_with('/') {
        return Some(Selection::dir(path));
    }

    let selection = match tree.lookup(&path) {
        Some(node) if node.is_dir() => Selection::dir(path),
        _ => Selection::file(path),
    };
    Some(selection)
}

async fn run_worker(
    resolver: ContentResolver,
    mut requests: mpsc::Receiver<(SelectionTicket, Selection)>,
    events: mpsc::Sender<ContentEvent>,
) {
    while let Some((ticket, selection)) = requests.recv().await {
        let resolver = resolver.clone();
        let events = events.clone();

        tokio::spawn(async move {
            let content = resolver.resolve(&selection.path, selection.is_dir).await;
            let event = ContentEvent { ticket, content };

            if events.send(event).await.is_err() {
                debug!(seq = ticket.sequence(), "view closed before result arrived");
            }
        });
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Tickets
//    - Old tasks are never cancelled; they run to completion
//    - Their events carry an older ticket and SessionState::complete drops them
//
// 2. Cloning the resolver per task
//    - tokio::spawn needs a 'static future, so each task owns its handle
//    - The clone is an Arc bump plus the exclusion set
// -----------------------------------------------------------------------------
