// src/session/mod.rs
// =============================================================================
// A browsing session: the state the view owns, and the channel plumbing that
// moves selections to the resolver and resolved content back.
// =============================================================================

mod browse;
mod state;

pub use browse::{parse_selection, Browser};
pub use state::{ContentState, Selection, SelectionTicket, SessionState};
