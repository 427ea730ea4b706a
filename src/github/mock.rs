// src/github/mock.rs
// In-memory ContentSource for tests. Records every call, can fail chosen
// paths, and can hold a raw fetch open until the test releases it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use super::{ContentSource, Entry, FetchError};

#[derive(Default)]
pub struct MockSource {
    listings: HashMap<String, Result<Vec<Entry>, FetchError>>,
    files: HashMap<String, Result<String, FetchError>>,
    gates: HashMap<String, Arc<Notify>>,
    listing_gates: HashMap<String, Arc<Notify>>,
    list_calls: Mutex<Vec<String>>,
    raw_calls: Mutex<Vec<String>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listing(mut self, path: &str, entries: Vec<Entry>) -> Self {
        self.listings.insert(path.to_string(), Ok(entries));
        self
    }

    pub fn with_failing_listing(mut self, path: &str, status: u16) -> Self {
        self.listings
            .insert(path.to_string(), Err(status_error(path, status)));
        self
    }

    pub fn with_file(mut self, path: &str, text: &str) -> Self {
        self.files.insert(path.to_string(), Ok(text.to_string()));
        self
    }

    pub fn with_failing_file(mut self, path: &str, status: u16) -> Self {
        self.files.insert(path.to_string(), Err(status_error(path, status)));
        self
    }

    /// Makes raw fetches of `path` wait until the returned Notify is
    /// signalled. A signal sent before the fetch starts is remembered.
    pub fn gate_file(&mut self, path: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates.insert(path.to_string(), gate.clone());
        gate
    }

    /// Same as `gate_file`, for directory listings.
    pub fn gate_listing(&mut self, path: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.listing_gates.insert(path.to_string(), gate.clone());
        gate
    }

    pub fn list_calls(&self) -> Vec<String> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn raw_calls(&self) -> Vec<String> {
        self.raw_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentSource for MockSource {
    async fn list_contents(&self, path: &str) -> Result<Vec<Entry>, FetchError> {
        self.list_calls.lock().unwrap().push(path.to_string());

        if let Some(gate) = self.listing_gates.get(path) {
            gate.notified().await;
        }

        self.listings
            .get(path)
            .cloned()
            .unwrap_or_else(|| Err(status_error(path, 404)))
    }

    async fn fetch_raw(&self, path: &str) -> Result<String, FetchError> {
        self.raw_calls.lock().unwrap().push(path.to_string());

        if let Some(gate) = self.gates.get(path) {
            gate.notified().await;
        }

        self.files
            .get(path)
            .cloned()
            .unwrap_or_else(|| Err(status_error(path, 404)))
    }
}

fn status_error(path: &str, status: u16) -> FetchError {
    FetchError::Status {
        url: format!("mock://{}", path),
        status,
    }
}
