//! Append-only transcript shared between use cases.

use std::sync::Arc;
use synclab_domain::{NewEntry, Transcript, TranscriptEntry};
use tokio::sync::RwLock;

/// Cloneable handle to the session transcript.
///
/// Writers only append, so readers may take windows at any time.
#[derive(Debug, Clone, Default)]
pub struct SharedTranscript {
    inner: Arc<RwLock<Transcript>>,
}

impl SharedTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and return the stored copy.
    pub async fn append(&self, entry: NewEntry) -> TranscriptEntry {
        self.inner.write().await.append(entry).clone()
    }

    /// The most recent `window` entries, oldest first.
    pub async fn recent(&self, window: usize) -> Vec<TranscriptEntry> {
        self.inner.read().await.recent(window).to_vec()
    }

    pub async fn entries(&self) -> Vec<TranscriptEntry> {
        self.inner.read().await.entries().to_vec()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}
