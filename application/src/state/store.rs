//! Shared state store.
//!
//! Owns the single [`ContextState`]. Every write goes through
//! [`merge`](SharedStateStore::merge) or [`replace`](SharedStateStore::replace),
//! which run under the channel's write lock, so writes are atomic and totally
//! ordered. Readers get cloned snapshots; subscribers are woken on each
//! committed change.

use synclab_domain::{ContextField, ContextPatch, ContextState};
use tokio::sync::watch;
use tracing::debug;

/// A committed version of the state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateRevision {
    /// Increases by one per committed change. Zero is the initial state.
    pub revision: u64,
    pub state: ContextState,
    /// Fields touched by the write that produced this revision.
    pub changed: Vec<ContextField>,
}

#[derive(Debug)]
pub struct SharedStateStore {
    tx: watch::Sender<StateRevision>,
}

impl SharedStateStore {
    pub fn new(initial: ContextState) -> Self {
        let (tx, _rx) = watch::channel(StateRevision {
            revision: 0,
            state: initial,
            changed: Vec::new(),
        });
        Self { tx }
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> ContextState {
        self.tx.borrow().state.clone()
    }

    pub fn revision(&self) -> u64 {
        self.tx.borrow().revision
    }

    /// Merge a partial update. Returns the fields whose value actually
    /// changed; an empty result means nothing was committed.
    pub fn merge(&self, patch: &ContextPatch) -> Vec<ContextField> {
        if patch.is_empty() {
            return Vec::new();
        }

        let mut changed = Vec::new();
        self.tx.send_if_modified(|current| {
            changed = current.state.apply(patch);
            if changed.is_empty() {
                return false;
            }
            current.revision += 1;
            current.changed = changed.clone();
            true
        });

        if !changed.is_empty() {
            debug!(?changed, revision = self.revision(), "state merged");
        }
        changed
    }

    /// Replace the whole state. Returns the fields that differ.
    pub fn replace(&self, state: ContextState) -> Vec<ContextField> {
        let mut changed = Vec::new();
        self.tx.send_if_modified(|current| {
            changed = ContextField::ALL
                .into_iter()
                .filter(|field| current.state.field(*field) != state.field(*field))
                .collect();
            if changed.is_empty() {
                return false;
            }
            current.revision += 1;
            current.state = state;
            current.changed = changed.clone();
            true
        });
        changed
    }

    /// Receiver woken on every committed change.
    pub fn subscribe(&self) -> watch::Receiver<StateRevision> {
        self.tx.subscribe()
    }
}

impl Default for SharedStateStore {
    fn default() -> Self {
        Self::new(ContextState::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_reports_only_changed_fields() {
        let store = SharedStateStore::new(ContextState::default().with_objective("Ship"));
        let patch = ContextPatch::new().objective("Ship").scratchpad("notes");
        assert_eq!(store.merge(&patch), vec![ContextField::Scratchpad]);
        assert_eq!(store.revision(), 1);
        assert_eq!(store.snapshot().scratchpad, "notes");
    }

    #[test]
    fn test_noop_merge_does_not_bump_revision() {
        let store = SharedStateStore::new(ContextState::default().with_objective("Ship"));
        assert!(store.merge(&ContextPatch::new().objective("Ship")).is_empty());
        assert!(store.merge(&ContextPatch::new()).is_empty());
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_later_merge_wins_field_by_field() {
        let store = SharedStateStore::default();
        store.merge(&ContextPatch::new().objective("A").scratchpad("first"));
        store.merge(&ContextPatch::new().scratchpad("second"));
        let state = store.snapshot();
        assert_eq!(state.objective, "A");
        assert_eq!(state.scratchpad, "second");
    }

    #[test]
    fn test_replace() {
        let store = SharedStateStore::new(
            ContextState::default()
                .with_objective("Ship")
                .with_artifact("a.rs", "fn a() {}"),
        );
        let changed = store.replace(ContextState::default());
        assert_eq!(
            changed,
            vec![
                ContextField::Objective,
                ContextField::ArtifactName,
                ContextField::ArtifactContent
            ]
        );
        assert!(store.snapshot().is_empty());
        assert!(store.replace(ContextState::default()).is_empty());
    }

    #[tokio::test]
    async fn test_subscribers_see_commits() {
        let store = SharedStateStore::default();
        let mut rx = store.subscribe();
        store.merge(&ContextPatch::new().artifact_content("fn main() {}"));
        rx.changed().await.unwrap();
        let seen = rx.borrow_and_update().clone();
        assert_eq!(seen.revision, 1);
        assert_eq!(seen.changed, vec![ContextField::ArtifactContent]);
        assert_eq!(seen.state.artifact_content, "fn main() {}");
    }
}
