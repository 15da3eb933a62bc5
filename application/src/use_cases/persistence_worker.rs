//! Persistence worker
//!
//! Saves the shared state after a quiet period following each committed
//! change. Save failures are logged and otherwise ignored; orchestration
//! never waits on disk.

use crate::ports::persistence::StatePersistence;
use crate::state::SharedStateStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub struct PersistenceWorker {
    persistence: Arc<dyn StatePersistence>,
    store: Arc<SharedStateStore>,
    debounce: Duration,
}

impl PersistenceWorker {
    pub fn new(
        persistence: Arc<dyn StatePersistence>,
        store: Arc<SharedStateStore>,
        debounce: Duration,
    ) -> Self {
        Self {
            persistence,
            store,
            debounce,
        }
    }

    /// Save the current state now. Returns whether the save succeeded.
    pub async fn flush(&self) -> bool {
        let state = self.store.snapshot();
        match self.persistence.save(&state).await {
            Ok(()) => {
                debug!(revision = self.store.revision(), "State saved");
                true
            }
            Err(e) => {
                warn!("Failed to save state: {}", e);
                false
            }
        }
    }

    /// Run until cancelled. Pending changes are flushed on the way out.
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        let mut rx = self.store.subscribe();
        rx.mark_unchanged();

        tokio::spawn(async move {
            let mut dirty = false;
            loop {
                if dirty {
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        changed = rx.changed() => {
                            if changed.is_err() {
                                break;
                            }
                            // Another change inside the quiet period restarts it.
                        }
                        _ = tokio::time::sleep(self.debounce) => {
                            self.flush().await;
                            dirty = false;
                        }
                    }
                } else {
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        changed = rx.changed() => {
                            if changed.is_err() {
                                break;
                            }
                            dirty = true;
                        }
                    }
                }
            }

            if dirty || rx.has_changed().unwrap_or(false) {
                self.flush().await;
            }
            debug!("Persistence worker stopped");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::persistence::PersistenceError;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use synclab_domain::{ContextPatch, ContextState};

    #[derive(Default)]
    struct MemoryPersistence {
        saves: Mutex<Vec<ContextState>>,
        fail: bool,
    }

    #[async_trait]
    impl StatePersistence for MemoryPersistence {
        async fn load(&self) -> Result<Option<ContextState>, PersistenceError> {
            Ok(self.saves.lock().unwrap().last().cloned())
        }

        async fn save(&self, state: &ContextState) -> Result<(), PersistenceError> {
            if self.fail {
                return Err(PersistenceError::Serialization("disk full".to_string()));
            }
            self.saves.lock().unwrap().push(state.clone());
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_is_saved_once_after_quiet_period() {
        let persistence = Arc::new(MemoryPersistence::default());
        let store = Arc::new(SharedStateStore::default());
        let worker = PersistenceWorker::new(
            persistence.clone(),
            store.clone(),
            Duration::from_millis(500),
        );
        let cancel = CancellationToken::new();
        let handle = worker.spawn(cancel.clone());

        for i in 0..3 {
            store.merge(&ContextPatch::new().scratchpad(format!("draft {}", i)));
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert!(persistence.saves.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_secs(1)).await;
        {
            let saves = persistence.saves.lock().unwrap();
            assert_eq!(saves.len(), 1);
            assert_eq!(saves[0].scratchpad, "draft 2");
        }

        cancel.cancel();
        handle.await.unwrap();
        assert_eq!(persistence.saves.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_change_is_flushed_on_shutdown() {
        let persistence = Arc::new(MemoryPersistence::default());
        let store = Arc::new(SharedStateStore::default());
        let worker = PersistenceWorker::new(
            persistence.clone(),
            store.clone(),
            Duration::from_secs(60),
        );
        let cancel = CancellationToken::new();
        let handle = worker.spawn(cancel.clone());

        store.merge(&ContextPatch::new().objective("Ship"));
        tokio::task::yield_now().await;
        cancel.cancel();
        handle.await.unwrap();

        let saves = persistence.saves.lock().unwrap();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0].objective, "Ship");
    }

    #[tokio::test]
    async fn test_failed_save_is_not_fatal() {
        let persistence = Arc::new(MemoryPersistence {
            fail: true,
            ..Default::default()
        });
        let store = Arc::new(SharedStateStore::default());
        let worker = PersistenceWorker::new(persistence, store, Duration::from_millis(1));
        assert!(!worker.flush().await);
    }
}
