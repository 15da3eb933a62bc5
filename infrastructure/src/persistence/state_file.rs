//! JSON file persistence for the shared state.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use synclab_application::ports::persistence::{PersistenceError, StatePersistence};
use synclab_domain::ContextState;
use tracing::debug;

/// Stores the [`ContextState`] as pretty-printed JSON.
///
/// Writes go to a sibling temp file that is then renamed over the target, so
/// a crash mid-write leaves the previous state intact.
pub struct JsonFileStatePersistence {
    path: PathBuf,
}

impl JsonFileStatePersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "state.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl StatePersistence for JsonFileStatePersistence {
    async fn load(&self) -> Result<Option<ContextState>, PersistenceError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let state = serde_json::from_str(&raw).map_err(|e| {
            PersistenceError::Serialization(format!("{}: {}", self.path.display(), e))
        })?;
        debug!(path = %self.path.display(), "Loaded state");
        Ok(Some(state))
    }

    async fn save(&self, state: &ContextState) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(state)
            .map_err(|e| PersistenceError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, json).await?;
        tokio::fs::rename(&temp, &self.path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let persistence = JsonFileStatePersistence::new(dir.path().join("state.json"));
        assert!(persistence.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("state.json");
        let persistence = JsonFileStatePersistence::new(&path);
        let state = ContextState::default()
            .with_objective("Ship the parser")
            .with_scratchpad("lexer done")
            .with_artifact("parser.rs", "fn parse() {}\n");

        persistence.save(&state).await.unwrap();
        assert!(path.exists());
        assert!(!persistence.temp_path().exists());

        let loaded = persistence.load().await.unwrap();
        assert_eq!(loaded, Some(state));
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_state() {
        let dir = tempfile::tempdir().unwrap();
        let persistence = JsonFileStatePersistence::new(dir.path().join("state.json"));
        persistence
            .save(&ContextState::default().with_objective("first"))
            .await
            .unwrap();
        persistence
            .save(&ContextState::default().with_objective("second"))
            .await
            .unwrap();

        let loaded = persistence.load().await.unwrap().unwrap();
        assert_eq!(loaded.objective, "second");
    }

    #[tokio::test]
    async fn test_corrupt_file_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{ not json").unwrap();

        let persistence = JsonFileStatePersistence::new(&path);
        let err = persistence.load().await.unwrap_err();
        assert!(matches!(err, PersistenceError::Serialization(_)));
    }
}
