//! # Vehicle Selector Store
//!
//! Keeps the most recently submitted vehicle identification in one JSON file.
//!
//! - Writes go to `<file>.tmp` first and are renamed over the target, so a
//!   reader sees either the old or the new identification, never half of one.
//! - One async mutex covers both reads and writes.
//! - The store is an ordinary value owned by the application state; nothing
//!   here is global.

use recall_core::VehicleIdentification;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from the vehicle store
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid vehicle identification: {0}")]
    Invalid(#[from] recall_core::Error),

    #[error("No vehicle identification has been submitted yet")]
    NotSet,

    #[error("Storage I/O failed for {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Stored vehicle identification is unreadable: {0}")]
    Corrupt(String),

    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// File-backed single-slot store
#[derive(Debug)]
pub struct VehicleStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl VehicleStore {
    /// Create a store backed by the given file (created on first save)
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "vehicle_data.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Validate a raw request body and persist it.
    ///
    /// Invalid bodies are rejected before the file is touched.
    pub async fn save_json(&self, body: &Value) -> Result<VehicleIdentification> {
        let identification = VehicleIdentification::from_json(body)?;
        self.save(&identification).await?;
        Ok(identification)
    }

    /// Replace the stored identification
    pub async fn save(&self, identification: &VehicleIdentification) -> Result<()> {
        let content = serde_json::to_vec_pretty(identification)?;

        let _guard = self.lock.lock().await;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::io(parent, e))?;
        }

        let temp_path = self.temp_path();
        if let Err(e) = write_synced(&temp_path, &content).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(Error::io(&temp_path, e));
        }

        if let Err(e) = tokio::fs::rename(&temp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(Error::io(&self.path, e));
        }

        tracing::debug!(vehicle = %identification, path = %self.path.display(), "Saved vehicle identification");
        Ok(())
    }

    /// Read the stored identification
    pub async fn load(&self) -> Result<VehicleIdentification> {
        let _guard = self.lock.lock().await;

        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(Error::NotSet),
            Err(e) => return Err(Error::io(&self.path, e)),
        };

        let value: Value =
            serde_json::from_slice(&bytes).map_err(|e| Error::Corrupt(e.to_string()))?;
        VehicleIdentification::from_json(&value).map_err(|e| Error::Corrupt(e.to_string()))
    }

    /// Check whether anything has been saved yet
    pub async fn exists(&self) -> bool {
        let _guard = self.lock.lock().await;
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }
}

async fn write_synced(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(content).await?;
    file.sync_all().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let store = VehicleStore::at_path(dir.path().join("vehicle_data.json"));

        let id = VehicleIdentification::new("Honda", "Civic", "2018");
        store.save(&id).await.unwrap();

        assert_eq!(store.load().await.unwrap(), id);
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let dir = tempdir().unwrap();
        let store = VehicleStore::at_path(dir.path().join("vehicle_data.json"));

        store
            .save(&VehicleIdentification::new("Honda", "Civic", "2018"))
            .await
            .unwrap();
        let second = VehicleIdentification::new("Ford", "Focus", "2014");
        store.save(&second).await.unwrap();

        assert_eq!(store.load().await.unwrap(), second);
        assert!(!store.temp_path().exists());
    }

    #[tokio::test]
    async fn test_load_before_save() {
        let dir = tempdir().unwrap();
        let store = VehicleStore::at_path(dir.path().join("vehicle_data.json"));

        assert!(!store.exists().await);
        assert!(matches!(store.load().await, Err(Error::NotSet)));
    }

    #[tokio::test]
    async fn test_invalid_body_never_touches_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vehicle_data.json");
        let store = VehicleStore::at_path(&path);

        let first = VehicleIdentification::new("Kia", "Soul", "2020");
        store.save(&first).await.unwrap();
        let before = std::fs::read(&path).unwrap();

        for body in [json!([1, 2, 3]), json!("Kia"), json!(null), json!({"make": "Kia"})] {
            let err = store.save_json(&body).await.unwrap_err();
            assert!(matches!(err, Error::Invalid(_)));
        }

        assert_eq!(std::fs::read(&path).unwrap(), before);
        assert_eq!(store.load().await.unwrap(), first);
    }

    #[tokio::test]
    async fn test_save_json_returns_identification() {
        let dir = tempdir().unwrap();
        let store = VehicleStore::at_path(dir.path().join("nested/dir/vehicle.json"));

        let saved = store
            .save_json(&json!({"make": "Tesla", "model": "Model 3", "model_year": 2021}))
            .await
            .unwrap();

        assert_eq!(saved.model_year, "2021");
        assert_eq!(store.load().await.unwrap(), saved);
    }

    #[tokio::test]
    async fn test_storage_failure_is_reported() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();
        let store = VehicleStore::at_path(blocker.join("vehicle.json"));

        let err = store
            .save(&VehicleIdentification::new("Kia", "Soul", "2020"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[tokio::test]
    async fn test_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vehicle_data.json");
        std::fs::write(&path, b"{ not json").unwrap();
        let store = VehicleStore::at_path(&path);

        assert!(matches!(store.load().await, Err(Error::Corrupt(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writers_never_interleave() {
        let dir = tempdir().unwrap();
        let store = Arc::new(VehicleStore::at_path(dir.path().join("vehicle_data.json")));

        let candidates: Vec<VehicleIdentification> = (0..32)
            .map(|i| {
                VehicleIdentification::new(
                    format!("Make{i}").repeat(i + 1),
                    format!("Model{i}"),
                    format!("{}", 1990 + i),
                )
            })
            .collect();

        let mut handles = Vec::new();
        for id in candidates.clone() {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.save(&id).await.unwrap();
                // every read observes a complete identification
                let seen = store.load().await.unwrap();
                assert!(seen.make.starts_with("Make"));
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let last = store.load().await.unwrap();
        assert!(candidates.contains(&last));

        // one more sequential write still wins
        let final_id = VehicleIdentification::new("Final", "Write", "2024");
        store.save(&final_id).await.unwrap();
        assert_eq!(store.load().await.unwrap(), final_id);
    }
}
