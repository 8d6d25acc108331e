use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;
use tokio::fs;

use crate::models::ProfileRecord;

/// Profile persistence failure
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Profile store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Profile store serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Persistence for the profile list
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Stored profiles; unreadable or corrupt data yields an empty list
    async fn list(&self) -> Vec<ProfileRecord>;
    /// Replace the stored list
    async fn save(&self, profiles: &[ProfileRecord]) -> Result<(), StoreError>;
}

/// JSON file store
pub struct JsonFileProfileStore {
    path: PathBuf,
}

impl JsonFileProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

#[async_trait]
impl ProfileStore for JsonFileProfileStore {
    async fn list(&self) -> Vec<ProfileRecord> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read profile store {}: {}", self.path.display(), e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<ProfileRecord>>(&content) {
            Ok(profiles) => profiles,
            Err(e) => {
                tracing::warn!(
                    "Corrupt profile data in {}, resetting: {}",
                    self.path.display(),
                    e
                );
                if let Err(e) = fs::remove_file(&self.path).await {
                    tracing::warn!(
                        "Failed to reset profile store {}: {}",
                        self.path.display(),
                        e
                    );
                }
                Vec::new()
            }
        }
    }

    async fn save(&self, profiles: &[ProfileRecord]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let data = serde_json::to_vec_pretty(profiles)?;
        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, &data).await?;
        fs::rename(&tmp_path, &self.path).await?;

        tracing::debug!("Saved {} profiles to {}", profiles.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, TempDir};

    fn temp_store_path() -> (TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("profiles").join("profiles.json");
        (dir, path)
    }

    fn playlist(id: &str) -> ProfileRecord {
        ProfileRecord::Playlist {
            id: id.to_string(),
            name: format!("Profile {}", id),
            url: format!("http://example.com/{}.m3u", id),
            epg_url: None,
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let (_dir, path) = temp_store_path();
        let store = JsonFileProfileStore::new(path);
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_save_then_list() {
        let (_dir, path) = temp_store_path();
        let store = JsonFileProfileStore::new(&path);
        let profiles = vec![
            playlist("a"),
            ProfileRecord::Portal {
                id: "b".to_string(),
                name: "Portal".to_string(),
                portal_url: "http://portal".to_string(),
                mac_address: "00:1A:79:00:00:02".to_string(),
            },
        ];

        store.save(&profiles).await.unwrap();
        assert_eq!(store.list().await, profiles);
        assert!(!store.tmp_path().exists());
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_resets() {
        let (_dir, path) = temp_store_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"{not json").unwrap();

        let store = JsonFileProfileStore::new(&path);
        assert!(store.list().await.is_empty());
        assert!(!path.exists());

        // A second read sees a missing file, not corrupt data
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_store_is_empty() {
        // A directory at the store path cannot be read as a file and is left alone
        let (_dir, path) = temp_store_path();
        std::fs::create_dir_all(&path).unwrap();

        let store = JsonFileProfileStore::new(&path);
        assert!(store.list().await.is_empty());
        assert!(path.exists());
    }
}
