//! File-backed roaming settings.
//!
//! The snapshot is stored as one JSON object (`{"key": "value", ...}`).
//! Saves write a sibling temp file and rename it over the target so a
//! crash never leaves a half-written file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use dashmap::DashMap;

use super::backend::{check_quota, RoamingError, RoamingSettings};

/// Roaming settings persisted to a local JSON file.
pub struct FileRoamingSettings {
    path: PathBuf,
    local: DashMap<String, String>,
    value_quota: usize,
}

impl FileRoamingSettings {
    /// Open the settings file at `path`.
    ///
    /// A missing file is treated as empty settings.
    pub async fn open(path: impl Into<PathBuf>, value_quota: usize) -> Result<Self, RoamingError> {
        let path = path.into();
        let local = DashMap::new();

        match tokio::fs::read_to_string(&path).await {
            Ok(contents) if !contents.trim().is_empty() => {
                let entries: BTreeMap<String, String> = serde_json::from_str(&contents)?;
                for (key, value) in entries {
                    local.insert(key, value);
                }
                tracing::debug!(path = %path.display(), entries = local.len(), "Loaded roaming settings file");
            }
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No roaming settings file yet");
            }
            Err(e) => return Err(RoamingError::Io(e)),
        }

        Ok(Self {
            path,
            local,
            value_quota,
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl RoamingSettings for FileRoamingSettings {
    fn backend_name(&self) -> &'static str {
        "file"
    }

    fn get(&self, key: &str) -> Option<String> {
        self.local.get(key).map(|v| v.value().clone())
    }

    fn set(&self, key: &str, value: String) {
        self.local.insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        self.local.remove(key);
    }

    async fn save_async(&self) -> Result<(), RoamingError> {
        let snapshot: BTreeMap<String, String> = self
            .local
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        check_quota(&snapshot, self.value_quota)?;

        let encoded = serde_json::to_string_pretty(&snapshot)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, encoded.as_bytes()).await?;
        tokio::fs::rename(&temp, &self.path).await?;

        tracing::debug!(
            path = %self.path.display(),
            entries = snapshot.len(),
            "Roaming settings saved to file"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DEFAULT_VALUE_QUOTA;

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileRoamingSettings::open(dir.path().join("settings.json"), DEFAULT_VALUE_QUOTA)
            .await
            .unwrap();

        assert!(backend.get("anything").is_none());
    }

    #[tokio::test]
    async fn test_save_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let backend = FileRoamingSettings::open(&path, DEFAULT_VALUE_QUOTA).await.unwrap();
        backend.set("cw_snippets_v1", "[]".to_string());
        backend.save_async().await.unwrap();

        let reopened = FileRoamingSettings::open(&path, DEFAULT_VALUE_QUOTA).await.unwrap();
        assert_eq!(reopened.get("cw_snippets_v1").as_deref(), Some("[]"));
        assert!(!backend.temp_path().exists());
    }

    #[tokio::test]
    async fn test_unsaved_changes_are_not_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let backend = FileRoamingSettings::open(&path, DEFAULT_VALUE_QUOTA).await.unwrap();
        backend.set("key", "value".to_string());

        let reopened = FileRoamingSettings::open(&path, DEFAULT_VALUE_QUOTA).await.unwrap();
        assert!(reopened.get("key").is_none());
    }

    #[tokio::test]
    async fn test_over_quota_save_leaves_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let backend = FileRoamingSettings::open(&path, 8).await.unwrap();
        backend.set("key", "small".to_string());
        backend.save_async().await.unwrap();
        let before = tokio::fs::read_to_string(&path).await.unwrap();

        backend.set("key", "far too long".to_string());
        let result = backend.save_async().await;

        assert!(matches!(
            result,
            Err(RoamingError::QuotaExceeded { ref key, len: 12, limit: 8 }) if key == "key"
        ));
        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), before);
        assert!(!backend.temp_path().exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        tokio::fs::write(&path, "not json").await.unwrap();

        let result = FileRoamingSettings::open(&path, DEFAULT_VALUE_QUOTA).await;
        assert!(matches!(result, Err(RoamingError::Serialization(_))));
    }
}
