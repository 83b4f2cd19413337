//! In-memory roaming settings backend using DashMap.
//!
//! Keeps a local snapshot and a "persisted" copy that only changes when
//! `save_async` succeeds. State is lost on restart.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use dashmap::DashMap;

use super::backend::{check_quota, RoamingError, RoamingSettings};

/// In-memory roaming settings backend.
pub struct MemoryRoamingSettings {
    /// Local snapshot (what `get`/`set`/`remove` see)
    local: DashMap<String, String>,
    /// Last successfully saved snapshot
    persisted: DashMap<String, String>,
    /// Per-value quota in UTF-16 code units
    value_quota: usize,
    /// Failure to report on the next save, if any
    next_failure: Mutex<Option<String>>,
    /// Number of save attempts that reached the backend
    saves: AtomicU64,
}

impl MemoryRoamingSettings {
    /// Create an empty backend with the given per-value quota.
    pub fn new(value_quota: usize) -> Self {
        Self {
            local: DashMap::new(),
            persisted: DashMap::new(),
            value_quota,
            next_failure: Mutex::new(None),
            saves: AtomicU64::new(0),
        }
    }

    /// Create a backend whose persisted state already holds `entries`.
    pub fn with_entries<I, K, V>(value_quota: usize, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let backend = Self::new(value_quota);
        for (key, value) in entries {
            let (key, value) = (key.into(), value.into());
            backend.local.insert(key.clone(), value.clone());
            backend.persisted.insert(key, value);
        }
        backend
    }

    /// Make the next `save_async` fail with a host error.
    pub fn fail_next_save(&self, reason: impl Into<String>) {
        if let Ok(mut next) = self.next_failure.lock() {
            *next = Some(reason.into());
        }
    }

    /// Value as of the last successful save.
    pub fn persisted(&self, key: &str) -> Option<String> {
        self.persisted.get(key).map(|v| v.value().clone())
    }

    /// Number of times `save_async` was called.
    pub fn save_count(&self) -> u64 {
        self.saves.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl RoamingSettings for MemoryRoamingSettings {
    fn backend_name(&self) -> &'static str {
        "memory"
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
        self.saves.fetch_add(1, Ordering::Relaxed);

        let injected = self.next_failure.lock().ok().and_then(|mut next| next.take());
        if let Some(reason) = injected {
            tracing::debug!(reason = %reason, "Injected roaming settings save failure");
            return Err(RoamingError::Host(reason));
        }

        let snapshot: Vec<(String, String)> = self
            .local
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        check_quota(snapshot.iter().map(|(k, v)| (k, v)), self.value_quota)?;

        self.persisted.clear();
        for (key, value) in snapshot {
            self.persisted.insert(key, value);
        }

        tracing::debug!(entries = self.persisted.len(), "Roaming settings saved to memory");
        Ok(())
    }
}
