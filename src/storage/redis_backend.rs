//! Redis-backed roaming settings.
//!
//! One mailbox's settings live as a single JSON object string at
//! `{prefix}:{mailbox}`, the same shape the file backend writes. A save
//! replaces the whole object.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::redis::RedisPool;

use super::backend::{check_quota, RoamingError, RoamingSettings};

/// Roaming settings shared through Redis.
pub struct RedisRoamingSettings {
    pool: Arc<RedisPool>,
    key: String,
    local: DashMap<String, String>,
    value_quota: usize,
}

impl RedisRoamingSettings {
    /// Load the settings for `mailbox` into a fresh local snapshot.
    pub async fn load(
        pool: Arc<RedisPool>,
        prefix: &str,
        mailbox: &str,
        value_quota: usize,
    ) -> Result<Self, RoamingError> {
        let key = storage_key(prefix, mailbox);
        let local = DashMap::new();

        if let Some(raw) = pool.get_string(&key).await? {
            for (k, v) in decode_snapshot(&raw)? {
                local.insert(k, v);
            }
        }

        tracing::debug!(key = %key, entries = local.len(), "Loaded roaming settings from Redis");

        Ok(Self {
            pool,
            key,
            local,
            value_quota,
        })
    }

    /// Redis key holding this mailbox's settings.
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Build the Redis key for a mailbox.
pub fn storage_key(prefix: &str, mailbox: &str) -> String {
    format!("{}:{}", prefix, mailbox)
}

/// Encode a snapshot for `SET`; `None` means the key should be deleted.
pub(crate) fn encode_snapshot(
    snapshot: &BTreeMap<String, String>,
    value_quota: usize,
) -> Result<Option<String>, RoamingError> {
    check_quota(snapshot, value_quota)?;

    if snapshot.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::to_string(snapshot)?))
}

/// Decode the stored JSON object
pub(crate) fn decode_snapshot(raw: &str) -> Result<BTreeMap<String, String>, RoamingError> {
    Ok(serde_json::from_str(raw)?)
}

#[async_trait]
impl RoamingSettings for RedisRoamingSettings {
    fn backend_name(&self) -> &'static str {
        "redis"
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

        match encode_snapshot(&snapshot, self.value_quota)? {
            Some(encoded) => self.pool.set_string(&self.key, &encoded).await?,
            None => self.pool.del(&self.key).await?,
        }

        tracing::debug!(key = %self.key, entries = snapshot.len(), "Roaming settings saved to Redis");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_key() {
        assert_eq!(
            storage_key("snippets:roaming", "ann@example.com"),
            "snippets:roaming:ann@example.com"
        );
    }

    #[test]
    fn test_empty_snapshot_deletes_key() {
        assert_eq!(encode_snapshot(&BTreeMap::new(), 100).unwrap(), None);
    }

    #[test]
    fn test_snapshot_encoding_reads_back() {
        let mut snapshot = BTreeMap::new();
        snapshot.insert("cw_snippets_v1".to_string(), "[]".to_string());
        snapshot.insert("cw_snippets_v1_error_flag".to_string(), "true".to_string());

        let encoded = encode_snapshot(&snapshot, 100).unwrap().unwrap();
        assert_eq!(
            encoded,
            r#"{"cw_snippets_v1":"[]","cw_snippets_v1_error_flag":"true"}"#
        );
        assert_eq!(decode_snapshot(&encoded).unwrap(), snapshot);
    }

    #[test]
    fn test_snapshot_over_quota() {
        let mut snapshot = BTreeMap::new();
        snapshot.insert("key".to_string(), "x".repeat(11));

        assert!(matches!(
            encode_snapshot(&snapshot, 10),
            Err(RoamingError::QuotaExceeded { len: 11, limit: 10, .. })
        ));
    }

    #[test]
    fn test_decode_rejects_non_object() {
        assert!(matches!(
            decode_snapshot("[1, 2]"),
            Err(RoamingError::Serialization(_))
        ));
    }
}
