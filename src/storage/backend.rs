//! Roaming settings backend trait.
//!
//! Mirrors the host's roaming settings object: `get`, `set` and `remove` work
//! on a local snapshot, `save_async` pushes the whole snapshot to the backing
//! store. Nothing set locally is durable until a save succeeds.

use async_trait::async_trait;
use thiserror::Error;

/// Per-value quota enforced by the host (32 KB)
pub const DEFAULT_VALUE_QUOTA: usize = 32 * 1024;

/// Errors that can occur while persisting roaming settings.
#[derive(Debug, Error)]
pub enum RoamingError {
    /// A value is larger than the backend accepts
    #[error("Value for '{key}' is {len} characters, over the {limit} character quota")]
    QuotaExceeded { key: String, len: usize, limit: usize },

    /// The host reported a failure
    #[error("Host storage failure: {0}")]
    Host(String),

    /// File backend I/O failure
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot could not be encoded or decoded
    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Redis operation failed
    #[error("Redis error: {0}")]
    Redis(String),
}

impl From<crate::redis::PoolError> for RoamingError {
    fn from(err: crate::redis::PoolError) -> Self {
        RoamingError::Redis(err.to_string())
    }
}

/// Host roaming key-value settings.
///
/// Implementations must be thread-safe (`Send + Sync`) so they can be shared
/// behind an `Arc`.
#[async_trait]
pub trait RoamingSettings: Send + Sync {
    /// Name of the backend, for logs.
    fn backend_name(&self) -> &'static str;

    /// Read a value from the local snapshot.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value to the local snapshot.
    fn set(&self, key: &str, value: String);

    /// Remove a value from the local snapshot.
    fn remove(&self, key: &str);

    /// Persist the local snapshot.
    ///
    /// # Errors
    ///
    /// Returns `RoamingError::QuotaExceeded` if any value is over the
    /// per-value quota; nothing is written in that case.
    async fn save_async(&self) -> Result<(), RoamingError>;
}

/// Reject the first value that is over `limit` characters.
///
/// Length is counted in UTF-16 code units, the unit the host quota uses.
pub(crate) fn check_quota<'a, I>(entries: I, limit: usize) -> Result<(), RoamingError>
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    for (key, value) in entries {
        let len = utf16_len(value);
        if len > limit {
            return Err(RoamingError::QuotaExceeded {
                key: key.clone(),
                len,
                limit,
            });
        }
    }
    Ok(())
}

/// Length of a string in UTF-16 code units
pub fn utf16_len(value: &str) -> usize {
    value.encode_utf16().count()
}
