//! Roaming settings backend factory

use std::sync::Arc;

use crate::config::StorageConfig;
use crate::redis::RedisPool;

use super::backend::{RoamingError, RoamingSettings};
use super::file_backend::FileRoamingSettings;
use super::memory_backend::MemoryRoamingSettings;
use super::redis_backend::RedisRoamingSettings;

/// Create a roaming settings backend based on configuration.
///
/// Returns the backend named by the `backend` setting:
/// - `"file"`: a `FileRoamingSettings` if `file_path` is configured
/// - `"redis"`: a `RedisRoamingSettings` if a Redis pool is provided
/// - `"memory"` (default): a `MemoryRoamingSettings`
///
/// A backend whose prerequisites are missing falls back to memory.
///
/// # Example
///
/// ```rust,ignore
/// let settings = create_roaming_settings(&settings.storage, Some(redis_pool.clone())).await?;
/// ```
pub async fn create_roaming_settings(
    config: &StorageConfig,
    redis_pool: Option<Arc<RedisPool>>,
) -> Result<Arc<dyn RoamingSettings>, RoamingError> {
    match config.backend.as_str() {
        "file" => {
            if let Some(path) = &config.file_path {
                tracing::info!(backend = "file", path = %path, "Creating file roaming settings");
                Ok(Arc::new(
                    FileRoamingSettings::open(path, config.value_quota).await?,
                ))
            } else {
                tracing::warn!("File backend requested but no file_path configured, falling back to memory");
                Ok(Arc::new(MemoryRoamingSettings::new(config.value_quota)))
            }
        }
        "redis" => {
            if let Some(pool) = redis_pool {
                tracing::info!(
                    backend = "redis",
                    prefix = %config.redis_prefix,
                    mailbox = %config.mailbox,
                    "Creating Redis roaming settings"
                );
                Ok(Arc::new(
                    RedisRoamingSettings::load(
                        pool,
                        &config.redis_prefix,
                        &config.mailbox,
                        config.value_quota,
                    )
                    .await?,
                ))
            } else {
                tracing::warn!("Redis backend requested but no pool provided, falling back to memory");
                Ok(Arc::new(MemoryRoamingSettings::new(config.value_quota)))
            }
        }
        _ => {
            tracing::info!(backend = "memory", "Creating memory roaming settings");
            Ok(Arc::new(MemoryRoamingSettings::new(config.value_quota)))
        }
    }
}
