//! Host roaming settings.
//!
//! The taskpane persists everything through the host's per-mailbox roaming
//! key-value store. This module provides:
//! - the `RoamingSettings` trait (local snapshot plus async save)
//! - in-memory, file and Redis backends
//! - a factory that picks the backend from configuration

mod backend;
mod factory;
mod file_backend;
mod memory_backend;
mod redis_backend;

pub use backend::{utf16_len, RoamingError, RoamingSettings, DEFAULT_VALUE_QUOTA};
pub use factory::create_roaming_settings;
pub use file_backend::FileRoamingSettings;
pub use memory_backend::MemoryRoamingSettings;
pub use redis_backend::{storage_key, RedisRoamingSettings};
