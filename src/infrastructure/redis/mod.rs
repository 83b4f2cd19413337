//! Redis connectivity for the roaming settings backend.

pub mod pool;

pub use pool::{PoolError, RedisPool};
