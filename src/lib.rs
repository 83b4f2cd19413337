// Infrastructure layer (shared components)
pub mod infrastructure;

// Re-export infrastructure modules at the crate root
pub use infrastructure::config;
pub use infrastructure::error;
pub use infrastructure::metrics;
pub use infrastructure::redis;

// Domain layer
pub mod placeholder;
pub mod snippet;
pub mod store;

// Host adapters
pub mod defaults;
pub mod document;
pub mod storage;

// Application layer
pub mod taskpane;

// Supporting modules
pub mod telemetry;
