mod settings;

pub use settings::{
    DefaultsConfig, MessageConfig, RedisConfig, Settings, StorageConfig, TelemetryConfig, UiConfig,
};
