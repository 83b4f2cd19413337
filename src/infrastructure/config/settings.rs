use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::env;

use crate::taskpane::{DeletePolicy, FormTogglePolicy};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub redis: RedisConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub messages: MessageConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Roaming settings backend: "memory", "file" or "redis"
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Roaming settings key holding the snippet collection
    #[serde(default = "default_key")]
    pub key: String,
    /// Largest encoded collection accepted by a save
    #[serde(default = "default_max_serialized_len")]
    pub max_serialized_len: usize,
    /// Per-value quota enforced by the backend
    #[serde(default = "default_value_quota")]
    pub value_quota: usize,
    /// Settings file for the "file" backend
    #[serde(default)]
    pub file_path: Option<String>,
    /// Key prefix for the "redis" backend
    #[serde(default = "default_redis_prefix")]
    pub redis_prefix: String,
    /// Mailbox whose settings are loaded
    #[serde(default = "default_mailbox")]
    pub mailbox: String,
}

fn default_backend() -> String {
    "memory".to_string()
}

fn default_key() -> String {
    "cw_snippets_v1".to_string()
}

fn default_max_serialized_len() -> usize {
    30_000 // under the 32KB per-value quota
}

fn default_value_quota() -> usize {
    32 * 1024
}

fn default_redis_prefix() -> String {
    "snippets:roaming".to_string()
}

fn default_mailbox() -> String {
    "default".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    #[serde(default = "default_redis_url")]
    pub url: String,
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DefaultsConfig {
    /// JSON file with the default snippets; the bundled set is used when unset
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageConfig {
    /// How long success messages stay visible, in milliseconds
    #[serde(default = "default_success_ms")]
    pub success_ms: u64,
    /// How long error messages stay visible, in milliseconds
    #[serde(default = "default_error_ms")]
    pub error_ms: u64,
}

fn default_success_ms() -> u64 {
    3000
}

fn default_error_ms() -> u64 {
    5000
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub delete_policy: DeletePolicy,
    #[serde(default)]
    pub form_toggle: FormTogglePolicy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    /// Filter used when RUST_LOG is not set
    #[serde(default = "default_filter")]
    pub filter: String,
    /// Emit JSON log lines instead of human-readable ones
    #[serde(default)]
    pub json: bool,
}

fn default_filter() -> String {
    "info".to_string()
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // SNIPPETS__STORAGE__BACKEND, SNIPPETS__REDIS__URL, etc.
            .add_source(
                Environment::with_prefix("SNIPPETS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Parse settings from a TOML document, filling gaps with defaults.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(contents, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}

impl StorageConfig {
    /// Flag key stored next to the snippet key
    pub fn error_flag_key(&self) -> String {
        format!("{}_error_flag", self.key)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            key: default_key(),
            max_serialized_len: default_max_serialized_len(),
            value_quota: default_value_quota(),
            file_path: None,
            redis_prefix: default_redis_prefix(),
            mailbox: default_mailbox(),
        }
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
        }
    }
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            success_ms: default_success_ms(),
            error_ms: default_error_ms(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let settings = Settings::default();
        assert_eq!(settings.storage.backend, "memory");
        assert_eq!(settings.storage.key, "cw_snippets_v1");
        assert_eq!(settings.storage.max_serialized_len, 30_000);
        assert_eq!(settings.messages.success_ms, 3000);
        assert_eq!(settings.messages.error_ms, 5000);
        assert_eq!(settings.storage.error_flag_key(), "cw_snippets_v1_error_flag");
    }

    #[test]
    fn test_from_toml_overrides() {
        let settings = Settings::from_toml(
            r#"
            [storage]
            backend = "file"
            file_path = "/tmp/roaming.json"

            [ui]
            delete_policy = "immediate"
            form_toggle = "preserve"
            "#,
        )
        .unwrap();

        assert_eq!(settings.storage.backend, "file");
        assert_eq!(settings.storage.file_path.as_deref(), Some("/tmp/roaming.json"));
        assert_eq!(settings.storage.key, "cw_snippets_v1");
        assert_eq!(settings.ui.delete_policy, DeletePolicy::Immediate);
        assert_eq!(settings.ui.form_toggle, FormTogglePolicy::Preserve);
        assert!(!settings.telemetry.json);
    }
}
