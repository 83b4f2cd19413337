use thiserror::Error;

use crate::defaults::DefaultsError;
use crate::document::DocumentError;
use crate::redis::PoolError;
use crate::snippet::SnippetError;
use crate::storage::RoamingError;
use crate::store::StoreError;
use crate::telemetry::TelemetryError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Snippet(#[from] SnippetError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Roaming settings error: {0}")]
    Storage(#[from] RoamingError),

    #[error(transparent)]
    Defaults(#[from] DefaultsError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("Redis error: {0}")]
    Redis(#[from] PoolError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),

    #[error("No placeholder prompt is open")]
    NoPrompt,
}

impl AppError {
    /// Stable code for logs
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Snippet(SnippetError::IndexOutOfRange(_)) => "NOT_FOUND",
            AppError::Snippet(SnippetError::NotFound(_)) => "NOT_FOUND",
            AppError::Snippet(_) => "VALIDATION_ERROR",
            AppError::Store(StoreError::Oversize { .. }) => "TOO_LARGE",
            AppError::Store(_) => "STORE_ERROR",
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::Defaults(_) => "DEFAULTS_ERROR",
            AppError::Document(DocumentError::MissingContext) => "NO_CONTEXT",
            AppError::Document(_) => "INSERT_ERROR",
            AppError::Redis(_) => "REDIS_ERROR",
            AppError::Telemetry(_) => "TELEMETRY_ERROR",
            AppError::NoPrompt => "NO_PROMPT",
        }
    }

    /// Text shown in the taskpane message area
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(_) => "Configuration error".to_string(),
            AppError::Storage(e) => format!("Error saving snippets: {}", e),
            AppError::Redis(_) => "Error saving snippets: storage temporarily unavailable".to_string(),
            AppError::Defaults(_) => "Error loading default snippets.".to_string(),
            other => other.to_string(),
        }
    }

    /// Whether the user can fix this by changing their input
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            AppError::Snippet(_) | AppError::Store(StoreError::Oversize { .. })
        )
    }

    /// Log the detailed error
    pub fn log(&self) {
        let code = self.code();
        if self.is_user_error() {
            tracing::warn!(code = %code, message = %self, "Rejected snippet change");
        } else {
            tracing::error!(code = %code, message = %self, "Taskpane error");
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_pass_through() {
        let err = AppError::from(SnippetError::AlreadyExists("sig".to_string()));
        assert_eq!(err.user_message(), "Error: Command Name \"sig\" already exists.");
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert!(err.is_user_error());
    }

    #[test]
    fn test_codes() {
        assert_eq!(AppError::from(DocumentError::MissingContext).code(), "NO_CONTEXT");
        assert_eq!(
            AppError::from(StoreError::Oversize { len: 40_000, limit: 30_000 }).code(),
            "TOO_LARGE"
        );
        assert_eq!(
            AppError::from(SnippetError::IndexOutOfRange(3)).user_message(),
            "Error: Could not find snippet data."
        );
        assert!(!AppError::NoPrompt.is_user_error());
    }
}
