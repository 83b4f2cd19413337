//! Default snippet sources.
//!
//! When the roaming store holds no collection yet, the taskpane seeds it from
//! a static JSON list. By default that list is compiled into the crate from
//! `assets/snippets.json`; a deployment can point at its own file instead.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::DefaultsConfig;
use crate::snippet::{ensure_unique, Snippet, SnippetError};

const BUNDLED_SNIPPETS: &str = include_str!("../../assets/snippets.json");

/// Errors that can occur while fetching default snippets.
#[derive(Debug, Error)]
pub enum DefaultsError {
    #[error("Failed to read default snippets from {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Default snippets are not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Default snippets are invalid: {0}")]
    Invalid(#[from] SnippetError),
}

/// Where the default snippet list comes from.
#[async_trait]
pub trait DefaultSnippetSource: Send + Sync {
    /// Fetch and validate the default list.
    async fn fetch(&self) -> Result<Vec<Snippet>, DefaultsError>;
}

/// Parse and validate a default list
pub fn parse_defaults(raw: &str) -> Result<Vec<Snippet>, DefaultsError> {
    let snippets: Vec<Snippet> = serde_json::from_str(raw)?;
    for snippet in &snippets {
        snippet.validate()?;
    }
    ensure_unique(&snippets)?;
    Ok(snippets)
}

/// Defaults compiled into the crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct BundledDefaults;

#[async_trait]
impl DefaultSnippetSource for BundledDefaults {
    async fn fetch(&self) -> Result<Vec<Snippet>, DefaultsError> {
        parse_defaults(BUNDLED_SNIPPETS)
    }
}

/// Defaults read from a JSON file on every fetch.
#[derive(Debug, Clone)]
pub struct FileDefaults {
    path: PathBuf,
}

impl FileDefaults {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DefaultSnippetSource for FileDefaults {
    async fn fetch(&self) -> Result<Vec<Snippet>, DefaultsError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| DefaultsError::Read {
                path: self.path.display().to_string(),
                source,
            })?;
        parse_defaults(&raw)
    }
}

/// Fixed in-memory defaults, mostly useful to embedders and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticDefaults {
    snippets: Vec<Snippet>,
}

impl StaticDefaults {
    pub fn new(snippets: Vec<Snippet>) -> Self {
        Self { snippets }
    }
}

#[async_trait]
impl DefaultSnippetSource for StaticDefaults {
    async fn fetch(&self) -> Result<Vec<Snippet>, DefaultsError> {
        Ok(self.snippets.clone())
    }
}

/// Create the configured defaults source.
pub fn create_defaults_source(config: &DefaultsConfig) -> Arc<dyn DefaultSnippetSource> {
    match &config.path {
        Some(path) => {
            tracing::info!(path = %path, "Using default snippets file");
            Arc::new(FileDefaults::new(path))
        }
        None => Arc::new(BundledDefaults),
    }
}
