//! Snippet collection persistence.
//!
//! The whole collection lives as one JSON array under a single roaming
//! settings key. A second key, `<key>_error_flag`, remembers that the last
//! load found a corrupt value so a failing default set cannot send the
//! taskpane into a reload loop.
//!
//! # Example
//!
//! ```rust,ignore
//! let store = SnippetStore::new(roaming, Arc::new(BundledDefaults), &settings.storage);
//!
//! let outcome = store.load().await;
//! let mut snippets = outcome.snippets;
//! snippets.push(Snippet::new("sig", "", "-- Ann"));
//! store.save(&snippets).await?;
//! ```

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::config::StorageConfig;
use crate::defaults::{DefaultSnippetSource, DefaultsError};
use crate::metrics::StoreMetrics;
use crate::snippet::{ensure_unique, Snippet, SnippetError};
use crate::storage::{utf16_len, RoamingError, RoamingSettings};

/// Value written to the error flag key
const FLAG_SET: &str = "true";

/// Store-specific error type
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Error: Snippets data too large to save ({len} of {limit} characters).")]
    Oversize { len: usize, limit: usize },

    #[error("Error saving snippets: {0}")]
    Write(#[from] RoamingError),

    #[error("Error preparing snippets for saving: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Why a stored value was rejected
#[derive(Debug, Error)]
enum CorruptValue {
    #[error("not a snippet list: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid snippet: {0}")]
    Invalid(#[from] SnippetError),
}

/// Where a loaded collection came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Parsed from the stored value
    Stored,
    /// Nothing was stored; defaults were fetched and saved
    Defaults,
    /// The stored value was corrupt; defaults replaced it
    RecoveredDefaults,
    /// Nothing was stored and the previous load had failed
    PreviousFailure,
}

impl LoadSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadSource::Stored => "stored",
            LoadSource::Defaults => "defaults",
            LoadSource::RecoveredDefaults => "recovered",
            LoadSource::PreviousFailure => "previous_failure",
        }
    }
}

impl fmt::Display for LoadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a load
#[derive(Debug)]
pub struct LoadOutcome {
    /// The collection to show
    pub snippets: Vec<Snippet>,

    /// Where it came from
    pub source: LoadSource,

    /// Set when the defaults could not be fetched (`snippets` is then empty)
    pub defaults_error: Option<DefaultsError>,

    /// Set when the defaults could not be written back
    pub persist_error: Option<StoreError>,
}

impl LoadOutcome {
    /// Size of the collection a caller may cache; nothing unsaved is cached
    pub fn cached_len(&self) -> usize {
        if self.persist_error.is_some() {
            0
        } else {
            self.snippets.len()
        }
    }

    fn stored(snippets: Vec<Snippet>) -> Self {
        Self {
            snippets,
            source: LoadSource::Stored,
            defaults_error: None,
            persist_error: None,
        }
    }
}

/// Roaming-settings-backed snippet store.
pub struct SnippetStore {
    settings: Arc<dyn RoamingSettings>,
    defaults: Arc<dyn DefaultSnippetSource>,
    key: String,
    flag_key: String,
    max_serialized_len: usize,
}

impl SnippetStore {
    pub fn new(
        settings: Arc<dyn RoamingSettings>,
        defaults: Arc<dyn DefaultSnippetSource>,
        config: &StorageConfig,
    ) -> Self {
        Self {
            settings,
            defaults,
            key: config.key.clone(),
            flag_key: config.error_flag_key(),
            max_serialized_len: config.max_serialized_len,
        }
    }

    /// Settings key holding the collection
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Settings key holding the corruption flag
    pub fn flag_key(&self) -> &str {
        &self.flag_key
    }

    /// Largest encoded collection a save accepts
    pub fn max_serialized_len(&self) -> usize {
        self.max_serialized_len
    }

    /// Load the collection, falling back to the defaults.
    ///
    /// Never fails outright: problems with the defaults are reported on the
    /// outcome and the collection is empty.
    pub async fn load(&self) -> LoadOutcome {
        let previous_failure = self.settings.get(&self.flag_key).is_some();
        self.settings.remove(&self.flag_key);

        let outcome = match self.settings.get(&self.key).filter(|raw| !raw.is_empty()) {
            Some(raw) => match parse_collection(&raw) {
                Ok(snippets) => {
                    tracing::debug!(count = snippets.len(), "Snippets loaded from roaming settings");
                    LoadOutcome::stored(snippets)
                }
                Err(e) => {
                    tracing::warn!(key = %self.key, error = %e, "Stored snippets are corrupt, loading defaults");
                    StoreMetrics::record_recovery();

                    self.settings.set(&self.flag_key, FLAG_SET.to_string());
                    if let Err(e) = self.settings.save_async().await {
                        tracing::warn!(error = %e, "Failed to persist snippet error flag");
                    }

                    self.load_defaults(LoadSource::RecoveredDefaults).await
                }
            },
            None if previous_failure => {
                tracing::warn!("No stored snippets and the previous load failed, not retrying defaults");
                LoadOutcome {
                    snippets: Vec::new(),
                    source: LoadSource::PreviousFailure,
                    defaults_error: None,
                    persist_error: None,
                }
            }
            None => {
                tracing::info!("No snippets in roaming settings, loading defaults");
                self.load_defaults(LoadSource::Defaults).await
            }
        };

        StoreMetrics::record_load(outcome.source.as_str(), outcome.cached_len());
        outcome
    }

    async fn load_defaults(&self, source: LoadSource) -> LoadOutcome {
        let (snippets, defaults_error) = match self.defaults.fetch().await {
            Ok(snippets) => {
                tracing::debug!(count = snippets.len(), "Loaded default snippets");
                (snippets, None)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load default snippets");
                (Vec::new(), Some(e))
            }
        };

        let persist_error = self.save(&snippets).await.err();

        LoadOutcome {
            snippets,
            source,
            defaults_error,
            persist_error,
        }
    }

    /// Persist the whole collection.
    ///
    /// Oversized collections are rejected before the host is called. On a
    /// host failure the previous stored value is restored locally, so a
    /// later load still sees the last saved collection.
    pub async fn save(&self, snippets: &[Snippet]) -> StoreResult<()> {
        let encoded = serde_json::to_string(snippets)?;
        let len = utf16_len(&encoded);

        if len > self.max_serialized_len {
            StoreMetrics::record_oversize(len);
            tracing::warn!(len = len, limit = self.max_serialized_len, "Snippets data too large to save");
            return Err(StoreError::Oversize {
                len,
                limit: self.max_serialized_len,
            });
        }

        let previous = self.settings.get(&self.key);
        self.settings.set(&self.key, encoded);

        match self.settings.save_async().await {
            Ok(()) => {
                self.settings.remove(&self.flag_key);
                StoreMetrics::record_saved(len, snippets.len());
                tracing::info!(count = snippets.len(), len = len, "Snippets saved");
                Ok(())
            }
            Err(e) => {
                match previous {
                    Some(value) => self.settings.set(&self.key, value),
                    None => self.settings.remove(&self.key),
                }
                StoreMetrics::record_write_failed();
                tracing::error!(error = %e, backend = self.settings.backend_name(), "Error saving snippets");
                Err(StoreError::Write(e))
            }
        }
    }

    /// Forget the stored collection and the error flag.
    ///
    /// The next load takes the defaults path again.
    pub async fn reset(&self) -> StoreResult<()> {
        self.settings.remove(&self.key);
        self.settings.remove(&self.flag_key);
        self.settings.save_async().await?;
        tracing::info!(key = %self.key, "Snippet storage reset");
        Ok(())
    }
}

fn parse_collection(raw: &str) -> Result<Vec<Snippet>, CorruptValue> {
    let snippets: Vec<Snippet> = serde_json::from_str(raw)?;
    for snippet in &snippets {
        snippet.validate()?;
    }
    ensure_unique(&snippets)?;
    Ok(snippets)
}
