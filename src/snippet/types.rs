//! Snippet types and error definitions

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Snippet-specific error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnippetError {
    #[error("Command Name and Snippet Text are required.")]
    MissingFields,

    #[error("Command Name can only contain letters, numbers, underscores, and hyphens.")]
    InvalidCommand(String),

    #[error("Error: Command Name \"{0}\" already exists.")]
    AlreadyExists(String),

    #[error("Error: Original snippet \"{0}\" not found for update.")]
    NotFound(String),

    #[error("Error: Could not find snippet data.")]
    IndexOutOfRange(usize),
}

/// Result type for snippet operations
pub type SnippetResult<T> = Result<T, SnippetError>;

lazy_static! {
    static ref COMMAND_PATTERN: Regex = Regex::new(r"^[a-zA-Z0-9_\-]+$").unwrap();
}

/// Check that a command name only uses `[A-Za-z0-9_-]` and is non-empty
pub fn is_valid_command(command: &str) -> bool {
    COMMAND_PATTERN.is_match(command)
}

/// A stored snippet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    /// Unique trigger name (letters, digits, dash, underscore)
    pub command: String,

    /// Human-readable description, empty when not given
    #[serde(default)]
    pub description: String,

    /// Template body with optional {placeholder} tokens
    pub text: String,
}

impl Snippet {
    pub fn new(
        command: impl Into<String>,
        description: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            command: command.into(),
            description: description.into(),
            text: text.into(),
        }
    }

    /// Validate an already-built snippet
    pub fn validate(&self) -> SnippetResult<()> {
        if self.command.is_empty() || self.text.is_empty() {
            return Err(SnippetError::MissingFields);
        }

        if !is_valid_command(&self.command) {
            return Err(SnippetError::InvalidCommand(self.command.clone()));
        }

        Ok(())
    }

    /// Description shown in the list, with a stand-in when empty
    pub fn display_description(&self) -> &str {
        if self.description.is_empty() {
            "(No description)"
        } else {
            &self.description
        }
    }
}

/// Raw form input before validation
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SnippetDraft {
    pub command: String,
    #[serde(default)]
    pub description: String,
    pub text: String,
}

impl SnippetDraft {
    pub fn new(
        command: impl Into<String>,
        description: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            command: command.into(),
            description: description.into(),
            text: text.into(),
        }
    }

    /// Trim the command and description, then validate.
    ///
    /// The text is kept verbatim so leading blank lines survive.
    pub fn into_snippet(self) -> SnippetResult<Snippet> {
        let snippet = Snippet {
            command: self.command.trim().to_string(),
            description: self.description.trim().to_string(),
            text: self.text,
        };
        snippet.validate()?;
        Ok(snippet)
    }
}

impl From<&Snippet> for SnippetDraft {
    fn from(snippet: &Snippet) -> Self {
        Self {
            command: snippet.command.clone(),
            description: snippet.description.clone(),
            text: snippet.text.clone(),
        }
    }
}

/// Check that no two snippets share a command
pub fn ensure_unique(snippets: &[Snippet]) -> SnippetResult<()> {
    for (i, snippet) in snippets.iter().enumerate() {
        if snippets[..i].iter().any(|s| s.command == snippet.command) {
            return Err(SnippetError::AlreadyExists(snippet.command.clone()));
        }
    }
    Ok(())
}
