//! Compose-body insertion.
//!
//! The host inserts HTML at the current selection of the message being
//! composed. Snippet text is plain text, so newlines become `<br/>` before
//! it is handed over.

use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while inserting into the compose body.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Error: Cannot insert text. Mailbox item context not available.")]
    MissingContext,

    #[error("Error inserting snippet: {0}")]
    Host(String),
}

/// Host "insert into selected range" API.
#[async_trait]
pub trait DocumentHost: Send + Sync {
    /// Whether a compose item is available for insertion.
    fn has_compose_context(&self) -> bool;

    /// Replace the current selection with `html`.
    async fn set_selected_html(&self, html: &str) -> Result<(), DocumentError>;
}

/// Convert snippet text into the HTML the host inserts
pub fn to_html(text: &str) -> String {
    text.replace('\n', "<br/>")
}

/// Insert `text` at the selection, refusing without a compose context.
pub async fn insert_text(host: &dyn DocumentHost, text: &str) -> Result<(), DocumentError> {
    if !host.has_compose_context() {
        tracing::error!("Mailbox item context is not available for insertion");
        return Err(DocumentError::MissingContext);
    }

    let html = to_html(text);
    host.set_selected_html(&html).await?;
    tracing::debug!(len = html.len(), "Snippet inserted");
    Ok(())
}

/// In-memory compose body.
///
/// Insertions append at the end of the body; there is no selection model.
pub struct ComposeBuffer {
    body: Mutex<String>,
    context: bool,
}

impl Default for ComposeBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ComposeBuffer {
    /// Create an empty body with a compose context
    pub fn new() -> Self {
        Self {
            body: Mutex::new(String::new()),
            context: true,
        }
    }

    /// Create a buffer that reports no compose context (read mode)
    pub fn without_context() -> Self {
        Self {
            body: Mutex::new(String::new()),
            context: false,
        }
    }

    /// Current body HTML
    pub fn body(&self) -> String {
        self.body.lock().map(|b| b.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl DocumentHost for ComposeBuffer {
    fn has_compose_context(&self) -> bool {
        self.context
    }

    async fn set_selected_html(&self, html: &str) -> Result<(), DocumentError> {
        let mut body = self
            .body
            .lock()
            .map_err(|e| DocumentError::Host(e.to_string()))?;
        body.push_str(html);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_html() {
        assert_eq!(to_html("Hi\n\nAnn"), "Hi<br/><br/>Ann");
        assert_eq!(to_html("plain"), "plain");
    }

    #[tokio::test]
    async fn test_insert_appends_html() {
        let buffer = ComposeBuffer::new();
        insert_text(&buffer, "a\nb").await.unwrap();
        insert_text(&buffer, "c").await.unwrap();
        assert_eq!(buffer.body(), "a<br/>bc");
    }

    #[tokio::test]
    async fn test_insert_without_context() {
        let buffer = ComposeBuffer::without_context();
        let result = insert_text(&buffer, "text").await;

        assert!(matches!(result, Err(DocumentError::MissingContext)));
        assert_eq!(buffer.body(), "");
    }
}
