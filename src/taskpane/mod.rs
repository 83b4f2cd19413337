//! Taskpane controller.
//!
//! `Taskpane` owns everything the compose taskpane shows: the snippet
//! collection, the create/edit form, the search term, the open placeholder
//! prompt, a pending delete confirmation and the status messages. It is
//! UI-toolkit agnostic; a front end renders its state and forwards user
//! actions to its methods.
//!
//! Every change to the collection goes through one path: build the new
//! collection, save it, and only then replace the cached one. Methods take
//! `&mut self`, so at most one save is ever in flight.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut pane = Taskpane::from_settings(&settings, Arc::new(ComposeBuffer::new())).await?;
//! pane.initialize().await;
//!
//! pane.submit(SnippetDraft::new("sig", "Signature", "Best,\n{name}")).await?;
//! pane.dispatch(ListCommand::Insert(0)).await?;
//! pane.set_placeholder("name", "Ann");
//! pane.confirm_insert().await?;
//! ```

mod command;
mod editor;
mod form;
mod prompt;
mod search;
mod status;

pub use command::{handler_for, CommandKind, CommandOutcome, Handler, ListCommand, HANDLERS};
pub use editor::{
    insert_at_cursor, insert_paragraph_break, insert_placeholder, Selection, PARAGRAPH_BREAK,
    PLACEHOLDER_SKELETON,
};
pub use form::SnippetForm;
pub use prompt::PlaceholderPrompt;
pub use search::{list_view, matches, ListItem, ListView};
pub use status::{StatusBoard, StatusChannel, StatusKind, StatusMessage};

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::config::Settings;
use crate::defaults::create_defaults_source;
use crate::document::{insert_text, DocumentError, DocumentHost};
use crate::error::AppError;
use crate::metrics::InsertMetrics;
use crate::placeholder::extract_placeholders;
use crate::redis::RedisPool;
use crate::snippet::{self, Snippet, SnippetDraft, SnippetError};
use crate::storage::create_roaming_settings;
use crate::store::{LoadSource, SnippetStore};

/// How the delete button behaves
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletePolicy {
    /// Delete asks for confirmation inside the row
    #[default]
    Inline,
    /// The front end already confirmed (e.g. a blocking dialog); delete at once
    Immediate,
}

/// What opening the form does to its contents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormTogglePolicy {
    /// Opening an idle form clears it; an edit in progress is kept
    #[default]
    ClearWhenIdle,
    /// Opening the form never clears it
    Preserve,
}

/// Result of a successful form submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Added { command: String },
    Updated { from: String, to: String },
}

/// The taskpane state object
pub struct Taskpane {
    store: SnippetStore,
    document: Arc<dyn DocumentHost>,
    snippets: Vec<Snippet>,
    form: SnippetForm,
    search: String,
    pending_delete: Option<usize>,
    prompt: Option<PlaceholderPrompt>,
    messages: StatusBoard,
    delete_policy: DeletePolicy,
    form_toggle: FormTogglePolicy,
}

impl Taskpane {
    pub fn new(store: SnippetStore, document: Arc<dyn DocumentHost>, settings: &Settings) -> Self {
        Self {
            store,
            document,
            snippets: Vec::new(),
            form: SnippetForm::default(),
            search: String::new(),
            pending_delete: None,
            prompt: None,
            messages: StatusBoard::new(&settings.messages),
            delete_policy: settings.ui.delete_policy,
            form_toggle: settings.ui.form_toggle,
        }
    }

    /// Build the store and its backends from configuration.
    pub async fn from_settings(
        settings: &Settings,
        document: Arc<dyn DocumentHost>,
    ) -> Result<Self, AppError> {
        let redis_pool = if settings.storage.backend == "redis" {
            Some(Arc::new(RedisPool::new(settings.redis.clone())?))
        } else {
            None
        };

        let roaming = create_roaming_settings(&settings.storage, redis_pool).await?;
        let defaults = create_defaults_source(&settings.defaults);
        let store = SnippetStore::new(roaming, defaults, &settings.storage);

        tracing::info!(key = %store.key(), "Taskpane state initialized");
        Ok(Self::new(store, document, settings))
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Load the collection and report what happened in the list area.
    pub async fn initialize(&mut self) -> LoadSource {
        let outcome = self.store.load().await;

        self.pending_delete = None;
        self.prompt = None;

        match outcome.persist_error {
            Some(e) => {
                // Nothing was saved, so nothing is cached
                self.snippets = Vec::new();
                self.report(StatusChannel::List, AppError::from(e));
            }
            None => {
                self.snippets = outcome.snippets;
                match outcome.source {
                    LoadSource::Stored => {}
                    LoadSource::Defaults => {
                        self.messages.post(StatusChannel::List, StatusKind::Success, "Loaded default snippets.");
                    }
                    LoadSource::RecoveredDefaults => {
                        self.messages.post(
                            StatusChannel::List,
                            StatusKind::Info,
                            "Error loading snippets from storage. Loading defaults.",
                        );
                    }
                    LoadSource::PreviousFailure => {
                        self.messages.post(
                            StatusChannel::List,
                            StatusKind::Error,
                            "Failed to load stored snippets previously. Manual reset might be needed.",
                        );
                    }
                }
            }
        }

        if let Some(e) = &outcome.defaults_error {
            tracing::warn!(error = %e, "Default snippets unavailable");
            self.messages.post(StatusChannel::List, StatusKind::Error, "Error loading default snippets.");
        }

        tracing::info!(source = %outcome.source, count = self.snippets.len(), "Snippets loaded");
        outcome.source
    }

    /// Load again, discarding the cached collection
    pub async fn reload(&mut self) -> LoadSource {
        self.initialize().await
    }

    /// Clear stored snippets and start over from the defaults.
    pub async fn reset_storage(&mut self) -> Result<LoadSource, AppError> {
        if let Err(e) = self.store.reset().await {
            return Err(self.report(StatusChannel::List, AppError::from(e)));
        }

        self.form.clear();
        self.form.hide();
        Ok(self.initialize().await)
    }

    // ------------------------------------------------------------------
    // Read-only state
    // ------------------------------------------------------------------

    pub fn snippets(&self) -> &[Snippet] {
        &self.snippets
    }

    pub fn form(&self) -> &SnippetForm {
        &self.form
    }

    /// Field values, for binding to the form inputs
    pub fn form_draft_mut(&mut self) -> &mut SnippetDraft {
        self.form.draft_mut()
    }

    pub fn prompt(&self) -> Option<&PlaceholderPrompt> {
        self.prompt.as_ref()
    }

    pub fn pending_delete(&self) -> Option<usize> {
        self.pending_delete
    }

    pub fn messages(&self) -> &StatusBoard {
        &self.messages
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Rows to show for the current search
    pub fn list_view(&self) -> ListView<'_> {
        list_view(&self.snippets, &self.search, self.pending_delete)
    }

    /// Snippets matching the search, with their collection index
    pub fn visible_snippets(&self) -> Vec<(usize, &Snippet)> {
        self.snippets
            .iter()
            .enumerate()
            .filter(|(_, s)| matches(s, &self.search))
            .collect()
    }

    /// Drop status messages whose time is up
    pub fn prune_messages(&mut self, now: DateTime<Utc>) -> usize {
        self.messages.prune(now)
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    pub fn clear_search(&mut self) {
        self.search.clear();
    }

    // ------------------------------------------------------------------
    // List commands
    // ------------------------------------------------------------------

    /// Run a list command through the handler table.
    ///
    /// Errors are also posted to the list message area.
    pub async fn dispatch(&mut self, command: ListCommand) -> Result<CommandOutcome, AppError> {
        let index = command.index();

        // A click anywhere else closes another row's delete confirmation
        if !command.is_confirmation() && self.pending_delete.is_some_and(|p| p != index) {
            self.pending_delete = None;
        }

        let handler = match handler_for(command.kind()) {
            Some(handler) => handler,
            None => {
                tracing::error!(command = ?command, "No handler registered for command");
                return Err(AppError::from(SnippetError::IndexOutOfRange(index)));
            }
        };

        tracing::debug!(command = ?command, "Dispatching list command");
        handler(self, index).await
    }

    fn snippet_at(&self, index: usize) -> Result<&Snippet, AppError> {
        self.snippets
            .get(index)
            .ok_or(AppError::Snippet(SnippetError::IndexOutOfRange(index)))
    }

    /// Look up a row, reporting a missing one to the list area
    fn require(&mut self, index: usize) -> Result<Snippet, AppError> {
        match self.snippet_at(index) {
            Ok(snippet) => Ok(snippet.clone()),
            Err(e) => {
                tracing::error!(index = index, "Could not find snippet data for index");
                Err(self.report(StatusChannel::List, e))
            }
        }
    }

    async fn insert_at(&mut self, index: usize) -> Result<CommandOutcome, AppError> {
        let snippet = self.require(index)?;
        self.pending_delete = None;

        let names = extract_placeholders(&snippet.text);
        if names.is_empty() {
            self.prompt = None;
            self.insert_into_document(&snippet.text).await?;
            return Ok(CommandOutcome::Inserted {
                command: snippet.command,
            });
        }

        self.prompt = Some(PlaceholderPrompt::new(index, &snippet, names.clone()));
        Ok(CommandOutcome::PromptOpened {
            command: snippet.command,
            names,
        })
    }

    fn edit_at(&mut self, index: usize) -> Result<CommandOutcome, AppError> {
        let snippet = self.require(index)?;

        self.form.begin_edit(&snippet);
        self.messages.dismiss(StatusChannel::Form);
        self.pending_delete = None;
        self.prompt = None;

        Ok(CommandOutcome::Editing {
            command: snippet.command,
        })
    }

    async fn request_delete(&mut self, index: usize) -> Result<CommandOutcome, AppError> {
        let snippet = self.require(index)?;

        match self.delete_policy {
            DeletePolicy::Inline => {
                self.pending_delete = Some(index);
                Ok(CommandOutcome::DeletePending {
                    question: format!("Delete '{}'?", snippet.command),
                    command: snippet.command,
                })
            }
            DeletePolicy::Immediate => self.delete_at(index).await,
        }
    }

    async fn delete_at(&mut self, index: usize) -> Result<CommandOutcome, AppError> {
        let snippet = self.require(index)?;
        tracing::info!(command = %snippet.command, "Confirmed delete");

        let updated = snippet::without_index(&self.snippets, index)?;
        self.commit(updated).await.map_err(|e| self.report(StatusChannel::List, e))?;

        self.messages.post(StatusChannel::List, StatusKind::Success, "Snippet deleted successfully!");

        if self.form.editing() == Some(snippet.command.as_str()) {
            self.form.clear();
            self.form.hide();
        }

        Ok(CommandOutcome::Deleted {
            command: snippet.command,
        })
    }

    fn cancel_delete(&mut self, index: usize) -> Result<CommandOutcome, AppError> {
        if self.pending_delete == Some(index) {
            self.pending_delete = None;
        }
        Ok(CommandOutcome::DeleteCancelled)
    }

    // ------------------------------------------------------------------
    // Placeholder prompt
    // ------------------------------------------------------------------

    /// Set a value in the open prompt; false if no prompt or no such field
    pub fn set_placeholder(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.prompt.as_mut() {
            Some(prompt) => prompt.set(name, value),
            None => false,
        }
    }

    /// Fill the prompted snippet and insert it. The prompt closes either way.
    pub async fn confirm_insert(&mut self) -> Result<CommandOutcome, AppError> {
        let prompt = match self.prompt.take() {
            Some(prompt) => prompt,
            None => return Err(AppError::NoPrompt),
        };

        // The collection may have changed while the prompt was open
        let found = self
            .snippets
            .get(prompt.index())
            .filter(|s| s.command == prompt.command())
            .cloned();
        let snippet = match found {
            Some(snippet) => snippet,
            None => {
                let err = AppError::from(SnippetError::IndexOutOfRange(prompt.index()));
                return Err(self.report(StatusChannel::List, err));
            }
        };

        let compiled = prompt.compile(&snippet.text);
        self.insert_into_document(&compiled).await?;

        Ok(CommandOutcome::Inserted {
            command: snippet.command,
        })
    }

    pub fn cancel_insert(&mut self) {
        self.prompt = None;
    }

    async fn insert_into_document(&mut self, text: &str) -> Result<(), AppError> {
        match insert_text(self.document.as_ref(), text).await {
            Ok(()) => {
                InsertMetrics::record_inserted();
                self.messages.post(StatusChannel::List, StatusKind::Success, "Snippet inserted!");
                Ok(())
            }
            Err(e) => {
                if matches!(e, DocumentError::MissingContext) {
                    InsertMetrics::record_no_context();
                } else {
                    InsertMetrics::record_failed();
                }
                Err(self.report(StatusChannel::List, AppError::from(e)))
            }
        }
    }

    // ------------------------------------------------------------------
    // Form
    // ------------------------------------------------------------------

    /// Open an empty form for a new snippet
    pub fn begin_create(&mut self) {
        self.form.clear();
        self.form.show();
    }

    /// Leave edit mode and collapse the form
    pub fn cancel_edit(&mut self) {
        self.form.clear();
        self.form.hide();
        self.messages.dismiss(StatusChannel::Form);
    }

    /// Show or hide the form; returns whether it is now visible
    pub fn toggle_form(&mut self) -> bool {
        self.form.toggle(self.form_toggle)
    }

    /// Insert a blank line into the form's text at `selection`
    pub fn form_insert_paragraph_break(&mut self, selection: Selection) -> Selection {
        insert_paragraph_break(&mut self.form.draft_mut().text, selection)
    }

    /// Insert `{}` into the form's text, cursor inside the braces
    pub fn form_insert_placeholder(&mut self, selection: Selection) -> Selection {
        insert_placeholder(&mut self.form.draft_mut().text, selection)
    }

    /// Validate and save the form contents.
    ///
    /// Adds a new snippet, or updates the one being edited. Validation and
    /// duplicate checks happen before anything is written.
    pub async fn submit(&mut self, draft: SnippetDraft) -> Result<SubmitOutcome, AppError> {
        let snippet = draft
            .into_snippet()
            .map_err(|e| self.report(StatusChannel::Form, AppError::from(e)))?;

        let original = self.form.editing().map(str::to_string);
        let edited = match &original {
            Some(original) => snippet::with_updated(&self.snippets, original, snippet.clone()),
            None => snippet::with_added(&self.snippets, snippet.clone()),
        };
        let updated = edited.map_err(|e| self.report(StatusChannel::Form, AppError::from(e)))?;

        self.commit(updated)
            .await
            .map_err(|e| self.report(StatusChannel::List, e))?;

        let outcome = match original {
            Some(from) => {
                self.messages.post(StatusChannel::Form, StatusKind::Success, "Snippet updated successfully!");
                SubmitOutcome::Updated {
                    from,
                    to: snippet.command,
                }
            }
            None => {
                self.messages.post(StatusChannel::Form, StatusKind::Success, "Snippet added successfully!");
                SubmitOutcome::Added {
                    command: snippet.command,
                }
            }
        };

        self.form.clear();
        self.form.hide();
        Ok(outcome)
    }

    /// Submit whatever is currently in the form fields
    pub async fn submit_form(&mut self) -> Result<SubmitOutcome, AppError> {
        let draft = self.form.draft().clone();
        self.submit(draft).await
    }

    // ------------------------------------------------------------------
    // Mutation funnel
    // ------------------------------------------------------------------

    /// Save `updated`, then make it the current collection.
    ///
    /// On failure the current collection is left as it was.
    async fn commit(&mut self, updated: Vec<Snippet>) -> Result<(), AppError> {
        self.store.save(&updated).await?;

        self.snippets = updated;
        self.pending_delete = None;
        self.prompt = None;
        Ok(())
    }

    /// Log an error, show it in `channel`, and hand it back
    fn report(&mut self, channel: StatusChannel, err: AppError) -> AppError {
        let message = err.user_message();
        err.log();
        self.messages.post(channel, StatusKind::Error, message);
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::StaticDefaults;
    use crate::document::ComposeBuffer;
    use crate::storage::{MemoryRoamingSettings, DEFAULT_VALUE_QUOTA};
    use crate::store::StoreError;

    struct Fixture {
        pane: Taskpane,
        backend: Arc<MemoryRoamingSettings>,
        document: Arc<ComposeBuffer>,
    }

    async fn fixture_with(settings: Settings, snippets: Vec<Snippet>) -> Fixture {
        let backend = Arc::new(MemoryRoamingSettings::new(DEFAULT_VALUE_QUOTA));
        let document = Arc::new(ComposeBuffer::new());
        let store = SnippetStore::new(
            backend.clone(),
            Arc::new(StaticDefaults::new(snippets)),
            &settings.storage,
        );
        let mut pane = Taskpane::new(store, document.clone(), &settings);
        pane.initialize().await;
        Fixture {
            pane,
            backend,
            document,
        }
    }

    async fn fixture() -> Fixture {
        fixture_with(
            Settings::default(),
            vec![
                Snippet::new("thanks", "Thank-you", "Thank you!\nAnn"),
                Snippet::new("greet", "Greeting", "Hi {name}, re {topic}"),
            ],
        )
        .await
    }

    fn list_text(pane: &Taskpane) -> Option<String> {
        pane.messages()
            .current(StatusChannel::List)
            .map(|m| m.text.clone())
    }

    #[tokio::test]
    async fn test_initialize_loads_defaults() {
        let f = fixture().await;
        assert_eq!(f.pane.snippets().len(), 2);
        assert_eq!(list_text(&f.pane).as_deref(), Some("Loaded default snippets."));
    }

    #[tokio::test]
    async fn test_insert_without_placeholders() {
        let mut f = fixture().await;

        let outcome = f.pane.dispatch(ListCommand::Insert(0)).await.unwrap();
        assert_eq!(
            outcome,
            CommandOutcome::Inserted {
                command: "thanks".to_string()
            }
        );
        assert_eq!(f.document.body(), "Thank you!<br/>Ann");
        assert_eq!(list_text(&f.pane).as_deref(), Some("Snippet inserted!"));
    }

    #[tokio::test]
    async fn test_insert_with_placeholders_prompts_first() {
        let mut f = fixture().await;

        let outcome = f.pane.dispatch(ListCommand::Insert(1)).await.unwrap();
        assert!(matches!(
            outcome,
            CommandOutcome::PromptOpened { ref names, .. } if names == &vec!["name".to_string(), "topic".to_string()]
        ));
        assert_eq!(f.document.body(), "");

        assert!(f.pane.set_placeholder("name", "Bob"));
        f.pane.confirm_insert().await.unwrap();

        assert_eq!(f.document.body(), "Hi Bob, re ");
        assert!(f.pane.prompt().is_none());
    }

    #[tokio::test]
    async fn test_confirm_insert_without_prompt() {
        let mut f = fixture().await;
        assert!(matches!(f.pane.confirm_insert().await, Err(AppError::NoPrompt)));
    }

    #[tokio::test]
    async fn test_unknown_index() {
        let mut f = fixture().await;

        let result = f.pane.dispatch(ListCommand::Edit(9)).await;
        assert!(matches!(
            result,
            Err(AppError::Snippet(SnippetError::IndexOutOfRange(9)))
        ));
        assert_eq!(
            list_text(&f.pane).as_deref(),
            Some("Error: Could not find snippet data.")
        );
    }

    #[tokio::test]
    async fn test_inline_delete_flow() {
        let mut f = fixture().await;

        let outcome = f.pane.dispatch(ListCommand::Delete(0)).await.unwrap();
        assert_eq!(
            outcome,
            CommandOutcome::DeletePending {
                command: "thanks".to_string(),
                question: "Delete 'thanks'?".to_string(),
            }
        );
        assert_eq!(f.pane.pending_delete(), Some(0));

        // Clicking another row closes the confirmation
        f.pane.dispatch(ListCommand::Edit(1)).await.unwrap();
        assert_eq!(f.pane.pending_delete(), None);

        f.pane.dispatch(ListCommand::Delete(0)).await.unwrap();
        f.pane.dispatch(ListCommand::CancelDelete(0)).await.unwrap();
        assert_eq!(f.pane.pending_delete(), None);
        assert_eq!(f.pane.snippets().len(), 2);

        f.pane.dispatch(ListCommand::Delete(0)).await.unwrap();
        f.pane.dispatch(ListCommand::ConfirmDelete(0)).await.unwrap();
        assert_eq!(f.pane.snippets().len(), 1);
        assert_eq!(f.pane.snippets()[0].command, "greet");
        assert_eq!(list_text(&f.pane).as_deref(), Some("Snippet deleted successfully!"));
    }

    #[tokio::test]
    async fn test_immediate_delete_policy() {
        let settings = Settings::from_toml("[ui]\ndelete_policy = \"immediate\"").unwrap();
        let mut f = fixture_with(settings, vec![Snippet::new("a", "", "1")]).await;

        let outcome = f.pane.dispatch(ListCommand::Delete(0)).await.unwrap();
        assert!(matches!(outcome, CommandOutcome::Deleted { .. }));
        assert!(f.pane.snippets().is_empty());
    }

    #[tokio::test]
    async fn test_deleting_edited_snippet_closes_form() {
        let mut f = fixture().await;

        f.pane.dispatch(ListCommand::Edit(1)).await.unwrap();
        assert_eq!(f.pane.form().editing(), Some("greet"));

        f.pane.dispatch(ListCommand::Delete(1)).await.unwrap();
        f.pane.dispatch(ListCommand::ConfirmDelete(1)).await.unwrap();

        assert!(!f.pane.form().is_editing());
        assert!(!f.pane.form().is_visible());
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_cache() {
        let mut f = fixture().await;
        f.backend.fail_next_save("quota exceeded");

        let result = f.pane.dispatch(ListCommand::ConfirmDelete(0)).await;
        assert!(matches!(result, Err(AppError::Store(StoreError::Write(_)))));
        assert_eq!(f.pane.snippets().len(), 2);
        assert!(list_text(&f.pane).unwrap().starts_with("Error saving snippets"));
    }

    #[tokio::test]
    async fn test_submit_adds_and_closes_form() {
        let mut f = fixture().await;
        f.pane.begin_create();

        let outcome = f
            .pane
            .submit(SnippetDraft::new(" sig ", "", "-- Ann"))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            SubmitOutcome::Added {
                command: "sig".to_string()
            }
        );
        assert_eq!(f.pane.snippets().len(), 3);
        assert!(!f.pane.form().is_visible());
        assert_eq!(
            f.pane.messages().current(StatusChannel::Form).unwrap().text,
            "Snippet added successfully!"
        );
    }

    #[tokio::test]
    async fn test_submit_duplicate_never_writes() {
        let mut f = fixture().await;
        let saves = f.backend.save_count();

        let result = f.pane.submit(SnippetDraft::new("thanks", "", "Again")).await;

        assert!(matches!(
            result,
            Err(AppError::Snippet(SnippetError::AlreadyExists(_)))
        ));
        assert_eq!(f.backend.save_count(), saves);
        assert_eq!(
            f.pane.messages().current(StatusChannel::Form).unwrap().text,
            "Error: Command Name \"thanks\" already exists."
        );
    }

    #[tokio::test]
    async fn test_submit_updates_edited_snippet() {
        let mut f = fixture().await;
        f.pane.dispatch(ListCommand::Edit(0)).await.unwrap();

        let mut draft = f.pane.form().draft().clone();
        draft.command = "ty".to_string();
        let outcome = f.pane.submit(draft).await.unwrap();

        assert_eq!(
            outcome,
            SubmitOutcome::Updated {
                from: "thanks".to_string(),
                to: "ty".to_string()
            }
        );
        assert_eq!(f.pane.snippets()[0].command, "ty");
        assert!(!f.pane.form().is_editing());
    }

    #[tokio::test]
    async fn test_submit_invalid_command() {
        let mut f = fixture().await;
        let result = f.pane.submit(SnippetDraft::new("bad name", "", "x")).await;

        assert!(matches!(
            result,
            Err(AppError::Snippet(SnippetError::InvalidCommand(_)))
        ));
    }

    #[tokio::test]
    async fn test_search_view() {
        let mut f = fixture().await;

        f.pane.set_search("GREET");
        match f.pane.list_view() {
            ListView::Items(items) => {
                assert_eq!(items.len(), 1);
                assert_eq!(items[0].index, 1);
            }
            other => panic!("unexpected view: {:?}", other),
        }

        f.pane.set_search("nothing like this");
        assert_eq!(f.pane.list_view(), ListView::NoMatches);

        f.pane.clear_search();
        assert!(matches!(f.pane.list_view(), ListView::Items(items) if items.len() == 2));
    }

    #[tokio::test]
    async fn test_form_editor_helpers() {
        let mut f = fixture().await;
        f.pane.begin_create();
        f.pane.form_draft_mut().text = "Hi".to_string();

        let cursor = f.pane.form_insert_paragraph_break(Selection::cursor(2));
        let cursor = f.pane.form_insert_placeholder(cursor);
        assert_eq!(f.pane.form().draft().text, "Hi\n\n{}");
        assert_eq!(cursor, Selection::cursor(5));

        f.pane.set_search("thank");
        let visible = f.pane.visible_snippets();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].0, 0);
    }

    #[tokio::test]
    async fn test_insert_without_compose_context() {
        let settings = Settings::default();
        let backend = Arc::new(MemoryRoamingSettings::new(DEFAULT_VALUE_QUOTA));
        let store = SnippetStore::new(
            backend,
            Arc::new(StaticDefaults::new(vec![Snippet::new("a", "", "text")])),
            &settings.storage,
        );
        let mut pane = Taskpane::new(store, Arc::new(ComposeBuffer::without_context()), &settings);
        pane.initialize().await;

        let result = pane.dispatch(ListCommand::Insert(0)).await;
        assert!(matches!(
            result,
            Err(AppError::Document(DocumentError::MissingContext))
        ));
    }
}
