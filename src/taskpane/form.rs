//! Create/edit form state

use crate::snippet::{Snippet, SnippetDraft};

use super::FormTogglePolicy;

/// The snippet form: visibility, field values and edit tracking.
///
/// `editing` holds the command of the snippet being edited; `None` means the
/// form creates a new snippet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnippetForm {
    visible: bool,
    editing: Option<String>,
    draft: SnippetDraft,
}

impl SnippetForm {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Command of the snippet being edited
    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Current field values
    pub fn draft(&self) -> &SnippetDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut SnippetDraft {
        &mut self.draft
    }

    pub fn title(&self) -> &'static str {
        if self.is_editing() {
            "Edit Snippet"
        } else {
            "Create New Snippet"
        }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_editing() {
            "Update Snippet"
        } else {
            "Save Snippet"
        }
    }

    /// The cancel button only shows while editing
    pub fn shows_cancel(&self) -> bool {
        self.is_editing()
    }

    /// Fill the form from a snippet and switch to edit mode
    pub fn begin_edit(&mut self, snippet: &Snippet) {
        self.draft = SnippetDraft::from(snippet);
        self.editing = Some(snippet.command.clone());
        self.visible = true;
    }

    /// Reset fields and leave edit mode; visibility is untouched
    pub fn clear(&mut self) {
        self.draft = SnippetDraft::default();
        self.editing = None;
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Flip visibility and return whether the form is now visible.
    pub fn toggle(&mut self, policy: FormTogglePolicy) -> bool {
        self.visible = !self.visible;

        if self.visible && policy == FormTogglePolicy::ClearWhenIdle && !self.is_editing() {
            self.clear();
        }

        self.visible
    }
}
