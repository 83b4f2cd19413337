//! List commands and their handler table.
//!
//! Each row in the snippet list offers insert, edit and delete; a row waiting
//! for delete confirmation offers confirm and cancel instead. The UI turns a
//! click into a `ListCommand` and hands it to `Taskpane::dispatch`.

use futures::future::BoxFuture;

use crate::error::AppError;

use super::Taskpane;

/// A click on a list row, addressed by the row's collection index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListCommand {
    Insert(usize),
    Edit(usize),
    Delete(usize),
    ConfirmDelete(usize),
    CancelDelete(usize),
}

/// Command discriminant, used as the handler table key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Insert,
    Edit,
    Delete,
    ConfirmDelete,
    CancelDelete,
}

impl ListCommand {
    pub fn kind(&self) -> CommandKind {
        match self {
            ListCommand::Insert(_) => CommandKind::Insert,
            ListCommand::Edit(_) => CommandKind::Edit,
            ListCommand::Delete(_) => CommandKind::Delete,
            ListCommand::ConfirmDelete(_) => CommandKind::ConfirmDelete,
            ListCommand::CancelDelete(_) => CommandKind::CancelDelete,
        }
    }

    pub fn index(&self) -> usize {
        match *self {
            ListCommand::Insert(i)
            | ListCommand::Edit(i)
            | ListCommand::Delete(i)
            | ListCommand::ConfirmDelete(i)
            | ListCommand::CancelDelete(i) => i,
        }
    }

    /// Commands issued from a row's delete confirmation
    pub fn is_confirmation(&self) -> bool {
        matches!(
            self.kind(),
            CommandKind::ConfirmDelete | CommandKind::CancelDelete
        )
    }
}

/// What a handled command did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Text went into the compose body
    Inserted { command: String },
    /// The snippet needs values first; a prompt is open
    PromptOpened { command: String, names: Vec<String> },
    /// The form now edits this snippet
    Editing { command: String },
    /// The row is waiting for confirmation
    DeletePending { command: String, question: String },
    Deleted { command: String },
    DeleteCancelled,
}

/// Async command handler
pub type Handler =
    for<'a> fn(&'a mut Taskpane, usize) -> BoxFuture<'a, Result<CommandOutcome, AppError>>;

fn handle_insert(pane: &mut Taskpane, index: usize) -> BoxFuture<'_, Result<CommandOutcome, AppError>> {
    Box::pin(pane.insert_at(index))
}

fn handle_edit(pane: &mut Taskpane, index: usize) -> BoxFuture<'_, Result<CommandOutcome, AppError>> {
    Box::pin(async move { pane.edit_at(index) })
}

fn handle_delete(pane: &mut Taskpane, index: usize) -> BoxFuture<'_, Result<CommandOutcome, AppError>> {
    Box::pin(pane.request_delete(index))
}

fn handle_confirm_delete(
    pane: &mut Taskpane,
    index: usize,
) -> BoxFuture<'_, Result<CommandOutcome, AppError>> {
    Box::pin(pane.delete_at(index))
}

fn handle_cancel_delete(
    pane: &mut Taskpane,
    index: usize,
) -> BoxFuture<'_, Result<CommandOutcome, AppError>> {
    Box::pin(async move { pane.cancel_delete(index) })
}

/// Handler for every command kind
pub static HANDLERS: [(CommandKind, Handler); 5] = [
    (CommandKind::Insert, handle_insert),
    (CommandKind::Edit, handle_edit),
    (CommandKind::Delete, handle_delete),
    (CommandKind::ConfirmDelete, handle_confirm_delete),
    (CommandKind::CancelDelete, handle_cancel_delete),
];

/// Look up the handler for a command kind
pub fn handler_for(kind: CommandKind) -> Option<Handler> {
    HANDLERS
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, handler)| *handler)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_a_handler() {
        for kind in [
            CommandKind::Insert,
            CommandKind::Edit,
            CommandKind::Delete,
            CommandKind::ConfirmDelete,
            CommandKind::CancelDelete,
        ] {
            assert!(handler_for(kind).is_some(), "missing handler for {:?}", kind);
        }
    }

    #[test]
    fn test_command_parts() {
        let cmd = ListCommand::ConfirmDelete(4);
        assert_eq!(cmd.kind(), CommandKind::ConfirmDelete);
        assert_eq!(cmd.index(), 4);
        assert!(cmd.is_confirmation());
        assert!(!ListCommand::Insert(0).is_confirmation());
    }
}
