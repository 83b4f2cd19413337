//! Snippet records and collection edits.
//!
//! Every edit produces a new collection; the caller persists it and only then
//! swaps it in as the current one.

mod types;

pub use types::{ensure_unique, is_valid_command, Snippet, SnippetDraft, SnippetError, SnippetResult};

/// Append a snippet, rejecting a command that already exists
pub fn with_added(snippets: &[Snippet], snippet: Snippet) -> SnippetResult<Vec<Snippet>> {
    if snippets.iter().any(|s| s.command == snippet.command) {
        return Err(SnippetError::AlreadyExists(snippet.command));
    }

    let mut updated = snippets.to_vec();
    updated.push(snippet);
    Ok(updated)
}

/// Replace the snippet named `original_command` in place.
///
/// Renaming is allowed as long as the new command is not used by another
/// snippet.
pub fn with_updated(
    snippets: &[Snippet],
    original_command: &str,
    snippet: Snippet,
) -> SnippetResult<Vec<Snippet>> {
    let index = snippets
        .iter()
        .position(|s| s.command == original_command)
        .ok_or_else(|| SnippetError::NotFound(original_command.to_string()))?;

    if snippet.command != original_command
        && snippets
            .iter()
            .enumerate()
            .any(|(i, s)| i != index && s.command == snippet.command)
    {
        return Err(SnippetError::AlreadyExists(snippet.command));
    }

    let mut updated = snippets.to_vec();
    updated[index] = snippet;
    Ok(updated)
}

/// Drop the snippet at `index`
pub fn without_index(snippets: &[Snippet], index: usize) -> SnippetResult<Vec<Snippet>> {
    if index >= snippets.len() {
        return Err(SnippetError::IndexOutOfRange(index));
    }

    Ok(snippets
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, s)| s.clone())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Snippet> {
        vec![
            Snippet::new("hi", "Greeting", "Hello {name}"),
            Snippet::new("bye", "", "Regards"),
        ]
    }

    #[test]
    fn test_add_appends() {
        let updated = with_added(&sample(), Snippet::new("ty", "", "Thanks")).unwrap();
        assert_eq!(updated.len(), 3);
        assert_eq!(updated[2].command, "ty");
    }

    #[test]
    fn test_add_duplicate() {
        let result = with_added(&sample(), Snippet::new("bye", "", "Cheers"));
        assert_eq!(result, Err(SnippetError::AlreadyExists("bye".to_string())));
    }

    #[test]
    fn test_update_keeps_position() {
        let updated = with_updated(&sample(), "hi", Snippet::new("hello", "", "Hey")).unwrap();
        assert_eq!(updated[0].command, "hello");
        assert_eq!(updated[1].command, "bye");
    }

    #[test]
    fn test_update_same_command() {
        let updated = with_updated(&sample(), "bye", Snippet::new("bye", "Sign-off", "Best")).unwrap();
        assert_eq!(updated[1].description, "Sign-off");
    }

    #[test]
    fn test_update_rename_onto_existing() {
        let result = with_updated(&sample(), "hi", Snippet::new("bye", "", "x"));
        assert_eq!(result, Err(SnippetError::AlreadyExists("bye".to_string())));
    }

    #[test]
    fn test_update_missing_original() {
        let result = with_updated(&sample(), "gone", Snippet::new("gone", "", "x"));
        assert_eq!(result, Err(SnippetError::NotFound("gone".to_string())));
    }

    #[test]
    fn test_remove_by_index() {
        let updated = without_index(&sample(), 0).unwrap();
        assert_eq!(updated, vec![Snippet::new("bye", "", "Regards")]);

        assert_eq!(
            without_index(&sample(), 5),
            Err(SnippetError::IndexOutOfRange(5))
        );
    }
}
