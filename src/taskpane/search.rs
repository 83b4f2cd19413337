//! List filtering

use crate::snippet::Snippet;

/// Case-insensitive match on command, description or text.
///
/// A blank term matches everything.
pub fn matches(snippet: &Snippet, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }

    snippet.command.to_lowercase().contains(&term)
        || snippet.description.to_lowercase().contains(&term)
        || snippet.text.to_lowercase().contains(&term)
}

/// One row of the snippet list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem<'a> {
    /// Position in the full collection (commands address items by it)
    pub index: usize,
    pub snippet: &'a Snippet,
    /// The row shows the delete confirmation instead of its actions
    pub confirming_delete: bool,
}

/// What the list area shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView<'a> {
    /// No snippets at all
    Empty,
    /// Snippets exist but none match the search
    NoMatches,
    Items(Vec<ListItem<'a>>),
}

impl ListView<'_> {
    /// Placeholder text for the list area when there are no rows
    pub fn status_text(&self) -> Option<&'static str> {
        match self {
            ListView::Empty => Some("No snippets found. Create one above!"),
            ListView::NoMatches => Some("No snippets match your search."),
            ListView::Items(_) => None,
        }
    }
}

/// Build the list view for `snippets` under `term`
pub fn list_view<'a>(
    snippets: &'a [Snippet],
    term: &str,
    pending_delete: Option<usize>,
) -> ListView<'a> {
    if snippets.is_empty() {
        return ListView::Empty;
    }

    let items: Vec<ListItem<'a>> = snippets
        .iter()
        .enumerate()
        .filter(|(_, s)| matches(s, term))
        .map(|(index, snippet)| ListItem {
            index,
            snippet,
            confirming_delete: pending_delete == Some(index),
        })
        .collect();

    if items.is_empty() {
        ListView::NoMatches
    } else {
        ListView::Items(items)
    }
}
