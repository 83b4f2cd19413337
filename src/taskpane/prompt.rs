//! Placeholder value prompt shown before inserting a templated snippet

use crate::placeholder::compile;
use crate::snippet::Snippet;

/// Values being collected for one snippet's placeholders.
///
/// Fields keep the order in which the placeholders first appear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderPrompt {
    index: usize,
    command: String,
    fields: Vec<(String, String)>,
}

impl PlaceholderPrompt {
    pub fn new(index: usize, snippet: &Snippet, names: Vec<String>) -> Self {
        Self {
            index,
            command: snippet.command.clone(),
            fields: names.into_iter().map(|n| (n, String::new())).collect(),
        }
    }

    /// Index of the snippet in the collection when the prompt opened
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set a field; returns false if the snippet has no such placeholder
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    /// Input hint for a field
    pub fn hint(name: &str) -> String {
        format!("Enter value for {{{}}}", name)
    }

    /// Fill the snippet text with the collected values
    pub fn compile(&self, text: &str) -> String {
        compile(
            text,
            self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str())),
        )
    }
}
