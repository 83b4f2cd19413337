//! Placeholder extraction and substitution for snippet bodies.
//!
//! A placeholder is any `{name}` run without a nested `}`. Whitespace around
//! the name is ignored both when listing placeholders and when filling them:
//!
//! ```
//! use snippet_taskpane::placeholder::{compile, extract_placeholders};
//!
//! let text = "Hello {name}, your { id } is ready";
//! assert_eq!(extract_placeholders(text), vec!["name", "id"]);
//!
//! let filled = compile(text, [("name", "Ann"), ("id", "order")]);
//! assert_eq!(filled, "Hello Ann, your order is ready");
//! ```

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\{([^}]+)\}").unwrap();
}

/// List the placeholder names in `text`, first occurrence first.
///
/// Names are trimmed; names that are blank after trimming are skipped.
pub fn extract_placeholders(text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();

    for caps in PLACEHOLDER.captures_iter(text) {
        let name = caps[1].trim();
        if name.is_empty() || names.iter().any(|n| n == name) {
            continue;
        }
        names.push(name.to_string());
    }

    names
}

/// Check whether `text` needs any values before it can be inserted
pub fn has_placeholders(text: &str) -> bool {
    !extract_placeholders(text).is_empty()
}

/// Fill the placeholders named in `values`.
///
/// Every `{ name }` occurrence is replaced by the value, literally. Names
/// that are not in `values` stay in the output untouched. The text is
/// scanned once, so inserted values are never expanded again and the order
/// of `values` does not matter. A repeated name takes its last value.
pub fn compile<I, N, V>(text: &str, values: I) -> String
where
    I: IntoIterator<Item = (N, V)>,
    N: AsRef<str>,
    V: AsRef<str>,
{
    let values: HashMap<String, String> = values
        .into_iter()
        .map(|(name, value)| (name.as_ref().trim().to_string(), value.as_ref().to_string()))
        .collect();

    PLACEHOLDER
        .replace_all(text, |caps: &Captures| match values.get(caps[1].trim()) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}
