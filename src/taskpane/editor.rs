//! Text field helpers for the snippet body.
//!
//! Selections are measured in characters, not bytes.

/// Inserted by the "new paragraph" button
pub const PARAGRAPH_BREAK: &str = "\n\n";

/// Inserted by the "placeholder" button; the cursor lands between the braces
pub const PLACEHOLDER_SKELETON: &str = "{}";

/// A text selection; `start == end` is a plain cursor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn cursor(at: usize) -> Self {
        Self { start: at, end: at }
    }
}

fn byte_offset(value: &str, chars: usize) -> usize {
    value
        .char_indices()
        .nth(chars)
        .map(|(i, _)| i)
        .unwrap_or(value.len())
}

/// Replace the selection with `insertion` and return the new cursor.
///
/// Out-of-range or reversed selections are clamped.
pub fn insert_at_cursor(value: &mut String, selection: Selection, insertion: &str) -> Selection {
    let len = value.chars().count();
    let start = selection.start.min(len);
    let end = selection.end.clamp(start, len);

    let (from, to) = (byte_offset(value, start), byte_offset(value, end));
    value.replace_range(from..to, insertion);

    Selection::cursor(start + insertion.chars().count())
}

/// Insert a blank line at the cursor
pub fn insert_paragraph_break(value: &mut String, selection: Selection) -> Selection {
    insert_at_cursor(value, selection, PARAGRAPH_BREAK)
}

/// Insert `{}` and put the cursor inside it
pub fn insert_placeholder(value: &mut String, selection: Selection) -> Selection {
    let after = insert_at_cursor(value, selection, PLACEHOLDER_SKELETON);
    Selection::cursor(after.start - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_selection() {
        let mut value = "Hello world".to_string();
        let cursor = insert_at_cursor(&mut value, Selection { start: 6, end: 11 }, "Ann");
        assert_eq!(value, "Hello Ann");
        assert_eq!(cursor, Selection::cursor(9));
    }

    #[test]
    fn test_insert_counts_chars() {
        let mut value = "héllo".to_string();
        insert_at_cursor(&mut value, Selection::cursor(2), "-");
        assert_eq!(value, "hé-llo");
    }

    #[test]
    fn test_insert_clamps() {
        let mut value = "abc".to_string();
        let cursor = insert_at_cursor(&mut value, Selection { start: 10, end: 2 }, "!");
        assert_eq!(value, "abc!");
        assert_eq!(cursor, Selection::cursor(4));
    }

    #[test]
    fn test_paragraph_break() {
        let mut value = "ab".to_string();
        insert_paragraph_break(&mut value, Selection::cursor(1));
        assert_eq!(value, "a\n\nb");
    }

    #[test]
    fn test_placeholder_cursor_inside() {
        let mut value = "Hi ".to_string();
        let cursor = insert_placeholder(&mut value, Selection::cursor(3));
        assert_eq!(value, "Hi {}");
        assert_eq!(cursor, Selection::cursor(4));
    }
}
