use crate::editor::splice::{self, byte_index, utf16_len};
use crate::editor::surface::EditorSurface;
use crate::editor::types::TextRange;
use crate::error::SpliceError;

/// In-memory editing surface: the document text plus a selection, both
/// addressed in UTF-16 code units.
#[derive(Debug, Clone, PartialEq)]
pub struct EditBuffer {
    text: String,
    anchor: usize,
    cursor: usize,
    focused: bool,
}

impl EditBuffer {
    pub fn new(text: &str) -> Self {
        let cursor = utf16_len(text);
        Self {
            text: text.to_string(),
            anchor: cursor,
            cursor,
            focused: false,
        }
    }

    pub fn new_empty() -> Self {
        Self {
            text: String::new(),
            anchor: 0,
            cursor: 0,
            focused: false,
        }
    }

    pub fn len(&self) -> usize {
        utf16_len(&self.text)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Caret position; the moving end of the selection.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    /// Places a collapsed caret, snapping back off a surrogate pair.
    pub fn set_cursor(&mut self, at: usize) {
        let at = self.snap(at);
        self.anchor = at;
        self.cursor = at;
    }

    pub fn text_before_cursor(&self) -> &str {
        let end = byte_index(&self.text, self.cursor).unwrap_or(self.text.len());
        &self.text[..end]
    }

    pub fn insert_char(&mut self, ch: char) {
        let mut tmp = [0u8; 4];
        // Selection and caret are kept in bounds, so this cannot fail.
        let _ = self.insert_text_at_selection(ch.encode_utf8(&mut tmp));
    }

    pub fn insert_str(&mut self, text: &str) {
        let _ = self.insert_text_at_selection(text);
    }

    pub fn delete_back(&mut self) {
        let sel = self.selection();
        if !sel.is_empty() {
            let _ = self.replace_range(sel.from, sel.to, "");
            return;
        }
        if let Some(prev) = self.text_before_cursor().chars().next_back() {
            let start = self.cursor - prev.len_utf16();
            let _ = self.replace_range(start, self.cursor, "");
        }
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = self.text_before_cursor().chars().next_back() {
            self.set_cursor(self.cursor - prev.len_utf16());
        }
    }

    pub fn move_right(&mut self) {
        let start = byte_index(&self.text, self.cursor).unwrap_or(self.text.len());
        if let Some(next) = self.text[start..].chars().next() {
            self.set_cursor(self.cursor + next.len_utf16());
        }
    }

    pub fn move_home(&mut self) {
        self.set_cursor(0);
    }

    pub fn move_end(&mut self) {
        self.set_cursor(self.len());
    }

    /// Replaces `[start, end)` and leaves the caret after the inserted text.
    pub fn replace_range(
        &mut self,
        start: usize,
        end: usize,
        replacement: &str,
    ) -> Result<(), SpliceError> {
        self.text = splice::splice(&self.text, start, end, replacement)?;
        self.set_cursor(start + utf16_len(replacement));
        Ok(())
    }

    fn snap(&self, at: usize) -> usize {
        let mut at = at.min(self.len());
        while at > 0 && byte_index(&self.text, at).is_err() {
            at -= 1;
        }
        at
    }
}

impl std::fmt::Display for EditBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

impl EditorSurface for EditBuffer {
    fn text(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, text: String) {
        self.text = text;
        self.anchor = self.snap(self.anchor);
        self.cursor = self.snap(self.cursor);
    }

    fn selection(&self) -> TextRange {
        TextRange::new(self.anchor.min(self.cursor), self.anchor.max(self.cursor))
    }

    fn set_selection(&mut self, from: usize, to: usize) {
        self.anchor = self.snap(from);
        self.cursor = self.snap(to);
    }

    fn insert_text_at_selection(&mut self, text: &str) -> Result<(), SpliceError> {
        let sel = self.selection();
        self.replace_range(sel.from, sel.to, text)
    }

    fn focus(&mut self) {
        self.focused = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_cursor_at_end() {
        let buf = EditBuffer::new("hello");
        assert_eq!(buf.to_string(), "hello");
        assert_eq!(buf.cursor(), 5);
        assert!(buf.selection().is_empty());
    }

    #[test]
    fn new_empty() {
        let buf = EditBuffer::new_empty();
        assert_eq!(buf.to_string(), "");
        assert_eq!(buf.cursor(), 0);
        assert!(buf.is_empty());
    }

    #[test]
    fn insert_char_mid_text() {
        let mut buf = EditBuffer::new("hllo");
        buf.set_cursor(1);
        buf.insert_char('e');
        assert_eq!(buf.to_string(), "hello");
        assert_eq!(buf.cursor(), 2);
    }

    #[test]
    fn insert_replaces_selection() {
        let mut buf = EditBuffer::new("hello world");
        buf.set_selection(6, 11);
        buf.insert_str("there");
        assert_eq!(buf.to_string(), "hello there");
        assert_eq!(buf.cursor(), 11);
        assert!(buf.selection().is_empty());
    }

    #[test]
    fn delete_back() {
        let mut buf = EditBuffer::new("hello");
        buf.delete_back();
        assert_eq!(buf.to_string(), "hell");
        assert_eq!(buf.cursor(), 4);
    }

    #[test]
    fn delete_back_at_start() {
        let mut buf = EditBuffer::new("hello");
        buf.set_cursor(0);
        buf.delete_back();
        assert_eq!(buf.to_string(), "hello");
        assert_eq!(buf.cursor(), 0);
    }

    #[test]
    fn delete_back_removes_whole_surrogate_pair() {
        let mut buf = EditBuffer::new("ok😀");
        assert_eq!(buf.cursor(), 4);
        buf.delete_back();
        assert_eq!(buf.to_string(), "ok");
        assert_eq!(buf.cursor(), 2);
    }

    #[test]
    fn delete_back_with_selection_removes_selection() {
        let mut buf = EditBuffer::new("abcdef");
        buf.set_selection(1, 4);
        buf.delete_back();
        assert_eq!(buf.to_string(), "aef");
        assert_eq!(buf.cursor(), 1);
    }

    #[test]
    fn move_left_right_step_over_code_points() {
        let mut buf = EditBuffer::new("a😀b");
        assert_eq!(buf.cursor(), 4);
        buf.move_left();
        assert_eq!(buf.cursor(), 3);
        buf.move_left();
        assert_eq!(buf.cursor(), 1);
        buf.move_right();
        assert_eq!(buf.cursor(), 3);
    }

    #[test]
    fn home_end() {
        let mut buf = EditBuffer::new("hello world");
        buf.move_home();
        assert_eq!(buf.cursor(), 0);
        buf.move_end();
        assert_eq!(buf.cursor(), 11);
    }

    #[test]
    fn selection_is_ordered() {
        let mut buf = EditBuffer::new("hello");
        buf.set_selection(4, 1);
        assert_eq!(buf.selection(), TextRange::new(1, 4));
    }

    #[test]
    fn set_selection_clamps_to_length() {
        let mut buf = EditBuffer::new("abc");
        buf.set_selection(1, 40);
        assert_eq!(buf.selection(), TextRange::new(1, 3));
    }

    #[test]
    fn set_cursor_snaps_off_surrogate_pair() {
        let mut buf = EditBuffer::new("a😀b");
        buf.set_cursor(2);
        assert_eq!(buf.cursor(), 1);
        assert_eq!(buf.selection(), TextRange::caret(1));
    }

    #[test]
    fn selection_end_is_the_cursor() {
        let mut buf = EditBuffer::new("a😀b");
        buf.set_selection(0, 2);
        assert_eq!(buf.cursor(), 1);
        assert_eq!(buf.selection(), TextRange::new(0, 1));
    }

    #[test]
    fn text_before_cursor() {
        let mut buf = EditBuffer::new("write /ai here");
        buf.set_cursor(10);
        assert_eq!(buf.text_before_cursor(), "write /ai ");
    }

    #[test]
    fn replace_range_basic() {
        let mut buf = EditBuffer::new("See [[pro and more");
        buf.replace_range(4, 9, "[[Plan]]").unwrap();
        assert_eq!(buf.to_string(), "See [[Plan]] and more");
        assert_eq!(buf.cursor(), 12);
    }

    #[test]
    fn replace_range_rejects_bad_range() {
        let mut buf = EditBuffer::new("short");
        let err = buf.replace_range(3, 10, "x");
        assert!(err.is_err());
        assert_eq!(buf.to_string(), "short");
    }

    #[test]
    fn set_text_keeps_selection_in_bounds() {
        let mut buf = EditBuffer::new("a long sentence");
        buf.set_text("tiny".into());
        assert_eq!(buf.selection(), TextRange::caret(4));
    }

    #[test]
    fn focus_and_blur() {
        let mut buf = EditBuffer::new("x");
        assert!(!buf.is_focused());
        buf.focus();
        assert!(buf.is_focused());
        buf.blur();
        assert!(!buf.is_focused());
    }

    #[test]
    fn empty_operations() {
        let mut buf = EditBuffer::new_empty();
        buf.delete_back();
        buf.move_left();
        buf.move_right();
        buf.move_home();
        buf.move_end();
        assert_eq!(buf.cursor(), 0);
        assert_eq!(buf.to_string(), "");
    }
}
