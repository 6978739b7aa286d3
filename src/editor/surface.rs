use crate::error::SpliceError;

use super::types::TextRange;

/// A live text-editing surface. Offsets are UTF-16 code units.
pub trait EditorSurface {
    fn text(&self) -> &str;

    /// Replaces the whole document.
    fn set_text(&mut self, text: String);

    /// Current selection, ordered so that `from <= to`.
    fn selection(&self) -> TextRange;

    /// Moves the selection, clamping to the document.
    fn set_selection(&mut self, from: usize, to: usize);

    /// Replaces the current selection with `text` and leaves the caret after it.
    fn insert_text_at_selection(&mut self, text: &str) -> Result<(), SpliceError>;

    fn focus(&mut self);
}
