use serde::{Deserialize, Serialize};

/// Half-open `[from, to)` range in UTF-16 code units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRange {
    pub from: usize,
    pub to: usize,
}

impl TextRange {
    pub fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }

    pub fn caret(at: usize) -> Self {
        Self { from: at, to: at }
    }

    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }

    /// Smallest range covering both.
    pub fn union(&self, other: &TextRange) -> TextRange {
        TextRange {
            from: self.from.min(other.from),
            to: self.to.max(other.to),
        }
    }
}

/// Screen position in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Container-relative popup anchor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopupAnchor {
    pub top: f64,
    pub left: f64,
}

/// Origin of the element a popup is positioned inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerRect {
    pub top: f64,
    pub left: f64,
}

/// A note as seen by the link picker. The note store owns the lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRef {
    pub id: String,
    pub title: String,
}

impl NoteRef {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}
