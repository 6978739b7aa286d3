use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Split view needs at least this many columns (or CSS pixels).
pub const WIDE_LAYOUT_MIN_WIDTH: u32 = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorAction {
    Save,
    ToggleEdit,
    ToggleSplit,
    NewNote,
    NoteFromContent,
    DeleteNote,
}

impl EditorAction {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "save" => Some(Self::Save),
            "toggle_edit" => Some(Self::ToggleEdit),
            "toggle_split" => Some(Self::ToggleSplit),
            "new_note" => Some(Self::NewNote),
            "note_from_content" => Some(Self::NoteFromContent),
            "delete_note" => Some(Self::DeleteNote),
            _ => None,
        }
    }

    pub fn hint_text(&self) -> &'static str {
        match self {
            Self::Save => "save",
            Self::ToggleEdit => "edit",
            Self::ToggleSplit => "split",
            Self::NewNote => "new note",
            Self::NoteFromContent => "note from content",
            Self::DeleteNote => "delete",
        }
    }

    /// Whether the action may fire in `ctx`. A bound key that is not
    /// enabled is still consumed.
    pub fn is_enabled(&self, ctx: &ShortcutContext) -> bool {
        match self {
            Self::Save => ctx.editing,
            Self::ToggleSplit => ctx.editing && ctx.wide_layout,
            Self::DeleteNote => ctx.note_selected && !ctx.editing,
            Self::ToggleEdit | Self::NewNote | Self::NoteFromContent => true,
        }
    }

    /// Whether a disabled binding still swallows the key. `Delete` must
    /// reach the editor while editing.
    pub fn suppress_when_disabled(&self) -> bool {
        !matches!(self, Self::DeleteNote)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShortcutContext {
    pub editing: bool,
    pub wide_layout: bool,
    pub note_selected: bool,
}

impl ShortcutContext {
    pub fn new(editing: bool, width: u32, note_selected: bool) -> Self {
        Self {
            editing,
            wide_layout: width >= WIDE_LAYOUT_MIN_WIDTH,
            note_selected,
        }
    }
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn chord(modifier: KeyModifiers, code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, modifier)
}

fn chord_shift(modifier: KeyModifiers, code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, modifier | KeyModifiers::SHIFT)
}

fn editor_preset(m: KeyModifiers) -> HashMap<KeyEvent, EditorAction> {
    let mut map = HashMap::new();
    map.insert(chord(m, KeyCode::Char('s')), EditorAction::Save);
    map.insert(chord(m, KeyCode::Char('e')), EditorAction::ToggleEdit);
    map.insert(chord(m, KeyCode::Char('\\')), EditorAction::ToggleSplit);
    map.insert(chord_shift(m, KeyCode::Char('s')), EditorAction::ToggleSplit);
    map.insert(chord(m, KeyCode::Char('n')), EditorAction::NewNote);
    map.insert(chord_shift(m, KeyCode::Char('n')), EditorAction::NoteFromContent);
    map.insert(key(KeyCode::Delete), EditorAction::DeleteNote);
    map
}

pub fn default_preset() -> HashMap<KeyEvent, EditorAction> {
    editor_preset(KeyModifiers::CONTROL)
}

pub fn mac_preset() -> HashMap<KeyEvent, EditorAction> {
    editor_preset(KeyModifiers::SUPER)
}

pub fn get_preset(name: &str) -> Option<HashMap<KeyEvent, EditorAction>> {
    match name.to_lowercase().as_str() {
        "default" => Some(default_preset()),
        "mac" => Some(mac_preset()),
        _ => None,
    }
}
