pub mod parser;
pub mod preset;

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use crate::error::{NoteError, Result};
use preset::{get_preset, EditorAction, ShortcutContext};

/// What the host should do with a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// Bound and enabled: run the action and swallow the key.
    Run(EditorAction),
    /// Bound but not enabled here: swallow the key, do nothing.
    /// Disabled `DeleteNote` is not reported at all.
    Suppressed(EditorAction),
}

pub struct KeybindingMap {
    bindings: HashMap<KeyEvent, EditorAction>,
}

impl KeybindingMap {
    pub fn from_preset(name: &str, overrides: &HashMap<String, String>) -> Result<Self> {
        let mut bindings = get_preset(name)
            .ok_or_else(|| NoteError::Config(format!("Unknown keybinding preset: {}", name)))?;

        for (action_name, key_str) in overrides {
            let action = EditorAction::from_str(action_name)
                .ok_or_else(|| NoteError::Config(format!("Unknown action: {}", action_name)))?;
            let key_event = parser::parse_key(key_str)?;

            bindings.retain(|_, v| v != &action);
            bindings.insert(key_event, action);
        }

        Ok(Self { bindings })
    }

    pub fn lookup(&self, key: &KeyEvent) -> Option<EditorAction> {
        // Drop kind/state so repeats and releases match their press.
        let key = KeyEvent::new(key.code, key.modifiers);
        self.bindings.get(&key).copied()
    }

    pub fn resolve(&self, key: &KeyEvent, ctx: &ShortcutContext) -> Option<Shortcut> {
        let action = self.lookup(key)?;
        let shortcut = if action.is_enabled(ctx) {
            Shortcut::Run(action)
        } else if action.suppress_when_disabled() {
            Shortcut::Suppressed(action)
        } else {
            return None;
        };
        debug!(?shortcut, ?ctx, "shortcut");
        Some(shortcut)
    }

    /// Display label of the first key bound to `action`, e.g. `Ctrl+s`.
    pub fn label(&self, action: EditorAction) -> Option<String> {
        let mut keys: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|(k, _)| format_key_event(k))
            .collect();
        keys.sort_by_key(|k| k.len());
        keys.into_iter().next()
    }
}

fn format_key_event(key: &KeyEvent) -> String {
    let mut parts = Vec::new();

    if key.modifiers.contains(KeyModifiers::SUPER) {
        parts.push("Cmd".to_string());
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        parts.push("Ctrl".to_string());
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        parts.push("Alt".to_string());
    }
    if key.modifiers.contains(KeyModifiers::SHIFT) {
        parts.push("Shift".to_string());
    }

    let key_str = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => "?".to_string(),
    };
    parts.push(key_str);

    parts.join("+")
}
