//! `[[` link picker: trigger detection, suggestion ranking, and the popup
//! state machine that splices `[[<title>#id:<id>]]` into the document.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::splice::{byte_index, splice, utf16_len};
use super::surface::EditorSurface;
use super::types::{ContainerRect, NoteRef, Point, PopupAnchor, TextRange};

pub const DEFAULT_Y_OFFSET: f64 = 18.0;
pub const SUGGESTION_LIMIT: usize = 8;
pub(crate) const MAX_QUERY_LEN: usize = 50;

const OPEN: &str = "[[";
const CLOSE: &str = "]]";
const ID_MARKER: &str = "#id:";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WikilinkContext {
    pub open: bool,
    pub query: String,
    pub pos: TextRange,
    pub coords: Point,
}

/// An unterminated `[[` found around the caret.
#[derive(Debug, Clone, PartialEq)]
pub struct WikilinkMatch {
    pub range: TextRange,
    pub query: String,
    /// A `]]` already follows the caret and is included in `range`.
    pub complete: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not a popup key; the editor should handle it.
    Ignored,
    Handled,
    /// A suggestion was confirmed; `true` if the link was inserted.
    Selected(bool),
}

pub fn format_wikilink(note: &NoteRef) -> String {
    format!("{}{}{}{}{}", OPEN, note.title, ID_MARKER, note.id, CLOSE)
}

/// Extracts every `[[<title>#id:<id>]]` link. Plain `[[title]]` links carry
/// no id and are skipped.
pub fn parse_wikilinks(text: &str) -> Vec<NoteRef> {
    let mut out = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find(OPEN) {
        let after_open = &rest[start + OPEN.len()..];
        let Some(end) = after_open.find(CLOSE) else {
            break;
        };
        let inner = &after_open[..end];
        if let Some((title, id)) = inner.rsplit_once(ID_MARKER) {
            if !id.is_empty() {
                out.push(NoteRef::new(id, title));
            }
        }
        rest = &after_open[end + CLOSE.len()..];
    }
    out
}

/// Looks for an open `[[` before `cursor` on the current line.
pub fn detect_wikilink(text: &str, cursor: usize) -> Option<WikilinkMatch> {
    if cursor == 0 {
        return None;
    }
    let cursor_byte = byte_index(text, cursor).ok()?;
    let before = &text[..cursor_byte];
    let open_byte = before.rfind(OPEN)?;
    let query = &before[open_byte + OPEN.len()..];

    if query.contains(CLOSE) || query.is_empty() {
        return None;
    }
    if utf16_len(query) > MAX_QUERY_LEN || query.contains('\n') {
        return None;
    }

    let from = utf16_len(&text[..open_byte]);
    let complete = text[cursor_byte..].starts_with(CLOSE);
    let to = if complete {
        cursor + utf16_len(CLOSE)
    } else {
        cursor
    };

    Some(WikilinkMatch {
        range: TextRange::new(from, to),
        query: query.to_string(),
        complete,
    })
}

/// Ranks notes by title: exact match, then prefix, then substring.
pub fn suggest_notes(query: &str, notes: &[NoteRef], limit: usize) -> Vec<NoteRef> {
    if query.trim().is_empty() {
        return notes.iter().take(limit).cloned().collect();
    }
    let q = query.to_lowercase();
    let mut scored: Vec<(u32, &NoteRef)> = notes
        .iter()
        .filter_map(|note| {
            let title = note.title.to_lowercase();
            let score = if title == q {
                1000
            } else if title.starts_with(&q) {
                100
            } else if title.contains(&q) {
                10
            } else {
                return None;
            };
            Some((score, note))
        })
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored
        .into_iter()
        .take(limit)
        .map(|(_, note)| note.clone())
        .collect()
}

#[derive(Debug, Clone)]
pub struct WikilinkResolver {
    ctx: WikilinkContext,
    selected: usize,
    suggestions: Vec<NoteRef>,
    y_offset: f64,
}

impl Default for WikilinkResolver {
    fn default() -> Self {
        Self::new(DEFAULT_Y_OFFSET)
    }
}

impl WikilinkResolver {
    pub fn new(y_offset: f64) -> Self {
        Self {
            ctx: WikilinkContext::default(),
            selected: 0,
            suggestions: Vec::new(),
            y_offset,
        }
    }

    pub fn context(&self) -> &WikilinkContext {
        &self.ctx
    }

    pub fn is_open(&self) -> bool {
        self.ctx.open
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn set_selected_index(&mut self, index: usize) {
        self.selected = index.min(self.suggestions.len().saturating_sub(1));
    }

    pub fn suggestions(&self) -> &[NoteRef] {
        &self.suggestions
    }

    /// Applies a context reported by the editing surface. An open context
    /// replaces the previous query and resets the highlighted row.
    pub fn on_context_change(&mut self, ctx: WikilinkContext) {
        if ctx.open {
            debug!(query = %ctx.query, from = ctx.pos.from, to = ctx.pos.to, "wikilink popup open");
            self.ctx = WikilinkContext {
                open: true,
                query: ctx.query,
                pos: ctx.pos,
                coords: Point::new(ctx.coords.x, ctx.coords.y + self.y_offset),
            };
            self.selected = 0;
        } else {
            self.close();
        }
    }

    /// Runs trigger detection at the surface's caret and opens or closes the
    /// popup accordingly. `caret_coords` is the caret's screen position.
    pub fn track<S>(&mut self, surface: &S, caret_coords: Point, notes: &[NoteRef])
    where
        S: EditorSurface + ?Sized,
    {
        let caret = surface.selection().to;
        match detect_wikilink(surface.text(), caret) {
            Some(m) => {
                self.on_context_change(WikilinkContext {
                    open: true,
                    query: m.query,
                    pos: m.range,
                    coords: caret_coords,
                });
                self.refresh_suggestions(notes);
            }
            None if self.ctx.open => self.close(),
            None => {}
        }
    }

    pub fn refresh_suggestions(&mut self, notes: &[NoteRef]) {
        self.suggestions = suggest_notes(&self.ctx.query, notes, SUGGESTION_LIMIT);
        self.selected = self.selected.min(self.suggestions.len().saturating_sub(1));
    }

    pub fn close(&mut self) {
        if self.ctx.open {
            debug!("wikilink popup closed");
        }
        self.ctx.open = false;
    }

    /// Replaces the trigger range with a formatted link and parks the caret
    /// just inside the closing `]]`. The popup closes whether or not the
    /// splice succeeds; a failed splice leaves the document untouched.
    pub fn select<S>(&mut self, note: &NoteRef, surface: &mut S) -> bool
    where
        S: EditorSurface + ?Sized,
    {
        if !self.ctx.open {
            return false;
        }
        let pos = self.ctx.pos;
        let replacement = format_wikilink(note);
        let inserted = match splice(surface.text(), pos.from, pos.to, &replacement) {
            Ok(content) => {
                surface.set_text(content);
                let inside = pos
                    .from
                    .max((pos.from + utf16_len(&replacement)).saturating_sub(CLOSE.len()));
                surface.set_selection(inside, inside);
                surface.focus();
                true
            }
            Err(e) => {
                warn!(error = %e, from = pos.from, to = pos.to, note_id = %note.id, "wikilink insert failed");
                false
            }
        };
        self.close();
        inserted
    }

    pub fn handle_key<S>(&mut self, key: &KeyEvent, surface: &mut S) -> KeyOutcome
    where
        S: EditorSurface + ?Sized,
    {
        if !self.ctx.open {
            return KeyOutcome::Ignored;
        }
        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Esc) => {
                self.close();
                KeyOutcome::Handled
            }
            (KeyModifiers::NONE, KeyCode::Up) => {
                self.selected = self.selected.saturating_sub(1);
                KeyOutcome::Handled
            }
            (KeyModifiers::NONE, KeyCode::Down) => {
                if self.selected + 1 < self.suggestions.len() {
                    self.selected += 1;
                }
                KeyOutcome::Handled
            }
            (KeyModifiers::NONE, KeyCode::Enter) | (KeyModifiers::NONE, KeyCode::Tab) => {
                match self.suggestions.get(self.selected).cloned() {
                    Some(note) => KeyOutcome::Selected(self.select(&note, surface)),
                    None => KeyOutcome::Handled,
                }
            }
            _ => KeyOutcome::Ignored,
        }
    }

    /// Popup position relative to its container, or `None` while closed.
    pub fn relative_popup_pos(&self, container: Option<ContainerRect>) -> Option<PopupAnchor> {
        if !self.ctx.open {
            return None;
        }
        let coords = self.ctx.coords;
        Some(match container {
            Some(rect) => PopupAnchor {
                top: coords.y - rect.top,
                left: coords.x - rect.left,
            },
            None => PopupAnchor {
                top: coords.y,
                left: coords.x,
            },
        })
    }
}
