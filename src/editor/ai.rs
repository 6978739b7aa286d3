//! Floating AI assistant: selection capture, `/ai ` trigger detection, and
//! splicing completions back into the note.

use tracing::{debug, warn};

use crate::api::assistant::AssistantClient;

use super::splice::{self, fits};
use super::surface::EditorSurface;
use super::types::{Point, TextRange};

pub const AI_TRIGGER: &str = "/ai";

/// UTF-16 width of `/ai` plus its trailing whitespace.
const TRIGGER_SPAN: usize = 4;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AiSelection {
    pub selected_text: String,
    pub selected_text_position: Option<TextRange>,
    pub trigger_position: Option<TextRange>,
    pub floating_open: bool,
    pub floating_position: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiMode {
    /// Replace the selection and trigger token with the completion.
    Replace,
    /// Replace only the trigger token.
    Explain,
}

/// Synthetic completion-menu entry offered while `/ai ` sits before the caret.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionMenu {
    pub range: TextRange,
    pub label: &'static str,
    pub detail: &'static str,
    pub apply: &'static str,
}

/// Where a completion lands.
pub enum InsertTarget<'a> {
    Live(&'a mut dyn EditorSurface),
    Detached(&'a mut String),
}

impl InsertTarget<'_> {
    fn text(&self) -> &str {
        match self {
            InsertTarget::Live(surface) => surface.text(),
            InsertTarget::Detached(buffer) => buffer.as_str(),
        }
    }

    fn focus(&mut self) {
        if let InsertTarget::Live(surface) = self {
            surface.focus();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Range(TextRange),
    Cursor,
    End,
}

/// A completion request captured at submit time. The document stays
/// editable while it is outstanding, so `range` may be stale by the time
/// the response arrives.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCompletion {
    pub prompt: String,
    pub context: String,
    pub range: Option<TextRange>,
    pub mode: AiMode,
}

pub fn detect_ai_trigger(before_caret: &str, caret: usize) -> Option<CompletionMenu> {
    let last = before_caret.chars().next_back()?;
    if !last.is_whitespace() || last == '\n' {
        return None;
    }
    let rest = &before_caret[..before_caret.len() - last.len_utf8()];
    if !rest.ends_with(AI_TRIGGER) || caret < TRIGGER_SPAN {
        return None;
    }
    Some(CompletionMenu {
        range: TextRange::new(caret - TRIGGER_SPAN, caret),
        label: "AI Assistant",
        detail: "Open AI floating input",
        apply: "",
    })
}

#[derive(Debug, Clone, Default)]
pub struct AiInsertionController {
    state: AiSelection,
}

impl AiInsertionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &AiSelection {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.floating_open
    }

    pub fn capture_selection(&mut self, surface: &dyn EditorSurface) {
        let sel = surface.selection();
        let text = if sel.is_empty() {
            None
        } else {
            splice::slice(surface.text(), sel).ok()
        };
        match text {
            Some(text) => {
                self.state.selected_text = text.to_string();
                self.state.selected_text_position = Some(sel);
            }
            None => {
                self.state.selected_text.clear();
                self.state.selected_text_position = None;
            }
        }
    }

    pub fn trigger(
        &mut self,
        surface: &dyn EditorSurface,
        pos: Point,
        trigger_range: Option<TextRange>,
    ) {
        self.capture_selection(surface);
        self.state.floating_position = pos;
        self.state.trigger_position = trigger_range;
        self.state.floating_open = true;
        debug!(
            selection = self.state.selected_text_position.is_some(),
            trigger = trigger_range.is_some(),
            "ai floating input open"
        );
    }

    /// Context sent with the prompt: the selection alone when there is one,
    /// otherwise the whole note.
    pub fn completion_context(&self, note: &str) -> String {
        if self.state.selected_text.trim().is_empty() {
            note.to_string()
        } else {
            format!("Selected text to work with: \"{}\"", self.state.selected_text)
        }
    }

    /// Range the completion will overwrite for `mode`.
    pub fn target_range(&self, mode: AiMode) -> Option<TextRange> {
        let trigger = self.state.trigger_position;
        if mode == AiMode::Explain {
            return trigger;
        }
        let selection = self
            .state
            .selected_text_position
            .filter(|_| !self.state.selected_text.is_empty());
        match (selection, trigger) {
            (Some(sel), Some(trig)) => Some(sel.union(&trig)),
            (Some(sel), None) => Some(sel),
            (None, trig) => trig,
        }
    }

    pub fn begin(&self, prompt: &str, note: &str, mode: AiMode) -> Option<PendingCompletion> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return None;
        }
        Some(PendingCompletion {
            prompt: prompt.to_string(),
            context: self.completion_context(note),
            range: self.target_range(mode),
            mode,
        })
    }

    /// Applies a finished completion, closes the floating input and hands
    /// focus back to the editor.
    pub fn finish(
        &mut self,
        pending: PendingCompletion,
        completion: &str,
        mut target: InsertTarget<'_>,
    ) -> Placement {
        let range = pending
            .range
            .filter(|r| Self::still_fits(target.text(), *r));
        let text = match range {
            Some(_) => completion.to_string(),
            None => format!("\n\n{}\n", completion),
        };
        let placement = self.insert(&text, range, &mut target);
        self.state.floating_open = false;
        Self::restore_focus(&mut target);
        placement
    }

    /// Full round trip: capture, request, splice.
    pub async fn run(
        &mut self,
        client: &AssistantClient,
        prompt: &str,
        note: &str,
        mode: AiMode,
        target: InsertTarget<'_>,
    ) -> Option<Placement> {
        let pending = self.begin(prompt, note, mode)?;
        let completion = client
            .request_completion(&pending.prompt, &pending.context)
            .await;
        Some(self.finish(pending, &completion, target))
    }

    /// Inserts `text`, replacing `replace` when it still fits the document.
    /// A range that no longer fits is dropped: live surfaces insert at the
    /// caret, detached buffers append.
    pub fn insert(
        &self,
        text: &str,
        replace: Option<TextRange>,
        target: &mut InsertTarget<'_>,
    ) -> Placement {
        match target {
            InsertTarget::Live(surface) => {
                let range = replace.filter(|r| Self::still_fits(surface.text(), *r));
                if let Some(r) = range {
                    surface.set_selection(r.from, r.to);
                }
                if let Err(e) = surface.insert_text_at_selection(text) {
                    warn!(error = %e, "ai insert at selection failed");
                }
                range.map_or(Placement::Cursor, Placement::Range)
            }
            InsertTarget::Detached(buffer) => {
                if let Some(r) = replace.filter(|r| Self::still_fits(buffer.as_str(), *r)) {
                    match splice::splice(buffer.as_str(), r.from, r.to, text) {
                        Ok(content) => {
                            **buffer = content;
                            return Placement::Range(r);
                        }
                        Err(e) => warn!(error = %e, "ai splice into detached buffer failed"),
                    }
                }
                buffer.push_str(text);
                Placement::End
            }
        }
    }

    /// Closes the floating input without a completion, removing the trigger
    /// token if one was recorded.
    pub fn dismiss(&mut self, mut target: InsertTarget<'_>) {
        if let Some(trigger) = self.state.trigger_position.take() {
            self.insert("", Some(trigger), &mut target);
        }
        self.state.floating_open = false;
        Self::restore_focus(&mut target);
    }

    pub fn restore_focus(target: &mut InsertTarget<'_>) {
        target.focus();
    }

    fn still_fits(text: &str, range: TextRange) -> bool {
        let ok = fits(text, range);
        if !ok {
            warn!(from = range.from, to = range.to, "stale ai range dropped");
        }
        ok
    }
}
