//! Single-slot asynchronous prompt: one modal question at a time, answered
//! later by whoever owns the UI.

use tokio::sync::oneshot;
use tracing::debug;

/// Handle returned to the caller that opened a prompt.
#[derive(Debug)]
pub struct PromptTicket<T> {
    pub id: u64,
    rx: oneshot::Receiver<Option<T>>,
}

impl<T> PromptTicket<T> {
    /// Resolves with the submitted value, or `None` on dismiss or when a
    /// newer prompt replaced this one.
    pub async fn wait(self) -> Option<T> {
        self.rx.await.ok().flatten()
    }
}

#[derive(Debug)]
pub struct PromptSlot<T> {
    next_id: u64,
    pending: Option<(u64, oneshot::Sender<Option<T>>)>,
    default_value: Option<T>,
}

impl<T> Default for PromptSlot<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            pending: None,
            default_value: None,
        }
    }
}

impl<T> PromptSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, default_value: T) -> PromptTicket<T> {
        if let Some((id, tx)) = self.pending.take() {
            debug!(id, "prompt superseded");
            let _ = tx.send(None);
        }
        self.next_id += 1;
        let (tx, rx) = oneshot::channel();
        self.pending = Some((self.next_id, tx));
        self.default_value = Some(default_value);
        PromptTicket {
            id: self.next_id,
            rx,
        }
    }

    pub fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    pub fn current_default(&self) -> Option<&T> {
        self.default_value.as_ref()
    }

    /// Answers the prompt `id`. Returns false if it is no longer current.
    pub fn resolve(&mut self, id: u64, value: T) -> bool {
        match self.pending.take() {
            Some((current, tx)) if current == id => {
                self.default_value = None;
                let _ = tx.send(Some(value));
                true
            }
            other => {
                self.pending = other;
                false
            }
        }
    }

    pub fn dismiss(&mut self) {
        if let Some((_, tx)) = self.pending.take() {
            let _ = tx.send(None);
        }
        self.default_value = None;
    }
}
