pub mod ai;
pub mod prompt;
pub mod splice;
pub mod surface;
pub mod types;
pub mod wikilink;

pub use ai::{AiInsertionController, AiMode, InsertTarget, Placement};
pub use prompt::{PromptSlot, PromptTicket};
pub use splice::splice;
pub use surface::EditorSurface;
pub use types::{ContainerRect, NoteRef, Point, PopupAnchor, TextRange};
pub use wikilink::{WikilinkContext, WikilinkResolver};
