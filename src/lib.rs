pub mod api;
pub mod broker;
pub mod config;
pub mod edit_buffer;
pub mod editor;
pub mod error;
pub mod keys;
pub mod server;
pub mod settings;

// Convenience re-exports
pub use api::assistant::AssistantClient;
pub use broker::{Provider, TokenBroker};
pub use config::AppConfig;
pub use edit_buffer::EditBuffer;
pub use editor::{AiInsertionController, EditorSurface, WikilinkResolver};
pub use error::{CredentialError, NoteError, Result, SpliceError};
pub use settings::{EditorPrefs, SettingsStore};
