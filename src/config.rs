use std::collections::HashMap;
use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::editor::wikilink::{WikilinkResolver, DEFAULT_Y_OFFSET};
use crate::error::{NoteError, Result};
use crate::keys::KeybindingMap;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub google: GoogleConfig,
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub editor: EditorConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GoogleConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default = "default_token_url")]
    pub token_url: String,
    #[serde(default = "default_calendar_base_url")]
    pub calendar_base_url: String,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            token_url: default_token_url(),
            calendar_base_url: default_calendar_base_url(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AiConfig {
    /// Empty means mock completions.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_ai_base_url")]
    pub base_url: String,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            base_url: default_ai_base_url(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EditorConfig {
    #[serde(default = "default_y_offset")]
    pub wikilink_y_offset: f64,
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            wikilink_y_offset: default_y_offset(),
            keybindings: KeybindingsConfig::default(),
        }
    }
}

impl EditorConfig {
    pub fn wikilink_resolver(&self) -> WikilinkResolver {
        WikilinkResolver::new(self.wikilink_y_offset)
    }

    pub fn keybinding_map(&self) -> Result<KeybindingMap> {
        KeybindingMap::from_preset(&self.keybindings.preset, &self.keybindings.bindings)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct KeybindingsConfig {
    #[serde(default = "default_preset")]
    pub preset: String,
    #[serde(default)]
    pub bindings: HashMap<String, String>,
}

impl Default for KeybindingsConfig {
    fn default() -> Self {
        Self {
            preset: default_preset(),
            bindings: HashMap::new(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:3000".into()
}

fn default_token_url() -> String {
    "https://oauth2.googleapis.com/token".into()
}

fn default_calendar_base_url() -> String {
    "https://www.googleapis.com/calendar/v3".into()
}

fn default_model() -> String {
    "gemini-1.5-flash".into()
}

fn default_ai_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".into()
}

fn default_y_offset() -> f64 {
    DEFAULT_Y_OFFSET
}

fn default_preset() -> String {
    "default".into()
}

impl AppConfig {
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        let config: AppConfig = Figment::new()
            .merge(Serialized::defaults(AppConfig::defaults()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("NOTEKIT_").split("__"))
            .extract()
            .map_err(|e| NoteError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.bind.trim().is_empty() {
            return Err(NoteError::Config("server.bind is required".into()));
        }
        if self.google.client_id.is_empty() {
            return Err(NoteError::Config(
                "google.client_id is required (set in config or NOTEKIT_GOOGLE__CLIENT_ID)".into(),
            ));
        }
        if self.google.client_secret.is_empty() {
            return Err(NoteError::Config(
                "google.client_secret is required (set in config or NOTEKIT_GOOGLE__CLIENT_SECRET)"
                    .into(),
            ));
        }
        self.editor.keybinding_map()?;
        Ok(())
    }

    pub fn config_dir() -> Option<PathBuf> {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(|xdg| PathBuf::from(xdg).join("notekit"))
            .or_else(|| {
                directories::BaseDirs::new()
                    .map(|dirs| dirs.home_dir().join(".config").join("notekit"))
            })
    }

    /// Editor preferences file next to `config.toml`.
    pub fn prefs_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("prefs.toml"))
    }

    pub fn write_default(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = r#"[server]
bind = "127.0.0.1:3000"

[google]
client_id = ""      # or set NOTEKIT_GOOGLE__CLIENT_ID
client_secret = ""  # or set NOTEKIT_GOOGLE__CLIENT_SECRET
# token_url = "https://oauth2.googleapis.com/token"
# calendar_base_url = "https://www.googleapis.com/calendar/v3"

[ai]
api_key = ""  # empty returns mock completions
model = "gemini-1.5-flash"

[editor]
wikilink_y_offset = 18

[editor.keybindings]
preset = "default"  # default | mac

# Override specific shortcuts:
# [editor.keybindings.bindings]
# save = "Ctrl+s"
# toggle_split = "Ctrl+\\"
"#;

        std::fs::write(path, content)?;
        Ok(())
    }

    fn defaults() -> Self {
        Self {
            server: ServerConfig::default(),
            google: GoogleConfig::default(),
            ai: AiConfig::default(),
            editor: EditorConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("config.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn loads_valid_config_from_toml() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(
            tmp.path(),
            r#"
[server]
bind = "0.0.0.0:8080"

[google]
client_id = "cid"
client_secret = "secret"

[ai]
api_key = "k"
model = "gemini-pro"

[editor]
wikilink_y_offset = 24

[editor.keybindings]
preset = "mac"
"#,
        );

        let config = AppConfig::load_from_path(&path).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.google.client_id, "cid");
        assert_eq!(config.ai.model, "gemini-pro");
        assert_eq!(config.editor.wikilink_y_offset, 24.0);
        assert_eq!(config.editor.keybindings.preset, "mac");
    }

    #[test]
    fn defaults_apply_for_missing_optional_fields() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(
            tmp.path(),
            r#"
[google]
client_id = "cid"
client_secret = "secret"
"#,
        );

        let config = AppConfig::load_from_path(&path).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:3000");
        assert_eq!(config.google.token_url, "https://oauth2.googleapis.com/token");
        assert_eq!(
            config.google.calendar_base_url,
            "https://www.googleapis.com/calendar/v3"
        );
        assert_eq!(config.ai.api_key, "");
        assert_eq!(config.ai.model, "gemini-1.5-flash");
        assert_eq!(config.editor.wikilink_y_offset, 18.0);
        assert_eq!(config.editor.keybindings.preset, "default");
    }

    #[test]
    fn validate_fails_without_client_id() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(
            tmp.path(),
            r#"
[google]
client_id = ""
client_secret = "secret"
"#,
        );

        let msg = AppConfig::load_from_path(&path).unwrap_err().to_string();
        assert!(msg.contains("google.client_id"));
    }

    #[test]
    fn validate_fails_without_client_secret() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(
            tmp.path(),
            r#"
[google]
client_id = "cid"
"#,
        );

        let msg = AppConfig::load_from_path(&path).unwrap_err().to_string();
        assert!(msg.contains("client_secret"));
    }

    #[test]
    fn validate_rejects_bad_keybindings() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(
            tmp.path(),
            r#"
[google]
client_id = "cid"
client_secret = "secret"

[editor.keybindings]
preset = "emacs"
"#,
        );

        let msg = AppConfig::load_from_path(&path).unwrap_err().to_string();
        assert!(msg.contains("emacs"));
    }

    #[test]
    fn env_var_overrides_nested_key() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(
            tmp.path(),
            r#"
[google]
client_id = "cid"
client_secret = "file-secret"

[ai]
base_url = "http://from-file"
"#,
        );

        env::set_var("NOTEKIT_AI__BASE_URL", "http://from-env");
        let config = AppConfig::load_from_path(&path);
        env::remove_var("NOTEKIT_AI__BASE_URL");

        assert_eq!(config.unwrap().ai.base_url, "http://from-env");
    }

    #[test]
    fn write_default_creates_config_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("subdir").join("config.toml");

        AppConfig::write_default(&path).unwrap();

        assert!(path.exists());
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("[google]"));
        assert!(content.contains("preset = \"default\""));
        // Written defaults parse but fail validation until credentials are filled in.
        assert!(AppConfig::load_from_path(&path).is_err());
    }

    #[test]
    fn keybinding_overrides_parsed() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(
            tmp.path(),
            r#"
[google]
client_id = "cid"
client_secret = "secret"

[editor.keybindings.bindings]
save = "Ctrl+Alt+s"
"#,
        );

        let config = AppConfig::load_from_path(&path).unwrap();
        assert_eq!(
            config.editor.keybindings.bindings.get("save").map(String::as_str),
            Some("Ctrl+Alt+s")
        );
        assert!(config.editor.keybinding_map().is_ok());
    }

    #[test]
    fn resolver_uses_configured_offset() {
        let editor = EditorConfig {
            wikilink_y_offset: 30.0,
            ..Default::default()
        };
        let mut resolver = editor.wikilink_resolver();
        resolver.on_context_change(crate::editor::wikilink::WikilinkContext {
            open: true,
            query: "q".into(),
            pos: crate::editor::types::TextRange::new(0, 3),
            coords: crate::editor::types::Point::new(10.0, 100.0),
        });
        assert_eq!(resolver.context().coords.y, 130.0);
    }

    #[test]
    fn config_dir_returns_some() {
        assert!(AppConfig::config_dir().is_some());
        assert!(AppConfig::prefs_path().unwrap().ends_with("prefs.toml"));
    }
}
