//! Persisted editor preferences behind an injectable storage capability.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;

pub const THEME_KEY: &str = "theme";
pub const NOTES_THEME_KEY: &str = "notes-theme";
pub const FONT_FAMILY_KEY: &str = "note-font-family";
pub const FONT_SIZE_KEY: &str = "note-font-size";
pub const PREVIEW_FONT_SIZE_KEY: &str = "note-preview-font-size";

/// Key/value storage the preferences are read from and written to.
pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Process-local store for headless contexts and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_values(
    values: &Mutex<BTreeMap<String, String>>,
) -> MutexGuard<'_, BTreeMap<String, String>> {
    match values.lock() {
        Ok(values) => values,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        lock_values(&self.values).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        lock_values(&self.values).insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// TOML file of flat string pairs. Every `set` rewrites the file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    pub fn open(path: &Path) -> Result<Self> {
        let values = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)?
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            values: Mutex::new(values),
        })
    }

    fn flush(&self, values: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, toml::to_string(values)?)?;
        Ok(())
    }
}

impl SettingsStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        lock_values(&self.values).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = lock_values(&self.values);
        values.insert(key.to_string(), value.to_string());
        self.flush(&values)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Latte,
    Macchiato,
    Frappe,
    Mocha,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Latte => "latte",
            Self::Macchiato => "macchiato",
            Self::Frappe => "frappe",
            Self::Mocha => "mocha",
        }
    }
}

impl FromStr for Theme {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, ()> {
        match s {
            "latte" => Ok(Self::Latte),
            "macchiato" => Ok(Self::Macchiato),
            "frappe" => Ok(Self::Frappe),
            "mocha" => Ok(Self::Mocha),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotesTheme {
    Light,
    #[default]
    Dark,
}

impl NotesTheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl FromStr for NotesTheme {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, ()> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorPrefs {
    pub theme: Theme,
    pub notes_theme: NotesTheme,
    pub font_family: String,
    pub font_size: String,
    pub preview_font_size: String,
}

impl Default for EditorPrefs {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            notes_theme: NotesTheme::default(),
            font_family: "inherit".into(),
            font_size: "16px".into(),
            preview_font_size: "16px".into(),
        }
    }
}

fn parse_or_default<T: FromStr + Default>(store: &dyn SettingsStore, key: &str) -> T {
    match store.get(key) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "unknown stored preference, using default");
            T::default()
        }),
        None => T::default(),
    }
}

impl EditorPrefs {
    pub fn load(store: &dyn SettingsStore) -> Self {
        let defaults = Self::default();
        Self {
            theme: parse_or_default(store, THEME_KEY),
            notes_theme: parse_or_default(store, NOTES_THEME_KEY),
            font_family: store.get(FONT_FAMILY_KEY).unwrap_or(defaults.font_family),
            font_size: store.get(FONT_SIZE_KEY).unwrap_or(defaults.font_size),
            preview_font_size: store
                .get(PREVIEW_FONT_SIZE_KEY)
                .unwrap_or(defaults.preview_font_size),
        }
    }

    pub fn save(&self, store: &dyn SettingsStore) -> Result<()> {
        store.set(THEME_KEY, self.theme.as_str())?;
        store.set(NOTES_THEME_KEY, self.notes_theme.as_str())?;
        store.set(FONT_FAMILY_KEY, &self.font_family)?;
        store.set(FONT_SIZE_KEY, &self.font_size)?;
        store.set(PREVIEW_FONT_SIZE_KEY, &self.preview_font_size)?;
        Ok(())
    }
}
