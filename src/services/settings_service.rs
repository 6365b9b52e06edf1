use crate::models::emoji::EmojiStyle;
use crate::models::settings::Settings;
use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

pub const EMOJI_STYLE_KEY: &str = "emojiStyle";

const APP_DIR_NAME: &str = "emoji-shell";
const SETTINGS_FILE: &str = "settings.json";

/// Get the app data directory, creating it if needed
pub fn get_app_data_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().context("No configuration directory for this platform")?;

    let app_dir = if cfg!(debug_assertions) {
        base.join(format!("{}.dev", APP_DIR_NAME))
    } else {
        base.join(APP_DIR_NAME)
    };

    if !app_dir.exists() {
        fs::create_dir_all(&app_dir).context("Failed to create app data directory")?;
    }

    Ok(app_dir)
}

/// Settings shared by every emoji component, optionally backed by a JSON file
pub struct SettingsService {
    settings: RwLock<Settings>,
    path: Option<PathBuf>,
}

impl SettingsService {
    /// Settings that are never written to disk
    pub fn in_memory(settings: Settings) -> Self {
        Self {
            settings: RwLock::new(settings),
            path: None,
        }
    }

    /// Loads `settings.json` from the app data directory
    pub fn load_default() -> Result<Self> {
        let path = get_app_data_dir()?.join(SETTINGS_FILE);
        Self::load_from(path)
    }

    /// Loads settings from `path`; a missing file yields defaults
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let settings = read_settings_file(&path)?;

        Ok(Self {
            settings: RwLock::new(settings),
            path: Some(path),
        })
    }

    pub fn snapshot(&self) -> Settings {
        self.read().clone()
    }

    pub fn emoji_style(&self) -> EmojiStyle {
        self.read().emoji_style
    }

    /// Changes the style and persists it. Returns false when it was already selected.
    pub fn set_emoji_style(&self, style: EmojiStyle) -> Result<bool> {
        let changed = self.update(|settings| {
            if settings.emoji_style == style {
                return Ok(false);
            }
            settings.emoji_style = style;
            Ok(true)
        })?;

        if changed {
            debug!("[Settings] Emoji style set to {}", style);
        }
        Ok(changed)
    }

    /// Reads one top-level setting by its JSON key, e.g. `emojiStyle`
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        let value = serde_json::to_value(&*self.read()).ok()?;
        value.get(key).cloned()
    }

    /// Writes one top-level setting by its JSON key and persists the result.
    /// `emojiStyle` is refused; use [`set_emoji_style`](Self::set_emoji_style).
    pub fn set(&self, key: &str, value: serde_json::Value) -> Result<()> {
        if key == EMOJI_STYLE_KEY {
            anyhow::bail!("'{}' must be changed with set_emoji_style", key);
        }

        self.update(|settings| {
            let mut json =
                serde_json::to_value(&*settings).context("Failed to serialize settings")?;
            let object = json
                .as_object_mut()
                .context("Settings did not serialize to an object")?;

            if !object.contains_key(key) {
                anyhow::bail!("Unknown setting '{}'", key);
            }
            object.insert(key.to_string(), value);

            let updated: Settings = serde_json::from_value(json)
                .with_context(|| format!("Invalid value for setting '{}'", key))?;
            let changed = updated != *settings;
            *settings = updated;
            Ok(changed)
        })?;

        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        self.persist(&self.read())
    }

    /// Applies `change` to a copy, writes the copy, then makes it live.
    /// A failed write leaves the live settings untouched.
    fn update<F>(&self, change: F) -> Result<bool>
    where
        F: FnOnce(&mut Settings) -> Result<bool>,
    {
        let mut settings = self.write();
        let mut candidate = settings.clone();
        if !change(&mut candidate)? {
            return Ok(false);
        }

        self.persist(&candidate)?;
        *settings = candidate;
        Ok(true)
    }

    fn persist(&self, settings: &Settings) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let json = serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write settings file {}", path.display()))?;

        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, Settings> {
        self.settings.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Settings> {
        self.settings.write().unwrap_or_else(|e| e.into_inner())
    }
}

fn read_settings_file(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }

    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file {}", path.display()))?;

    match serde_json::from_str(&json) {
        Ok(settings) => Ok(settings),
        Err(e) => {
            warn!("[Settings] Ignoring unreadable settings file: {}", e);
            Ok(Settings::default())
        }
    }
}
