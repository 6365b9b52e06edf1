use crate::commands::menu::select_emoji_style;
use crate::models::settings::{AppState, Settings};
use crate::services::diagnostic_logger;
use crate::services::settings_service::EMOJI_STYLE_KEY;
use crate::services::style_menu_service::StyleChangeHooks;
use serde_json::Value;

pub(crate) const DIAGNOSTICS_KEY: &str = "diagnosticsEnabled";

pub fn load_settings(state: &AppState) -> Settings {
    state.settings.snapshot()
}

/// Reads one setting by key, e.g. `emojiStyle`
pub fn get_setting(state: &AppState, key: String) -> Result<Value, String> {
    state
        .settings
        .get(&key)
        .ok_or_else(|| format!("Unknown setting '{}'", key))
}

/// Writes one setting by key. An `emojiStyle` change refreshes the menu and asks for a
/// restart, exactly like picking the style from the menu.
pub fn set_setting(
    state: &AppState,
    key: String,
    value: Value,
    hooks: &dyn StyleChangeHooks,
) -> Result<(), String> {
    if key == EMOJI_STYLE_KEY {
        let style = value
            .as_str()
            .ok_or_else(|| format!("Invalid value for setting '{}': {}", key, value))?;
        select_emoji_style(state, style.to_string(), hooks)?;
        return Ok(());
    }

    state
        .settings
        .set(&key, value)
        .map_err(|e| format!("Failed to save setting: {:#}", e))?;

    if key == DIAGNOSTICS_KEY {
        diagnostic_logger::set_diagnostics_enabled(state.settings.snapshot().diagnostics_enabled);
    }
    Ok(())
}
