//! Commands for diagnostic logging control.

use crate::commands::settings::DIAGNOSTICS_KEY;
use crate::models::settings::AppState;
use crate::services::diagnostic_logger;

/// Called when the user toggles diagnostics; the choice is persisted with the other settings.
pub fn set_diagnostics_enabled(state: &AppState, enabled: bool) -> Result<(), String> {
    state
        .settings
        .set(DIAGNOSTICS_KEY, serde_json::Value::Bool(enabled))
        .map_err(|e| format!("Failed to save diagnostics setting: {:#}", e))?;
    diagnostic_logger::set_diagnostics_enabled(enabled);
    Ok(())
}

pub fn is_diagnostics_enabled() -> bool {
    diagnostic_logger::is_diagnostics_enabled()
}
