//! Diagnostic-aware logging configuration.
//!
//! Every component logs through the `log` facade with a `[Component]` prefix.
//! With diagnostics disabled only WARN and ERROR records reach the output;
//! enabling them also shows the render bridge and picker traffic at DEBUG/INFO.
//! `RUST_LOG` can still narrow individual modules.

use crate::models::settings::Settings;
use lazy_static::lazy_static;
use log::LevelFilter;
use std::sync::atomic::{AtomicBool, Ordering};

lazy_static! {
    static ref DIAGNOSTICS_ENABLED: AtomicBool = AtomicBool::new(true);
}

/// Most verbose level emitted for a diagnostics preference
pub fn level_for(enabled: bool) -> LevelFilter {
    if enabled {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

/// Installs the env_logger backend and applies the stored diagnostics preference.
/// Safe to call more than once; later calls only reapply the level.
pub fn init_logging(settings: &Settings) {
    let installed = env_logger::Builder::new()
        .filter_level(level_for(true))
        .parse_default_env()
        .format_timestamp_millis()
        .format_module_path(true)
        .try_init()
        .is_ok();

    set_diagnostics_enabled(settings.diagnostics_enabled);

    if installed {
        log::warn!(
            "[DiagnosticLogger] Logging initialized, diagnostics {}",
            if settings.diagnostics_enabled { "on" } else { "off" }
        );
    }
}

/// Applies the preference to the global max level. Returns the previous preference.
pub fn set_diagnostics_enabled(enabled: bool) -> bool {
    let previous = DIAGNOSTICS_ENABLED.swap(enabled, Ordering::SeqCst);
    log::set_max_level(level_for(enabled));

    if previous != enabled {
        log::warn!(
            "[DiagnosticLogger] Diagnostics {}",
            if enabled { "enabled" } else { "disabled" }
        );
    }
    previous
}

pub fn is_diagnostics_enabled() -> bool {
    DIAGNOSTICS_ENABLED.load(Ordering::SeqCst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels() {
        assert_eq!(level_for(true), LevelFilter::Debug);
        assert_eq!(level_for(false), LevelFilter::Warn);
    }

    // Only test touching the global level, so the assertions cannot race
    #[test]
    fn test_preference_drives_global_level() {
        let settings = Settings {
            diagnostics_enabled: false,
            ..Settings::default()
        };
        init_logging(&settings);
        assert!(!is_diagnostics_enabled());
        assert_eq!(log::max_level(), LevelFilter::Warn);

        assert!(!set_diagnostics_enabled(true));
        assert!(set_diagnostics_enabled(true));
        assert!(is_diagnostics_enabled());
        assert_eq!(log::max_level(), LevelFilter::Debug);
    }
}
