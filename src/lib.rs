//! Emoji support for the chat desktop shell: shortcode autocomplete, emoji set
//! switching for images the chat page loads, and native glyph rendering.

use anyhow::Result;
use models::settings::AppState;
use services::native_render_service::RenderChannel;
use services::settings_service::SettingsService;
use std::sync::Arc;

pub mod commands;
pub mod models;
pub mod services;
pub mod utils;

/// Startup: loads `settings.json` from the app data directory, installs logging
/// and wires the emoji services to the host's render channel.
pub fn initialize(channel: Arc<dyn RenderChannel>) -> Result<AppState> {
    let settings = SettingsService::load_default()?;
    services::diagnostic_logger::init_logging(&settings.snapshot());

    log::info!(
        "[EmojiShell] Starting with emoji style {}",
        settings.emoji_style()
    );
    Ok(AppState::new(settings, channel))
}
