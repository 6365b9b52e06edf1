use crate::models::emoji::EmojiStyle;
use crate::services::icon_cache_service::IconCache;
use crate::services::image_interceptor::ImageInterceptor;
use crate::services::native_render_service::{NativeRenderBridge, RenderChannel};
use crate::services::settings_service::SettingsService;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

pub const DEFAULT_DEBOUNCE_MS: u64 = 400;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AutocompleteSettings {
    pub enabled: bool,
    pub debounce_ms: u64, // Quiet period before a keystroke is evaluated
    pub max_candidates: Option<usize>, // None shows every match
}

impl Default for AutocompleteSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            max_candidates: None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub emoji_style: EmojiStyle,
    #[serde(default)]
    pub autocomplete: AutocompleteSettings,
    #[serde(default = "default_diagnostics")]
    pub diagnostics_enabled: bool,
    /// Directory holding the bundled `emoji-<style>.png` menu icons
    #[serde(default)]
    pub assets_dir: Option<PathBuf>,
}

fn default_diagnostics() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            emoji_style: EmojiStyle::default(),
            autocomplete: AutocompleteSettings::default(),
            diagnostics_enabled: default_diagnostics(),
            assets_dir: None,
        }
    }
}

impl Settings {
    /// Bundled assets live in `static/` next to the executable unless configured
    pub fn resolved_assets_dir(&self) -> PathBuf {
        if let Some(dir) = &self.assets_dir {
            return dir.clone();
        }

        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join("static")))
            .unwrap_or_else(|| PathBuf::from("static"))
    }
}

/// Process-wide emoji state shared with the host
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<SettingsService>,
    pub render_bridge: Arc<NativeRenderBridge>,
    pub icon_cache: Arc<IconCache>,
    pub interceptor: Arc<ImageInterceptor>,
}

impl AppState {
    pub fn new(settings: SettingsService, channel: Arc<dyn RenderChannel>) -> Self {
        let settings = Arc::new(settings);
        let assets_dir = settings.snapshot().resolved_assets_dir();
        let render_bridge = Arc::new(NativeRenderBridge::new(channel));
        let icon_cache = Arc::new(IconCache::new(render_bridge.clone(), assets_dir));
        let interceptor = Arc::new(ImageInterceptor::new(
            settings.clone(),
            render_bridge.clone(),
        ));

        Self {
            settings,
            render_bridge,
            icon_cache,
            interceptor,
        }
    }
}
