/// Menu Commands - The emoji style submenu and its click handler
use crate::models::emoji::EmojiStyle;
use crate::models::settings::AppState;
use crate::services::style_menu_service::{self, StyleChangeHooks, StyleMenuEntry};

pub async fn generate_emoji_submenu(state: &AppState) -> Result<Vec<StyleMenuEntry>, String> {
    style_menu_service::generate_submenu(&state.settings, &state.icon_cache)
        .await
        .map_err(|e| format!("Failed to build emoji menu: {:#}", e))
}

/// `style` is the persisted name, e.g. `messenger-1-0`
pub fn select_emoji_style(
    state: &AppState,
    style: String,
    hooks: &dyn StyleChangeHooks,
) -> Result<bool, String> {
    let style: EmojiStyle = style.parse()?;
    style_menu_service::select_style(&state.settings, style, hooks)
        .map_err(|e| format!("Failed to save emoji style: {:#}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::settings::Settings;
    use crate::services::native_render_service::MpscRenderChannel;
    use crate::services::settings_service::SettingsService;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct CountingHooks {
        refreshes: AtomicUsize,
        prompts: AtomicUsize,
    }

    impl StyleChangeHooks for CountingHooks {
        fn refresh_menu(&self) {
            self.refreshes.fetch_add(1, Ordering::SeqCst);
        }

        fn prompt_restart(&self, _message: &str) {
            self.prompts.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn state_with_assets(assets_dir: std::path::PathBuf) -> AppState {
        let (channel, _commands) = MpscRenderChannel::new();
        let settings = SettingsService::in_memory(Settings {
            assets_dir: Some(assets_dir),
            ..Settings::default()
        });
        AppState::new(settings, Arc::new(channel))
    }

    #[test]
    fn test_select_by_name() {
        let state = state_with_assets(std::env::temp_dir());
        let hooks = CountingHooks::default();

        assert_eq!(select_emoji_style(&state, "facebook-2-2".to_string(), &hooks), Ok(true));
        assert_eq!(state.settings.emoji_style(), EmojiStyle::Facebook22);
        assert_eq!(hooks.refreshes.load(Ordering::SeqCst), 1);
        assert_eq!(hooks.prompts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unknown_style_name_is_rejected() {
        let state = state_with_assets(std::env::temp_dir());
        let hooks = CountingHooks::default();

        assert!(select_emoji_style(&state, "apple-13".to_string(), &hooks).is_err());
        assert_eq!(state.settings.emoji_style(), EmojiStyle::Facebook30);
        assert_eq!(hooks.refreshes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_bundled_icon_is_reported() {
        let empty = std::env::temp_dir().join(format!("emoji-empty-{}", uuid::Uuid::new_v4()));
        let state = state_with_assets(empty);

        let err = generate_emoji_submenu(&state).await.unwrap_err();
        assert!(err.contains("Missing bundled emoji icon"), "{}", err);
    }
}
