use crate::models::emoji::EmojiStyle;
use crate::services::icon_cache_service::{EmojiIcon, IconCache};
use crate::services::settings_service::SettingsService;
use anyhow::Result;
use futures::future::try_join_all;
use log::info;

pub const RESTART_MESSAGE: &str = "The app needs to be restarted to apply emoji changes.";

/// Side effects of changing the style, owned by the host shell
pub trait StyleChangeHooks: Send + Sync {
    fn refresh_menu(&self);
    fn prompt_restart(&self, message: &str);
}

#[derive(Debug, Clone)]
pub enum StyleMenuEntry {
    Style {
        style: EmojiStyle,
        label: &'static str,
        checked: bool,
        icon: Option<EmojiIcon>,
    },
    Separator,
}

impl StyleMenuEntry {
    pub fn style(&self) -> Option<EmojiStyle> {
        match self {
            StyleMenuEntry::Style { style, .. } => Some(*style),
            StyleMenuEntry::Separator => None,
        }
    }
}

/// Entries for the emoji style submenu: System, a separator, then the bundled sets
pub async fn generate_submenu(
    settings: &SettingsService,
    icons: &IconCache,
) -> Result<Vec<StyleMenuEntry>> {
    let selected = settings.emoji_style();

    let entries = try_join_all(EmojiStyle::ALL.into_iter().map(|style| async move {
        let icon = icons.get_icon(style).await?;
        Ok::<_, anyhow::Error>(StyleMenuEntry::Style {
            style,
            label: style.label(),
            checked: style == selected,
            icon,
        })
    }))
    .await?;

    let mut menu = Vec::with_capacity(entries.len() + 1);
    let mut entries = entries.into_iter();
    menu.extend(entries.next());
    menu.push(StyleMenuEntry::Separator);
    menu.extend(entries);
    Ok(menu)
}

/// Menu click on a style. Returns false when the style was already selected.
pub fn select_style(
    settings: &SettingsService,
    style: EmojiStyle,
    hooks: &dyn StyleChangeHooks,
) -> Result<bool> {
    if !settings.set_emoji_style(style)? {
        return Ok(false);
    }

    info!("[StyleMenu] Emoji style changed to {}", style);
    hooks.refresh_menu();
    hooks.prompt_restart(RESTART_MESSAGE);
    Ok(true)
}
