/// Emoji Commands - Exposes shortcode lookup and the image/render hooks to the host
use crate::models::emoji::EmojiEntry;
use crate::models::settings::AppState;
use crate::services::emoji_index::EmojiIndex;
use crate::services::image_interceptor::InterceptResponse;

fn loaded_index() -> &'static EmojiIndex {
    let index = EmojiIndex::global();
    index.load();
    index
}

/// Converts emoji shortcodes in text to Unicode emojis
pub fn convert_emoji_shortcodes(text: String) -> String {
    loaded_index().convert_shortcodes(&text)
}

/// Index entries whose shortcode starts with `prefix`, in index order
pub fn search_emoji(prefix: String) -> Vec<EmojiEntry> {
    loaded_index().search(&prefix)
}

/// Called by the host for every image request the chat page makes
pub async fn intercept_emoji_request(state: &AppState, url: String) -> InterceptResponse {
    state.interceptor.process(&url).await.into()
}

/// Inbound `{"emoji", "dataUrl"}` message from the renderer process
pub fn deliver_native_emoji(state: &AppState, message: String) -> Result<(), String> {
    state
        .render_bridge
        .deliver_json(&message)
        .map_err(|e| format!("Failed to deliver native emoji: {:#}", e))
}
