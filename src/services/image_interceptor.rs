// Emoji image interception
//
// Swaps the emoji set the backend serves, e.g. with the style set to messenger-1-0
// https://static.xx.fbcdn.net/images/emoji.php/v9/t27/2/32/1f600.png
// becomes
// https://static.xx.fbcdn.net/images/emoji.php/v9/z27/2/32/1f600.png#replaced
//                                                 ^
// With the native style the image is replaced by one drawn in the renderer process.

use crate::models::emoji::{EmojiStyle, StyleCode};
use crate::services::native_render_service::NativeRenderBridge;
use crate::services::settings_service::SettingsService;
use crate::services::style_resolver;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const EMOJI_SET_PREFIX: &str = "emoji.php/v9/";
const REPLACED_MARKER: &str = "#replaced";
const PNG_SUFFIX: &str = ".png";

/// Facebook's private-use thumbs-up (U+F0000), shown on the contacts list
const FACEBOOK_THUMBS_UP: u32 = 0xF0000;
const THUMBS_UP: &str = "👍";
const VARIATION_SELECTOR_16: char = '\u{FE0F}';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterceptDecision {
    PassThrough,
    Redirect(String),
}

/// Response handed back to the network hook: `{}` or `{"redirectURL": ...}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterceptResponse {
    #[serde(rename = "redirectURL", skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

impl From<InterceptDecision> for InterceptResponse {
    fn from(decision: InterceptDecision) -> Self {
        match decision {
            InterceptDecision::PassThrough => Self::default(),
            InterceptDecision::Redirect(url) => Self {
                redirect_url: Some(url),
            },
        }
    }
}

pub struct ImageInterceptor {
    settings: Arc<SettingsService>,
    bridge: Arc<NativeRenderBridge>,
}

impl ImageInterceptor {
    pub fn new(settings: Arc<SettingsService>, bridge: Arc<NativeRenderBridge>) -> Self {
        Self { settings, bridge }
    }

    /// Decides what to do with one intercepted emoji image request.
    /// Each call is independent of other in-flight fetches.
    pub async fn process(&self, url: &str) -> InterceptDecision {
        let style = self.settings.emoji_style();

        if style == EmojiStyle::Native {
            return self.redirect_to_native(url).await;
        }

        match rewrite_url(url, style_resolver::code_for(style)) {
            Some(rewritten) => {
                debug!("[ImageInterceptor] {} -> {}", url, rewritten);
                InterceptDecision::Redirect(rewritten)
            }
            None => InterceptDecision::PassThrough,
        }
    }

    async fn redirect_to_native(&self, url: &str) -> InterceptDecision {
        let Some(glyph) = url_to_emoji(url) else {
            debug!("[ImageInterceptor] Could not decode emoji from {}", url);
            return InterceptDecision::PassThrough;
        };

        match self.bridge.render(&glyph).await {
            Ok(data_url) => InterceptDecision::Redirect(data_url),
            Err(e) => {
                warn!("[ImageInterceptor] Native render of {:?} failed: {}", glyph, e);
                InterceptDecision::PassThrough
            }
        }
    }
}

/// The filename without its extension, e.g. `1f471_1f3fb_200d_2640`
pub fn character_code(url: &str) -> Option<&str> {
    let end = url.rfind(PNG_SUFFIX)?;
    let start = url.rfind('/').map_or(0, |slash| slash + 1);
    url.get(start..end)
}

/// Points the URL at the bundled set for `code`. `None` means leave the request alone.
pub fn rewrite_url(url: &str, code: StyleCode) -> Option<String> {
    // Latest set is what the backend serves already
    if code == StyleCode::NEWEST {
        return None;
    }

    // Already rewritten; don't loop
    if url.contains(REPLACED_MARKER) {
        return None;
    }

    let characters = character_code(url)?;

    // Older sets stop at emoji 5.0
    if style_resolver::is_excluded(characters) {
        return None;
    }

    let set_index = url.find(EMOJI_SET_PREFIX)? + EMOJI_SET_PREFIX.len();
    let mut rest = url.get(set_index..)?.chars();
    rest.next()?;

    Some(format!(
        "{}{}{}{}",
        &url[..set_index],
        code,
        rest.as_str(),
        REPLACED_MARKER
    ))
}

/// Decodes the codepoints in an emoji URL's filename into the glyph they name,
/// e.g. `.../emoji.php/v9/tae/2/16/1f471_1f3fb_200d_2640.png`
pub fn url_to_emoji(url: &str) -> Option<String> {
    let filename = url.rsplit('/').next()?;
    let stem = filename.split(['.', '?', '#']).next()?;

    let code_points = stem
        .split('_')
        .map(|hex| u32::from_str_radix(hex, 16).ok())
        .collect::<Option<Vec<u32>>>()?;

    if code_points == [FACEBOOK_THUMBS_UP] {
        return Some(THUMBS_UP.to_string());
    }

    let mut glyph = code_points
        .into_iter()
        .map(char::from_u32)
        .collect::<Option<String>>()?;

    // Filenames drop VS16, so text-default characters would otherwise render as text
    glyph.push(VARIATION_SELECTOR_16);
    Some(glyph)
}

/// Inverse of the filename encoding: lower-case hex codepoints joined by `_`, without VS16
pub fn encode_codepoints(glyph: &str) -> String {
    glyph
        .chars()
        .filter(|c| *c != VARIATION_SELECTOR_16)
        .map(|c| format!("{:x}", c as u32))
        .collect::<Vec<_>>()
        .join("_")
}
