// Menu icons for each emoji style, cached for the process lifetime

use crate::models::emoji::EmojiStyle;
use crate::services::native_render_service::NativeRenderBridge;
use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::imageops::{self, FilterType};
use image::RgbaImage;
use log::debug;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub type EmojiIcon = Arc<RgbaImage>;

/// Edge length of the native-style menu icon
pub const MENU_ICON_SIZE: u32 = 16;

const NATIVE_ICON_GLYPH: &str = "🙂";

pub struct IconCache {
    bridge: Arc<NativeRenderBridge>,
    assets_dir: PathBuf,
    icons: Mutex<HashMap<EmojiStyle, EmojiIcon>>,
}

impl IconCache {
    pub fn new(bridge: Arc<NativeRenderBridge>, assets_dir: impl Into<PathBuf>) -> Self {
        Self {
            bridge,
            assets_dir: assets_dir.into(),
            icons: Mutex::new(HashMap::new()),
        }
    }

    /// Icon for the style's menu entry.
    ///
    /// `Ok(None)` when the native icon is requested before a rendering surface exists.
    /// A missing bundled asset is a packaging defect and comes back as an error.
    pub async fn get_icon(&self, style: EmojiStyle) -> Result<Option<EmojiIcon>> {
        if let Some(icon) = self.cached(style) {
            return Ok(Some(icon));
        }

        let image = match style {
            EmojiStyle::Native => {
                if !self.bridge.has_surface() {
                    debug!("[IconCache] No rendering surface yet, skipping native icon");
                    return Ok(None);
                }

                let data_url = self.bridge.render(NATIVE_ICON_GLYPH).await?;
                let rendered = decode_png_data_url(&data_url)?;
                imageops::resize(&rendered, MENU_ICON_SIZE, MENU_ICON_SIZE, FilterType::Lanczos3)
            }
            _ => load_bundled_icon(&self.assets_dir.join(style.asset_name()))?,
        };

        let mut icons = self.icons.lock().unwrap_or_else(|e| e.into_inner());
        let icon = icons.entry(style).or_insert_with(|| Arc::new(image)).clone();
        debug!("[IconCache] Cached icon for {}", style);
        Ok(Some(icon))
    }

    pub fn cached_styles(&self) -> Vec<EmojiStyle> {
        let icons = self.icons.lock().unwrap_or_else(|e| e.into_inner());
        EmojiStyle::ALL
            .into_iter()
            .filter(|style| icons.contains_key(style))
            .collect()
    }

    fn cached(&self, style: EmojiStyle) -> Option<EmojiIcon> {
        self.icons
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&style)
            .cloned()
    }
}

fn load_bundled_icon(path: &Path) -> Result<RgbaImage> {
    let image = image::open(path)
        .with_context(|| format!("Missing bundled emoji icon {}", path.display()))?;
    Ok(image.to_rgba8())
}

/// Decodes a `data:image/png;base64,...` URL into pixels
pub fn decode_png_data_url(data_url: &str) -> Result<RgbaImage> {
    let (header, payload) = data_url
        .split_once(',')
        .context("Data URL has no payload")?;

    if !header.starts_with("data:") || !header.ends_with(";base64") {
        anyhow::bail!("Unsupported data URL header: {}", header);
    }

    let bytes = STANDARD
        .decode(payload)
        .context("Failed to decode base64 image payload")?;
    let image = image::load_from_memory(&bytes).context("Failed to decode rendered emoji")?;
    Ok(image.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::render::NativeEmojiReply;
    use crate::services::native_render_service::MpscRenderChannel;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    fn png_bytes(size: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(size, size, Rgba([255, 200, 0, 255]));
        let mut bytes = Cursor::new(Vec::new());
        image.write_to(&mut bytes, ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    fn png_data_url(size: u32) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(png_bytes(size)))
    }

    fn temp_assets_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("emoji-icons-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_native_icon_is_rendered_and_downsampled() {
        let (channel, mut commands) = MpscRenderChannel::new();
        let bridge = Arc::new(NativeRenderBridge::new(Arc::new(channel)));
        let cache = IconCache::new(bridge.clone(), temp_assets_dir());

        let renderer = tokio::spawn({
            let bridge = bridge.clone();
            async move {
                let command = commands.recv().await.unwrap();
                bridge.deliver(NativeEmojiReply {
                    emoji: command.payload,
                    data_url: png_data_url(64),
                });
                commands
            }
        });

        let icon = cache.get_icon(EmojiStyle::Native).await.unwrap().unwrap();
        assert_eq!(icon.dimensions(), (MENU_ICON_SIZE, MENU_ICON_SIZE));

        let again = cache.get_icon(EmojiStyle::Native).await.unwrap().unwrap();
        assert!(Arc::ptr_eq(&icon, &again));

        let mut commands = renderer.await.unwrap();
        assert!(commands.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_native_icon_without_surface_is_absent() {
        let (channel, commands) = MpscRenderChannel::new();
        drop(commands);
        let bridge = Arc::new(NativeRenderBridge::new(Arc::new(channel)));
        let cache = IconCache::new(bridge, temp_assets_dir());

        assert!(cache.get_icon(EmojiStyle::Native).await.unwrap().is_none());
        assert!(cache.cached_styles().is_empty());
    }

    #[tokio::test]
    async fn test_bundled_icon_is_loaded_once() {
        let dir = temp_assets_dir();
        std::fs::write(dir.join("emoji-messenger-1-0.png"), png_bytes(16)).unwrap();

        let (channel, _commands) = MpscRenderChannel::new();
        let bridge = Arc::new(NativeRenderBridge::new(Arc::new(channel)));
        let cache = IconCache::new(bridge, dir.clone());

        let icon = cache.get_icon(EmojiStyle::Messenger10).await.unwrap().unwrap();
        assert_eq!(icon.dimensions(), (16, 16));

        // Served from memory even after the file disappears
        std::fs::remove_file(dir.join("emoji-messenger-1-0.png")).unwrap();
        assert!(cache.get_icon(EmojiStyle::Messenger10).await.unwrap().is_some());
        assert_eq!(cache.cached_styles(), vec![EmojiStyle::Messenger10]);
    }

    #[tokio::test]
    async fn test_missing_bundled_icon_is_an_error() {
        let (channel, _commands) = MpscRenderChannel::new();
        let bridge = Arc::new(NativeRenderBridge::new(Arc::new(channel)));
        let cache = IconCache::new(bridge, temp_assets_dir());

        let err = cache.get_icon(EmojiStyle::Facebook22).await.unwrap_err();
        assert!(err.to_string().contains("emoji-facebook-2-2.png"));
    }

    #[test]
    fn test_decode_rejects_non_base64_urls() {
        assert!(decode_png_data_url("data:image/png,rawbytes").is_err());
        assert!(decode_png_data_url("https://example.com/a.png").is_err());
        assert_eq!(decode_png_data_url(&png_data_url(4)).unwrap().dimensions(), (4, 4));
    }
}
