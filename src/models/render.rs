use serde::{Deserialize, Serialize};

pub const RENDER_NATIVE_EMOJI: &str = "render-native-emoji";

/// Outbound message asking the renderer process to draw a glyph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderCommand {
    pub command: String,
    pub payload: String,
}

impl RenderCommand {
    pub fn render_native_emoji(glyph: &str) -> Self {
        Self {
            command: RENDER_NATIVE_EMOJI.to_string(),
            payload: glyph.to_string(),
        }
    }
}

/// Inbound reply from the renderer, correlated by exact glyph equality
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeEmojiReply {
    pub emoji: String,
    #[serde(rename = "dataUrl")]
    pub data_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_wire_shape() {
        let value = serde_json::to_value(RenderCommand::render_native_emoji("😀")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "command": "render-native-emoji", "payload": "😀" })
        );
    }

    #[test]
    fn test_reply_wire_shape() {
        let reply: NativeEmojiReply =
            serde_json::from_str(r#"{"emoji":"😀","dataUrl":"data:image/png;base64,AA=="}"#)
                .unwrap();
        assert_eq!(reply.emoji, "😀");
        assert_eq!(reply.data_url, "data:image/png;base64,AA==");
    }
}
