use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single shortcode -> glyph pair from the baked emoji table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmojiEntry {
    pub shortcode: String,
    pub glyph: String,
}

impl EmojiEntry {
    pub fn new(shortcode: impl Into<String>, glyph: impl Into<String>) -> Self {
        Self {
            shortcode: shortcode.into(),
            glyph: glyph.into(),
        }
    }

    /// Display label used in the picker, e.g. `:grin:`
    pub fn label(&self) -> String {
        format!(":{}:", self.shortcode)
    }
}

/// Where emoji images come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub enum EmojiStyle {
    /// Rendered by the system font in the renderer process
    #[serde(rename = "native")]
    Native,
    #[default]
    #[serde(rename = "facebook-3-0")]
    Facebook30,
    #[serde(rename = "messenger-1-0")]
    Messenger10,
    #[serde(rename = "facebook-2-2")]
    Facebook22,
}

impl EmojiStyle {
    /// Menu order
    pub const ALL: [EmojiStyle; 4] = [
        EmojiStyle::Native,
        EmojiStyle::Facebook30,
        EmojiStyle::Messenger10,
        EmojiStyle::Facebook22,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmojiStyle::Native => "native",
            EmojiStyle::Facebook30 => "facebook-3-0",
            EmojiStyle::Messenger10 => "messenger-1-0",
            EmojiStyle::Facebook22 => "facebook-2-2",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EmojiStyle::Native => "System",
            EmojiStyle::Facebook30 => "Facebook 3.0",
            EmojiStyle::Messenger10 => "Messenger 1.0",
            EmojiStyle::Facebook22 => "Facebook 2.2",
        }
    }

    /// File name of the bundled menu icon for this style
    pub fn asset_name(&self) -> String {
        format!("emoji-{}.png", self.as_str())
    }

    /// Parses a persisted style value, falling back to the default style for anything unknown
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or_else(|_| {
            log::warn!(
                "[EmojiStyle] Unknown emoji style {:?}, using {}",
                value,
                EmojiStyle::default().as_str()
            );
            EmojiStyle::default()
        })
    }
}

impl fmt::Display for EmojiStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmojiStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EmojiStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| format!("unknown emoji style '{}'", s))
    }
}

impl<'de> Deserialize<'de> for EmojiStyle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(EmojiStyle::parse_lenient(&value))
    }
}

/// Single-character set discriminator embedded in vendor emoji URLs
/// (`emoji.php/v9/<code>...`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StyleCode(char);

impl StyleCode {
    pub const FACEBOOK_3_0: StyleCode = StyleCode('t');
    pub const MESSENGER_1_0: StyleCode = StyleCode('z');
    pub const FACEBOOK_2_2: StyleCode = StyleCode('f');

    /// The set the backend serves by default; nothing to rewrite to
    pub const NEWEST: StyleCode = StyleCode::FACEBOOK_3_0;

    pub fn as_char(&self) -> char {
        self.0
    }
}

impl fmt::Display for StyleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
