// Emoji index - read-only shortcode table used by the autocomplete picker
// Built once from the table baked in by build.rs, then shared for the process lifetime

use crate::models::emoji::EmojiEntry;
use crate::utils::static_tables::emoji_table;
use log::debug;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::sync::OnceLock;

static COMPLETE_SHORTCODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r":([A-Za-z0-9_+\-]+):").expect("valid shortcode regex"));

static INSTANCE: OnceLock<EmojiIndex> = OnceLock::new();

pub struct EmojiIndex {
    entries: OnceLock<Vec<EmojiEntry>>,
}

impl EmojiIndex {
    /// An index that has not been loaded yet
    pub fn new() -> Self {
        Self {
            entries: OnceLock::new(),
        }
    }

    pub fn global() -> &'static EmojiIndex {
        INSTANCE.get_or_init(EmojiIndex::new)
    }

    /// Flattens the static table on first call; later calls return the same entries
    pub fn load(&self) -> &[EmojiEntry] {
        self.entries.get_or_init(|| {
            let entries: Vec<EmojiEntry> = emoji_table()
                .entries()
                .map(|(shortcode, glyph)| EmojiEntry::new(*shortcode, *glyph))
                .collect();
            debug!("[EmojiIndex] Loaded {} emoji", entries.len());
            entries
        })
    }

    pub fn is_loaded(&self) -> bool {
        self.entries.get().is_some()
    }

    /// All entries whose shortcode starts with `prefix`, in index order.
    /// Empty when the index has not been loaded.
    pub fn search(&self, prefix: &str) -> Vec<EmojiEntry> {
        let Some(entries) = self.entries.get() else {
            return Vec::new();
        };

        entries
            .iter()
            .filter(|entry| entry.shortcode.starts_with(prefix))
            .cloned()
            .collect()
    }

    /// Exact shortcode match
    pub fn lookup(&self, shortcode: &str) -> Option<&EmojiEntry> {
        let entries = self.entries.get()?;
        let index = emoji_table().get_index(shortcode)?;
        entries.get(index)
    }

    /// Replaces every complete `:shortcode:` known to the index with its glyph.
    /// Unknown shortcodes are left as typed.
    pub fn convert_shortcodes(&self, text: &str) -> String {
        if !text.contains(':') {
            return text.to_string();
        }

        COMPLETE_SHORTCODE
            .replace_all(text, |caps: &Captures| match self.lookup(&caps[1]) {
                Some(entry) => entry.glyph.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}

impl Default for EmojiIndex {
    fn default() -> Self {
        Self::new()
    }
}
