use crate::models::emoji::EmojiEntry;
use serde::{Deserialize, Serialize};

/// Keys the picker reacts to, parsed from DOM `KeyboardEvent.key` names
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerKey {
    ArrowLeft,
    ArrowRight,
    Enter,
    Escape,
    Other(String),
}

impl PickerKey {
    pub fn from_key_name(name: &str) -> Self {
        match name {
            "ArrowLeft" => PickerKey::ArrowLeft,
            "ArrowRight" => PickerKey::ArrowRight,
            "Enter" => PickerKey::Enter,
            "Escape" => PickerKey::Escape,
            other => PickerKey::Other(other.to_string()),
        }
    }

    /// Navigation and commit keys never trigger a new search
    pub fn is_control(&self) -> bool {
        !matches!(self, PickerKey::Other(_))
    }
}

/// Live state of an open picker. Rebuilt on every evaluated keystroke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerState {
    /// The input token that opened the menu; replaced on commit
    pub query_text: String,
    pub candidates: Vec<EmojiEntry>,
    pub active_index: usize,
}

impl PickerState {
    /// Returns `None` for an empty candidate list; an open picker always has something to pick
    pub fn open(query_text: impl Into<String>, candidates: Vec<EmojiEntry>) -> Option<Self> {
        if candidates.is_empty() {
            return None;
        }

        Some(Self {
            query_text: query_text.into(),
            candidates,
            active_index: 0,
        })
    }

    pub fn active(&self) -> Option<&EmojiEntry> {
        self.candidates.get(self.active_index)
    }

    pub fn select_next(&mut self) -> bool {
        if self.active_index + 1 < self.candidates.len() {
            self.active_index += 1;
            true
        } else {
            false
        }
    }

    pub fn select_previous(&mut self) -> bool {
        if self.active_index > 0 {
            self.active_index -= 1;
            true
        } else {
            false
        }
    }

    /// The menu shows exactly the candidate list, in order
    pub fn to_menu(&self) -> EmojiMenu {
        EmojiMenu {
            items: self
                .candidates
                .iter()
                .enumerate()
                .map(|(index, entry)| EmojiMenuItem {
                    glyph: entry.glyph.clone(),
                    label: entry.label(),
                    active: index == self.active_index,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmojiMenuItem {
    pub glyph: String,
    pub label: String,
    pub active: bool,
}

/// What the host draws for an open picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmojiMenu {
    pub items: Vec<EmojiMenuItem>,
}
