use crate::models::emoji::{EmojiStyle, StyleCode};
use crate::utils::static_tables::excluded_emoji;

/// Set code the backend expects for a style. Native never reaches URL rewriting,
/// so it shares the default code.
pub fn code_for(style: EmojiStyle) -> StyleCode {
    match style {
        EmojiStyle::Facebook22 => StyleCode::FACEBOOK_2_2,
        EmojiStyle::Messenger10 => StyleCode::MESSENGER_1_0,
        EmojiStyle::Facebook30 | EmojiStyle::Native => StyleCode::FACEBOOK_3_0,
    }
}

/// Same as [`code_for`] for a raw persisted value; unknown values get the newest set
pub fn code_for_name(style: &str) -> StyleCode {
    code_for(EmojiStyle::parse_lenient(style))
}

/// Messenger 1.0 and Facebook 2.2 only ship emoji up to version 5.0, so anything
/// newer (or Facebook's own thumbs-up) has to stay on the default set.
pub fn is_excluded(codepoint_id: &str) -> bool {
    excluded_emoji().contains(codepoint_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(code_for(EmojiStyle::Facebook30).as_char(), 't');
        assert_eq!(code_for(EmojiStyle::Messenger10).as_char(), 'z');
        assert_eq!(code_for(EmojiStyle::Facebook22).as_char(), 'f');
        assert_eq!(code_for(EmojiStyle::Native), StyleCode::NEWEST);
    }

    #[test]
    fn test_unknown_name_maps_to_newest() {
        assert_eq!(code_for_name("noto-color"), StyleCode::NEWEST);
        assert_eq!(code_for_name("messenger-1-0"), StyleCode::MESSENGER_1_0);
    }

    #[test]
    fn test_exclusions() {
        assert!(is_excluded("f0000"));
        assert!(is_excluded("1f9b0"));
        assert!(is_excluded("1f468_200d_2764_200d_1f48b_200d_1f468"));
        assert!(is_excluded("267e"));
        assert!(!is_excluded("1f600"));
        assert!(!is_excluded(""));
    }
}
