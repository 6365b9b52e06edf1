//! Tables generated by `build.rs` from `data/`.

include!(concat!(env!("OUT_DIR"), "/emoji_tables.rs"));

/// Shortcode -> glyph, in source file order
pub fn emoji_table() -> &'static phf::OrderedMap<&'static str, &'static str> {
    &EMOJI_TABLE
}

/// Codepoint identifiers the legacy bundled styles cannot draw
pub fn excluded_emoji() -> &'static phf::Set<&'static str> {
    &EXCLUDED_EMOJI
}
