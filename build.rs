use std::collections::HashSet;
use std::env;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Yields the meaningful lines of a data file, skipping comments and blanks.
fn data_lines(contents: &str) -> impl Iterator<Item = &str> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

fn main() {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap_or_default();
    let data_dir = Path::new(&manifest_dir).join("data");
    let out_path = Path::new(&env::var("OUT_DIR").expect("OUT_DIR is set by cargo"))
        .join("emoji_tables.rs");

    let emoji_source = fs::read_to_string(data_dir.join("emoji.txt"))
        .expect("data/emoji.txt must exist");
    let excluded_source = fs::read_to_string(data_dir.join("excluded_emoji.txt"))
        .expect("data/excluded_emoji.txt must exist");

    // Shortcode table, kept in file order
    let mut seen = HashSet::new();
    let mut table = phf_codegen::OrderedMap::new();
    for line in data_lines(&emoji_source) {
        let Some((shortcode, glyph)) = line.split_once(' ') else {
            panic!("malformed emoji line: {:?}", line);
        };
        let (shortcode, glyph) = (shortcode.trim(), glyph.trim());

        if !seen.insert(shortcode) {
            panic!("duplicate emoji shortcode: {}", shortcode);
        }

        table.entry(shortcode, &format!("{:?}", glyph));
    }

    let mut excluded = phf_codegen::Set::new();
    let mut seen_excluded = HashSet::new();
    for identifier in data_lines(&excluded_source) {
        if seen_excluded.insert(identifier) {
            excluded.entry(identifier);
        }
    }

    let mut out = BufWriter::new(fs::File::create(&out_path).expect("create emoji_tables.rs"));
    writeln!(
        out,
        "static EMOJI_TABLE: phf::OrderedMap<&'static str, &'static str> = {};",
        table.build()
    )
    .expect("write emoji table");
    writeln!(
        out,
        "static EXCLUDED_EMOJI: phf::Set<&'static str> = {};",
        excluded.build()
    )
    .expect("write exclusion set");

    println!("cargo:rerun-if-changed=data/emoji.txt");
    println!("cargo:rerun-if-changed=data/excluded_emoji.txt");
}
