//! Alternate search renderings of a raw title.

const TRUNCATION_DELIMITERS: [char; 5] = [':', '-', '\u{2013}', '\u{2014}', '|'];
const TRADEMARK_GLYPHS: [char; 3] = ['\u{2122}', '\u{00A9}', '\u{00AE}'];

fn push_unique(variants: &mut Vec<String>, candidate: String) {
    if candidate.is_empty() || variants.contains(&candidate) {
        return;
    }
    variants.push(candidate);
}

/// Builds the ordered, deduplicated query list for a raw title:
/// the trimmed original, the head before the first subtitle delimiter, and
/// the original without trademark glyphs.
pub fn query_variants(raw_title: &str) -> Vec<String> {
    let original = raw_title.trim().to_string();
    let mut variants = Vec::with_capacity(3);
    if original.is_empty() {
        return variants;
    }

    let truncated = original
        .split(TRUNCATION_DELIMITERS)
        .next()
        .unwrap_or_default()
        .trim()
        .to_string();
    let without_glyphs = original
        .chars()
        .filter(|ch| !TRADEMARK_GLYPHS.contains(ch))
        .collect::<String>()
        .trim()
        .to_string();

    push_unique(&mut variants, original);
    push_unique(&mut variants, truncated);
    push_unique(&mut variants, without_glyphs);
    variants
}
