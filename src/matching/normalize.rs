//! Title normalization profiles.
//!
//! Two profiles exist. [`normalize_title`] feeds the tokenizer: diacritics and
//! apostrophes are dropped so `"Marvel’s Pokémon"` folds to `"marvels pokemon"`.
//! [`normalize_display_title`] keeps a clean, display-safe string that is sent
//! as a search term by the detail cascade.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

const APOSTROPHES: [char; 2] = ['\'', '\u{2019}'];
const DISPLAY_APOSTROPHE_VARIANTS: [char; 5] = ['\u{2019}', '\u{2018}', '\u{02BC}', '`', '\u{00B4}'];

fn strip_diacritics(value: &str) -> String {
    value.nfd().filter(|ch| !is_combining_mark(*ch)).collect()
}

/// Canonicalizes a raw title for tokenizing. Idempotent; empty in, empty out.
pub fn normalize_title(value: &str) -> String {
    let stripped = strip_diacritics(value);
    let mut folded = String::with_capacity(stripped.len());
    for ch in stripped.chars() {
        if APOSTROPHES.contains(&ch) {
            continue;
        }
        if ch == '&' {
            folded.push_str(" and ");
        } else {
            folded.push(ch);
        }
    }
    // Lowercasing U+0130 and friends yields a base letter plus a combining mark.
    strip_diacritics(&folded.to_lowercase())
}

/// Compatibility-folds a title, unifies apostrophes and collapses whitespace.
pub fn normalize_display_title(value: &str) -> String {
    let folded: String = value
        .nfkc()
        .map(|ch| {
            if DISPLAY_APOSTROPHE_VARIANTS.contains(&ch) {
                '\''
            } else {
                ch
            }
        })
        .collect();
    collapse_whitespace(&folded)
}

pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
