//! Token splitting for normalized titles.

const ROMAN_NUMERALS: [&str; 20] = [
    "i", "ii", "iii", "iv", "v", "vi", "vii", "viii", "ix", "x", "xi", "xii", "xiii", "xiv", "xv",
    "xvi", "xvii", "xviii", "xix", "xx",
];

fn roman_to_decimal(token: &str) -> Option<String> {
    ROMAN_NUMERALS
        .iter()
        .position(|numeral| *numeral == token)
        .map(|index| (index + 1).to_string())
}

/// Splits a normalized title into `[a-z0-9]` tokens, in order.
///
/// Roman numerals `i` through `xx` become their decimal form so that
/// "final fantasy vii" and "final fantasy 7" share the token `"7"`.
pub fn tokenize(normalized: &str) -> Vec<String> {
    let cleaned: String = normalized
        .chars()
        .map(|ch| {
            if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch.is_whitespace() {
                ch
            } else {
                ' '
            }
        })
        .collect();
    cleaned
        .split_whitespace()
        .map(|token| roman_to_decimal(token).unwrap_or_else(|| token.to_string()))
        .collect()
}
