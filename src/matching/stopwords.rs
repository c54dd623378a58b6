//! Filler-token filtering.

use std::collections::HashSet;

use crate::matching::normalize::normalize_title;
use crate::matching::tokenize::tokenize;

/// Edition/marketing filler, generic nouns, trademark glyphs and Spanish
/// function words. Replaceable through `[matching] stopwords` in config.
pub const DEFAULT_STOPWORDS: &[&str] = &[
    "edition",
    "editions",
    "deluxe",
    "ultimate",
    "definitive",
    "remastered",
    "remake",
    "goty",
    "complete",
    "collection",
    "director",
    "directors",
    "cut",
    "hd",
    "enhanced",
    "year",
    "gold",
    "platinum",
    "edicion",
    "definitiva",
    "remasterizado",
    "remasterizada",
    "completa",
    "coleccion",
    "aniversario",
    "juego",
    "videojuego",
    "tm",
    "©",
    "®",
    "el",
    "la",
    "los",
    "las",
    "de",
    "del",
    "y",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopwordFilter {
    words: HashSet<String>,
}

impl Default for StopwordFilter {
    fn default() -> Self {
        Self::from_words(DEFAULT_STOPWORDS.iter().copied())
    }
}

/// Folds a configured word the same way titles are folded, so "Versión"
/// filters the token `version`.
fn word_tokens<I, S>(words: I) -> impl Iterator<Item = String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    words
        .into_iter()
        .flat_map(|word| tokenize(&normalize_title(word.as_ref())))
}

impl StopwordFilter {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: word_tokens(words).collect(),
        }
    }

    pub fn extended<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.words.extend(word_tokens(extra));
        self
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    pub fn filter(&self, tokens: Vec<String>) -> Vec<String> {
        tokens
            .into_iter()
            .filter(|token| !self.is_stopword(token))
            .collect()
    }
}
