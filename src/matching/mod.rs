//! Lexical title matching: normalization, tokenizing, filtering and scoring.

pub mod aliases;
pub mod genre_mapper;
pub mod normalize;
pub mod similarity;
pub mod stopwords;
pub mod tokenize;
pub mod variants;

use std::collections::HashSet;

use normalize::normalize_title;
use stopwords::StopwordFilter;
use tokenize::tokenize;

pub type TokenSet = HashSet<String>;

const DISTINCTIVE_MIN_CHARS: usize = 4;

/// Signal tokens: four or more characters, or purely numeric.
pub fn is_distinctive(token: &str) -> bool {
    token.chars().count() >= DISTINCTIVE_MIN_CHARS
        || (!token.is_empty() && token.chars().all(|ch| ch.is_ascii_digit()))
}

pub fn distinctive_tokens(tokens: &[String]) -> TokenSet {
    tokens
        .iter()
        .filter(|token| is_distinctive(token))
        .cloned()
        .collect()
}

/// Token view of one source title, computed once per match attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleProfile {
    pub tokens: TokenSet,
    pub distinctive: TokenSet,
}

impl TitleProfile {
    /// Hard gate: the candidate must carry every distinctive source token.
    pub fn admits(&self, candidate_tokens: &TokenSet) -> bool {
        self.distinctive.is_subset(candidate_tokens)
    }
}

/// Normalizer → tokenizer → stopword filter.
#[derive(Debug, Clone, Default)]
pub struct TokenPipeline {
    stopwords: StopwordFilter,
}

impl TokenPipeline {
    pub fn new(stopwords: StopwordFilter) -> Self {
        Self { stopwords }
    }

    pub fn filtered_tokens(&self, raw: &str) -> Vec<String> {
        self.stopwords.filter(tokenize(&normalize_title(raw)))
    }

    pub fn token_set(&self, raw: &str) -> TokenSet {
        self.filtered_tokens(raw).into_iter().collect()
    }

    pub fn profile(&self, raw_title: &str) -> TitleProfile {
        let filtered = self.filtered_tokens(raw_title);
        TitleProfile {
            distinctive: distinctive_tokens(&filtered),
            tokens: filtered.into_iter().collect(),
        }
    }
}
