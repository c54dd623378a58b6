//! External genre taxonomy → product genre vocabulary.

use std::collections::{BTreeSet, HashMap};

const GENRE_TABLE: &[(&str, &str)] = &[
    ("shooter", "Acción"),
    ("hack and slash/beat 'em up", "Acción"),
    ("fighting", "Lucha"),
    ("platform", "Plataformas"),
    ("adventure", "Aventura"),
    ("point-and-click", "Aventura"),
    ("visual novel", "Aventura"),
    ("role-playing (rpg)", "RPG"),
    ("strategy", "Estrategia"),
    ("real time strategy (rts)", "Estrategia"),
    ("turn-based strategy (tbs)", "Estrategia"),
    ("tactical", "Estrategia"),
    ("moba", "Estrategia"),
    ("sport", "Deportes"),
    ("racing", "Carreras"),
    ("simulator", "Simulación"),
    ("puzzle", "Puzzle"),
    ("quiz/trivia", "Puzzle"),
    ("card & board game", "Puzzle"),
    ("music", "Música"),
    ("arcade", "Arcade"),
    ("pinball", "Arcade"),
    ("indie", "Indie"),
];

/// Static many-to-one genre dictionary. Labels are matched case-insensitively.
#[derive(Debug, Clone)]
pub struct GenreMapper {
    mappings: HashMap<String, &'static str>,
}

impl Default for GenreMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl GenreMapper {
    pub fn new() -> Self {
        let mappings = GENRE_TABLE
            .iter()
            .map(|(external, product)| ((*external).to_string(), *product))
            .collect();
        Self { mappings }
    }

    pub fn map_genre(&self, external: &str) -> Option<&'static str> {
        self.mappings
            .get(&external.trim().to_lowercase())
            .copied()
    }

    /// Maps external labels, silently dropping unknown ones. Deduplicated, sorted.
    pub fn map_genres<S: AsRef<str>>(&self, external: &[S]) -> Vec<String> {
        external
            .iter()
            .filter_map(|label| self.map_genre(label.as_ref()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}
