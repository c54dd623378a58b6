//! Hand-curated alternate search strings for the detail cascade.

use std::collections::HashMap;

use super::normalize::normalize_display_title;

const BUILTIN_ALIASES: &[(&str, &[&str])] = &[
    ("gta v", &["Grand Theft Auto V"]),
    ("gta 5", &["Grand Theft Auto V"]),
    ("rdr 2", &["Red Dead Redemption 2"]),
    ("zelda breath of the wild", &["The Legend of Zelda: Breath of the Wild"]),
    ("zelda tears of the kingdom", &["The Legend of Zelda: Tears of the Kingdom"]),
    ("pokemon espada", &["Pokémon Sword"]),
    ("pokemon escudo", &["Pokémon Shield"]),
    ("spiderman", &["Marvel's Spider-Man"]),
    ("spiderman miles morales", &["Marvel's Spider-Man: Miles Morales"]),
    ("cod modern warfare 2", &["Call of Duty: Modern Warfare II"]),
    ("mario kart 8", &["Mario Kart 8 Deluxe"]),
    ("animal crossing", &["Animal Crossing: New Horizons"]),
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AliasTable {
    entries: HashMap<String, Vec<String>>,
}

impl AliasTable {
    pub fn alias_key(title: &str) -> String {
        normalize_display_title(title).to_lowercase()
    }

    pub fn builtin() -> Self {
        let mut table = Self::default();
        for (title, aliases) in BUILTIN_ALIASES {
            table.insert(title, aliases.iter().map(|alias| alias.to_string()).collect());
        }
        table
    }

    /// Entries from `other` replace built-in entries with the same key.
    pub fn merged_with(mut self, other: &HashMap<String, Vec<String>>) -> Self {
        for (title, aliases) in other {
            self.insert(title, aliases.clone());
        }
        self
    }

    fn insert(&mut self, title: &str, aliases: Vec<String>) {
        let key = Self::alias_key(title);
        let aliases: Vec<String> = aliases
            .into_iter()
            .map(|alias| alias.trim().to_string())
            .filter(|alias| !alias.is_empty())
            .collect();
        if key.is_empty() || aliases.is_empty() {
            return;
        }
        self.entries.insert(key, aliases);
    }

    pub fn lookup(&self, title: &str) -> &[String] {
        self.entries
            .get(&Self::alias_key(title))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::AliasTable;

    #[test]
    fn test_builtin_lookup_is_case_and_space_insensitive() {
        let table = AliasTable::builtin();
        assert_eq!(table.lookup("  GTA   V "), ["Grand Theft Auto V".to_string()]);
    }

    #[test]
    fn test_lookup_miss_returns_empty_slice() {
        assert!(AliasTable::builtin().lookup("Celeste").is_empty());
    }

    #[test]
    fn test_configured_aliases_override_builtin_entries() {
        let mut configured = HashMap::new();
        configured.insert(
            "GTA V".to_string(),
            vec!["Grand Theft Auto V: Premium Edition".to_string(), " ".to_string()],
        );
        let table = AliasTable::builtin().merged_with(&configured);
        assert_eq!(
            table.lookup("gta v"),
            ["Grand Theft Auto V: Premium Edition".to_string()]
        );
    }
}
