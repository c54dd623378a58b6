use std::path::Path;

use rusqlite::{params, Connection, Row};

use crate::backends::CatalogStore;
use crate::error::EnrichError;
use crate::protocol::{CatalogRecord, EnrichmentMode, RecordUpdate};

/// SQLite-backed catalog store.
pub struct DbManager {
    conn: Connection,
}

impl DbManager {
    pub fn open(path: &Path) -> Result<Self, EnrichError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        let db_manager = Self { conn };
        db_manager.initialize_schema()?;
        Ok(db_manager)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, EnrichError> {
        let db_manager = Self {
            conn: Connection::open_in_memory()?,
        };
        db_manager.initialize_schema()?;
        Ok(db_manager)
    }

    fn initialize_schema(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS games (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                cover_url TEXT,
                description TEXT,
                genres TEXT
            )",
            [],
        )?;
        Ok(())
    }

    fn record_from_row(row: &Row<'_>) -> Result<CatalogRecord, rusqlite::Error> {
        let genres_json: Option<String> = row.get(4)?;
        Ok(CatalogRecord {
            id: row.get(0)?,
            title: row.get(1)?,
            cover_url: row.get(2)?,
            description: row.get(3)?,
            genres: genres_json
                .as_deref()
                .and_then(|text| serde_json::from_str::<Vec<String>>(text).ok())
                .unwrap_or_default(),
        })
    }

    pub fn insert_game(&self, title: &str) -> Result<i64, EnrichError> {
        self.conn
            .execute("INSERT INTO games (title) VALUES (?1)", params![title])?;
        Ok(self.conn.last_insert_rowid())
    }

    #[cfg(test)]
    pub fn get_game(&self, id: i64) -> Result<Option<CatalogRecord>, EnrichError> {
        use rusqlite::OptionalExtension;

        let record = self
            .conn
            .query_row(
                "SELECT id, title, cover_url, description, genres FROM games WHERE id = ?1",
                params![id],
                Self::record_from_row,
            )
            .optional()?;
        Ok(record)
    }

    fn update_cover(&self, id: i64, url: &str) -> Result<usize, rusqlite::Error> {
        self.conn.execute(
            "UPDATE games SET cover_url = ?1 WHERE id = ?2",
            params![url, id],
        )
    }

    fn update_details(
        &self,
        id: i64,
        description: Option<&str>,
        genres: Option<&[String]>,
    ) -> Result<usize, EnrichError> {
        let genres_json = genres.map(serde_json::to_string).transpose()?;
        let changed = self.conn.execute(
            "UPDATE games
                SET description = COALESCE(?1, description),
                    genres = COALESCE(?2, genres)
              WHERE id = ?3",
            params![description, genres_json, id],
        )?;
        Ok(changed)
    }
}

impl CatalogStore for DbManager {
    fn list_pending(
        &self,
        mode: EnrichmentMode,
        overwrite: bool,
    ) -> Result<Vec<CatalogRecord>, EnrichError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, cover_url, description, genres FROM games ORDER BY id ASC",
        )?;
        let record_iter = stmt.query_map([], Self::record_from_row)?;

        let mut records = Vec::new();
        for record in record_iter {
            let record = record?;
            if record.is_pending(mode, overwrite) {
                records.push(record);
            }
        }
        Ok(records)
    }

    fn persist(&self, id: i64, update: &RecordUpdate) -> Result<(), EnrichError> {
        let changed = match update {
            RecordUpdate::Cover { url } => self.update_cover(id, url)?,
            RecordUpdate::Details {
                description,
                genres,
            } => self.update_details(id, description.as_deref(), genres.as_deref())?,
        };
        if changed == 0 {
            return Err(EnrichError::Store(rusqlite::Error::QueryReturnedNoRows));
        }
        Ok(())
    }
}
