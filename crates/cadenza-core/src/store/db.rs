use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::model::{FeatureSchema, Track};

use super::migrations::MIGRATIONS;

/// Summary of the catalog currently held in the store.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogInfo {
    pub schema: FeatureSchema,
    /// Where the catalog was imported from, if recorded.
    pub source: Option<String>,
    pub imported_at: DateTime<Utc>,
    pub track_count: usize,
}

/// A database connection holding one catalog snapshot.
#[derive(Debug)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) a database at the given path and apply migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.apply_migrations()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.apply_migrations()?;
        Ok(db)
    }

    /// Get a reference to the underlying connection (for advanced queries).
    #[must_use]
    pub const fn conn(&self) -> &Connection {
        &self.conn
    }

    fn apply_migrations(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            )",
            [],
        )?;

        let mut stmt = self
            .conn
            .prepare("SELECT version FROM schema_migrations ORDER BY version")?;
        let applied: Vec<u32> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        for migration in MIGRATIONS {
            if !applied.contains(&migration.version) {
                log::info!(
                    "Applying migration {} ({})",
                    migration.version,
                    migration.name
                );
                self.conn.execute_batch(migration.sql)?;
                self.conn.execute(
                    "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
                    rusqlite::params![migration.version, migration.name],
                )?;
            }
        }

        Ok(())
    }
}

// Catalog snapshot
impl Database {
    /// Replace the stored catalog wholesale.
    ///
    /// Runs in a single transaction: readers of the file see either the old
    /// catalog or the new one, never a mix.
    pub fn replace_catalog(&self, catalog: &Catalog, source: Option<&str>) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;

        tx.execute("DELETE FROM tracks", [])?;
        tx.execute("DELETE FROM catalog_meta", [])?;

        {
            let mut insert = tx.prepare(
                "INSERT INTO tracks (
                    position, artist, title, features, track_id, genre,
                    image_url, preview_url, duration_ms
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;

            for (position, track) in catalog.tracks().iter().enumerate() {
                let position = i64::try_from(position)
                    .map_err(|_| Error::InvalidData(format!("position {position} overflows")))?;
                insert.execute(rusqlite::params![
                    position,
                    track.artist,
                    track.title,
                    serde_json::to_string(&track.features)?,
                    track.track_id,
                    track.genre,
                    track.image_url,
                    track.preview_url,
                    track
                        .duration_ms
                        .map(|d| i64::try_from(d).unwrap_or(i64::MAX)),
                ])?;
            }
        }

        tx.execute(
            "INSERT INTO catalog_meta (id, schema_version, schema_fields, source, imported_at)
             VALUES (1, ?1, ?2, ?3, ?4)",
            rusqlite::params![
                catalog.schema().version(),
                serde_json::to_string(catalog.schema().fields())?,
                source,
                Utc::now().to_rfc3339(),
            ],
        )?;

        tx.commit()?;
        log::info!("Stored catalog of {} tracks", catalog.len());
        Ok(())
    }

    /// Load the stored catalog in ordinal order.
    ///
    /// Returns `None` if nothing has been imported yet.
    pub fn load_catalog(&self) -> Result<Option<Catalog>> {
        let Some(schema) = self.stored_schema()? else {
            return Ok(None);
        };

        let mut stmt = self.conn.prepare(
            "SELECT artist, title, features, track_id, genre,
                    image_url, preview_url, duration_ms
             FROM tracks
             ORDER BY position",
        )?;

        let tracks = stmt
            .query_map([], row_to_track)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        log::debug!("Loaded {} tracks from store", tracks.len());
        Catalog::new(schema, tracks).map(Some)
    }

    /// Number of stored tracks.
    pub fn count_tracks(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM tracks", [], |row| row.get(0))?;
        usize::try_from(count).map_err(|_| Error::InvalidData(format!("bad track count {count}")))
    }

    /// Describe the stored catalog without loading its tracks.
    pub fn catalog_info(&self) -> Result<Option<CatalogInfo>> {
        let row = self
            .conn
            .query_row(
                "SELECT schema_version, schema_fields, source, imported_at
                 FROM catalog_meta WHERE id = 1",
                [],
                |row| {
                    Ok((
                        row.get::<_, u32>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;

        let Some((version, fields, source, imported_at)) = row else {
            return Ok(None);
        };

        let schema = parse_schema(version, &fields)?;
        let imported_at = DateTime::parse_from_rfc3339(&imported_at)
            .map_err(|e| Error::InvalidData(format!("bad import timestamp: {e}")))?
            .with_timezone(&Utc);

        Ok(Some(CatalogInfo {
            schema,
            source,
            imported_at,
            track_count: self.count_tracks()?,
        }))
    }

    fn stored_schema(&self) -> Result<Option<FeatureSchema>> {
        let row = self
            .conn
            .query_row(
                "SELECT schema_version, schema_fields FROM catalog_meta WHERE id = 1",
                [],
                |row| Ok((row.get::<_, u32>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;

        row.map(|(version, fields)| parse_schema(version, &fields))
            .transpose()
    }
}

fn parse_schema(version: u32, fields_json: &str) -> Result<FeatureSchema> {
    let fields: Vec<String> = serde_json::from_str(fields_json)?;
    FeatureSchema::new(version, fields)
}

fn row_to_track(row: &rusqlite::Row) -> rusqlite::Result<Track> {
    let features_json: String = row.get(2)?;
    let features: Vec<f64> = serde_json::from_str(&features_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;

    let mut track = Track::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?, features);
    track.track_id = row.get(3)?;
    track.genre = row.get(4)?;
    track.image_url = row.get(5)?;
    track.preview_url = row.get(6)?;
    track.duration_ms = row
        .get::<_, Option<i64>>(7)?
        .and_then(|d| u64::try_from(d).ok());
    Ok(track)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_catalog() -> Catalog {
        let schema = FeatureSchema::new(3, ["energy", "valence"]).unwrap();
        Catalog::new(
            schema,
            vec![
                Track::new("Massive Attack", "Teardrop", vec![0.4, 0.1])
                    .with_track_id("t1")
                    .with_preview_url("https://example.com/t1.mp3")
                    .with_duration_ms(330_000),
                Track::new("Portishead", "Roads", vec![0.2, 0.05]).with_genre("Trip-hop"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_database_open_in_memory() {
        let db = Database::open_in_memory().unwrap();
        let count: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_empty_store_has_no_catalog() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.load_catalog().unwrap().is_none());
        assert!(db.catalog_info().unwrap().is_none());
        assert_eq!(db.count_tracks().unwrap(), 0);
    }

    #[test]
    fn test_catalog_round_trip() {
        let db = Database::open_in_memory().unwrap();
        let catalog = sample_catalog();

        db.replace_catalog(&catalog, Some("tracks.csv")).unwrap();
        let loaded = db.load_catalog().unwrap().unwrap();

        assert_eq!(loaded, catalog);
    }

    #[test]
    fn test_replace_is_wholesale() {
        let db = Database::open_in_memory().unwrap();
        db.replace_catalog(&sample_catalog(), None).unwrap();

        let smaller = Catalog::new(
            FeatureSchema::new(4, ["tempo"]).unwrap(),
            vec![Track::new("Low", "Words", vec![62.0])],
        )
        .unwrap();
        db.replace_catalog(&smaller, Some("low.csv")).unwrap();

        let loaded = db.load_catalog().unwrap().unwrap();
        assert_eq!(loaded, smaller);

        let info = db.catalog_info().unwrap().unwrap();
        assert_eq!(info.schema.version(), 4);
        assert_eq!(info.source.as_deref(), Some("low.csv"));
        assert_eq!(info.track_count, 1);
    }
}
