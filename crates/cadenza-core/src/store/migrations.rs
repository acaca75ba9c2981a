/// A schema migration.
#[derive(Debug)]
pub struct Migration {
    pub version: u32,
    pub name: &'static str,
    pub sql: &'static str,
}

const MIGRATION_001: &str = r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Tracks, keyed by their ordinal position in the catalog
CREATE TABLE IF NOT EXISTS tracks (
    position INTEGER PRIMARY KEY,
    artist TEXT NOT NULL,
    title TEXT NOT NULL,
    features TEXT NOT NULL,
    track_id TEXT,
    genre TEXT,
    image_url TEXT,
    preview_url TEXT,
    duration_ms INTEGER
);

CREATE INDEX IF NOT EXISTS idx_tracks_artist_title ON tracks(artist, title);

-- The single catalog snapshot currently stored (feature schema + import info)
CREATE TABLE IF NOT EXISTS catalog_meta (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    schema_version INTEGER NOT NULL,
    schema_fields TEXT NOT NULL,
    source TEXT,
    imported_at TEXT NOT NULL
);
"#;

pub const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: MIGRATION_001,
}];
