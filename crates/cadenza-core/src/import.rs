//! CSV catalog import.
//!
//! Reads a header-driven CSV file (such as the Spotify audio features
//! dataset) into a [`Catalog`]. Columns are located by name, so extra columns
//! and column order do not matter. Every schema feature must be present as a
//! column, along with `artist_name` and `track_name`.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::model::{FeatureSchema, Track};

const ARTIST_COLUMN: &str = "artist_name";
const TITLE_COLUMN: &str = "track_name";

/// What to do with a row that does not conform to the feature schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowPolicy {
    /// Fail the whole import on the first bad row.
    #[default]
    Reject,
    /// Log the bad row and leave it out of the catalog.
    Skip,
}

/// Counts gathered while importing a CSV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportReport {
    pub rows_read: usize,
    pub rows_imported: usize,
    pub rows_skipped: usize,
}

/// Column positions resolved from the CSV header.
#[derive(Debug)]
struct ColumnMap {
    artist: usize,
    title: usize,
    features: Vec<usize>,
    track_id: Option<usize>,
    genre: Option<usize>,
    image_url: Option<usize>,
    preview_url: Option<usize>,
    duration_ms: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord, schema: &FeatureSchema) -> Result<Self> {
        let positions: HashMap<&str, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name.trim(), i))
            .collect();

        let required = |name: &str| {
            positions
                .get(name)
                .copied()
                .ok_or_else(|| Error::MissingColumn(name.to_string()))
        };

        let features = schema
            .fields()
            .iter()
            .map(|f| required(f))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            artist: required(ARTIST_COLUMN)?,
            title: required(TITLE_COLUMN)?,
            features,
            track_id: positions.get("track_id").copied(),
            genre: positions.get("genre").copied(),
            image_url: positions.get("image_url").copied(),
            preview_url: positions.get("preview_url").copied(),
            duration_ms: positions.get("duration_ms").copied(),
        })
    }
}

/// Read a catalog from a CSV file on disk.
pub fn read_csv(
    path: &Path,
    schema: FeatureSchema,
    policy: RowPolicy,
) -> Result<(Catalog, ImportReport)> {
    log::info!("Importing catalog from {}", path.display());
    let file = std::fs::File::open(path)?;
    read_csv_from(file, schema, policy)
}

/// Read a catalog from any CSV source.
pub fn read_csv_from<R: Read>(
    source: R,
    schema: FeatureSchema,
    policy: RowPolicy,
) -> Result<(Catalog, ImportReport)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(source);

    let columns = ColumnMap::from_headers(reader.headers()?, &schema)?;
    let mut report = ImportReport::default();
    let mut tracks = Vec::new();

    for result in reader.records() {
        report.rows_read += 1;

        let parsed = match result {
            Ok(record) => {
                let line = record.position().map_or(0, |p| p.line());
                parse_track(&record, &columns, &schema).map_err(|reason| (line, reason))
            }
            // A row that is not valid UTF-8 is a bad row, not a broken file.
            Err(e) => match e.kind() {
                csv::ErrorKind::Utf8 { pos, err } => Err((
                    pos.as_ref().map_or(0, |p| p.line()),
                    format!("field {} is not valid UTF-8", err.field() + 1),
                )),
                _ => return Err(e.into()),
            },
        };

        match parsed {
            Ok(track) => tracks.push(track),
            Err((line, reason)) => match policy {
                RowPolicy::Reject => return Err(Error::InvalidRow { line, reason }),
                RowPolicy::Skip => {
                    log::warn!("Skipping row at line {}: {}", line, reason);
                    report.rows_skipped += 1;
                }
            },
        }
    }

    report.rows_imported = tracks.len();
    log::info!(
        "Import complete: {} rows read, {} imported, {} skipped",
        report.rows_read,
        report.rows_imported,
        report.rows_skipped
    );

    Ok((Catalog::new(schema, tracks)?, report))
}

fn parse_track(
    record: &StringRecord,
    columns: &ColumnMap,
    schema: &FeatureSchema,
) -> std::result::Result<Track, String> {
    let artist = required_text(record, columns.artist, ARTIST_COLUMN)?;
    let title = required_text(record, columns.title, TITLE_COLUMN)?;

    let mut features = Vec::with_capacity(columns.features.len());
    for (&column, name) in columns.features.iter().zip(schema.fields()) {
        let cell = record
            .get(column)
            .map(str::trim)
            .ok_or_else(|| format!("missing value for '{name}'"))?;
        let value: f64 = cell
            .parse()
            .map_err(|_| format!("'{name}' is not numeric: {cell:?}"))?;
        if !value.is_finite() {
            return Err(format!("'{name}' is not finite: {cell:?}"));
        }
        features.push(value);
    }

    let mut track = Track::new(artist, title, features);
    track.track_id = optional_text(record, columns.track_id);
    track.genre = optional_text(record, columns.genre);
    track.image_url = optional_text(record, columns.image_url);
    track.preview_url = optional_text(record, columns.preview_url);
    track.duration_ms = optional_text(record, columns.duration_ms).and_then(|d| d.parse().ok());
    Ok(track)
}

fn required_text(
    record: &StringRecord,
    column: usize,
    name: &str,
) -> std::result::Result<String, String> {
    match record.get(column).map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(format!("missing value for '{name}'")),
    }
}

fn optional_text(record: &StringRecord, column: Option<usize>) -> Option<String> {
    column
        .and_then(|c| record.get(c))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> FeatureSchema {
        FeatureSchema::new(1, ["danceability", "energy"]).unwrap()
    }

    #[test]
    fn test_reads_rows_in_order() {
        let data = "\
genre,artist_name,track_name,track_id,danceability,energy,duration_ms,preview_url
Jazz,Nina Simone,Sinnerman,id1,0.5,0.7,612000,https://example.com/1.mp3
Pop,Robyn,Dancing On My Own,id2,0.68,0.9,288000,
";
        let (catalog, report) = read_csv_from(data.as_bytes(), schema(), RowPolicy::Reject).unwrap();

        assert_eq!(report.rows_read, 2);
        assert_eq!(report.rows_imported, 2);
        assert_eq!(catalog.len(), 2);

        let first = catalog.get(0).unwrap();
        assert_eq!(first.artist, "Nina Simone");
        assert_eq!(first.features, vec![0.5, 0.7]);
        assert_eq!(first.duration_ms, Some(612_000));
        assert_eq!(first.genre.as_deref(), Some("Jazz"));
        assert_eq!(first.preview_url.as_deref(), Some("https://example.com/1.mp3"));

        let second = catalog.get(1).unwrap();
        assert_eq!(second.track_id.as_deref(), Some("id2"));
        assert!(second.preview_url.is_none());
        assert!(second.image_url.is_none());
    }

    #[test]
    fn test_column_order_does_not_matter() {
        let data = "energy,track_name,danceability,artist_name\n0.9,Song,0.1,Artist\n";
        let (catalog, _) = read_csv_from(data.as_bytes(), schema(), RowPolicy::Reject).unwrap();
        assert_eq!(catalog.get(0).unwrap().features, vec![0.1, 0.9]);
    }

    #[test]
    fn test_missing_feature_column() {
        let data = "artist_name,track_name,danceability\nA,B,0.1\n";
        let result = read_csv_from(data.as_bytes(), schema(), RowPolicy::Reject);
        assert!(matches!(result, Err(Error::MissingColumn(c)) if c == "energy"));
    }

    #[test]
    fn test_rejects_non_numeric_feature() {
        let data = "artist_name,track_name,danceability,energy\nA,B,0.1,loud\n";
        let result = read_csv_from(data.as_bytes(), schema(), RowPolicy::Reject);
        assert!(matches!(result, Err(Error::InvalidRow { line: 2, .. })));
    }

    #[test]
    fn test_skip_policy_drops_bad_rows() {
        let data = "\
artist_name,track_name,danceability,energy
A,One,0.1,0.2
A,Two,0.1,NaN
,Three,0.1,0.2
A,Four,0.3
A,Five,0.4,0.5
";
        let (catalog, report) = read_csv_from(data.as_bytes(), schema(), RowPolicy::Skip).unwrap();
        assert_eq!(report.rows_read, 5);
        assert_eq!(report.rows_imported, 2);
        assert_eq!(report.rows_skipped, 3);
        assert_eq!(catalog.get(1).unwrap().title, "Five");
    }

    #[test]
    fn test_invalid_utf8_row_follows_policy() {
        let data: &[u8] = b"artist_name,track_name,danceability,energy\n\
A,One,0.1,0.2\n\
A,\xff\xfe,0.1,0.2\n\
A,Three,0.3,0.4\n";

        let (catalog, report) = read_csv_from(data, schema(), RowPolicy::Skip).unwrap();
        assert_eq!(report.rows_read, 3);
        assert_eq!(report.rows_imported, 2);
        assert_eq!(report.rows_skipped, 1);
        assert_eq!(catalog.get(1).unwrap().title, "Three");

        let result = read_csv_from(data, schema(), RowPolicy::Reject);
        assert!(matches!(result, Err(Error::InvalidRow { .. })));
    }

    #[test]
    fn test_read_csv_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("tracks.csv");
        std::fs::write(&path, "artist_name,track_name,danceability,energy\nA,B,0.1,0.2\n")
            .unwrap();

        let (catalog, _) = read_csv(&path, schema(), RowPolicy::Reject).unwrap();
        assert_eq!(catalog.len(), 1);
    }
}
