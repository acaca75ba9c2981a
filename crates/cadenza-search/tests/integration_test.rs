//! Integration tests for the import → store → snapshot → recommend path.

use std::io::Write;
use std::time::Duration;

use cadenza_core::import::{read_csv, RowPolicy};
use cadenza_core::store::Database;
use cadenza_core::FeatureSchema;
use cadenza_search::{build_snapshot_with_timeout, SharedSnapshot, Snapshot};
use tempfile::TempDir;

const HEADER: &str = "genre,artist_name,track_name,track_id,popularity,acousticness,\
danceability,duration_ms,energy,instrumentalness,liveness,loudness,speechiness,tempo,valence";

const ROWS: &[&str] = &[
    "Electronic,Air,Sexy Boy,id-1,61,0.21,0.62,298000,0.57,0.71,0.11,-9.1,0.04,110.2,0.52",
    "Electronic,Air,Kelly Watch the Stars,id-2,55,0.08,0.71,224000,0.66,0.82,0.09,-8.4,0.03,121.0,0.73",
    "Jazz,Nina Simone,Feeling Good,id-3,70,0.83,0.37,177000,0.31,0.0,0.21,-11.7,0.05,83.1,0.28",
    "Rock,Radiohead,Airbag,id-4,58,0.01,0.29,284000,0.88,0.47,0.32,-5.6,0.06,144.3,0.31",
    "Electronic,Air,Sexy Boy (Live),id-5,61,0.21,0.62,301000,0.57,0.71,0.11,-9.1,0.04,110.2,0.52",
];

fn write_csv(dir: &TempDir, rows: &[&str]) -> std::path::PathBuf {
    let path = dir.path().join("tracks.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "{HEADER}").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    path
}

#[test]
fn test_import_store_and_recommend() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = write_csv(&temp_dir, ROWS);
    let db_path = temp_dir.path().join("test.db");

    let (catalog, report) =
        read_csv(&csv_path, FeatureSchema::spotify_v1(), RowPolicy::Reject).unwrap();
    assert_eq!(report.rows_imported, 5);

    let db = Database::open(&db_path).unwrap();
    db.replace_catalog(&catalog, Some("tracks.csv")).unwrap();
    drop(db);

    let db = Database::open(&db_path).unwrap();
    let stored = db.load_catalog().unwrap().unwrap();
    assert_eq!(stored.len(), 5);

    let snapshot = Snapshot::build(stored).unwrap();
    let recs = snapshot.recommend("Air", "Sexy Boy", 3).unwrap();

    assert_eq!(recs.len(), 3);
    assert!(recs.iter().all(|r| r.index != 0));
    assert_eq!(recs[0].title, "Sexy Boy (Live)");
    assert!(recs[0].distance < 1e-9);
    assert!(recs.windows(2).all(|w| w[0].distance <= w[1].distance));
    assert_eq!(recs[0].track_id.as_deref(), Some("id-5"));
}

#[test]
fn test_bad_row_rejects_whole_import() {
    let temp_dir = TempDir::new().unwrap();
    let mut rows = ROWS.to_vec();
    rows.push("Pop,Nobody,Broken,id-6,50,0.1,oops,200000,0.5,0.0,0.1,-7.0,0.05,100.0,0.5");
    let csv_path = write_csv(&temp_dir, &rows);

    let result = read_csv(&csv_path, FeatureSchema::spotify_v1(), RowPolicy::Reject);
    assert!(result.is_err());

    let (catalog, report) =
        read_csv(&csv_path, FeatureSchema::spotify_v1(), RowPolicy::Skip).unwrap();
    assert_eq!(catalog.len(), 5);
    assert_eq!(report.rows_skipped, 1);
}

#[tokio::test]
async fn test_snapshot_build_and_swap() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = write_csv(&temp_dir, ROWS);
    let (catalog, _) =
        read_csv(&csv_path, FeatureSchema::spotify_v1(), RowPolicy::Reject).unwrap();

    let snapshot = build_snapshot_with_timeout(catalog, Duration::from_secs(30))
        .await
        .unwrap();
    let shared = SharedSnapshot::new(snapshot);
    let before = shared.load();

    let smaller = write_csv(&temp_dir, &ROWS[..3]);
    let (catalog, _) = read_csv(&smaller, FeatureSchema::spotify_v1(), RowPolicy::Reject).unwrap();
    shared.rebuild(catalog).unwrap();

    // Readers holding the old snapshot keep a consistent view
    assert_eq!(before.catalog().len(), 5);
    assert_eq!(before.recommend("Air", "Sexy Boy", 10).unwrap().len(), 4);

    let after = shared.load();
    assert_eq!(after.catalog().len(), 3);
    assert!(after.recommend("Air", "Sexy Boy (Live)", 1).is_err());
}
