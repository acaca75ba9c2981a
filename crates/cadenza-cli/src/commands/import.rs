use anyhow::{Context, Result};
use std::path::Path;

use cadenza_core::import::{self, RowPolicy};
use cadenza_core::store::Database;
use cadenza_core::FeatureSchema;

pub fn run_import(csv_path: &Path, db_path: &Path, skip_invalid: bool) -> Result<()> {
    let policy = if skip_invalid {
        RowPolicy::Skip
    } else {
        RowPolicy::Reject
    };

    let (catalog, report) = import::read_csv(csv_path, FeatureSchema::spotify_v1(), policy)
        .with_context(|| format!("Failed to import {}", csv_path.display()))?;

    if catalog.is_empty() {
        anyhow::bail!("{} contains no usable tracks", csv_path.display());
    }

    let db = Database::open(db_path).context("Failed to open database")?;
    db.replace_catalog(&catalog, csv_path.to_str())?;

    println!("✓ Imported {} tracks", report.rows_imported);
    if report.rows_skipped > 0 {
        println!("  Skipped {} invalid rows", report.rows_skipped);
    }
    println!("  into {}", db_path.display());

    Ok(())
}
