use anyhow::Result;
use std::path::Path;

use cadenza_core::store::Database;

pub fn show_status(db_path: &Path) -> Result<()> {
    let db = Database::open(db_path)?;

    println!("\n📊 Cadenza Status\n");
    println!("  Database: {}", db_path.display());

    let Some(info) = db.catalog_info()? else {
        println!("  Tracks: 0");
        println!("\n  Run `cadenza import <file.csv>` to load a catalog");
        return Ok(());
    };

    println!("  Tracks: {}", info.track_count);
    println!("  Imported: {}", info.imported_at.format("%Y-%m-%d %H:%M:%S UTC"));
    if let Some(source) = &info.source {
        println!("  Source: {}", source);
    }
    println!(
        "  Feature schema v{}: {}",
        info.schema.version(),
        info.schema.fields().join(", ")
    );

    Ok(())
}
