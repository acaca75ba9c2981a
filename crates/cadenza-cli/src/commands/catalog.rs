use anyhow::Result;
use std::path::Path;

use super::load_catalog;

pub fn list_artists(db_path: &Path) -> Result<()> {
    let catalog = load_catalog(db_path)?;
    for artist in catalog.artists() {
        println!("{artist}");
    }
    Ok(())
}

pub fn list_tracks(db_path: &Path, artist: &str) -> Result<()> {
    let catalog = load_catalog(db_path)?;
    let titles = catalog.titles_for(artist);

    if titles.is_empty() {
        anyhow::bail!("No tracks by '{}' in the catalog", artist);
    }

    for title in titles {
        println!("{title}");
    }
    Ok(())
}
