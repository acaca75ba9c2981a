pub mod browse;
pub mod catalog;
pub mod config;
pub mod feedback;
pub mod import;
pub mod inspect;
pub mod recommend;
pub mod status;

use std::path::Path;

use anyhow::{Context, Result};
use cadenza_core::store::Database;
use cadenza_core::Catalog;
use cadenza_search::{build_snapshot_with_timeout, Snapshot};

use crate::config::Config;

pub use browse::run_browse;
pub use catalog::{list_artists, list_tracks};
pub use feedback::acknowledge_feedback;
pub use import::run_import;
pub use inspect::run_inspect;
pub use recommend::run_recommend;
pub use status::show_status;

/// Load the stored catalog, or explain how to create one.
fn load_catalog(db_path: &Path) -> Result<Catalog> {
    let db = Database::open(db_path).context("Failed to open database")?;
    db.load_catalog()?.ok_or_else(|| {
        anyhow::anyhow!("No catalog imported yet. Run 'cadenza import <file.csv>' first.")
    })
}

/// Attach a hint to errors caused by what the user asked for.
fn explain_search_error(err: cadenza_search::Error) -> anyhow::Error {
    if err.is_selection_error() {
        anyhow::anyhow!(
            "{err}\nUse 'cadenza artists' and 'cadenza tracks <artist>' to find exact names."
        )
    } else {
        err.into()
    }
}

/// Load the stored catalog and build its similarity snapshot.
async fn load_snapshot(config: &Config) -> Result<Snapshot> {
    let catalog = load_catalog(&config.database_path)?;
    build_snapshot_with_timeout(catalog, config.build_timeout())
        .await
        .context("Failed to build similarity index")
}
