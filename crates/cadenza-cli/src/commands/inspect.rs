use anyhow::Result;

use super::{explain_search_error, load_snapshot};
use crate::config::Config;

pub async fn run_inspect(config: &Config, artist: &str, title: &str) -> Result<()> {
    let snapshot = load_snapshot(config).await?;
    let readings = snapshot
        .inspect(
            artist,
            title,
            &config.inspect_features,
            config.display_precision,
        )
        .map_err(explain_search_error)?;

    println!("\n📊 Features of '{}' by {}\n", title, artist);
    for reading in readings {
        println!("  {:<18} {}", reading.label(), reading.value);
    }

    Ok(())
}
