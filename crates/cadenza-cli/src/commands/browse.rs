use anyhow::Result;

use super::load_snapshot;
use crate::config::Config;

pub async fn run_browse(config: &Config) -> Result<()> {
    let snapshot = load_snapshot(config).await?;
    crate::tui::run_tui(snapshot, config)
}
