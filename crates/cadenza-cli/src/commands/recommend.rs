use anyhow::Result;
use std::fmt;

use cadenza_core::TrackSummary;

use super::{explain_search_error, load_snapshot};
use crate::config::Config;

pub async fn run_recommend(
    config: &Config,
    artist: &str,
    title: &str,
    k: usize,
    json: bool,
) -> Result<()> {
    let snapshot = load_snapshot(config).await?;
    let summaries = snapshot
        .recommend(artist, title, k)
        .map_err(explain_search_error)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    } else {
        let list = RecommendationList {
            artist,
            title,
            summaries: &summaries,
        };
        print!("{list}");
    }

    Ok(())
}

/// Plain-text listing of recommendations.
#[derive(Debug)]
pub struct RecommendationList<'a> {
    pub artist: &'a str,
    pub title: &'a str,
    pub summaries: &'a [TrackSummary],
}

impl fmt::Display for RecommendationList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "\n🎧 Recommended tracks similar to '{}' by {}\n",
            self.title, self.artist
        )?;

        if self.summaries.is_empty() {
            return writeln!(f, "  No other tracks in the catalog.");
        }

        for (rank, summary) in self.summaries.iter().enumerate() {
            writeln!(
                f,
                "  {:>2}. {} by {}  (distance {:.4})",
                rank + 1,
                summary.title,
                summary.artist,
                summary.distance
            )?;
            if let Some(url) = &summary.preview_url {
                writeln!(f, "      preview: {}", url)?;
            }
            if let Some(url) = &summary.image_url {
                writeln!(f, "      image:   {}", url)?;
            }
        }

        Ok(())
    }
}
