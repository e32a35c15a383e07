//! JSON output generation.
//!
//! Serializes each source's admitted articles to a JSON file for
//! downstream consumption. Files are grouped by the run's reference date
//! so repeated runs on the same day overwrite their own source file and
//! nothing else.

use crate::models::NewsSheet;
use std::error::Error;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write a [`NewsSheet`] to `{json_output_dir}/{date}/{source}.json`.
///
/// Creates the date directory if needed.
///
/// # Errors
///
/// Returns an error if directory creation, serialization, or the file
/// write fails.
#[instrument(level = "info", skip_all, fields(source = %sheet.source, json_output_dir = %json_output_dir))]
pub async fn write_news_sheet(
    sheet: &NewsSheet,
    json_output_dir: &str,
) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(sheet)?;

    let full_json_dir = format!("{}/{}", json_output_dir, sheet.local_date);
    info!(%full_json_dir, "Ensuring JSON directory exists");
    if let Err(e) = fs::create_dir_all(&full_json_dir).await {
        error!(%full_json_dir, error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let output_json_filename = format!("{}/{}.json", full_json_dir, sheet.source);
    info!(path = %output_json_filename, "Writing JSON");
    fs::write(&output_json_filename, json).await?;
    info!(
        path = %output_json_filename,
        article_count = sheet.articles.len(),
        "Wrote news sheet"
    );

    Ok(())
}
