//! `tutor tags` command - reconstruct the tag set at a past date.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tutor_core::{Config, Tag, tags_at_date};

use crate::output;
use crate::services;

/// Run the tags command.
pub fn run(config_path: &str, repo: Option<&str>, at: DateTime<Utc>, json: bool) -> Result<()> {
    let config = Config::load(config_path)?;
    let source = services::build_source(&config, repo)?;

    let snapshot = source.fetch_snapshot(&config.window())?;
    let tags = tags_at_date(at, &snapshot.tags, &snapshot.events);

    if json {
        let out = JsonOutput { at, tags: &tags };
        output::essential(&serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if tags.is_empty() {
        output::info(&format!("no tags existed at {at}"));
        return Ok(());
    }

    output::info(&format!("{} tag(s) at {at}", tags.len()));
    for tag in &tags {
        output::detail(&format!(
            "  {} -> {}",
            tag.name,
            tag.commit_id.get(..10).unwrap_or(&tag.commit_id)
        ));
    }

    Ok(())
}

/// JSON shape for the tags command.
#[derive(Serialize)]
struct JsonOutput<'a> {
    at: DateTime<Utc>,
    tags: &'a [Tag],
}
