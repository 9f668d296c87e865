//! `tutor branch` command - attribute one feature branch.

use std::collections::HashSet;

use anyhow::Result;
use serde::Serialize;
use tutor_core::{
    CommitId, Config, first_feature_commit, merge_point, refine_first_feature_commit,
};

use crate::output;
use crate::services;

/// Run the branch command.
pub fn run(
    config_path: &str,
    repo: Option<&str>,
    name: &str,
    base_override: Option<&str>,
    json: bool,
) -> Result<()> {
    let config = Config::load(config_path)?;
    let source = services::build_source(&config, repo)?;

    let window = config.window();
    let base_branch = base_override.unwrap_or(&config.analysis.base_branch);

    let base = source.fetch_commits(&window.for_branch(base_branch))?;
    let feature = source.fetch_commits(&window.for_branch(name))?;

    let Some(first) = first_feature_commit(&base, &feature)? else {
        if json {
            output::essential(&serde_json::to_string_pretty(&JsonOutput::empty(name, base_branch))?);
        } else {
            output::warn(&format!("no commits on '{name}' in the window - nothing to attribute"));
        }
        return Ok(());
    };

    // Merge commits inside the feature path bound the divergence point.
    let merges: HashSet<CommitId> = feature
        .iter()
        .filter(|commit| commit.is_merge())
        .map(|commit| commit.id.clone())
        .collect();
    let first = refine_first_feature_commit(&feature, first, &merges);

    let tip = &feature[0];
    let merge = merge_point(tip, &base);
    let fast_forward = merge.is_some_and(|m| m.id == tip.id);

    if json {
        let out = JsonOutput {
            branch: name,
            base: base_branch,
            first_commit: Some(first.id.as_str()),
            merge_point: merge.map(|m| m.id.as_str()),
            fast_forward,
        };
        output::essential(&serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    output::success(&format!("first commit on '{name}': {}", first.short_id()));
    match merge {
        Some(m) if fast_forward => {
            output::info(&format!(
                "integrated into '{base_branch}' by fast-forward at {}",
                m.short_id()
            ));
        }
        Some(m) => {
            output::info(&format!("merged into '{base_branch}' at {}", m.short_id()));
        }
        None => output::info(&format!("not merged into '{base_branch}'")),
    }

    Ok(())
}

/// JSON shape for the branch command.
#[derive(Serialize)]
struct JsonOutput<'a> {
    branch: &'a str,
    base: &'a str,
    first_commit: Option<&'a str>,
    merge_point: Option<&'a str>,
    fast_forward: bool,
}

impl<'a> JsonOutput<'a> {
    const fn empty(branch: &'a str, base: &'a str) -> Self {
        Self {
            branch,
            base,
            first_commit: None,
            merge_point: None,
            fast_forward: false,
        }
    }
}
