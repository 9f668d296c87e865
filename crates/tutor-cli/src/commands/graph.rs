//! `tutor graph` command - reconstruct and display the branch paths.

use std::fmt::Write as _;

use anyhow::Result;
use serde::Serialize;
use tutor_core::{Boundary, BranchPath, Config, RefSet, branch_paths};

use crate::output;
use crate::services;

/// Run the graph command.
pub fn run(config_path: &str, repo: Option<&str>, json: bool, dot: bool) -> Result<()> {
    let config = Config::load(config_path)?;
    let source = services::build_source(&config, repo)?;

    let snapshot = source.fetch_snapshot(&config.window())?;
    let graph = snapshot.graph();
    let paths = branch_paths(&graph, &snapshot.refs);

    if json {
        let out = JsonOutput {
            branch_paths: &paths,
            refs: &snapshot.refs,
        };
        output::essential(&serde_json::to_string_pretty(&out)?);
    } else if dot {
        output::essential(&dot_output(&paths, &snapshot.refs));
    } else {
        print_paths(&paths);
    }

    Ok(())
}

/// JSON shape for the graph command.
#[derive(Serialize)]
struct JsonOutput<'a> {
    branch_paths: &'a [BranchPath],
    refs: &'a RefSet,
}

/// Print paths in human-readable form.
fn print_paths(paths: &[BranchPath]) {
    if paths.is_empty() {
        output::warn("no commits in the analysis window");
        return;
    }

    output::info(&format!("{} branch path(s) reconstructed", paths.len()));
    for (index, path) in paths.iter().enumerate() {
        let chain = path
            .ids
            .iter()
            .map(|id| id.get(..10).unwrap_or(id))
            .collect::<Vec<_>>()
            .join(" -> ");
        output::detail(&format!("  [{index}] {chain}"));

        if let Boundary::Truncated { parent_id } = &path.boundary {
            output::detail(&format!(
                "      (history continues past {} outside the window)",
                parent_id.get(..10).unwrap_or(parent_id)
            ));
        }
    }
}

/// Serialize the branch set as a DOT graph description.
///
/// One node group per path, plus a labelled box per ref pointing at its
/// target commit. Rendering the description is left to graphviz.
fn dot_output(paths: &[BranchPath], refs: &RefSet) -> String {
    let mut dot = String::from("strict digraph history {\n");

    for (index, path) in paths.iter().enumerate() {
        let _ = writeln!(dot, "\tnode[group=\"{index}\"];");
        let chain = path
            .ids
            .iter()
            .map(|id| format!("\"{id}\""))
            .collect::<Vec<_>>()
            .join(" -> ");
        let _ = writeln!(dot, "\t{chain};");
    }

    let known: std::collections::HashSet<&str> = paths
        .iter()
        .flat_map(|path| path.ids.iter().map(String::as_str))
        .collect();

    for (index, (name, target)) in refs.iter().enumerate() {
        if !known.contains(target.as_str()) {
            continue;
        }
        let _ = writeln!(dot, "\tsubgraph Decorate{index} {{");
        let _ = writeln!(dot, "\t\trank = \"same\";");
        let _ = writeln!(
            dot,
            "\t\t\"({name})\" [shape = \"box\", style = \"filled\", fillcolor = \"#ddddff\"];"
        );
        let _ = writeln!(
            dot,
            "\t\t\"({name})\" -> \"{target}\" [weight = 0, arrowhead = \"none\", style = \"dotted\"];"
        );
        let _ = writeln!(dot, "\t}}");
    }

    dot.push_str("}\n");
    dot
}
