//! Tutor CLI - commit attribution and branch topology analysis for grading.

use clap::Parser;

mod commands;
mod output;
mod services;

use commands::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Graph { json, dot } => commands::graph::run(&cli.config, cli.repo.as_deref(), json, dot),
        Commands::Branch { name, base, json } => {
            commands::branch::run(&cli.config, cli.repo.as_deref(), &name, base.as_deref(), json)
        }
        Commands::Tags { at, json } => commands::tags::run(&cli.config, cli.repo.as_deref(), at, json),
        Commands::Completions { shell } => commands::completions::run(shell),
    };

    if let Err(e) = result {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
