use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;

mod cli_bin;

use cli_bin::{
    args::{Cli, Commands},
    commands::{self, Outcome},
};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let result = match cli.command {
        Commands::Get(args) => commands::get_command(args),
        Commands::Nodes(args) => commands::nodes_command(args),
        Commands::Groups(args) => commands::groups_command(args),
    };
    let outcome = result
        .or_else(commands::settle_failure)
        .context("cfgtree failed")?;

    Ok(match outcome {
        Outcome::Success => ExitCode::SUCCESS,
        Outcome::Missing => ExitCode::FAILURE,
        Outcome::Failed => ExitCode::from(2),
    })
}
