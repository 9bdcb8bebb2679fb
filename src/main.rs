//! narlock - Nix binary cache closure resolver
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use narlock::cli::{Cli, Commands};
use narlock::config::Config;
use narlock::error::NarlockResult;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> NarlockResult<()> {
    let cli = Cli::parse();

    // Initialize logging: 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("narlock=warn"),
        1 => EnvFilter::new("narlock=info"),
        _ => EnvFilter::new("narlock=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Resolve(args) => narlock::cli::commands::resolve(args, &config),
        Commands::Check(args) => narlock::cli::commands::check(args, &config),
        Commands::Fetch(args) => narlock::cli::commands::fetch(args, &config),
        Commands::Unpack(args) => narlock::cli::commands::unpack(args, &config),
        Commands::Show(args) => narlock::cli::commands::show(args, &config),
    }
}
