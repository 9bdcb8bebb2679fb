//! Show command - display lockfile contents

use crate::cli::args::ShowArgs;
use crate::config::Config;
use crate::error::NarlockResult;
use crate::lockfile::{LockStore, Lockfile};
use crate::store::StorePath;
use console::style;

/// Execute the show command
pub fn execute(args: ShowArgs, config: &Config) -> NarlockResult<()> {
    let lock_path = args
        .lockfile
        .clone()
        .unwrap_or_else(|| config.lock.path.clone());
    let snapshot = LockStore::load(&lock_path)?.snapshot();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    print_summary(&snapshot);
    Ok(())
}

fn print_summary(lockfile: &Lockfile) {
    if let Some(commit) = &lockfile.nixpkgs_commit {
        println!("nixpkgs: {commit}");
    }

    if !lockfile.flakes.is_empty() {
        println!("{}", style("Builds").bold());
        for (label, flake) in &lockfile.flakes {
            println!(
                "  {:<32} {} ({} closure paths)",
                label,
                flake.output_store_path,
                flake.closure.len()
            );
        }
        println!();
    }

    if lockfile.store_paths.is_empty() {
        println!("No store paths resolved.");
        return;
    }

    println!("{}", style("Store paths").bold());
    println!("{:<44} {:<12} {:>12}  {}", "NAME", "COMPRESSION", "SIZE", "REFS");
    for (path, record) in &lockfile.store_paths {
        println!(
            "{:<44} {:<12} {:>12}  {}",
            StorePath::new(path.as_str()).base_name(),
            record.compression,
            record.file_size,
            record.references.len()
        );
    }
    println!();
    println!("Total: {} store path(s)", lockfile.store_paths.len());
}
