//! Unpack command - extract a local NAR archive

use crate::cli::args::UnpackArgs;
use crate::config::Config;
use crate::error::{NarlockError, NarlockResult};
use crate::nar::{decompress, unpack_nar, UnpackOptions};
use console::style;
use std::fs::File;
use std::io::BufReader;

/// Execute the unpack command
pub fn execute(args: UnpackArgs, config: &Config) -> NarlockResult<()> {
    let file = File::open(&args.archive)
        .map_err(|e| NarlockError::io(format!("opening {}", args.archive.display()), e))?;
    let nar = decompress(BufReader::new(file), &args.compression)?;

    let opts = if args.strict {
        UnpackOptions::strict()
    } else {
        UnpackOptions {
            store_prefix: config.store.prefix.clone(),
            ..Default::default()
        }
    };
    unpack_nar(nar, &args.dest, &opts)?;

    println!(
        "{} {} -> {}",
        style("Unpacked").green().bold(),
        args.archive.display(),
        args.dest.display()
    );
    Ok(())
}
