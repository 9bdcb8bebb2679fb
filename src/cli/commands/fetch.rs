//! Fetch command - download and unpack a store path

use crate::cache::{CacheClient, NarInfoSource};
use crate::cli::args::FetchArgs;
use crate::config::Config;
use crate::error::{NarlockError, NarlockResult};
use crate::nar::{decompress, unpack_nar, UnpackOptions};
use crate::store::StorePath;
use console::style;
use tracing::info;

/// Execute the fetch command
pub fn execute(args: FetchArgs, config: &Config) -> NarlockResult<()> {
    let cache_url = args.cache_url.as_deref().unwrap_or(&config.cache.url);
    let client = CacheClient::new(cache_url, config.timeout());

    let path = StorePath::new(args.store_path.as_str());
    let info = client
        .lookup_narinfo(path.hash_part())?
        .ok_or_else(|| NarlockError::NotCached(path.as_str().to_string()))?;

    info!(
        "fetching {} ({}, {} bytes compressed)",
        info.url, info.compression, info.file_size
    );
    let raw = client.download_nar(&info.url)?;
    let nar = decompress(raw, &info.compression)?;

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
        path,
        args.dest.display()
    );
    Ok(())
}
