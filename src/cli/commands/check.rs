//! Check command - cache presence probe

use crate::cache::CacheClient;
use crate::cli::args::CheckArgs;
use crate::config::Config;
use crate::error::{NarlockError, NarlockResult};
use crate::store::StorePath;
use console::style;

/// Execute the check command.
///
/// Exits nonzero when the path is not published so scripts can branch
/// on the result.
pub fn execute(args: CheckArgs, config: &Config) -> NarlockResult<()> {
    let cache_url = args.cache_url.as_deref().unwrap_or(&config.cache.url);
    let client = CacheClient::new(cache_url, config.timeout());

    let path = StorePath::new(args.store_path.as_str());
    if client.is_cached(path.hash_part())? {
        println!("{} {} is cached", style("Ok").green().bold(), path);
        Ok(())
    } else {
        Err(NarlockError::NotCached(path.as_str().to_string()))
    }
}
