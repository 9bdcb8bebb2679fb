//! Resolve command - crawl a closure into the lockfile

use crate::cache::CacheClient;
use crate::cli::args::ResolveArgs;
use crate::closure::Crawler;
use crate::config::Config;
use crate::error::{NarlockError, NarlockResult};
use crate::lockfile::{FlakeRecord, LockStore};
use crate::store::StorePath;
use console::style;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Execute the resolve command
pub fn execute(args: ResolveArgs, config: &Config) -> NarlockResult<()> {
    let cache_url = args.cache_url.as_deref().unwrap_or(&config.cache.url);
    let lock_path = args
        .lockfile
        .clone()
        .unwrap_or_else(|| config.lock.path.clone());

    let client = CacheClient::new(cache_url, config.timeout());
    let lock = LockStore::load(&lock_path)?;
    let crawler = Crawler::new(&client, client.url(), &config.store.prefix);

    let root = StorePath::new(args.store_path.as_str());
    info!("resolving closure of {root}");
    let closure = crawler.crawl(&root, &lock)?;

    if let Some(label) = &args.label {
        let record = build_record(&args, &root, &closure, &config.store.prefix)?;
        lock.upsert_flake(label, record);
    }

    lock.save()?;

    println!(
        "{} {} ({} store paths) -> {}",
        style("Resolved").green().bold(),
        root,
        closure.len(),
        lock.path().display()
    );
    Ok(())
}

fn build_record(
    args: &ResolveArgs,
    root: &StorePath,
    closure: &[String],
    store_prefix: &str,
) -> NarlockResult<FlakeRecord> {
    // The build definition digest: the hashed --drv file when given,
    // the root's own store hash otherwise
    let drv_hash = match &args.drv {
        Some(path) => hash_definition_file(path)?,
        None => root.hash_part().to_string(),
    };

    let mut env = BTreeMap::new();
    for assignment in &args.env {
        let (key, value) = assignment
            .split_once('=')
            .ok_or_else(|| NarlockError::EnvAssignment(assignment.clone()))?;
        env.insert(key.to_string(), value.to_string());
    }

    Ok(FlakeRecord {
        drv_hash,
        deps: args.deps.clone(),
        output_store_path: StorePath::resolve(store_prefix, root.as_str())
            .as_str()
            .to_string(),
        executable: args.executable.clone().unwrap_or_default(),
        env,
        closure: closure.to_vec(),
    })
}

/// Hash a build definition file's contents with SHA256.
fn hash_definition_file(path: &Path) -> NarlockResult<String> {
    let contents = std::fs::read(path)
        .map_err(|e| NarlockError::io(format!("reading definition file {}", path.display()), e))?;

    let mut hasher = Sha256::new();
    hasher.update(&contents);
    Ok(hex::encode(hasher.finalize()))
}
