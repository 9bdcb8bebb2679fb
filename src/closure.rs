//! Transitive closure crawling
//!
//! Breadth-first traversal over the reference graph a binary cache
//! describes: each resolved narinfo names the store paths its artifact
//! needs at runtime, and those need their own, recursively. Every
//! resolved node lands in the lock store; the ordered closure list is
//! returned for the caller's build record.

use crate::cache::NarInfoSource;
use crate::error::{NarlockError, NarlockResult};
use crate::lockfile::LockStore;
use crate::store::StorePath;
use std::collections::{HashSet, VecDeque};
use tracing::{debug, warn};

/// Crawls reference closures from a narinfo source into a lock store.
pub struct Crawler<'a, S: NarInfoSource> {
    source: &'a S,
    /// Absolute URL recorded for downloaded NARs
    cache_url: String,
    /// Prefix used to expand bare reference basenames
    store_prefix: String,
}

impl<'a, S: NarInfoSource> Crawler<'a, S> {
    pub fn new(source: &'a S, cache_url: &str, store_prefix: &str) -> Self {
        Self {
            source,
            cache_url: cache_url.to_string(),
            store_prefix: store_prefix.to_string(),
        }
    }

    /// Crawl the closure rooted at `root`, upserting a cache record
    /// for every resolvable member into `lock`.
    ///
    /// The returned list is in breadth-first discovery order, root
    /// first. Cycles and self-references terminate through the visited
    /// set. A member whose metadata is absent or fails to load is
    /// logged and skipped so one unpublished dependency does not sink
    /// the rest of the graph; consumers needing strict completeness
    /// must compare the result against the recorded references. The
    /// root is the exception: if it cannot be resolved the whole crawl
    /// fails.
    pub fn crawl(&self, root: &StorePath, lock: &LockStore) -> NarlockResult<Vec<String>> {
        let root_path = StorePath::resolve(&self.store_prefix, root.as_str());
        let mut queue: VecDeque<String> = VecDeque::from([root_path.as_str().to_string()]);
        let mut visited: HashSet<String> = HashSet::new();
        let mut closure: Vec<String> = Vec::new();

        while let Some(path) = queue.pop_front() {
            if !visited.insert(path.clone()) {
                continue;
            }
            closure.push(path.clone());

            let store_path = StorePath::new(path.as_str());
            let info = match self.source.lookup_narinfo(store_path.hash_part()) {
                Ok(Some(info)) => info,
                Ok(None) => {
                    if path == root_path.as_str() {
                        return Err(NarlockError::NotCached(path));
                    }
                    warn!("{path} not found in cache, skipping");
                    continue;
                }
                Err(e) => {
                    if path == root_path.as_str() {
                        return Err(e);
                    }
                    warn!("error looking up {path}: {e}");
                    continue;
                }
            };

            debug!(
                "resolved {path} ({} references)",
                info.references.len()
            );
            lock.upsert_store_path(&info, &self.cache_url);

            // References are usually bare basenames; expand before
            // enqueueing. Trivial self-references are dropped here,
            // the visited set covers longer cycles.
            for reference in &info.references {
                let full = StorePath::resolve(&self.store_prefix, reference);
                let full = full.as_str();
                if full != path && !visited.contains(full) {
                    queue.push_back(full.to_string());
                }
            }
        }

        Ok(closure)
    }
}
