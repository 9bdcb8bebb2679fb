//! Binary cache HTTP client
//!
//! Talks to a Nix-style binary cache: `.narinfo` metadata lookups and
//! NAR archive downloads. A 404 on a narinfo lookup is a first-class
//! "not published" outcome, not an error. No retries are built in; the
//! caller decides retry policy.

use crate::cache::NarInfo;
use crate::error::{NarlockError, NarlockResult};
use std::io::Read;
use std::time::Duration;
use tracing::debug;
use ureq::Agent;

/// The default public Nix binary cache.
pub const DEFAULT_CACHE_URL: &str = "https://cache.nixos.org";

/// Anything that can answer narinfo lookups by store hash.
///
/// The closure crawler is generic over this so tests can stub the
/// cache without a network.
pub trait NarInfoSource {
    /// Fetch the narinfo for a store path hash. `Ok(None)` means the
    /// path was never published.
    fn lookup_narinfo(&self, store_hash: &str) -> NarlockResult<Option<NarInfo>>;
}

/// A Nix binary cache endpoint.
pub struct CacheClient {
    url: String,
    agent: Agent,
}

impl CacheClient {
    /// Create a client for the given cache root URL. An empty URL
    /// falls back to the public cache; a trailing slash is stripped.
    pub fn new(url: &str, timeout: Duration) -> Self {
        let url = if url.is_empty() { DEFAULT_CACHE_URL } else { url };
        let config = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            url: url.trim_end_matches('/').to_string(),
            agent: Agent::new_with_config(config),
        }
    }

    /// The cache root URL, without trailing slash.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Download a NAR archive by its cache-relative path, returning the
    /// raw (possibly compressed) byte stream. The caller owns the
    /// reader and is responsible for decompression.
    pub fn download_nar(&self, nar_path: &str) -> NarlockResult<Box<dyn Read>> {
        let url = format!("{}/{}", self.url, nar_path.trim_start_matches('/'));
        debug!("downloading NAR from {url}");

        match self.agent.get(&url).call() {
            Ok(response) => Ok(Box::new(response.into_body().into_reader())),
            Err(ureq::Error::StatusCode(status)) => Err(NarlockError::HttpStatus { url, status }),
            Err(e) => Err(NarlockError::transport(url, e)),
        }
    }

    /// Check whether a store path hash is available in the cache.
    pub fn is_cached(&self, store_hash: &str) -> NarlockResult<bool> {
        Ok(self.lookup_narinfo(store_hash)?.is_some())
    }
}

impl NarInfoSource for CacheClient {
    fn lookup_narinfo(&self, store_hash: &str) -> NarlockResult<Option<NarInfo>> {
        let url = format!("{}/{}.narinfo", self.url, store_hash);
        debug!("fetching {url}");

        match self.agent.get(&url).call() {
            Ok(mut response) => {
                let body = response
                    .body_mut()
                    .read_to_string()
                    .map_err(|e| NarlockError::transport(url, e))?;
                NarInfo::parse(&body).map(Some)
            }
            // Not published: a first-class outcome, not an error
            Err(ureq::Error::StatusCode(404)) => Ok(None),
            Err(ureq::Error::StatusCode(status)) => Err(NarlockError::HttpStatus { url, status }),
            Err(e) => Err(NarlockError::transport(url, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_stripped() {
        let client = CacheClient::new("https://cache.example.org/", Duration::from_secs(5));
        assert_eq!(client.url(), "https://cache.example.org");
    }

    #[test]
    fn empty_url_uses_default() {
        let client = CacheClient::new("", Duration::from_secs(5));
        assert_eq!(client.url(), DEFAULT_CACHE_URL);
    }
}
