//! The `nix.lock` index
//!
//! A durable JSON file accumulating everything resolved against the
//! binary cache: per-store-path cache records, per-build flake records
//! with their runtime closures, and externally managed source entries.
//! [`LockStore`] owns the in-memory index behind a mutex; every
//! mutation and the save path go through it, so concurrent crawls
//! never interleave a partial write.

use crate::cache::{nix_hash_to_hex, NarInfo};
use crate::error::{NarlockError, NarlockResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info};

/// Current lockfile schema version.
pub const LOCKFILE_VERSION: u32 = 1;

/// The serialized lockfile shape.
///
/// Maps are `BTreeMap` so serialization order is stable and lockfile
/// diffs stay reviewable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lockfile {
    pub version: u32,
    /// Pinned upstream revision the store paths were resolved against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nixpkgs_commit: Option<String>,
    /// Build records keyed by build label
    #[serde(default)]
    pub flakes: BTreeMap<String, FlakeRecord>,
    /// External source downloads, managed by the build generator
    #[serde(default)]
    pub sources: BTreeMap<String, SourceRecord>,
    /// Cache records keyed by store path
    #[serde(default)]
    pub store_paths: BTreeMap<String, StorePathRecord>,
}

impl Lockfile {
    fn empty() -> Self {
        Self {
            version: LOCKFILE_VERSION,
            ..Default::default()
        }
    }
}

/// Facts about one resolved build target.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlakeRecord {
    /// Content digest identifying the build definition
    pub drv_hash: String,
    /// Declared build dependency labels
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deps: Vec<String>,
    /// Primary output; key into `store_paths`
    pub output_store_path: String,
    /// Executable sub-path inside the output, if any
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub executable: String,
    /// Exported environment variables
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
    /// Full transitive closure in discovery order; keys into `store_paths`
    #[serde(
        rename = "runtime_closure",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub closure: Vec<String>,
}

/// Cache facts for one store path, as needed by download rule
/// generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorePathRecord {
    pub store_path: String,
    /// Absolute URL of the compressed NAR
    pub nar_url: String,
    /// `sha256:<hex>` digest of the compressed NAR
    pub nar_hash: String,
    pub file_size: u64,
    pub compression: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<String>,
}

/// An externally downloaded source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub urls: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sha256: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub integrity: String,
    #[serde(
        rename = "downloaded_file_path",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub path: String,
}

/// Handle to the lockfile: in-memory index plus its backing path.
///
/// All mutation is serialized through the internal mutex; callers only
/// see atomic upserts, snapshots and saves.
pub struct LockStore {
    path: PathBuf,
    inner: Mutex<Lockfile>,
}

impl LockStore {
    /// Load the lockfile at `path`. A missing or empty file yields a
    /// fresh index at the current schema version, not an error.
    pub fn load(path: impl Into<PathBuf>) -> NarlockResult<Self> {
        let path = path.into();

        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(NarlockError::io(
                    format!("reading lockfile {}", path.display()),
                    e,
                ))
            }
        };

        let lockfile = if data.is_empty() {
            debug!("lockfile {} absent, starting fresh", path.display());
            Lockfile::empty()
        } else {
            serde_json::from_slice(&data)?
        };

        Ok(Self {
            path,
            inner: Mutex::new(lockfile),
        })
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Lockfile> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record cache facts for a store path, replacing any previous
    /// record. The compressed-file digest is normalized to hex; if the
    /// base32 conversion fails the raw encoded digest is kept.
    pub fn upsert_store_path(&self, info: &NarInfo, cache_url: &str) {
        let raw = info
            .file_hash
            .strip_prefix("sha256:")
            .unwrap_or(&info.file_hash);
        let nar_hash = match nix_hash_to_hex(raw) {
            Ok(hex) => format!("sha256:{hex}"),
            Err(_) => format!("sha256:{raw}"),
        };

        let record = StorePathRecord {
            store_path: info.store_path.clone(),
            nar_url: format!("{}/{}", cache_url.trim_end_matches('/'), info.url),
            nar_hash,
            file_size: info.file_size,
            compression: info.compression.clone(),
            references: info.references.clone(),
        };

        self.lock().store_paths.insert(info.store_path.clone(), record);
    }

    /// Install or replace the build record for `label`. Records are
    /// replaced whole, never merged field by field.
    pub fn upsert_flake(&self, label: &str, record: FlakeRecord) {
        self.lock().flakes.insert(label.to_string(), record);
    }

    /// Pin the upstream revision the resolution ran against.
    pub fn set_pinned_revision(&self, commit: &str) {
        self.lock().nixpkgs_commit = Some(commit.to_string());
    }

    /// A point-in-time copy of the index for read-only consumers.
    pub fn snapshot(&self) -> Lockfile {
        self.lock().clone()
    }

    /// Persist the index. Serialization happens under the lock so a
    /// torn map view is never written; the bytes go to a sibling
    /// temporary file first, then rename into place.
    pub fn save(&self) -> NarlockResult<()> {
        let data = {
            let guard = self.lock();
            serde_json::to_vec_pretty(&*guard)?
        };

        let tmp = self.path.with_extension("lock.tmp");
        fs::write(&tmp, &data)
            .map_err(|e| NarlockError::io(format!("writing {}", tmp.display()), e))?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            NarlockError::io(format!("renaming {} into place", tmp.display()), e)
        })?;

        info!(
            "saved lockfile {} ({} store paths)",
            self.path.display(),
            self.lock().store_paths.len()
        );
        Ok(())
    }
}
