//! Store path handling
//!
//! A store path identifies an immutable, content-addressed artifact:
//! `/nix/store/<hash>-<name>`. The hash part keys cache lookups, the
//! name part is a human-readable slug.

use std::fmt;

/// Default prefix under which store paths live.
pub const DEFAULT_STORE_PREFIX: &str = "/nix/store/";

/// A reference to one store artifact.
///
/// Accepts both full paths (`/nix/store/abc123-hello-2.12`) and bare
/// basenames (`abc123-hello-2.12`); the derived views behave the same
/// for either form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorePath(String);

impl StorePath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Build a full store path from a bare reference, leaving already
    /// absolute references untouched.
    pub fn resolve(prefix: &str, reference: &str) -> Self {
        if reference.starts_with('/') {
            Self(reference.to_string())
        } else {
            Self(format!("{prefix}{reference}"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The basename without the store prefix.
    ///
    /// The prefix is configurable, so take everything after the last
    /// `/` rather than stripping a fixed prefix.
    pub fn base_name(&self) -> &str {
        match self.0.rfind('/') {
            Some(idx) => &self.0[idx + 1..],
            None => &self.0,
        }
    }

    /// The hash token used for `.narinfo` lookups.
    ///
    /// Everything before the first `-`; a malformed path without a
    /// separator degrades to the whole basename.
    pub fn hash_part(&self) -> &str {
        let base = self.base_name();
        match base.find('-') {
            Some(idx) if idx > 0 => &base[..idx],
            _ => base,
        }
    }

    /// The human-readable name after the hash token.
    pub fn name(&self) -> &str {
        let base = self.base_name();
        match base.find('-') {
            Some(idx) if idx > 0 && idx < base.len() - 1 => &base[idx + 1..],
            _ => base,
        }
    }
}

impl fmt::Display for StorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for StorePath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
