//! Error types for narlock
//!
//! All modules use `NarlockResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for narlock operations
pub type NarlockResult<T> = Result<T, NarlockError>;

/// All errors that can occur in narlock
#[derive(Error, Debug)]
pub enum NarlockError {
    // Cache protocol errors
    #[error("cache returned status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    #[error("store path not found in cache: {0}")]
    NotCached(String),

    // Narinfo format errors
    #[error("invalid narinfo: {reason}")]
    NarInfoInvalid { reason: String },

    // Hash codec errors
    #[error("invalid base32 character {character:?} in hash {hash:?}")]
    HashCharacter { hash: String, character: char },

    #[error("hash {0:?} does not fit in a 32-byte digest")]
    HashOverflow(String),

    // NAR format errors
    #[error("not a NAR archive (magic {0:?})")]
    NarMagic(String),

    #[error("unexpected token {found:?} in NAR stream, expected {expected}")]
    NarToken { expected: String, found: String },

    #[error("NAR token is not valid UTF-8")]
    NarTokenEncoding,

    #[error("unknown NAR entry type: {0:?}")]
    NarEntryType(String),

    #[error("invalid NAR directory entry name {0:?}")]
    NarEntryName(String),

    #[error("refusing to overwrite existing directory with file: {0}")]
    NarDestIsDirectory(PathBuf),

    #[error("unsupported compression: {0:?}")]
    UnsupportedCompression(String),

    // Configuration errors
    #[error("invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("invalid environment assignment {0:?}, expected KEY=VALUE")]
    EnvAssignment(String),

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NarlockError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a transport error for a failed request
    pub fn transport(url: impl Into<String>, source: ureq::Error) -> Self {
        Self::Transport {
            url: url.into(),
            source: Box::new(source),
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::NotCached(_) => {
                Some("the path was never published to this cache; it may need to be built locally")
            }
            Self::UnsupportedCompression(_) => {
                Some("only xz, zstd, gzip, bzip2 and uncompressed NAR streams are supported")
            }
            Self::NarMagic(_) => Some("the input does not look like a NAR archive"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = NarlockError::NotCached("/nix/store/abc-hello".to_string());
        assert!(err.to_string().contains("not found in cache"));
    }

    #[test]
    fn error_hint() {
        let err = NarlockError::UnsupportedCompression("lrzip".to_string());
        assert!(err.hint().unwrap().contains("zstd"));
        assert!(NarlockError::NarTokenEncoding.hint().is_none());
    }

    #[test]
    fn io_helper_keeps_source() {
        let err = NarlockError::io(
            "reading lockfile",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.to_string().contains("reading lockfile"));
    }
}
