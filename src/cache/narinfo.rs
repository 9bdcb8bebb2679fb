//! `.narinfo` metadata parsing
//!
//! The binary cache describes each store path with a small line-oriented
//! `Key: Value` document. Unknown keys are ignored for forward
//! compatibility; the record is only rejected when the mandatory
//! `StorePath` or `URL` fields never appear.

use crate::error::{NarlockError, NarlockResult};
use std::fmt;

/// Parsed contents of a `.narinfo` file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NarInfo {
    /// Full store path (e.g. `/nix/store/abc-hello-2.12`)
    pub store_path: String,
    /// NAR file URL, relative to the cache root
    pub url: String,
    /// Compression type (`xz`, `zstd`, `none`, ...)
    pub compression: String,
    /// Hash of the compressed NAR file
    pub file_hash: String,
    /// Size of the compressed NAR file in bytes
    pub file_size: u64,
    /// Hash of the uncompressed NAR
    pub nar_hash: String,
    /// Size of the uncompressed NAR in bytes
    pub nar_size: u64,
    /// Store paths this artifact references (usually basenames)
    pub references: Vec<String>,
    /// Path to the derivation that built this artifact
    pub deriver: Option<String>,
    /// Signatures, in file order
    pub sig: Vec<String>,
}

/// Lenient numeric field policy: a size that fails to parse is recorded
/// as zero rather than invalidating the whole record, tolerating minor
/// format drift on non-essential fields.
fn parse_lenient_u64(value: &str) -> u64 {
    value.parse().unwrap_or(0)
}

impl NarInfo {
    /// Parse a `.narinfo` document.
    ///
    /// Blank lines, `#` comments and lines without a colon are skipped.
    /// Repeated `Sig` lines accumulate; `References` is whitespace-split.
    pub fn parse(content: &str) -> NarlockResult<Self> {
        let mut info = NarInfo::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            match key {
                "StorePath" => info.store_path = value.to_string(),
                "URL" => info.url = value.to_string(),
                "Compression" => info.compression = value.to_string(),
                "FileHash" => info.file_hash = value.to_string(),
                "FileSize" => info.file_size = parse_lenient_u64(value),
                "NarHash" => info.nar_hash = value.to_string(),
                "NarSize" => info.nar_size = parse_lenient_u64(value),
                "References" => {
                    if !value.is_empty() {
                        info.references = value.split_whitespace().map(String::from).collect();
                    }
                }
                "Deriver" => info.deriver = Some(value.to_string()),
                "Sig" => info.sig.push(value.to_string()),
                // Forward compatible: unknown keys are ignored
                _ => {}
            }
        }

        if info.store_path.is_empty() || info.url.is_empty() {
            return Err(NarlockError::NarInfoInvalid {
                reason: "missing required StorePath or URL field".to_string(),
            });
        }

        Ok(info)
    }
}

impl fmt::Display for NarInfo {
    /// Serialize back to the narinfo text format. `parse` of the output
    /// reproduces the record.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "StorePath: {}", self.store_path)?;
        writeln!(f, "URL: {}", self.url)?;
        if !self.compression.is_empty() {
            writeln!(f, "Compression: {}", self.compression)?;
        }
        if !self.file_hash.is_empty() {
            writeln!(f, "FileHash: {}", self.file_hash)?;
        }
        if self.file_size != 0 {
            writeln!(f, "FileSize: {}", self.file_size)?;
        }
        if !self.nar_hash.is_empty() {
            writeln!(f, "NarHash: {}", self.nar_hash)?;
        }
        if self.nar_size != 0 {
            writeln!(f, "NarSize: {}", self.nar_size)?;
        }
        if !self.references.is_empty() {
            writeln!(f, "References: {}", self.references.join(" "))?;
        }
        if let Some(deriver) = &self.deriver {
            writeln!(f, "Deriver: {deriver}")?;
        }
        for sig in &self.sig {
            writeln!(f, "Sig: {sig}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
StorePath: /nix/store/aaa-hello-2.12
URL: nar/x.nar.xz
Compression: xz
FileHash: sha256:0123456789abcdfghijklmnpqrsvwxyz0123456789abcdfghijk
FileSize: 50088
NarHash: sha256:1111111111111111111111111111111111111111111111111111
NarSize: 226488
References: bbb-dep ccc-other
Deriver: ddd-hello-2.12.drv
Sig: cache.nixos.org-1:AAAA
Sig: backup.example.org-1:BBBB
";

    #[test]
    fn parse_full_record() {
        let info = NarInfo::parse(SAMPLE).unwrap();
        assert_eq!(info.store_path, "/nix/store/aaa-hello-2.12");
        assert_eq!(info.url, "nar/x.nar.xz");
        assert_eq!(info.compression, "xz");
        assert_eq!(info.file_size, 50088);
        assert_eq!(info.nar_size, 226488);
        assert_eq!(info.references, vec!["bbb-dep", "ccc-other"]);
        assert_eq!(info.deriver.as_deref(), Some("ddd-hello-2.12.drv"));
        assert_eq!(info.sig.len(), 2);
        assert_eq!(info.sig[0], "cache.nixos.org-1:AAAA");
    }

    #[test]
    fn parse_missing_store_path_rejected() {
        let err = NarInfo::parse("URL: nar/x.nar.xz\n").unwrap_err();
        assert!(err.to_string().contains("missing required"));
    }

    #[test]
    fn parse_missing_url_rejected() {
        assert!(NarInfo::parse("StorePath: /nix/store/aaa-hello\n").is_err());
    }

    #[test]
    fn parse_skips_comments_and_blank_lines() {
        let text = "# comment\n\nStorePath: /nix/store/aaa-x\n\nURL: nar/x.nar\n";
        let info = NarInfo::parse(text).unwrap();
        assert_eq!(info.store_path, "/nix/store/aaa-x");
    }

    #[test]
    fn parse_ignores_unknown_keys_and_colonless_lines() {
        let text = "StorePath: /nix/store/aaa-x\nURL: nar/x.nar\nFancyNewKey: 1\nnot a pair\n";
        let info = NarInfo::parse(text).unwrap();
        assert_eq!(info.url, "nar/x.nar");
    }

    #[test]
    fn lenient_numeric_fields_default_to_zero() {
        let text = "StorePath: /nix/store/aaa-x\nURL: nar/x.nar\nFileSize: oops\nNarSize: -3\n";
        let info = NarInfo::parse(text).unwrap();
        assert_eq!(info.file_size, 0);
        assert_eq!(info.nar_size, 0);
    }

    #[test]
    fn empty_references_value_yields_empty_list() {
        let text = "StorePath: /nix/store/aaa-x\nURL: nar/x.nar\nReferences:\n";
        let info = NarInfo::parse(text).unwrap();
        assert!(info.references.is_empty());
    }

    #[test]
    fn display_round_trip() {
        let info = NarInfo::parse(SAMPLE).unwrap();
        let reparsed = NarInfo::parse(&info.to_string()).unwrap();
        assert_eq!(info, reparsed);
    }

    #[test]
    fn minimal_record_round_trip() {
        let info = NarInfo {
            store_path: "/nix/store/aaa-x".to_string(),
            url: "nar/x.nar".to_string(),
            ..Default::default()
        };
        let reparsed = NarInfo::parse(&info.to_string()).unwrap();
        assert_eq!(info, reparsed);
    }
}
