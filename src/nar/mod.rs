//! NAR (Nix ARchive) format support
//!
//! NAR is Nix's deterministic container format: a file, directory or
//! symlink tree serialized as nested length-prefixed tokens. This
//! module decodes a NAR byte stream onto disk; the write path is not
//! implemented.

pub mod decompress;
pub mod reader;
pub mod unpack;

pub use decompress::decompress;
pub use reader::TokenReader;
pub use unpack::{unpack_nar, UnpackOptions, NAR_MAGIC};

/// Builders for synthetic NAR streams used across the decoder tests.
#[cfg(test)]
pub(crate) mod testutil {
    use super::NAR_MAGIC;

    /// One length-prefixed token: 8-byte LE length, data, zero padding
    /// to the next 8-byte boundary.
    pub fn token_bytes(data: &[u8]) -> Vec<u8> {
        let mut out = (data.len() as u64).to_le_bytes().to_vec();
        out.extend_from_slice(data);
        let pad = (8 - (data.len() % 8)) % 8;
        out.extend(std::iter::repeat_n(0u8, pad));
        out
    }

    /// Concatenate string tokens.
    pub fn tokens(parts: &[&str]) -> Vec<u8> {
        parts
            .iter()
            .flat_map(|p| token_bytes(p.as_bytes()))
            .collect()
    }

    /// A serialized regular-file entry.
    pub fn regular(contents: &[u8], executable: bool) -> Vec<u8> {
        let mut out = tokens(&["(", "type", "regular"]);
        if executable {
            out.extend(tokens(&["executable", ""]));
        }
        out.extend(token_bytes(b"contents"));
        out.extend(token_bytes(contents));
        out.extend(token_bytes(b")"));
        out
    }

    /// A serialized directory entry with named children.
    pub fn directory(entries: &[(&str, Vec<u8>)]) -> Vec<u8> {
        let mut out = tokens(&["(", "type", "directory"]);
        for (name, node) in entries {
            out.extend(tokens(&["entry", "(", "name", name, "node"]));
            out.extend_from_slice(node);
            out.extend(token_bytes(b")"));
        }
        out.extend(token_bytes(b")"));
        out
    }

    /// A serialized symlink entry.
    pub fn symlink(target: &str) -> Vec<u8> {
        tokens(&["(", "type", "symlink", "target", target, ")"])
    }

    /// A complete NAR stream: magic plus one root entry.
    pub fn nar_stream(root: &[u8]) -> Vec<u8> {
        let mut out = token_bytes(NAR_MAGIC.as_bytes());
        out.extend_from_slice(root);
        out
    }
}
