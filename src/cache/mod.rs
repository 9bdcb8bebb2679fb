//! Binary cache protocol support
//!
//! A Nix-style binary cache serves two document kinds over HTTP:
//! `<hash>.narinfo` metadata records and the NAR archives they point
//! at. This module covers the metadata side: the HTTP client, the
//! narinfo text format, and the base32 digest codec. Archive decoding
//! lives in [`crate::nar`].

pub mod client;
pub mod hash;
pub mod narinfo;

pub use client::{CacheClient, NarInfoSource, DEFAULT_CACHE_URL};
pub use hash::{decode_nix_base32, encode_nix_base32, nix_hash_to_hex};
pub use narinfo::NarInfo;
