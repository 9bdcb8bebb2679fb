//! narlock - Nix binary cache closure resolver
//!
//! Resolves store paths against a Nix-style binary cache, unpacks NAR
//! archives, crawls transitive reference closures and records the
//! results in a reproducible `nix.lock` index.

pub mod cache;
pub mod cli;
pub mod closure;
pub mod config;
pub mod error;
pub mod lockfile;
pub mod nar;
pub mod store;

pub use error::{NarlockError, NarlockResult};
