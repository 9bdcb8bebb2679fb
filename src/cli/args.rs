//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// narlock - Nix binary cache closure resolver
///
/// Resolves store paths against a binary cache, unpacks NAR archives
/// and records the results in a reproducible lockfile.
#[derive(Parser, Debug)]
#[command(name = "narlock")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "NARLOCK_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a store path's closure into the lockfile
    Resolve(ResolveArgs),

    /// Check whether a store path is published in the cache
    Check(CheckArgs),

    /// Download and unpack a store path from the cache
    Fetch(FetchArgs),

    /// Unpack a local NAR archive
    Unpack(UnpackArgs),

    /// Show lockfile contents
    Show(ShowArgs),
}

/// Arguments for the resolve command
#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// Store path or basename to resolve (e.g. /nix/store/abc-hello)
    pub store_path: String,

    /// Record a build entry under this label
    #[arg(short, long)]
    pub label: Option<String>,

    /// Build definition file hashed into the build entry
    #[arg(long, requires = "label")]
    pub drv: Option<PathBuf>,

    /// Declared dependency label (repeatable)
    #[arg(long = "dep", requires = "label")]
    pub deps: Vec<String>,

    /// Executable sub-path inside the output
    #[arg(long, requires = "label")]
    pub executable: Option<String>,

    /// Exported environment variable, KEY=VALUE (repeatable)
    #[arg(long = "env", requires = "label")]
    pub env: Vec<String>,

    /// Lockfile path (overrides config)
    #[arg(long)]
    pub lockfile: Option<PathBuf>,

    /// Cache root URL (overrides config)
    #[arg(long)]
    pub cache_url: Option<String>,
}

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Store path or basename to probe
    pub store_path: String,

    /// Cache root URL (overrides config)
    #[arg(long)]
    pub cache_url: Option<String>,
}

/// Arguments for the fetch command
#[derive(Parser, Debug)]
pub struct FetchArgs {
    /// Store path or basename to download
    pub store_path: String,

    /// Destination directory
    pub dest: PathBuf,

    /// Lossless extraction: keep all symlinks, fail on collisions
    #[arg(long)]
    pub strict: bool,

    /// Cache root URL (overrides config)
    #[arg(long)]
    pub cache_url: Option<String>,
}

/// Arguments for the unpack command
#[derive(Parser, Debug)]
pub struct UnpackArgs {
    /// NAR archive file to unpack
    pub archive: PathBuf,

    /// Destination directory
    pub dest: PathBuf,

    /// Compression of the archive (none, xz, zstd, gzip, bzip2)
    #[arg(long, default_value = "none")]
    pub compression: String,

    /// Lossless extraction: keep all symlinks, fail on collisions
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the show command
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Lockfile path (overrides config)
    #[arg(long)]
    pub lockfile: Option<PathBuf>,

    /// Emit the raw lockfile JSON
    #[arg(long)]
    pub json: bool,
}
