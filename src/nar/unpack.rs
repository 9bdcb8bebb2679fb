//! NAR archive extraction
//!
//! A NAR stream is the magic token `nix-archive-1` followed by one
//! recursively nested entry: a regular file, a directory of named
//! entries, or a symlink. Extraction writes the tree under a
//! destination root. There is no rollback; a failed decode leaves
//! whatever was already written.

use crate::error::{NarlockError, NarlockResult};
use crate::nar::reader::TokenReader;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// First token of every NAR stream.
pub const NAR_MAGIC: &str = "nix-archive-1";

/// Extraction policies.
///
/// The defaults reproduce the behavior the build sandbox expects:
/// symlinks that would dangle are dropped (they resolve through
/// runtime mounts instead), and a single-file archive extracted over a
/// pre-created directory lands at `<dir>/content`. [`strict`] turns
/// both off for lossless extraction.
///
/// [`strict`]: UnpackOptions::strict
#[derive(Debug, Clone)]
pub struct UnpackOptions {
    /// Store namespace prefix; absolute symlink targets under it are
    /// never materialized (they are expected to be mounted at runtime).
    pub store_prefix: String,
    /// Skip symlinks whose target does not exist at extraction time
    /// instead of creating a dangling link.
    pub skip_dangling_symlinks: bool,
    /// When the destination of a regular file already exists as a
    /// directory, write the file as `<dest>/content` instead of
    /// failing.
    pub file_into_existing_dir: bool,
}

impl Default for UnpackOptions {
    fn default() -> Self {
        Self {
            store_prefix: crate::store::DEFAULT_STORE_PREFIX.to_string(),
            skip_dangling_symlinks: true,
            file_into_existing_dir: true,
        }
    }
}

impl UnpackOptions {
    /// Lossless extraction: every symlink is created as archived and
    /// destination collisions are errors.
    pub fn strict() -> Self {
        Self {
            store_prefix: crate::store::DEFAULT_STORE_PREFIX.to_string(),
            skip_dangling_symlinks: false,
            file_into_existing_dir: false,
        }
    }
}

/// Extract a decompressed NAR stream into `dest`.
pub fn unpack_nar<R: Read>(reader: R, dest: &Path, opts: &UnpackOptions) -> NarlockResult<()> {
    let mut tokens = TokenReader::new(reader);

    let magic = tokens.read_token()?;
    if magic != NAR_MAGIC {
        return Err(NarlockError::NarMagic(magic));
    }

    extract_entry(&mut tokens, dest, opts)
}

/// Decode one entry rooted at `dest`. Entries nest through the
/// directory case, all sharing the one stream cursor.
fn extract_entry<R: Read>(
    tokens: &mut TokenReader<R>,
    dest: &Path,
    opts: &UnpackOptions,
) -> NarlockResult<()> {
    tokens.expect_token("(")?;
    tokens.expect_token("type")?;

    let kind = tokens.read_token()?;
    match kind.as_str() {
        "regular" => extract_regular(tokens, dest, opts),
        "directory" => extract_directory(tokens, dest, opts),
        "symlink" => extract_symlink(tokens, dest, opts),
        other => Err(NarlockError::NarEntryType(other.to_string())),
    }
}

fn extract_regular<R: Read>(
    tokens: &mut TokenReader<R>,
    dest: &Path,
    opts: &UnpackOptions,
) -> NarlockResult<()> {
    let mut executable = false;
    let mut written_to: Option<PathBuf> = None;

    loop {
        let token = tokens.read_token()?;
        match token.as_str() {
            ")" => break,
            "executable" => {
                // Marker attribute; its value is the empty token
                tokens.expect_token("")?;
                executable = true;
            }
            "contents" => {
                let path = resolve_file_dest(dest, opts)?;
                let mut file = fs::File::create(&path)
                    .map_err(|e| NarlockError::io(format!("creating {}", path.display()), e))?;
                let len = tokens.copy_payload(&mut file)?;
                debug!("wrote {} ({len} bytes)", path.display());
                written_to = Some(path);
            }
            // An unknown attribute would desynchronize the stream
            found => {
                return Err(NarlockError::NarToken {
                    expected: "\"executable\", \"contents\" or \")\"".to_string(),
                    found: found.to_string(),
                })
            }
        }
    }

    // A regular entry without a contents token is an empty file
    let path = match written_to {
        Some(path) => path,
        None => {
            let path = resolve_file_dest(dest, opts)?;
            fs::write(&path, b"")
                .map_err(|e| NarlockError::io(format!("creating {}", path.display()), e))?;
            path
        }
    };

    set_file_mode(&path, executable)
}

/// Pick the on-disk destination for a regular file, applying the
/// existing-directory policy.
fn resolve_file_dest(dest: &Path, opts: &UnpackOptions) -> NarlockResult<PathBuf> {
    if dest.is_dir() {
        if opts.file_into_existing_dir {
            // Single-file archive extracted into a pre-created
            // directory container
            return Ok(dest.join("content"));
        }
        return Err(NarlockError::NarDestIsDirectory(dest.to_path_buf()));
    }
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| NarlockError::io(format!("creating {}", parent.display()), e))?;
    }
    Ok(dest.to_path_buf())
}

#[cfg(unix)]
fn set_file_mode(path: &Path, executable: bool) -> NarlockResult<()> {
    use std::os::unix::fs::PermissionsExt;
    let mode = if executable { 0o755 } else { 0o644 };
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
        .map_err(|e| NarlockError::io(format!("setting permissions on {}", path.display()), e))
}

#[cfg(not(unix))]
fn set_file_mode(_path: &Path, _executable: bool) -> NarlockResult<()> {
    Ok(())
}

fn extract_directory<R: Read>(
    tokens: &mut TokenReader<R>,
    dest: &Path,
    opts: &UnpackOptions,
) -> NarlockResult<()> {
    fs::create_dir_all(dest)
        .map_err(|e| NarlockError::io(format!("creating {}", dest.display()), e))?;

    loop {
        let token = tokens.read_token()?;
        match token.as_str() {
            ")" => break,
            "entry" => {
                tokens.expect_token("(")?;
                tokens.expect_token("name")?;
                let name = tokens.read_token()?;
                validate_entry_name(&name)?;
                tokens.expect_token("node")?;
                extract_entry(tokens, &dest.join(&name), opts)?;
                tokens.expect_token(")")?;
            }
            found => {
                return Err(NarlockError::NarToken {
                    expected: "\"entry\" or \")\"".to_string(),
                    found: found.to_string(),
                })
            }
        }
    }

    Ok(())
}

/// Reject names that would escape or corrupt the destination tree.
fn validate_entry_name(name: &str) -> NarlockResult<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains('/') || name.contains('\0') {
        return Err(NarlockError::NarEntryName(name.to_string()));
    }
    Ok(())
}

fn extract_symlink<R: Read>(
    tokens: &mut TokenReader<R>,
    dest: &Path,
    opts: &UnpackOptions,
) -> NarlockResult<()> {
    let mut target = String::new();

    loop {
        let token = tokens.read_token()?;
        match token.as_str() {
            ")" => break,
            "target" => target = tokens.read_token()?,
            // Other attributes are consumed and ignored
            _ => {}
        }
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| NarlockError::io(format!("creating {}", parent.display()), e))?;
    }

    if opts.skip_dangling_symlinks {
        // Absolute links into the store namespace resolve through
        // runtime mounts; materializing them here would dangle.
        if target.starts_with(&opts.store_prefix) {
            debug!("skipping store symlink {} -> {target}", dest.display());
            return Ok(());
        }

        // Relative links are only created when the target already
        // exists, so downstream tree validation never sees a dangling
        // link. Intentionally lossy.
        let resolved = if Path::new(&target).is_absolute() {
            PathBuf::from(&target)
        } else {
            dest.parent().unwrap_or(Path::new(".")).join(&target)
        };
        if !resolved.exists() {
            warn!(
                "skipping dangling symlink {} -> {target}",
                dest.display()
            );
            return Ok(());
        }
    }

    make_symlink(&target, dest)
}

#[cfg(unix)]
fn make_symlink(target: &str, dest: &Path) -> NarlockResult<()> {
    std::os::unix::fs::symlink(target, dest)
        .map_err(|e| NarlockError::io(format!("creating symlink {}", dest.display()), e))
}

#[cfg(not(unix))]
fn make_symlink(_target: &str, dest: &Path) -> NarlockResult<()> {
    Err(NarlockError::io(
        format!("creating symlink {}", dest.display()),
        std::io::Error::new(std::io::ErrorKind::Unsupported, "symlinks not supported"),
    ))
}
