//! Persisting variants as JPEG files.
//!
//! A write is complete only when the bytes are on disk. Each file is written
//! and `sync_all`ed under a hidden temporary name in the destination
//! directory, then renamed onto its variant name. A failed write removes the
//! temporary file, so a variant name only ever refers to a complete JPEG.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use super::{encode_image, EncodeError};
use crate::decode::DecodedImage;
use crate::naming::variant_path;

/// JPEG quality used for every generated variant.
pub const VARIANT_JPEG_QUALITY: u8 = 90;

/// Errors that can occur while writing a variant to disk.
#[derive(Debug, Error)]
pub enum WriteError {
    /// The bitmap could not be encoded.
    #[error("Failed to encode {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: EncodeError,
    },

    /// The destination could not be created or written.
    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl WriteError {
    /// Destination path the failed write was aimed at.
    pub fn path(&self) -> &Path {
        match self {
            WriteError::Encode { path, .. } | WriteError::Io { path, .. } => path,
        }
    }
}

/// Encode `image` and write it next to `base_path` with `suffix` appended.
///
/// With an empty suffix the file is written to `base_path` itself.
/// Returns the path that was written.
pub fn write_variant(
    image: &DecodedImage,
    base_path: &Path,
    suffix: &str,
) -> Result<PathBuf, WriteError> {
    let path = variant_path(base_path, suffix);
    write_jpeg(image, &path, VARIANT_JPEG_QUALITY)?;
    Ok(path)
}

/// Encode `image` at `quality` and persist it to `path`, synced to disk.
pub fn write_jpeg(image: &DecodedImage, path: &Path, quality: u8) -> Result<(), WriteError> {
    let bytes = encode_image(image, quality).map_err(|source| WriteError::Encode {
        path: path.to_path_buf(),
        source,
    })?;

    persist_synced(path, |file| file.write_all(&bytes)).map_err(|source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), bytes = bytes.len(), "Wrote JPEG");
    Ok(())
}

/// Run `write` against a temporary file beside `path`, sync it, and rename
/// it onto `path`. On error nothing is left behind and `path` is untouched.
fn persist_synced<F>(path: &Path, write: F) -> io::Result<()>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut builder = tempfile::Builder::new();
    builder.prefix(".artsynth-").suffix(".part");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o644));
    }

    let mut tmp = builder.tempfile_in(dir)?;
    write(tmp.as_file_mut())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
