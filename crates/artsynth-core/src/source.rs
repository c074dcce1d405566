//! Loading the source photograph from the configured input directory.

use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

use crate::config::Config;
use crate::decode::{decode_jpeg, DecodeError, DecodedImage};

/// Errors that prevent a source image from being loaded.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Invalid source file name {0:?}: must be a plain file name")]
    InvalidFileName(String),

    #[error("Unsupported file extension for {file_name:?} (supported: {})", .supported.join(", "))]
    UnsupportedExtension {
        file_name: String,
        supported: Vec<String>,
    },

    #[error("Source image not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },
}

/// A decoded source photograph.
#[derive(Debug, Clone)]
pub struct SourceImage {
    /// Name of the file inside the input directory.
    pub file_name: String,
    pub path: PathBuf,
    /// Bitmap with EXIF orientation applied.
    pub image: DecodedImage,
}

/// Load `file_name` from `config.input_dir`.
///
/// The extension is checked against the allow-list before the file is
/// looked up.
pub fn load_source(config: &Config, file_name: &str) -> Result<SourceImage, SourceError> {
    let name = std::path::Path::new(file_name);
    if file_name.is_empty() || name.file_name() != Some(name.as_os_str()) {
        return Err(SourceError::InvalidFileName(file_name.to_string()));
    }
    if !config.is_supported_extension(file_name) {
        return Err(SourceError::UnsupportedExtension {
            file_name: file_name.to_string(),
            supported: config.supported_extensions.clone(),
        });
    }

    let path = config.input_dir.join(file_name);
    if !path.exists() {
        return Err(SourceError::NotFound(path));
    }

    let bytes = std::fs::read(&path).map_err(|source| SourceError::Io {
        path: path.clone(),
        source,
    })?;
    let image = decode_jpeg(&bytes).map_err(|source| SourceError::Decode {
        path: path.clone(),
        source,
    })?;

    info!(
        file = %file_name,
        width = image.width,
        height = image.height,
        "Source image loaded"
    );

    Ok(SourceImage {
        file_name: file_name.to_string(),
        path,
        image,
    })
}
