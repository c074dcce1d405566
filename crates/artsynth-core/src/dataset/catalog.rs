//! Registration of the source photograph in the content catalog.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{ArtworkMetadata, DatasetError, ServiceError};

/// Catalog entry created for an artwork.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtworkRecord {
    #[serde(flatten)]
    pub metadata: ArtworkMetadata,
    pub status: String,
    /// Id of the uploaded photograph.
    pub image: String,
}

/// Client for the content catalog that displays recognised artworks.
pub trait ArtworkCatalog {
    /// Store a file and return its id.
    fn upload_file(&mut self, file_name: &str, bytes: &[u8]) -> Result<String, ServiceError>;

    /// Create an artwork entry and return its id.
    fn create_artwork(&mut self, record: &ArtworkRecord) -> Result<String, ServiceError>;
}

/// Upload the photograph at `source_path` and create a published record for it.
///
/// Returns the id of the new catalog entry.
pub fn register_artwork<C: ArtworkCatalog + ?Sized>(
    catalog: &mut C,
    source_path: &Path,
    metadata: &ArtworkMetadata,
) -> Result<String, DatasetError> {
    let bytes = std::fs::read(source_path).map_err(|source| DatasetError::Io {
        path: source_path.to_path_buf(),
        source,
    })?;
    let file_name = source_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let image = catalog.upload_file(&file_name, &bytes)?;
    let record = ArtworkRecord {
        metadata: metadata.clone(),
        status: "published".to_string(),
        image,
    };
    let id = catalog.create_artwork(&record)?;

    info!(artwork = %id, file = %file_name, "Artwork registered");
    Ok(id)
}
