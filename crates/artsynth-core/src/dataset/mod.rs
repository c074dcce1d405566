//! Hand-off of a generated variant set to downstream services.
//!
//! Once a run has written its files, the output directory is uploaded to an
//! image-classification training service in fixed-size batches, a training
//! iteration is started and published, and the original photograph is
//! registered in the content catalog. Concrete service clients live outside
//! this crate; they plug in through the [`TrainingService`] and
//! [`ArtworkCatalog`] traits.

mod catalog;
mod training;

pub use catalog::{register_artwork, ArtworkCatalog, ArtworkRecord};
pub use training::{
    publish_dataset, DatasetOptions, Iteration, IterationStatus, PublishReport, TrainingService,
    UploadImage,
};

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error reported by an external service client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ServiceError(pub String);

/// Errors that can occur while handing a dataset to downstream services.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Service call failed: {0}")]
    Service(#[from] ServiceError),

    #[error("No variant files found in {}", .0.display())]
    EmptyDataset(PathBuf),

    #[error("Batch size must be at least 1")]
    InvalidBatchSize,

    #[error("Training iteration {0} failed")]
    TrainingFailed(String),

    #[error("Training iteration {id} still running after {polls} polls")]
    TrainingTimeout { id: String, polls: u32 },
}

/// Free-text description of an artwork, collected alongside the photograph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtworkMetadata {
    /// Numeric identifier used in the training tag.
    pub id: u64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist_nationality: Option<String>,
}

impl ArtworkMetadata {
    /// Training tag for this artwork: `"<id>: <artist> - <title>"`.
    pub fn tag_name(&self) -> String {
        format!(
            "{}: {} - {}",
            self.id,
            self.artist_name.as_deref().unwrap_or_default(),
            self.title
        )
    }
}

/// Split `items` into consecutive groups of `size`, keeping order.
///
/// Every group is full except possibly the last one.
pub fn chunk<T: Clone>(items: &[T], size: usize) -> Result<Vec<Vec<T>>, DatasetError> {
    if size == 0 {
        return Err(DatasetError::InvalidBatchSize);
    }
    Ok(items.chunks(size).map(<[T]>::to_vec).collect())
}

/// Regular files in `dir`, sorted by path.
///
/// Hidden files are skipped, including temporary files of a write that never
/// completed.
pub fn list_dataset_files(dir: &Path) -> Result<Vec<PathBuf>, DatasetError> {
    let io_err = |source| DatasetError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if !hidden && entry.file_type().map_err(io_err)?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: chunking preserves every item in order and respects the size.
        #[test]
        fn prop_chunk_preserves_items(
            items in prop::collection::vec(any::<u16>(), 0..200),
            size in 1usize..=25,
        ) {
            let groups = chunk(&items, size).unwrap();
            let flattened: Vec<u16> = groups.iter().flatten().copied().collect();
            prop_assert_eq!(&flattened, &items);

            prop_assert_eq!(groups.len(), items.len().div_ceil(size));
            if let Some((last, full)) = groups.split_last() {
                prop_assert!(full.iter().all(|g| g.len() == size));
                prop_assert!(!last.is_empty() && last.len() <= size);
            }
        }
    }
}
