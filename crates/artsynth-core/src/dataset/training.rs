//! Upload, train and publish against an image-classification service.

use std::path::Path;
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{chunk, list_dataset_files, ArtworkMetadata, DatasetError, ServiceError};

/// One image handed to [`TrainingService::upload_images`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Lifecycle state of a training iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IterationStatus {
    Training,
    Completed,
    Failed,
}

/// A training iteration as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Iteration {
    pub id: String,
    pub status: IterationStatus,
    /// Name the iteration is published under, if any.
    pub publish_name: Option<String>,
}

/// Client for a project on an image-classification training service.
///
/// Implementations are bound to a single project; every call acts on it.
pub trait TrainingService {
    /// Create a tag and return its id.
    fn create_tag(&mut self, name: &str) -> Result<String, ServiceError>;

    /// Upload a batch of images labelled with `tag_id`.
    fn upload_images(&mut self, tag_id: &str, images: &[UploadImage]) -> Result<(), ServiceError>;

    /// Start training a new iteration.
    fn train(&mut self) -> Result<Iteration, ServiceError>;

    fn iteration(&mut self, id: &str) -> Result<Iteration, ServiceError>;

    fn iterations(&mut self) -> Result<Vec<Iteration>, ServiceError>;

    fn unpublish_iteration(&mut self, id: &str) -> Result<(), ServiceError>;

    fn delete_iteration(&mut self, id: &str) -> Result<(), ServiceError>;

    /// Publish an iteration under `publish_name` on the given prediction resource.
    fn publish_iteration(
        &mut self,
        id: &str,
        publish_name: &str,
        prediction_resource_id: &str,
    ) -> Result<(), ServiceError>;
}

/// Batching, pacing and publishing settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetOptions {
    /// Images per upload call.
    pub batch_size: usize,
    /// Pause between upload batches, in milliseconds.
    pub batch_delay_ms: u64,
    /// Pause between training status polls, in milliseconds.
    pub poll_interval_ms: u64,
    /// Polls before giving up on a running iteration.
    pub max_polls: u32,
    pub publish_name: String,
    pub prediction_resource_id: String,
}

impl Default for DatasetOptions {
    fn default() -> Self {
        Self {
            batch_size: 10,
            batch_delay_ms: 1500,
            poll_interval_ms: 1500,
            max_polls: 400,
            publish_name: "testing".to_string(),
            prediction_resource_id: String::new(),
        }
    }
}

impl DatasetOptions {
    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Summary of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub tag_id: String,
    pub iteration_id: String,
    pub uploaded: usize,
    pub batches: usize,
    /// Iteration previously published under the same name, now deleted.
    pub replaced: Option<String>,
}

/// Upload every file in `output_dir` under the artwork's tag, train, and
/// publish the new iteration in place of the previous one.
pub fn publish_dataset<S: TrainingService + ?Sized>(
    service: &mut S,
    output_dir: &Path,
    metadata: &ArtworkMetadata,
    options: &DatasetOptions,
) -> Result<PublishReport, DatasetError> {
    let files = list_dataset_files(output_dir)?;
    if files.is_empty() {
        return Err(DatasetError::EmptyDataset(output_dir.to_path_buf()));
    }
    let batches = chunk(&files, options.batch_size)?;

    let tag_name = metadata.tag_name();
    let tag_id = service.create_tag(&tag_name)?;
    info!(tag = %tag_name, %tag_id, files = files.len(), "Uploading dataset");

    for (i, batch) in batches.iter().enumerate() {
        if i > 0 {
            thread::sleep(options.batch_delay());
        }

        let mut images = Vec::with_capacity(batch.len());
        for path in batch {
            let bytes = std::fs::read(path).map_err(|source| DatasetError::Io {
                path: path.clone(),
                source,
            })?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            images.push(UploadImage { file_name, bytes });
        }

        service.upload_images(&tag_id, &images)?;
        debug!(batch = i, size = images.len(), "Batch uploaded");
    }

    let iteration = wait_for_training(service, options)?;
    info!(iteration = %iteration.id, "Training completed");

    let previous = service
        .iterations()?
        .into_iter()
        .find(|it| {
            it.id != iteration.id
                && it.publish_name.as_deref() == Some(options.publish_name.as_str())
        });

    if let Some(old) = &previous {
        service.unpublish_iteration(&old.id)?;
        service.delete_iteration(&old.id)?;
        info!(iteration = %old.id, "Replaced previously published iteration");
    }

    service.publish_iteration(
        &iteration.id,
        &options.publish_name,
        &options.prediction_resource_id,
    )?;
    info!(iteration = %iteration.id, name = %options.publish_name, "Iteration published");

    Ok(PublishReport {
        tag_id,
        iteration_id: iteration.id,
        uploaded: files.len(),
        batches: batches.len(),
        replaced: previous.map(|it| it.id),
    })
}

fn wait_for_training<S: TrainingService + ?Sized>(
    service: &mut S,
    options: &DatasetOptions,
) -> Result<Iteration, DatasetError> {
    let mut iteration = service.train()?;
    let mut polls = 0;

    while iteration.status == IterationStatus::Training {
        if polls >= options.max_polls {
            return Err(DatasetError::TrainingTimeout {
                id: iteration.id,
                polls,
            });
        }
        thread::sleep(options.poll_interval());
        iteration = service.iteration(&iteration.id)?;
        polls += 1;
    }

    match iteration.status {
        IterationStatus::Failed => Err(DatasetError::TrainingFailed(iteration.id)),
        _ => Ok(iteration),
    }
}
