//! Variant orchestration: one source image in, one JPEG per grid entry out.
//!
//! Every grid entry runs transform → name → write in order. A failing entry
//! is logged and recorded in the [`RunReport`] and the run moves on; only
//! precondition failures (unusable output directory or base filename) abort
//! the whole run. Writes are synchronous and synced, so by the time
//! [`run_variants`] returns every reported file is complete on disk.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::decode::DecodedImage;
use crate::encode::write_variant;
use crate::grid::ParameterGrid;
use crate::naming::variant_suffix;
use crate::transform::{apply_transform, TransformDescriptor};

/// Errors that abort a run before any variant is produced.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Output directory does not exist: {}", .0.display())]
    OutputDirMissing(PathBuf),

    #[error("Output path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Invalid base filename {0:?}: must be a plain file name")]
    InvalidBaseFilename(String),
}

/// Step of a variant that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Transform,
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Transform => f.write_str("transform"),
            Stage::Write => f.write_str("write"),
        }
    }
}

/// A grid entry that produced no file.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantFailure {
    /// Zero-based position in the grid.
    pub index: usize,
    pub descriptor: TransformDescriptor,
    pub suffix: String,
    pub stage: Stage,
    pub message: String,
}

/// Outcome of a full run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    /// Files written, in grid order.
    pub written: Vec<PathBuf>,
    /// Entries that failed, in grid order.
    pub failures: Vec<VariantFailure>,
}

impl RunReport {
    /// Number of grid entries attempted.
    pub fn total(&self) -> usize {
        self.written.len() + self.failures.len()
    }

    /// True when every entry produced a file.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Generate the standard grid of variants for `source`.
///
/// Files are written to `output_dir` as `<stem>-<suffix>.<ext>` derived from
/// `base_filename`.
pub fn run_variants(
    source: &DecodedImage,
    output_dir: &Path,
    base_filename: &str,
) -> Result<RunReport, RunError> {
    run_grid(source, output_dir, base_filename, &ParameterGrid::standard())
}

/// Generate every variant of an explicit grid.
pub fn run_grid(
    source: &DecodedImage,
    output_dir: &Path,
    base_filename: &str,
    grid: &ParameterGrid,
) -> Result<RunReport, RunError> {
    check_output_dir(output_dir)?;
    let base_path = output_dir.join(checked_file_name(base_filename)?);

    let mut report = RunReport::default();

    for (index, descriptor) in grid.entries().into_iter().enumerate() {
        let suffix = variant_suffix(&descriptor);

        let variant = match apply_transform(source, &descriptor) {
            Ok(variant) => variant,
            Err(e) => {
                warn!(index, %suffix, stage = %Stage::Transform, error = %e, "Variant failed");
                report.failures.push(VariantFailure {
                    index,
                    descriptor,
                    suffix,
                    stage: Stage::Transform,
                    message: e.to_string(),
                });
                continue;
            }
        };

        match write_variant(&variant, &base_path, &suffix) {
            Ok(path) => {
                info!(index, %suffix, path = %path.display(), "Variant written");
                report.written.push(path);
            }
            Err(e) => {
                warn!(index, %suffix, stage = %Stage::Write, error = %e, "Variant failed");
                report.failures.push(VariantFailure {
                    index,
                    descriptor,
                    suffix,
                    stage: Stage::Write,
                    message: e.to_string(),
                });
            }
        }
    }

    info!(
        written = report.written.len(),
        failed = report.failures.len(),
        output_dir = %output_dir.display(),
        "Variant run finished"
    );
    Ok(report)
}

fn check_output_dir(output_dir: &Path) -> Result<(), RunError> {
    if !output_dir.exists() {
        return Err(RunError::OutputDirMissing(output_dir.to_path_buf()));
    }
    if !output_dir.is_dir() {
        return Err(RunError::NotADirectory(output_dir.to_path_buf()));
    }
    Ok(())
}

fn checked_file_name(base_filename: &str) -> Result<&Path, RunError> {
    let path = Path::new(base_filename);
    match path.file_name() {
        Some(name) if name == path.as_os_str() => Ok(path),
        _ => Err(RunError::InvalidBaseFilename(base_filename.to_string())),
    }
}
