//! Transform engine: derives one variant bitmap from the source.
//!
//! Two mutually exclusive families are supported:
//! - **Affine**: uniform scale and clockwise rotation about the image center
//! - **Perspective**: a one-sided keystone warp followed by a global
//!   compression, approximating an oblique viewing angle
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner, y grows downward
//! - Positive rotation angles turn the image clockwise on screen
//! - Every output has the source dimensions; exposed areas are white
//!
//! The source is never mutated; each call allocates a new [`DecodedImage`].

mod affine;
mod descriptor;
mod perspective;
mod sample;

pub use affine::apply_affine;
pub use descriptor::{AffineTransform, Edge, PerspectiveTransform, TransformDescriptor};
pub use perspective::{apply_perspective, keystone_extent, keystone_warp};

use thiserror::Error;
use tracing::debug;

use crate::decode::DecodedImage;

/// Errors raised before any pixel of a variant is produced.
#[derive(Debug, Error, PartialEq)]
pub enum TransformError {
    /// The source has no pixels to transform.
    #[error("Degenerate source image: {width}x{height}")]
    DegenerateImage { width: u32, height: u32 },

    /// The pixel buffer does not hold `width * height` RGB triples.
    #[error("Pixel buffer of {actual} bytes does not match {width}x{height} RGB")]
    BufferSizeMismatch {
        width: u32,
        height: u32,
        actual: usize,
    },

    /// Perspective strength outside (0, 100].
    #[error("Invalid perspective strength {0}: must be in 1..=100")]
    InvalidStrength(u32),

    /// Scale outside (0, 100] or not finite.
    #[error("Invalid scale {0}: must be in (0, 100]")]
    InvalidScale(f64),

    /// Rotation is not a finite number.
    #[error("Invalid rotation {0}: must be finite")]
    InvalidRotation(f64),
}

/// Apply a transform descriptor to a source image.
///
/// # Errors
///
/// See [`TransformError`]. Errors are specific to one variant; callers
/// generating a whole grid should record them and move on.
pub fn apply_transform(
    image: &DecodedImage,
    descriptor: &TransformDescriptor,
) -> Result<DecodedImage, TransformError> {
    debug!(
        width = image.width,
        height = image.height,
        ?descriptor,
        "Applying transform"
    );
    match descriptor {
        TransformDescriptor::Affine(t) => apply_affine(image, t),
        TransformDescriptor::Perspective(t) => apply_perspective(image, t),
    }
}

pub(crate) fn ensure_valid_source(image: &DecodedImage) -> Result<(), TransformError> {
    if image.is_empty() {
        return Err(TransformError::DegenerateImage {
            width: image.width,
            height: image.height,
        });
    }
    if !image.has_consistent_buffer() {
        return Err(TransformError::BufferSizeMismatch {
            width: image.width,
            height: image.height,
            actual: image.pixels.len(),
        });
    }
    Ok(())
}
