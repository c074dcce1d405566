//! Combined scale + rotation about the image center.
//!
//! # Algorithm
//!
//! The output canvas has the source dimensions and starts out white. The
//! forward mapping rotates first, then scales, both about the same pivot:
//!
//! ```text
//! dst = c + s * R(θ) * (src - c)
//! ```
//!
//! With y pointing down, a positive θ turns the image clockwise on screen.
//! Each output pixel is filled by inverse mapping:
//!
//! ```text
//! src_x = ( dx * cos(θ) + dy * sin(θ)) / s + cx
//! src_y = (-dx * sin(θ) + dy * cos(θ)) / s + cy
//! ```
//!
//! where `(dx, dy)` is the output pixel center relative to `c`. Output
//! pixels whose preimage falls outside the source stay white.

use crate::decode::{DecodedImage, BACKGROUND};

use super::sample::{covers, sample_bilinear};
use super::{ensure_valid_source, AffineTransform, TransformError};

/// Apply an affine variant to an image.
///
/// Absent fields are identity on their axis. The output always has the
/// source dimensions; corners exposed by rotation or shrinkage are padded
/// with white.
///
/// # Errors
///
/// `DegenerateImage` for an empty source, `InvalidScale`/`InvalidRotation`
/// for out-of-range parameters.
pub fn apply_affine(
    image: &DecodedImage,
    transform: &AffineTransform,
) -> Result<DecodedImage, TransformError> {
    ensure_valid_source(image)?;
    transform.validate()?;

    // Fast path: no scale and a whole number of turns
    if transform.is_identity() {
        return Ok(image.clone());
    }

    let scale = transform.scale_factor();
    let angle_rad = transform.angle_degrees().to_radians();
    let cos = angle_rad.cos();
    let sin = angle_rad.sin();

    let cx = image.width as f64 / 2.0;
    let cy = image.height as f64 / 2.0;

    let mut output = DecodedImage::filled(image.width, image.height, BACKGROUND);

    for dst_y in 0..image.height {
        let dy = dst_y as f64 + 0.5 - cy;
        for dst_x in 0..image.width {
            let dx = dst_x as f64 + 0.5 - cx;

            let src_x = (dx * cos + dy * sin) / scale + cx - 0.5;
            let src_y = (-dx * sin + dy * cos) / scale + cy - 0.5;

            if covers(image.width, src_x) && covers(image.height, src_y) {
                output.put_pixel(dst_x, dst_y, sample_bilinear(image, src_x, src_y));
            }
        }
    }

    Ok(output)
}
