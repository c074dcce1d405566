//! One-sided keystone perspective synthesis.
//!
//! This is a two-stage raster warp, not a projective homography:
//!
//! 1. **Keystone warp**: every line parallel to the anchored edge (rows for
//!    top/bottom, columns for left/right) is squeezed independently and
//!    re-centered. The squeeze grows linearly from nothing at the anchored
//!    edge to `1 - strength` at the opposite edge, giving a trapezoid.
//! 2. **Global compression**: the trapezoid is scaled by `strength` across
//!    the warp direction (vertically for top/bottom, horizontally for
//!    left/right) about the image center, onto a fresh white canvas.
//!
//! For line `i` of `n` the slope is `i / n` (top, left) or `(n - i) / n`
//! (bottom, right), and the squeezed extent is
//!
//! ```text
//! extent = across - across * (1 - strength) * slope
//! ```
//!
//! `strength = 1` makes both stages the identity without special casing.

use crate::decode::{DecodedImage, BACKGROUND};

use super::sample::{covers, sample_bilinear};
use super::{ensure_valid_source, Edge, PerspectiveTransform, TransformError};

/// Extent retained by warped line `index` after stage 1.
///
/// For top/bottom this is the resized width of row `index`; for left/right
/// it is the resized height of column `index`.
pub fn keystone_extent(
    edge: Edge,
    width: u32,
    height: u32,
    strength_percent: u32,
    index: u32,
) -> f64 {
    let (lines, across) = if edge.warps_rows() {
        (height as f64, width as f64)
    } else {
        (width as f64, height as f64)
    };
    let i = index as f64;
    let slope = match edge {
        Edge::Top | Edge::Left => i / lines,
        Edge::Bottom | Edge::Right => (lines - i) / lines,
    };
    let strength = strength_percent as f64 / 100.0;
    let offset = across * (1.0 - strength) * slope;
    across - offset
}

/// Apply a keystone perspective variant (both stages).
///
/// # Errors
///
/// `DegenerateImage` for an empty source, `InvalidStrength` when
/// `strength_percent` is outside (0, 100].
pub fn apply_perspective(
    image: &DecodedImage,
    transform: &PerspectiveTransform,
) -> Result<DecodedImage, TransformError> {
    let warped = keystone_warp(image, transform)?;
    Ok(compress(&warped, transform.edge, transform.strength()))
}

/// Stage 1 only: squeeze and re-center every line parallel to the edge.
///
/// The result has the source dimensions. Exposed separately so the
/// trapezoid can be inspected before the global compression.
pub fn keystone_warp(
    image: &DecodedImage,
    transform: &PerspectiveTransform,
) -> Result<DecodedImage, TransformError> {
    ensure_valid_source(image)?;
    transform.validate()?;

    let PerspectiveTransform {
        edge,
        strength_percent,
    } = *transform;
    let (width, height) = (image.width, image.height);
    let mut output = DecodedImage::filled(width, height, BACKGROUND);

    if edge.warps_rows() {
        let across = width as f64;
        for y in 0..height {
            let extent = keystone_extent(edge, width, height, strength_percent, y);
            let start = (across - extent) / 2.0;
            let ratio = across / extent;
            for x in 0..width {
                let u = x as f64 + 0.5;
                if u >= start && u < start + extent {
                    let src_x = (u - start) * ratio - 0.5;
                    output.put_pixel(x, y, sample_bilinear(image, src_x, y as f64));
                }
            }
        }
    } else {
        let across = height as f64;
        for x in 0..width {
            let extent = keystone_extent(edge, width, height, strength_percent, x);
            let start = (across - extent) / 2.0;
            let ratio = across / extent;
            for y in 0..height {
                let v = y as f64 + 0.5;
                if v >= start && v < start + extent {
                    let src_y = (v - start) * ratio - 0.5;
                    output.put_pixel(x, y, sample_bilinear(image, x as f64, src_y));
                }
            }
        }
    }

    Ok(output)
}

/// Stage 2: scale by `strength` about the center along one axis.
fn compress(image: &DecodedImage, edge: Edge, strength: f64) -> DecodedImage {
    let (width, height) = (image.width, image.height);
    let cx = width as f64 / 2.0;
    let cy = height as f64 / 2.0;
    let mut output = DecodedImage::filled(width, height, BACKGROUND);

    for y in 0..height {
        for x in 0..width {
            let (src_x, src_y) = if edge.warps_rows() {
                (x as f64, cy + (y as f64 + 0.5 - cy) / strength - 0.5)
            } else {
                (cx + (x as f64 + 0.5 - cx) / strength - 0.5, y as f64)
            };

            if covers(width, src_x) && covers(height, src_y) {
                output.put_pixel(x, y, sample_bilinear(image, src_x, src_y));
            }
        }
    }

    output
}
