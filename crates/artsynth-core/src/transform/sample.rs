//! Pixel sampling shared by the affine and perspective paths.
//!
//! Coordinates are in pixel-center space: `(0.0, 0.0)` is the center of the
//! top-left pixel, so an integer coordinate reads that pixel exactly.

use crate::decode::DecodedImage;

/// True when a pixel-center coordinate falls inside a span of `len` pixels.
///
/// The covered area of pixel `i` is `[i - 0.5, i + 0.5)`.
#[inline]
pub(crate) fn covers(len: u32, coord: f64) -> bool {
    coord >= -0.5 && coord < len as f64 - 0.5
}

#[inline]
fn get_pixel_f64(image: &DecodedImage, px: u32, py: u32) -> [f64; 3] {
    let p = image.pixel(px, py);
    [p[0] as f64, p[1] as f64, p[2] as f64]
}

/// Sample a pixel using bilinear interpolation, clamping to the border.
///
/// Callers decide coverage with [`covers`] first; this only interpolates.
pub(crate) fn sample_bilinear(image: &DecodedImage, x: f64, y: f64) -> [u8; 3] {
    let max_x = (image.width - 1) as f64;
    let max_y = (image.height - 1) as f64;
    let x = x.clamp(0.0, max_x);
    let y = y.clamp(0.0, max_y);

    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    let x1 = (x0 + 1).min(image.width - 1);
    let y1 = (y0 + 1).min(image.height - 1);

    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = get_pixel_f64(image, x0, y0);
    let p10 = get_pixel_f64(image, x1, y0);
    let p01 = get_pixel_f64(image, x0, y1);
    let p11 = get_pixel_f64(image, x1, y1);

    let mut result = [0u8; 3];
    for i in 0..3 {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }

    result
}
