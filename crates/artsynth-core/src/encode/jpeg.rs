//! JPEG encoding for generated variants.
//!
//! Uses the `image` crate's baseline encoder. It writes every component
//! with 1x1 sampling factors, i.e. 4:4:4 with no chroma subsampling, which
//! keeps the fine edges the recognizer is trained on.

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;
use thiserror::Error;

use crate::decode::DecodedImage;

/// Errors that can occur during JPEG encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// JPEG encoding failed
    #[error("JPEG encoding failed: {0}")]
    EncodingFailed(String),
}

/// Encode RGB pixel data to JPEG bytes.
///
/// `quality` is clamped to 1..=100.
///
/// # Errors
///
/// Fails when the buffer length doesn't match `width * height * 3`, when a
/// dimension is zero, or when the encoder itself fails.
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected_len = (width as usize) * (height as usize) * 3;
    if pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: pixels.len(),
        });
    }

    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100))
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

/// Encode a decoded bitmap to JPEG bytes.
pub fn encode_image(image: &DecodedImage, quality: u8) -> Result<Vec<u8>, EncodeError> {
    encode_jpeg(&image.pixels, image.width, image.height, quality)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Sampling factor byte of every component in the SOF0 header.
    pub(crate) fn sof_sampling_factors(jpeg: &[u8]) -> Vec<u8> {
        let mut pos = 2;
        while pos + 4 <= jpeg.len() {
            assert_eq!(jpeg[pos], 0xFF, "expected marker at {pos}");
            let marker = jpeg[pos + 1];
            let len = u16::from_be_bytes([jpeg[pos + 2], jpeg[pos + 3]]) as usize;
            if marker == 0xC0 {
                let seg = &jpeg[pos + 4..pos + 2 + len];
                let components = seg[5] as usize;
                return (0..components).map(|c| seg[6 + c * 3 + 1]).collect();
            }
            pos += 2 + len;
        }
        panic!("no SOF0 segment found");
    }

    #[test]
    fn test_encode_jpeg_markers() {
        let jpeg = encode_jpeg(&vec![128u8; 64 * 48 * 3], 64, 48, 90).unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
        assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_chroma_is_not_subsampled() {
        let pixels: Vec<u8> = (0..32 * 32 * 3).map(|i| (i * 7 % 256) as u8).collect();
        let jpeg = encode_jpeg(&pixels, 32, 32, 90).unwrap();
        assert_eq!(sof_sampling_factors(&jpeg), vec![0x11, 0x11, 0x11]);
    }

    #[test]
    fn test_encode_image_matches_raw_encoding() {
        let img = DecodedImage::filled(10, 6, [10, 200, 30]);
        assert_eq!(
            encode_image(&img, 90).unwrap(),
            encode_jpeg(&img.pixels, 10, 6, 90).unwrap()
        );
    }

    #[test]
    fn test_quality_is_clamped() {
        let pixels = vec![128u8; 10 * 10 * 3];
        assert!(encode_jpeg(&pixels, 10, 10, 0).is_ok());
        assert!(encode_jpeg(&pixels, 10, 10, 255).is_ok());
    }

    #[test]
    fn test_invalid_pixel_data() {
        let result = encode_jpeg(&vec![128u8; 99 * 100 * 3], 100, 100, 90);
        assert!(matches!(result, Err(EncodeError::InvalidPixelData { .. })));
    }

    #[test]
    fn test_zero_dimensions() {
        assert!(matches!(
            encode_jpeg(&[], 0, 100, 90),
            Err(EncodeError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            encode_image(&DecodedImage::new(5, 0, vec![]), 90),
            Err(EncodeError::InvalidDimensions { .. })
        ));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: valid input always yields a complete JPEG stream.
        #[test]
        fn prop_valid_input_produces_valid_jpeg(
            width in 1u32..=40,
            height in 1u32..=40,
            quality in 1u8..=100,
            fill in any::<u8>(),
        ) {
            let pixels = vec![fill; (width * height * 3) as usize];
            let jpeg = encode_jpeg(&pixels, width, height, quality).unwrap();
            prop_assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
            prop_assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);
        }

        /// Property: same input always produces the same bytes.
        #[test]
        fn prop_deterministic_output(
            width in 1u32..=20,
            height in 1u32..=20,
            quality in 1u8..=100,
        ) {
            let pixels: Vec<u8> = (0..(width * height * 3) as usize).map(|i| (i % 251) as u8).collect();
            prop_assert_eq!(
                encode_jpeg(&pixels, width, height, quality).unwrap(),
                encode_jpeg(&pixels, width, height, quality).unwrap()
            );
        }
    }
}
