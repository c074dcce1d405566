//! JPEG decoding with EXIF orientation handling.
//!
//! Artwork photographs usually come straight off a phone, so the pixel data
//! is rotated according to the EXIF orientation tag before any variant is
//! generated from it.

use std::io::Cursor;
use std::path::Path;

use exif::{In, Reader, Tag};
use image::DynamicImage;
use image::ImageReader;

use super::{DecodeError, DecodedImage, Orientation};

/// Decode a JPEG image from bytes, applying EXIF orientation correction.
///
/// # Errors
///
/// Returns `DecodeError::CorruptedFile` if the bytes cannot be decoded.
pub fn decode_jpeg(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let orientation = extract_orientation(bytes);
    let img = decode_dynamic(bytes)?;
    let rgb_img = apply_orientation(img, orientation).into_rgb8();
    Ok(DecodedImage::from_rgb_image(rgb_img))
}

/// Read and decode an image file from disk (orientation applied).
pub fn decode_file(path: &Path) -> Result<DecodedImage, DecodeError> {
    let bytes = std::fs::read(path).map_err(|e| DecodeError::IoError(e.to_string()))?;
    decode_jpeg(&bytes)
}

fn decode_dynamic(bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))
}

/// `Orientation::Normal` when there is no EXIF block or no orientation tag.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    let Ok(exif) = Reader::new().read_from_container(&mut cursor) else {
        return Orientation::Normal;
    };

    exif.get_field(Tag::Orientation, In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
        .map(Orientation::from)
        .unwrap_or_default()
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode_jpeg;

    fn sample_jpeg(width: u32, height: u32) -> Vec<u8> {
        let pixels = vec![200u8; (width * height * 3) as usize];
        encode_jpeg(&pixels, width, height, 90).unwrap()
    }

    #[test]
    fn test_decode_valid_jpeg() {
        let img = decode_jpeg(&sample_jpeg(12, 7)).unwrap();
        assert_eq!(img.width, 12);
        assert_eq!(img.height, 7);
        assert_eq!(img.pixels.len(), 12 * 7 * 3);
    }

    #[test]
    fn test_decode_invalid_bytes() {
        match decode_jpeg(&[0x00, 0x01, 0x02, 0x03]) {
            Err(DecodeError::CorruptedFile(_)) => {}
            other => panic!("Expected CorruptedFile error, got: {:?}", other),
        }
    }

    #[test]
    fn test_decode_truncated_jpeg() {
        let bytes = sample_jpeg(16, 16);
        assert!(decode_jpeg(&bytes[..20]).is_err());
        assert!(decode_jpeg(&[]).is_err());
    }

    #[test]
    fn test_orientation_without_exif() {
        assert_eq!(extract_orientation(&sample_jpeg(4, 4)), Orientation::Normal);
        assert_eq!(extract_orientation(&[0x00, 0x01]), Orientation::Normal);
    }

    #[test]
    fn test_decode_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let result = decode_file(&dir.path().join("missing.jpg"));
        assert!(matches!(result, Err(DecodeError::IoError(_))));
    }

    #[test]
    fn test_apply_orientation_rotate90_swaps_dimensions() {
        let rgb_img = image::RgbImage::from_raw(2, 1, vec![255, 0, 0, 0, 255, 0]).unwrap();
        let rotated = apply_orientation(DynamicImage::ImageRgb8(rgb_img), Orientation::Rotate90CW);
        assert_eq!(rotated.into_rgb8().dimensions(), (1, 2));
    }

    #[test]
    fn test_apply_orientation_flip_horizontal() {
        let rgb_img = image::RgbImage::from_raw(2, 1, vec![255, 0, 0, 0, 255, 0]).unwrap();
        let flipped = apply_orientation(
            DynamicImage::ImageRgb8(rgb_img),
            Orientation::FlipHorizontal,
        )
        .into_rgb8();
        assert_eq!(flipped.get_pixel(0, 0).0, [0, 255, 0]);
        assert_eq!(flipped.get_pixel(1, 0).0, [255, 0, 0]);
    }
}
