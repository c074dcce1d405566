//! Source bitmap decoding.
//!
//! This module provides functionality for:
//! - Decoding JPEG photographs of artworks into RGB buffers
//! - Correcting EXIF orientation so variants are generated from an upright image
//!
//! All operations are synchronous. The decoded [`DecodedImage`] is loaded once
//! per run and read by every variant.

mod jpeg;
mod types;

pub use jpeg::{decode_file, decode_jpeg};
pub use types::{DecodeError, DecodedImage, Orientation, BACKGROUND};
