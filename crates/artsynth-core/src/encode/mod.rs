//! Variant output: JPEG encoding and persistence.
//!
//! This module provides functionality for:
//! - Encoding RGB bitmaps to JPEG with no chroma subsampling
//! - Writing a variant under its derived filename, synced to disk
//!
//! # Examples
//!
//! ```ignore
//! use artsynth_core::encode::write_variant;
//!
//! let path = write_variant(&image, Path::new("out/art.jpg"), "scale-90")?;
//! assert_eq!(path, Path::new("out/art-scale-90.jpg"));
//! ```

mod jpeg;
mod writer;

pub use jpeg::{encode_image, encode_jpeg, EncodeError};
pub use writer::{write_jpeg, write_variant, WriteError, VARIANT_JPEG_QUALITY};
