//! ArtSynth Core - Training-set synthesis for artwork recognition
//!
//! This crate turns one photograph of an artwork into a fixed grid of
//! geometric variants (scaled, rotated and keystone-warped copies) that
//! simulate the ways a visitor might photograph the piece, writes them as
//! JPEG files, and hands the resulting set to a training service.

pub mod config;
pub mod dataset;
pub mod decode;
pub mod encode;
pub mod grid;
pub mod naming;
pub mod pipeline;
pub mod source;
pub mod transform;

pub use config::{Config, ConfigError};
pub use decode::{DecodedImage, BACKGROUND};
pub use grid::ParameterGrid;
pub use naming::{variant_path, variant_suffix};
pub use pipeline::{run_grid, run_variants, RunError, RunReport, Stage, VariantFailure};
pub use source::{load_source, SourceError, SourceImage};
pub use transform::{apply_transform, Edge, TransformDescriptor, TransformError};
