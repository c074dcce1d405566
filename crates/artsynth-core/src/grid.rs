//! The fixed parameter grid enumerated for every run.
//!
//! Scales model viewing distance, rotations model an off-axis camera, and
//! the perspective entries model photographing the piece from above, below
//! or either side.

use crate::transform::{Edge, TransformDescriptor};

/// Uniform scales in percent.
pub const SCALE_FACTORS: [u32; 3] = [90, 60, 30];
/// Clockwise rotations in degrees.
pub const ROTATIONS: [u32; 7] = [0, 30, 60, 90, 270, 300, 330];
/// Perspective strengths in percent.
pub const PERSPECTIVE_STRENGTHS: [u32; 4] = [90, 80, 70, 60];

/// Cartesian grid of affine and perspective variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterGrid {
    pub scale_factors: Vec<u32>,
    pub rotations: Vec<u32>,
    pub edges: Vec<Edge>,
    pub strengths: Vec<u32>,
}

impl Default for ParameterGrid {
    fn default() -> Self {
        Self::standard()
    }
}

impl ParameterGrid {
    /// The 37-entry grid used for every artwork.
    pub fn standard() -> Self {
        Self {
            scale_factors: SCALE_FACTORS.to_vec(),
            rotations: ROTATIONS.to_vec(),
            edges: Edge::ALL.to_vec(),
            strengths: PERSPECTIVE_STRENGTHS.to_vec(),
        }
    }

    /// Number of variants the grid produces.
    pub fn len(&self) -> usize {
        self.scale_factors.len() * self.rotations.len() + self.edges.len() * self.strengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All descriptors in run order.
    ///
    /// Affine entries come first (scale-major, rotation-minor), followed by
    /// perspective entries (edge-major, strength-minor). A rotation of 0 is
    /// recorded as no rotation, so it does not appear in the variant name.
    pub fn entries(&self) -> Vec<TransformDescriptor> {
        let mut entries = Vec::with_capacity(self.len());

        for &scale in &self.scale_factors {
            for &rotation in &self.rotations {
                let rotate = (rotation % 360 != 0).then_some(f64::from(rotation));
                entries.push(TransformDescriptor::affine(Some(f64::from(scale)), rotate));
            }
        }

        for &edge in &self.edges {
            for &strength in &self.strengths {
                entries.push(TransformDescriptor::perspective(edge, strength));
            }
        }

        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::variant_suffix;
    use std::collections::HashSet;

    #[test]
    fn test_standard_grid_size() {
        let grid = ParameterGrid::standard();
        assert_eq!(grid.len(), 37);
        assert_eq!(grid.entries().len(), 37);
    }

    #[test]
    fn test_standard_grid_order() {
        let entries = ParameterGrid::standard().entries();

        assert_eq!(entries[0], TransformDescriptor::affine(Some(90.0), None));
        assert_eq!(
            entries[1],
            TransformDescriptor::affine(Some(90.0), Some(30.0))
        );
        assert_eq!(
            entries[7],
            TransformDescriptor::affine(Some(60.0), None)
        );
        assert_eq!(
            entries[20],
            TransformDescriptor::affine(Some(30.0), Some(330.0))
        );
        assert_eq!(entries[21], TransformDescriptor::perspective(Edge::Top, 90));
        assert_eq!(entries[24], TransformDescriptor::perspective(Edge::Top, 60));
        assert_eq!(
            entries[36],
            TransformDescriptor::perspective(Edge::Right, 60)
        );
    }

    #[test]
    fn test_every_entry_is_valid() {
        for entry in ParameterGrid::standard().entries() {
            assert!(entry.validate().is_ok(), "{:?}", entry);
        }
    }

    #[test]
    fn test_suffixes_are_unique_across_grid() {
        let suffixes: Vec<String> = ParameterGrid::standard()
            .entries()
            .iter()
            .map(variant_suffix)
            .collect();
        let unique: HashSet<&String> = suffixes.iter().collect();

        assert_eq!(unique.len(), suffixes.len());
        assert!(suffixes.iter().all(|s| !s.is_empty()));
        assert_eq!(suffixes[0], "scale-90");
        assert_eq!(suffixes[4], "scale-90-rotate-270");
        assert_eq!(suffixes[36], "perspective-type-right-scale-60");
    }

    #[test]
    fn test_empty_grid() {
        let grid = ParameterGrid {
            scale_factors: vec![],
            rotations: vec![0],
            edges: vec![],
            strengths: vec![90],
        };
        assert!(grid.is_empty());
        assert!(grid.entries().is_empty());
    }
}
