//! Transform descriptors.
//!
//! A variant is either an affine transform (scale and/or rotation about the
//! image center) or a one-sided keystone perspective. The two families are
//! separate enum arms, so a descriptor can never carry both.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::TransformError;

/// Describes how one variant is derived from the source image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TransformDescriptor {
    /// Uniform scale and clockwise rotation about the image center.
    Affine(AffineTransform),
    /// Keystone synthesis converging away from one edge.
    Perspective(PerspectiveTransform),
}

impl TransformDescriptor {
    /// Shorthand for an affine descriptor.
    pub fn affine(scale_percent: Option<f64>, rotate_degrees: Option<f64>) -> Self {
        Self::Affine(AffineTransform {
            scale_percent,
            rotate_degrees,
        })
    }

    /// Shorthand for a perspective descriptor.
    pub fn perspective(edge: Edge, strength_percent: u32) -> Self {
        Self::Perspective(PerspectiveTransform {
            edge,
            strength_percent,
        })
    }

    /// Check parameter ranges without touching any pixels.
    pub fn validate(&self) -> Result<(), TransformError> {
        match self {
            Self::Affine(t) => t.validate(),
            Self::Perspective(t) => t.validate(),
        }
    }
}

/// Scale and rotation about the image center.
///
/// Field order is significant: variant suffixes list the present fields in
/// the order they are declared here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    /// Uniform scale in percent, in (0, 100]. `None` means 100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_percent: Option<f64>,
    /// Clockwise rotation in degrees. `None` means no rotation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate_degrees: Option<f64>,
}

impl AffineTransform {
    /// Effective scale factor (1.0 when absent).
    pub fn scale_factor(&self) -> f64 {
        self.scale_percent.unwrap_or(100.0) / 100.0
    }

    /// Effective rotation in degrees (0.0 when absent).
    pub fn angle_degrees(&self) -> f64 {
        self.rotate_degrees.unwrap_or(0.0)
    }

    /// True when the transform leaves every pixel where it is.
    pub fn is_identity(&self) -> bool {
        self.scale_factor() == 1.0 && self.angle_degrees() % 360.0 == 0.0
    }

    pub fn validate(&self) -> Result<(), TransformError> {
        if let Some(scale) = self.scale_percent {
            if !scale.is_finite() || scale <= 0.0 || scale > 100.0 {
                return Err(TransformError::InvalidScale(scale));
            }
        }
        if let Some(angle) = self.rotate_degrees {
            if !angle.is_finite() {
                return Err(TransformError::InvalidRotation(angle));
            }
        }
        Ok(())
    }
}

/// One-sided keystone perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerspectiveTransform {
    /// Edge that keeps its full extent; the opposite edge converges.
    pub edge: Edge,
    /// Percent of the original extent retained at the converged edge, in (0, 100].
    pub strength_percent: u32,
}

impl PerspectiveTransform {
    /// Strength as a fraction.
    pub fn strength(&self) -> f64 {
        self.strength_percent as f64 / 100.0
    }

    pub fn validate(&self) -> Result<(), TransformError> {
        if self.strength_percent == 0 || self.strength_percent > 100 {
            return Err(TransformError::InvalidStrength(self.strength_percent));
        }
        Ok(())
    }
}

/// Image edge a keystone perspective is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    /// All edges in grid order.
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right];

    pub fn as_str(self) -> &'static str {
        match self {
            Edge::Top => "top",
            Edge::Bottom => "bottom",
            Edge::Left => "left",
            Edge::Right => "right",
        }
    }

    /// True for top/bottom, whose warp squeezes rows.
    pub fn warps_rows(self) -> bool {
        matches!(self, Edge::Top | Edge::Bottom)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
