use forge_core::errors::Result;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::{PrimitiveBuilder, ShapeDescriptor, require_min, require_positive};
use crate::bounds::BoundingBox;

/// Square grid in the XY plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaneOptions {
    /// Edge length.
    pub size: f32,
    /// Grid cells per edge.
    pub segments: u32,
}

impl Default for PlaneOptions {
    fn default() -> Self {
        Self {
            size: 2.0,
            segments: 1,
        }
    }
}

impl PlaneOptions {
    pub fn validate(&self) -> Result<()> {
        require_positive("plane", "size", self.size)?;
        require_min("plane", "segments", self.segments, 1)
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        let edge = self.segments as usize + 1;
        edge * edge
    }

    #[must_use]
    pub fn face_count(&self) -> usize {
        let cells = self.segments as usize;
        cells * cells
    }

    #[must_use]
    pub fn local_bounds(&self) -> BoundingBox {
        let half = self.size * 0.5;
        BoundingBox::centered(Vec3::new(half, half, 0.0))
    }
}

impl From<PlaneOptions> for ShapeDescriptor {
    fn from(options: PlaneOptions) -> Self {
        Self::Plane(options)
    }
}

#[must_use]
pub fn create_plane(options: PlaneOptions) -> PrimitiveBuilder {
    PrimitiveBuilder::new(options)
}
