use forge_core::errors::Result;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::{PrimitiveBuilder, ShapeDescriptor, require_positive};
use crate::bounds::BoundingBox;

/// Axis-aligned box centred on the origin. `size` is the full extent per axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxOptions {
    pub size: Vec3,
}

impl Default for BoxOptions {
    fn default() -> Self {
        Self {
            size: Vec3::splat(2.0),
        }
    }
}

impl BoxOptions {
    pub fn validate(&self) -> Result<()> {
        require_positive("box", "width", self.size.x)?;
        require_positive("box", "depth", self.size.y)?;
        require_positive("box", "height", self.size.z)
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        8
    }

    #[must_use]
    pub fn face_count(&self) -> usize {
        6
    }

    #[must_use]
    pub fn local_bounds(&self) -> BoundingBox {
        BoundingBox::centered(self.size * 0.5)
    }
}

impl From<BoxOptions> for ShapeDescriptor {
    fn from(options: BoxOptions) -> Self {
        Self::Box(options)
    }
}

#[must_use]
pub fn create_box(width: f32, depth: f32, height: f32) -> PrimitiveBuilder {
    PrimitiveBuilder::new(BoxOptions {
        size: Vec3::new(width, depth, height),
    })
}

/// Box with per-axis extents.
#[must_use]
pub fn create_cube(size: Vec3) -> PrimitiveBuilder {
    PrimitiveBuilder::new(BoxOptions { size })
}
