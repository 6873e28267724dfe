use forge_core::errors::{ForgeError, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::{PrimitiveBuilder, ShapeDescriptor, require_min, require_positive};
use crate::bounds::BoundingBox;

/// Latitude/longitude sphere with poles on the Z axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphereOptions {
    pub radius: f32,
    /// Longitudinal segments.
    pub segments: u32,
    /// Latitudinal rings.
    pub rings: u32,
}

impl Default for SphereOptions {
    fn default() -> Self {
        Self {
            radius: 1.0,
            segments: 32,
            rings: 16,
        }
    }
}

impl SphereOptions {
    pub fn validate(&self) -> Result<()> {
        require_positive("uv_sphere", "radius", self.radius)?;
        require_min("uv_sphere", "segments", self.segments, 3)?;
        require_min("uv_sphere", "rings", self.rings, 3)
    }

    /// One vertex per pole plus a full ring between each pair of rings.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.segments as usize * (self.rings as usize - 1) + 2
    }

    #[must_use]
    pub fn face_count(&self) -> usize {
        self.segments as usize * self.rings as usize
    }

    #[must_use]
    pub fn local_bounds(&self) -> BoundingBox {
        BoundingBox::centered(Vec3::splat(self.radius))
    }
}

/// Icosahedron refined by repeated subdivision. One subdivision is the bare
/// icosahedron.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IcoSphereOptions {
    pub radius: f32,
    pub subdivisions: u32,
}

impl Default for IcoSphereOptions {
    fn default() -> Self {
        Self {
            radius: 1.0,
            subdivisions: 2,
        }
    }
}

impl IcoSphereOptions {
    pub fn validate(&self) -> Result<()> {
        require_positive("ico_sphere", "radius", self.radius)?;
        require_min("ico_sphere", "subdivisions", self.subdivisions, 1)?;
        // Face count grows as 4^(n-1).
        if self.subdivisions > 10 {
            return Err(ForgeError::InvalidShape {
                shape: "ico_sphere",
                reason: format!("subdivisions must be at most 10, got {}", self.subdivisions),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        10 * 4usize.pow(self.subdivisions - 1) + 2
    }

    #[must_use]
    pub fn face_count(&self) -> usize {
        20 * 4usize.pow(self.subdivisions - 1)
    }

    #[must_use]
    pub fn local_bounds(&self) -> BoundingBox {
        BoundingBox::centered(Vec3::splat(self.radius))
    }
}

impl From<SphereOptions> for ShapeDescriptor {
    fn from(options: SphereOptions) -> Self {
        Self::UvSphere(options)
    }
}

impl From<IcoSphereOptions> for ShapeDescriptor {
    fn from(options: IcoSphereOptions) -> Self {
        Self::IcoSphere(options)
    }
}

#[must_use]
pub fn create_sphere(options: SphereOptions) -> PrimitiveBuilder {
    PrimitiveBuilder::new(options)
}

#[must_use]
pub fn create_ico_sphere(options: IcoSphereOptions) -> PrimitiveBuilder {
    PrimitiveBuilder::new(options)
}
