use forge_core::errors::{ForgeError, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::{PrimitiveBuilder, ShapeDescriptor, require_min, require_positive};
use crate::bounds::BoundingBox;

/// Capped cylinder along Z, centred on the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CylinderOptions {
    pub radius: f32,
    pub depth: f32,
    /// Vertices per cap ring.
    pub vertices: u32,
}

impl Default for CylinderOptions {
    fn default() -> Self {
        Self {
            radius: 1.0,
            depth: 2.0,
            vertices: 32,
        }
    }
}

impl CylinderOptions {
    pub fn validate(&self) -> Result<()> {
        require_positive("cylinder", "radius", self.radius)?;
        require_positive("cylinder", "depth", self.depth)?;
        require_min("cylinder", "vertices", self.vertices, 3)
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        2 * self.vertices as usize
    }

    /// Side quads plus two n-gon caps.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.vertices as usize + 2
    }

    #[must_use]
    pub fn local_bounds(&self) -> BoundingBox {
        BoundingBox::centered(Vec3::new(self.radius, self.radius, self.depth * 0.5))
    }
}

/// Cone or frustum along Z. A zero top radius collapses the top ring into an apex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConeOptions {
    pub radius_bottom: f32,
    pub radius_top: f32,
    pub depth: f32,
    pub vertices: u32,
}

impl Default for ConeOptions {
    fn default() -> Self {
        Self {
            radius_bottom: 1.0,
            radius_top: 0.0,
            depth: 2.0,
            vertices: 32,
        }
    }
}

impl ConeOptions {
    pub fn validate(&self) -> Result<()> {
        require_positive("cone", "radius_bottom", self.radius_bottom)?;
        require_positive("cone", "depth", self.depth)?;
        require_min("cone", "vertices", self.vertices, 3)?;
        if !(self.radius_top.is_finite() && self.radius_top >= 0.0) {
            return Err(ForgeError::InvalidShape {
                shape: "cone",
                reason: format!(
                    "radius_top must be non-negative and finite, got {}",
                    self.radius_top
                ),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn has_apex(&self) -> bool {
        self.radius_top == 0.0
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        let ring = self.vertices as usize;
        if self.has_apex() { ring + 1 } else { 2 * ring }
    }

    #[must_use]
    pub fn face_count(&self) -> usize {
        let ring = self.vertices as usize;
        if self.has_apex() { ring + 1 } else { ring + 2 }
    }

    #[must_use]
    pub fn local_bounds(&self) -> BoundingBox {
        let r = self.radius_bottom.max(self.radius_top);
        BoundingBox::centered(Vec3::new(r, r, self.depth * 0.5))
    }
}

impl From<CylinderOptions> for ShapeDescriptor {
    fn from(options: CylinderOptions) -> Self {
        Self::Cylinder(options)
    }
}

impl From<ConeOptions> for ShapeDescriptor {
    fn from(options: ConeOptions) -> Self {
        Self::Cone(options)
    }
}

#[must_use]
pub fn create_cylinder(options: CylinderOptions) -> PrimitiveBuilder {
    PrimitiveBuilder::new(options)
}

#[must_use]
pub fn create_cone(options: ConeOptions) -> PrimitiveBuilder {
    PrimitiveBuilder::new(options)
}
