//! Primitive Shapes
//!
//! Pure descriptors for the host's primitive meshes. Building a primitive
//! validates its parameters and returns a [`Primitive`]: the immutable
//! [`ShapeDescriptor`] plus a default local [`Transform`] taken from the
//! requested placement. Nothing here talks to the host.
//!
//! Vertex and face counts follow the host's primitive topology so merged
//! meshes can be checked without constructing any geometry.
//!
//! ```rust,ignore
//! let head = create_cube(Vec3::splat(0.2))
//!     .location(Vec3::new(0.0, 0.0, 1.6))
//!     .build()?;
//! assert_eq!(head.shape.vertex_count(), 8);
//! ```

pub mod box_shape;
pub mod cylinder;
pub mod plane;
pub mod sphere;

pub use box_shape::{BoxOptions, create_box, create_cube};
pub use cylinder::{ConeOptions, CylinderOptions, create_cone, create_cylinder};
pub use plane::{PlaneOptions, create_plane};
pub use sphere::{IcoSphereOptions, SphereOptions, create_ico_sphere, create_sphere};

use forge_core::errors::{ForgeError, Result};
use forge_core::transform::{Transform, euler_to_quat};
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::bounds::BoundingBox;

/// Parameters of one primitive kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeDescriptor {
    Box(BoxOptions),
    UvSphere(SphereOptions),
    IcoSphere(IcoSphereOptions),
    Cylinder(CylinderOptions),
    Cone(ConeOptions),
    Plane(PlaneOptions),
}

impl ShapeDescriptor {
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Box(_) => "box",
            Self::UvSphere(_) => "uv_sphere",
            Self::IcoSphere(_) => "ico_sphere",
            Self::Cylinder(_) => "cylinder",
            Self::Cone(_) => "cone",
            Self::Plane(_) => "plane",
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Box(o) => o.validate(),
            Self::UvSphere(o) => o.validate(),
            Self::IcoSphere(o) => o.validate(),
            Self::Cylinder(o) => o.validate(),
            Self::Cone(o) => o.validate(),
            Self::Plane(o) => o.validate(),
        }
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        match self {
            Self::Box(o) => o.vertex_count(),
            Self::UvSphere(o) => o.vertex_count(),
            Self::IcoSphere(o) => o.vertex_count(),
            Self::Cylinder(o) => o.vertex_count(),
            Self::Cone(o) => o.vertex_count(),
            Self::Plane(o) => o.vertex_count(),
        }
    }

    #[must_use]
    pub fn face_count(&self) -> usize {
        match self {
            Self::Box(o) => o.face_count(),
            Self::UvSphere(o) => o.face_count(),
            Self::IcoSphere(o) => o.face_count(),
            Self::Cylinder(o) => o.face_count(),
            Self::Cone(o) => o.face_count(),
            Self::Plane(o) => o.face_count(),
        }
    }

    /// Bounds in the shape's own space, before placement.
    #[must_use]
    pub fn local_bounds(&self) -> BoundingBox {
        match self {
            Self::Box(o) => o.local_bounds(),
            Self::UvSphere(o) => o.local_bounds(),
            Self::IcoSphere(o) => o.local_bounds(),
            Self::Cylinder(o) => o.local_bounds(),
            Self::Cone(o) => o.local_bounds(),
            Self::Plane(o) => o.local_bounds(),
        }
    }
}

/// A validated shape and the transform it was placed with.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub shape: ShapeDescriptor,
    pub transform: Transform,
}

/// Placement of a shape before validation.
#[derive(Debug, Clone)]
pub struct PrimitiveBuilder {
    shape: ShapeDescriptor,
    location: Vec3,
    rotation: Quat,
    scale: Vec3,
}

impl PrimitiveBuilder {
    #[must_use]
    pub fn new(shape: impl Into<ShapeDescriptor>) -> Self {
        Self {
            shape: shape.into(),
            location: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    #[must_use]
    pub fn location(mut self, location: Vec3) -> Self {
        self.location = location;
        self
    }

    #[must_use]
    pub fn rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// XYZ Euler angles in radians.
    #[must_use]
    pub fn rotation_euler(mut self, euler: Vec3) -> Self {
        self.rotation = euler_to_quat(euler);
        self
    }

    #[must_use]
    pub fn scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn build(self) -> Result<Primitive> {
        self.shape.validate()?;
        if !self.location.is_finite() || !self.rotation.is_finite() {
            return Err(ForgeError::InvalidShape {
                shape: self.shape.kind_name(),
                reason: "placement must be finite".into(),
            });
        }
        if !self.scale.is_finite() || self.scale.cmple(Vec3::ZERO).any() {
            return Err(ForgeError::InvalidShape {
                shape: self.shape.kind_name(),
                reason: format!("scale must be positive on every axis, got {}", self.scale),
            });
        }

        let transform = Transform::from_translation(self.location)
            .with_rotation(self.rotation.normalize())
            .with_scale(self.scale);

        Ok(Primitive {
            shape: self.shape,
            transform,
        })
    }
}

// ============================================================================
// Validation helpers
// ============================================================================

pub(crate) fn require_positive(shape: &'static str, name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ForgeError::InvalidShape {
            shape,
            reason: format!("{name} must be positive and finite, got {value}"),
        })
    }
}

pub(crate) fn require_min(shape: &'static str, name: &str, value: u32, min: u32) -> Result<()> {
    if value >= min {
        Ok(())
    } else {
        Err(ForgeError::InvalidShape {
            shape,
            reason: format!("{name} must be at least {min}, got {value}"),
        })
    }
}
