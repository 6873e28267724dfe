use glam::Affine3A;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::bounds::BoundingBox;
use crate::primitives::ShapeDescriptor;

/// One placed shape inside a merged mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshPart {
    pub shape: ShapeDescriptor,
    /// Placement of the shape relative to the owning mesh node.
    pub offset: Affine3A,
    /// Index into the owning node's material slots. `None` leaves the part
    /// without a material.
    pub material_slot: Option<usize>,
}

/// Geometry carried by a mesh node.
///
/// A freshly built node holds a single [`Geometry::Primitive`]. Merging a
/// subtree produces [`Geometry::Merged`], which keeps every source shape with
/// its baked offset so the host can rebuild the combined mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Geometry {
    Primitive { shape: ShapeDescriptor },
    Merged { parts: Vec<MeshPart> },
}

impl Geometry {
    #[must_use]
    pub fn primitive(shape: ShapeDescriptor) -> Self {
        Self::Primitive { shape }
    }

    /// One shape with a fixed offset inside its node.
    #[must_use]
    pub fn placed(shape: ShapeDescriptor, offset: Affine3A) -> Self {
        Self::Merged {
            parts: vec![MeshPart {
                shape,
                offset,
                material_slot: Some(0),
            }],
        }
    }

    /// Placed parts, with identity offset and slot 0 for a single primitive.
    #[must_use]
    pub fn parts(&self) -> SmallVec<[MeshPart; 1]> {
        match self {
            Self::Primitive { shape } => smallvec::smallvec![MeshPart {
                shape: *shape,
                offset: Affine3A::IDENTITY,
                material_slot: Some(0),
            }],
            Self::Merged { parts } => parts.iter().cloned().collect(),
        }
    }

    #[must_use]
    pub fn part_count(&self) -> usize {
        match self {
            Self::Primitive { .. } => 1,
            Self::Merged { parts } => parts.len(),
        }
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        match self {
            Self::Primitive { shape } => shape.vertex_count(),
            Self::Merged { parts } => parts.iter().map(|p| p.shape.vertex_count()).sum(),
        }
    }

    #[must_use]
    pub fn face_count(&self) -> usize {
        match self {
            Self::Primitive { shape } => shape.face_count(),
            Self::Merged { parts } => parts.iter().map(|p| p.shape.face_count()).sum(),
        }
    }

    #[must_use]
    pub fn local_bounds(&self) -> Option<BoundingBox> {
        match self {
            Self::Primitive { shape } => Some(shape.local_bounds()),
            Self::Merged { parts } => parts
                .iter()
                .map(|p| p.shape.local_bounds().transform(&p.offset))
                .reduce(|a, b| a.union(&b)),
        }
    }

    /// Highest material slot referenced, plus one.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        match self {
            Self::Primitive { .. } => 1,
            Self::Merged { parts } => parts
                .iter()
                .filter_map(|p| p.material_slot)
                .map(|slot| slot + 1)
                .max()
                .unwrap_or(0),
        }
    }
}
