//! Shape descriptors, geometry and materials for Scene Forge.

pub mod bounds;
pub mod geometry;
pub mod material;
pub mod primitives;

pub use bounds::BoundingBox;
pub use geometry::{Geometry, MeshPart};
pub use material::{ColorVariance, Material, VarianceMode};
pub use primitives::{Primitive, PrimitiveBuilder, ShapeDescriptor};
