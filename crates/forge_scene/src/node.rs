use forge_core::handles::{ArmatureKey, MaterialKey, NodeHandle};
use forge_core::transform::Transform;
use forge_resources::geometry::Geometry;
use glam::Affine3A;
use smallvec::SmallVec;

use crate::camera::Camera;
use crate::light::Light;

/// What a node carries besides its place in the hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeContent {
    /// Grouping node without payload.
    Empty,
    Mesh(Geometry),
    Light(Light),
    Camera(Camera),
    /// The node that owns an armature's bone hierarchy.
    Armature(ArmatureKey),
}

impl NodeContent {
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Mesh(_) => "mesh",
            Self::Light(_) => "light",
            Self::Camera(_) => "camera",
            Self::Armature(_) => "armature",
        }
    }
}

/// Deformation of a mesh by an armature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkinBinding {
    pub armature: ArmatureKey,
}

/// A named scene node.
///
/// # Hierarchy
///
/// - `parent`: `None` for root nodes
/// - `children`: ordered child handles
///
/// Both sides of a link are kept in sync by [`Scene`](crate::Scene); the
/// fields are not writable from outside the crate.
///
/// # Materials
///
/// `materials` are the node's slots. A mesh part refers to a slot by index.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) name: String,
    pub content: NodeContent,
    pub transform: Transform,

    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    pub(crate) materials: SmallVec<[MaterialKey; 2]>,
    pub(crate) skin: Option<SkinBinding>,
}

impl Node {
    #[must_use]
    pub fn new(name: impl Into<String>, content: NodeContent) -> Self {
        Self {
            name: name.into(),
            content,
            transform: Transform::new(),
            parent: None,
            children: Vec::new(),
            materials: SmallVec::new(),
            skin: None,
        }
    }

    #[must_use]
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, NodeContent::Empty)
    }

    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn materials(&self) -> &[MaterialKey] {
        &self.materials
    }

    #[inline]
    #[must_use]
    pub fn skin(&self) -> Option<SkinBinding> {
        self.skin
    }

    #[must_use]
    pub fn geometry(&self) -> Option<&Geometry> {
        match &self.content {
            NodeContent::Mesh(geometry) => Some(geometry),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_mesh(&self) -> bool {
        matches!(self.content, NodeContent::Mesh(_))
    }

    /// World matrix as of the last transform update.
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        self.transform.world_matrix()
    }
}
