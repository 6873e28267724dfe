//! Scene Graph Assembler
//!
//! [`compose`] turns an ordered list of part descriptors into parented scene
//! nodes. The whole list is checked before the scene is touched, so a failed
//! composition leaves no partial hierarchy behind.
//!
//! [`merge_subtree`] flattens every mesh under a root into that root.

use forge_core::errors::{ForgeError, Result};
use forge_core::handles::{MaterialKey, NodeHandle};
use forge_core::transform::Transform;
use forge_resources::geometry::{Geometry, MeshPart};
use forge_resources::primitives::Primitive;
use glam::{Affine3A, Quat, Vec3};
use rand::Rng;
use rustc_hash::FxHashSet;

use crate::appearance::{self, Appearance};
use crate::camera::Camera;
use crate::light::Light;
use crate::node::{Node, NodeContent};
use crate::scene::Scene;

// ============================================================================
// Part descriptors
// ============================================================================

/// Everything needed to create one node during composition.
#[derive(Debug, Clone)]
pub struct NodeDesc {
    pub name: String,
    pub content: NodeContent,
    pub transform: Transform,
    pub appearance: Option<Appearance>,
}

impl NodeDesc {
    #[must_use]
    pub fn new(name: impl Into<String>, content: NodeContent) -> Self {
        Self {
            name: name.into(),
            content,
            transform: Transform::new(),
            appearance: None,
        }
    }

    /// Mesh node placed where the primitive was built.
    #[must_use]
    pub fn mesh(name: impl Into<String>, primitive: Primitive) -> Self {
        Self {
            name: name.into(),
            content: NodeContent::Mesh(Geometry::primitive(primitive.shape)),
            transform: primitive.transform,
            appearance: None,
        }
    }

    /// Mesh node at the primitive's location with its rotation and scale
    /// baked into the geometry. Children see an unrotated, unscaled frame.
    #[must_use]
    pub fn baked_mesh(name: impl Into<String>, primitive: Primitive) -> Self {
        let Primitive { shape, transform } = primitive;
        let offset = Affine3A::from_scale_rotation_translation(transform.scale, transform.rotation, Vec3::ZERO);
        Self {
            name: name.into(),
            content: NodeContent::Mesh(Geometry::placed(shape, offset)),
            transform: Transform::from_translation(transform.position),
            appearance: None,
        }
    }

    #[must_use]
    pub fn light(name: impl Into<String>, light: Light, location: Vec3) -> Self {
        Self::new(name, NodeContent::Light(light)).at(location)
    }

    #[must_use]
    pub fn camera(name: impl Into<String>, camera: Camera, location: Vec3, rotation: Quat) -> Self {
        let mut desc = Self::new(name, NodeContent::Camera(camera)).at(location);
        desc.transform.rotation = rotation;
        desc
    }

    #[must_use]
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, NodeContent::Empty)
    }

    #[must_use]
    pub fn at(mut self, location: Vec3) -> Self {
        self.transform.position = location;
        self
    }

    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    #[must_use]
    pub fn with_appearance(mut self, appearance: impl Into<Appearance>) -> Self {
        self.appearance = Some(appearance.into());
        self
    }
}

/// A part and the name of its parent, `None` for a root.
pub type Part = (NodeDesc, Option<String>);

// ============================================================================
// Compose
// ============================================================================

/// Adds `parts` to `scene` in order and returns their handles in the same
/// order.
///
/// A parent must already be in the scene or appear earlier in `parts`.
/// Names must be unique across the scene and the list. Any violation fails
/// before the first node is inserted.
pub fn compose<R: Rng + ?Sized>(
    scene: &mut Scene,
    parts: Vec<Part>,
    rng: &mut R,
) -> Result<Vec<NodeHandle>> {
    validate_parts(scene, &parts)?;

    let count = parts.len();
    let mut handles = Vec::with_capacity(count);

    for (desc, parent) in parts {
        let NodeDesc {
            name,
            content,
            transform,
            appearance,
        } = desc;

        let node = Node::new(name, content).with_transform(transform);
        let handle = match parent {
            Some(parent_name) => {
                let parent = scene.node_by_name(&parent_name).ok_or_else(|| {
                    ForgeError::MissingParent {
                        part: node.name().to_string(),
                        parent: parent_name,
                    }
                })?;
                scene.add_to_parent(node, parent)?
            }
            None => scene.add_node(node)?,
        };

        if let Some(appearance) = appearance {
            appearance::assign(scene, handle, &appearance, rng)?;
        }
        handles.push(handle);
    }

    log::info!("Composed {count} parts");
    Ok(handles)
}

fn validate_parts(scene: &Scene, parts: &[Part]) -> Result<()> {
    let mut seen: FxHashSet<&str> = FxHashSet::default();

    for (desc, parent) in parts {
        if scene.contains_name(&desc.name) || !seen.insert(desc.name.as_str()) {
            return Err(ForgeError::DuplicateNode(desc.name.clone()));
        }
        if let Some(parent) = parent {
            if parent == &desc.name {
                return Err(ForgeError::CyclicHierarchy {
                    child: desc.name.clone(),
                    parent: parent.clone(),
                });
            }
            if !seen.contains(parent.as_str()) && !scene.contains_name(parent) {
                return Err(ForgeError::MissingParent {
                    part: desc.name.clone(),
                    parent: parent.clone(),
                });
            }
        }
        if let Some(appearance) = &desc.appearance {
            appearance.validate()?;
        }
        if let NodeContent::Armature(_) = desc.content {
            return Err(ForgeError::InvalidParameter(format!(
                "part `{}`: armatures are created by the rig builder",
                desc.name
            )));
        }
    }
    Ok(())
}

// ============================================================================
// Merge
// ============================================================================

/// Summary of a [`merge_subtree`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    pub root: NodeHandle,
    pub merged_nodes: usize,
    pub vertex_count: usize,
    pub face_count: usize,
    pub material_slots: usize,
}

/// Fuses every mesh node under `root` (inclusive) into `root`.
///
/// Each source shape keeps its placement as an offset relative to the root,
/// so vertex and face totals are unchanged. The root's material slots become
/// the distinct materials of all sources, in first-seen order. A source with
/// no material keeps no slot rather than borrowing another's. Merged nodes
/// are removed; other descendants are re-parented onto the root without
/// moving in world space. The merge cannot be undone.
pub fn merge_subtree(scene: &mut Scene, root: NodeHandle) -> Result<MergeReport> {
    let root_name = scene.require(root)?.name().to_string();
    let subtree = scene.subtree(root);

    let root_world = scene
        .compute_world_matrix(root)
        .ok_or_else(|| ForgeError::UnknownNode(root_name.clone()))?;
    let root_inv = root_world.inverse();

    let mut parts: Vec<MeshPart> = Vec::new();
    let mut slots: Vec<MaterialKey> = Vec::new();
    let mut merged: Vec<NodeHandle> = Vec::new();
    let mut keep: Vec<NodeHandle> = Vec::new();

    for &handle in &subtree {
        let node = scene.require(handle)?;
        let Some(geometry) = node.geometry() else {
            if handle != root {
                keep.push(handle);
            }
            continue;
        };

        let node_world = scene
            .compute_world_matrix(handle)
            .ok_or_else(|| ForgeError::UnknownNode(node.name().to_string()))?;
        let to_root = root_inv * node_world;

        for part in geometry.parts() {
            let source = part.material_slot.and_then(|slot| node.materials().get(slot).copied());
            let material_slot = source.map(|key| match slots.iter().position(|&k| k == key) {
                Some(existing) => existing,
                None => {
                    slots.push(key);
                    slots.len() - 1
                }
            });
            parts.push(MeshPart {
                shape: part.shape,
                offset: to_root * part.offset,
                material_slot,
            });
        }

        if handle != root {
            merged.push(handle);
        }
    }

    if parts.is_empty() {
        return Err(ForgeError::EmptyMerge(root_name));
    }

    // Only nodes whose parent is about to disappear need a new parent.
    let merged_set: FxHashSet<NodeHandle> = merged.iter().copied().collect();
    for handle in keep {
        let parent = scene.require(handle)?.parent();
        if parent.is_some_and(|p| merged_set.contains(&p)) {
            scene.attach_keep_world(handle, root)?;
        }
    }

    for &handle in &merged {
        scene.remove_single(handle);
    }

    let geometry = Geometry::Merged { parts };
    let report = MergeReport {
        root,
        merged_nodes: merged.len() + 1,
        vertex_count: geometry.vertex_count(),
        face_count: geometry.face_count(),
        material_slots: slots.len(),
    };

    scene.require_mut(root)?.content = NodeContent::Mesh(geometry);
    scene.replace_materials(root, &slots)?;
    scene.update_subtree(root);

    log::info!(
        "Merged {} nodes into `{root_name}` ({} vertices, {} faces, {} material slots)",
        report.merged_nodes,
        report.vertex_count,
        report.face_count,
        report.material_slots
    );
    Ok(report)
}
