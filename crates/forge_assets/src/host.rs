//! Host interface
//!
//! The external 3D host owns mesh construction, material evaluation,
//! armature deformation and file writing. Scene Forge reaches it only
//! through [`HostBridge`]: one method per capability, each returning the
//! host's own error unchanged.
//!
//! Objects created in the host are referred to by opaque [`HostHandle`]s
//! the host hands out.

use std::path::Path;

use forge_core::errors::HostError;
use forge_core::settings::ExportOptions;
use forge_core::transform::Transform;
use forge_animation::tracks::Interpolation;
use forge_resources::geometry::MeshPart;
use forge_resources::material::Material;
use forge_scene::camera::Camera;
use forge_scene::light::Light;
use forge_scene::skeleton::Bone;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

pub type HostResult<T> = std::result::Result<T, HostError>;

/// Opaque reference to an object in the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HostHandle(pub u64);

/// Local placement sent to the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformData {
    pub location: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl From<&Transform> for TransformData {
    fn from(t: &Transform) -> Self {
        Self {
            location: t.position,
            rotation: t.rotation,
            scale: t.scale,
        }
    }
}

/// An edit bone in armature space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoneData {
    pub name: String,
    pub head: Vec3,
    pub tail: Vec3,
    pub parent: Option<String>,
}

impl BoneData {
    /// Resolves the parent index of `bone` against the armature's bone list.
    #[must_use]
    pub fn from_bone(bone: &Bone, bones: &[Bone]) -> Self {
        Self {
            name: bone.name.clone(),
            head: bone.head,
            tail: bone.tail,
            parent: bone.parent.map(|p| bones[p].name.clone()),
        }
    }
}

/// One keyframe on one F-curve component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyframeData {
    pub data_path: String,
    pub index: usize,
    pub frame: i32,
    pub value: f32,
    pub interpolation: Interpolation,
}

pub trait HostBridge {
    fn create_material(&mut self, material: &Material) -> HostResult<HostHandle>;

    /// Creates a mesh object from one or more placed primitives.
    fn create_mesh(&mut self, name: &str, parts: &[MeshPart]) -> HostResult<HostHandle>;

    fn create_light(&mut self, name: &str, light: &Light) -> HostResult<HostHandle>;

    fn create_camera(&mut self, name: &str, camera: &Camera) -> HostResult<HostHandle>;

    fn create_empty(&mut self, name: &str) -> HostResult<HostHandle>;

    /// Binds `material` to material slot `slot` of `object`.
    fn attach_material(&mut self, object: HostHandle, material: HostHandle, slot: usize) -> HostResult<()>;

    fn set_transform(&mut self, object: HostHandle, transform: &TransformData) -> HostResult<()>;

    fn set_parent(&mut self, child: HostHandle, parent: HostHandle) -> HostResult<()>;

    fn create_armature(&mut self, name: &str) -> HostResult<HostHandle>;

    /// Adds a bone. Its parent, if any, was created by an earlier call.
    fn create_bone(&mut self, armature: HostHandle, bone: &BoneData) -> HostResult<()>;

    /// Deforms `mesh` by `armature`.
    fn create_armature_binding(&mut self, mesh: HostHandle, armature: HostHandle) -> HostResult<()>;

    /// Creates an action and assigns it to `target`.
    fn create_action(&mut self, name: &str, target: HostHandle) -> HostResult<HostHandle>;

    fn insert_keyframe(&mut self, action: HostHandle, key: &KeyframeData) -> HostResult<()>;

    fn set_scene_frame_range(&mut self, start: i32, end: i32) -> HostResult<()>;

    fn set_frame_rate(&mut self, fps: u32) -> HostResult<()>;

    /// Writes `roots` and everything reachable from them to `path`.
    fn export_to_interchange_format(
        &mut self,
        roots: &[HostHandle],
        path: &Path,
        options: &ExportOptions,
    ) -> HostResult<()>;
}
