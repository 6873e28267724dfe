//! Skeletal Rig Builder
//!
//! Bones live inside an [`Armature`], ordered by creation. A bone's parent
//! must already exist when the bone is added, so the bone list is always in
//! parent-before-child order and bone indices double as a topological sort.

use forge_core::errors::{ForgeError, Result};
use forge_core::handles::{ArmatureKey, NodeHandle};
use forge_core::transform::Transform;
use glam::{Quat, Vec3};
use rustc_hash::FxHashMap;

use crate::node::{Node, NodeContent, SkinBinding};
use crate::scene::Scene;

const MIN_BONE_LENGTH: f32 = 1e-6;

/// A bone in armature space. The bone's local +Y axis runs head to tail.
#[derive(Debug, Clone, PartialEq)]
pub struct Bone {
    pub name: String,
    pub head: Vec3,
    pub tail: Vec3,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
}

impl Bone {
    #[must_use]
    pub fn length(&self) -> f32 {
        (self.tail - self.head).length()
    }

    /// Rest orientation implied by the head-to-tail vector.
    #[must_use]
    pub fn rest_rotation(&self) -> Quat {
        Quat::from_rotation_arc(Vec3::Y, (self.tail - self.head).normalize())
    }
}

#[derive(Debug, Clone)]
pub struct Armature {
    pub name: String,
    /// Scene node carrying this armature.
    pub node: NodeHandle,
    pub multi_rooted: bool,
    bones: Vec<Bone>,
    index: FxHashMap<String, usize>,
}

impl Armature {
    #[must_use]
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    #[must_use]
    pub fn bone(&self, name: &str) -> Option<&Bone> {
        self.index.get(name).map(|&i| &self.bones[i])
    }

    #[must_use]
    pub fn bone_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn require_bone(&self, name: &str) -> Result<&Bone> {
        self.bone(name).ok_or_else(|| ForgeError::UnknownBone {
            armature: self.name.clone(),
            bone: name.to_string(),
        })
    }

    /// Bones without a parent.
    pub fn roots(&self) -> impl Iterator<Item = &Bone> {
        self.bones.iter().filter(|b| b.parent.is_none())
    }

    #[must_use]
    pub fn parent_of(&self, name: &str) -> Option<&Bone> {
        self.bone(name)?.parent.map(|p| &self.bones[p])
    }

    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }
}

/// Parameters of one bone for [`RigBuilder`].
#[derive(Debug, Clone, PartialEq)]
pub struct BoneSpec {
    pub name: String,
    pub head: Vec3,
    pub tail: Vec3,
    pub parent: Option<String>,
}

impl BoneSpec {
    #[must_use]
    pub fn new(name: impl Into<String>, head: Vec3, tail: Vec3) -> Self {
        Self {
            name: name.into(),
            head,
            tail,
            parent: None,
        }
    }

    #[must_use]
    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }
}

/// A built rig: the armature and the scene node that carries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rig {
    pub node: NodeHandle,
    pub armature: ArmatureKey,
}

/// Builds an armature and its scene node in one step.
///
/// ```rust,ignore
/// let rig = RigBuilder::new("Armature")
///     .bone(BoneSpec::new("Spine", Vec3::new(0.0, 0.0, 0.9), Vec3::new(0.0, 0.0, 1.1)))
///     .bone(BoneSpec::new("Head", Vec3::new(0.0, 0.0, 1.1), Vec3::new(0.0, 0.0, 1.3)).parent("Spine"))
///     .build(&mut scene)?;
/// ```
#[derive(Debug, Clone)]
pub struct RigBuilder {
    name: String,
    transform: Transform,
    bones: Vec<BoneSpec>,
    multi_rooted: bool,
}

impl RigBuilder {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::new(),
            bones: Vec::new(),
            multi_rooted: false,
        }
    }

    #[must_use]
    pub fn location(mut self, location: Vec3) -> Self {
        self.transform.position = location;
        self
    }

    #[must_use]
    pub fn bone(mut self, spec: BoneSpec) -> Self {
        self.bones.push(spec);
        self
    }

    /// Allows more than one parentless bone.
    #[must_use]
    pub fn multi_rooted(mut self) -> Self {
        self.multi_rooted = true;
        self
    }

    /// Validates the bones in order and adds the armature node to `scene`.
    pub fn build(self, scene: &mut Scene) -> Result<Rig> {
        let mut bones: Vec<Bone> = Vec::with_capacity(self.bones.len());
        let mut index: FxHashMap<String, usize> = FxHashMap::default();

        for spec in self.bones {
            if index.contains_key(&spec.name) {
                return Err(ForgeError::DuplicateBone {
                    armature: self.name,
                    bone: spec.name,
                });
            }
            if !(spec.head.is_finite() && spec.tail.is_finite()) {
                return Err(ForgeError::InvalidParameter(format!(
                    "bone `{}` has non-finite head or tail",
                    spec.name
                )));
            }
            if (spec.tail - spec.head).length() < MIN_BONE_LENGTH {
                return Err(ForgeError::ZeroLengthBone(spec.name));
            }

            let parent = match &spec.parent {
                Some(parent_name) => match index.get(parent_name) {
                    Some(&p) => Some(p),
                    None => {
                        return Err(ForgeError::ForwardBoneReference {
                            bone: spec.name,
                            parent: parent_name.clone(),
                        });
                    }
                },
                None => None,
            };

            let idx = bones.len();
            if let Some(p) = parent {
                bones[p].children.push(idx);
            }
            index.insert(spec.name.clone(), idx);
            bones.push(Bone {
                name: spec.name,
                head: spec.head,
                tail: spec.tail,
                parent,
                children: Vec::new(),
            });
        }

        let roots = bones.iter().filter(|b| b.parent.is_none()).count();
        if roots > 1 && !self.multi_rooted {
            return Err(ForgeError::MultipleRootBones {
                armature: self.name,
                roots,
            });
        }

        if scene.contains_name(&self.name) {
            return Err(ForgeError::DuplicateNode(self.name));
        }

        // The node needs the armature key and the armature needs the node
        // handle: insert the node as an empty first, then fill in its content.
        let node = scene.add_node(Node::empty(self.name.clone()).with_transform(self.transform))?;
        let bone_count = bones.len();
        let armature = scene.insert_armature(Armature {
            name: self.name.clone(),
            node,
            multi_rooted: self.multi_rooted,
            bones,
            index,
        });
        scene.require_mut(node)?.content = NodeContent::Armature(armature);

        log::info!("Built armature `{}` with {bone_count} bones", self.name);
        Ok(Rig { node, armature })
    }
}

/// Skins `mesh` to the rig and parents it under the armature node, keeping
/// its world placement. Binding an already skinned mesh replaces the old
/// binding.
pub fn bind(scene: &mut Scene, mesh: NodeHandle, rig: Rig) -> Result<()> {
    let armature_name = scene
        .get_armature(rig.armature)
        .map(|a| a.name.clone())
        .ok_or_else(|| ForgeError::UnknownNode(format!("{:?}", rig.armature)))?;

    let target = scene.require(mesh)?;
    if !target.is_mesh() {
        return Err(ForgeError::InvalidParameter(format!(
            "cannot bind `{}`: only mesh nodes can be skinned, found {}",
            target.name(),
            target.content.kind_name()
        )));
    }
    if let Some(previous) = target.skin() {
        log::warn!(
            "`{}` was already bound to {:?}; replacing with `{armature_name}`",
            target.name(),
            previous.armature
        );
    }

    if scene.require(mesh)?.parent() != Some(rig.node) {
        scene.attach_keep_world(mesh, rig.node)?;
    }
    scene.set_skin(
        mesh,
        Some(SkinBinding {
            armature: rig.armature,
        }),
    )?;
    Ok(())
}
