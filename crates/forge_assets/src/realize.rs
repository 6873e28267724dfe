//! Scene realization
//!
//! Replays the reachable part of a [`Scene`] into a host, in an order the
//! host can always satisfy:
//!
//! 1. materials
//! 2. nodes, parents before children (object, transform, parent link,
//!    material slots, bones)
//! 3. skin bindings, once every armature exists
//! 4. actions and their keyframes
//! 5. scene frame range and rate
//!
//! Skin bindings are checked before the first host call. Keyframes are
//! stored relative to the start of the span and shifted by
//! [`Timeline::frame_start`] on the way out, so the first key lands on the
//! first frame of the scene range.

use forge_animation::library::AnimationLibrary;
use forge_core::errors::{ForgeError, Result};
use forge_core::handles::{MaterialKey, NodeHandle};
use forge_scene::node::{Node, NodeContent};
use forge_scene::scene::Scene;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::host::{BoneData, HostBridge, HostHandle, KeyframeData, TransformData};

/// Timeline written to the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeline {
    pub frame_start: i32,
    pub frame_end: i32,
    pub fps: u32,
}

impl From<&forge_core::settings::GenerationSettings> for Timeline {
    fn from(settings: &forge_core::settings::GenerationSettings) -> Self {
        Self {
            frame_start: settings.frame_start,
            frame_end: settings.frame_end,
            fps: settings.fps,
        }
    }
}

/// Host handles of everything realized.
#[derive(Debug, Default)]
pub struct Realized {
    pub nodes: FxHashMap<NodeHandle, HostHandle>,
    pub materials: FxHashMap<MaterialKey, HostHandle>,
    pub actions: usize,
    pub keyframes: usize,
}

impl Realized {
    #[must_use]
    pub fn node(&self, handle: NodeHandle) -> Option<HostHandle> {
        self.nodes.get(&handle).copied()
    }
}

struct Realizer<'a, H: HostBridge + ?Sized> {
    scene: &'a Scene,
    host: &'a mut H,
    out: Realized,
}

/// Pushes `roots` and their descendants into `host`.
///
/// Host errors are returned as soon as they occur; whatever the host already
/// created stays there.
pub fn realize<H: HostBridge + ?Sized>(
    scene: &Scene,
    animations: &AnimationLibrary,
    roots: &[NodeHandle],
    timeline: Timeline,
    host: &mut H,
) -> Result<Realized> {
    let mut seen: FxHashSet<NodeHandle> = FxHashSet::default();
    let mut order: Vec<NodeHandle> = Vec::new();
    for &root in roots {
        scene.require(root)?;
        for handle in scene.subtree(root) {
            if seen.insert(handle) {
                order.push(handle);
            }
        }
    }

    check_skins(scene, &seen, &order)?;

    let mut realizer = Realizer {
        scene,
        host,
        out: Realized::default(),
    };

    realizer.create_materials(&order)?;
    for &handle in &order {
        realizer.create_node(handle)?;
    }
    realizer.bind_skins(&order)?;
    realizer.create_actions(animations, timeline.frame_start)?;

    realizer
        .host
        .set_scene_frame_range(timeline.frame_start, timeline.frame_end)?;
    realizer.host.set_frame_rate(timeline.fps)?;

    log::info!(
        "Realized {} nodes, {} materials, {} actions ({} keyframes)",
        realizer.out.nodes.len(),
        realizer.out.materials.len(),
        realizer.out.actions,
        realizer.out.keyframes
    );
    Ok(realizer.out)
}

/// Every skinned node in `order` must have its armature in `exported`.
fn check_skins(scene: &Scene, exported: &FxHashSet<NodeHandle>, order: &[NodeHandle]) -> Result<()> {
    for &handle in order {
        let node = scene.require(handle)?;
        let Some(skin) = node.skin() else {
            continue;
        };
        let armature = scene.get_armature(skin.armature).ok_or_else(|| {
            ForgeError::InvalidParameter(format!("`{}` is bound to a missing armature", node.name()))
        })?;
        if !exported.contains(&armature.node) {
            return Err(ForgeError::InvalidParameter(format!(
                "`{}` is bound to armature `{}`, which is not being exported",
                node.name(),
                armature.name
            )));
        }
    }
    Ok(())
}

impl<H: HostBridge + ?Sized> Realizer<'_, H> {
    fn create_materials(&mut self, order: &[NodeHandle]) -> Result<()> {
        let scene = self.scene;
        for &handle in order {
            let node = scene.require(handle)?;
            for &key in node.materials() {
                if self.out.materials.contains_key(&key) {
                    continue;
                }
                let material = scene.get_material(key).ok_or_else(|| {
                    ForgeError::InvalidParameter(format!(
                        "`{}` references a missing material",
                        node.name()
                    ))
                })?;
                let host_handle = self.host.create_material(material)?;
                self.out.materials.insert(key, host_handle);
            }
        }
        Ok(())
    }

    fn create_node(&mut self, handle: NodeHandle) -> Result<()> {
        let scene = self.scene;
        let node = scene.require(handle)?;
        let object = self.create_object(node)?;
        log::debug!("Host created {} `{}` as {object:?}", node.content.kind_name(), node.name());

        self.host
            .set_transform(object, &TransformData::from(&node.transform))?;

        if let Some(parent) = node.parent().and_then(|p| self.out.node(p)) {
            self.host.set_parent(object, parent)?;
        }

        for (slot, key) in node.materials().iter().enumerate() {
            let material = self.out.materials[key];
            self.host.attach_material(object, material, slot)?;
        }

        self.out.nodes.insert(handle, object);
        Ok(())
    }

    fn create_object(&mut self, node: &Node) -> Result<HostHandle> {
        let scene = self.scene;
        let object = match &node.content {
            NodeContent::Empty => self.host.create_empty(node.name())?,
            NodeContent::Mesh(geometry) => self.host.create_mesh(node.name(), &geometry.parts())?,
            NodeContent::Light(light) => self.host.create_light(node.name(), light)?,
            NodeContent::Camera(camera) => self.host.create_camera(node.name(), camera)?,
            NodeContent::Armature(key) => {
                let armature = scene.get_armature(*key).ok_or_else(|| {
                    ForgeError::InvalidParameter(format!(
                        "`{}` references a missing armature",
                        node.name()
                    ))
                })?;
                let object = self.host.create_armature(node.name())?;
                for bone in armature.bones() {
                    self.host
                        .create_bone(object, &BoneData::from_bone(bone, armature.bones()))?;
                }
                object
            }
        };
        Ok(object)
    }

    fn bind_skins(&mut self, order: &[NodeHandle]) -> Result<()> {
        let scene = self.scene;
        for &handle in order {
            let node = scene.require(handle)?;
            let Some(skin) = node.skin() else {
                continue;
            };
            let armature = scene.get_armature(skin.armature).ok_or_else(|| {
                ForgeError::InvalidParameter(format!("`{}` is bound to a missing armature", node.name()))
            })?;
            let armature_object = self.out.node(armature.node).ok_or_else(|| {
                ForgeError::InvalidParameter(format!(
                    "`{}` is bound to armature `{}`, which is not being exported",
                    node.name(),
                    armature.name
                ))
            })?;
            self.host
                .create_armature_binding(self.out.nodes[&handle], armature_object)?;
        }
        Ok(())
    }

    fn create_actions(&mut self, animations: &AnimationLibrary, frame_start: i32) -> Result<()> {
        for (_, action) in animations.iter() {
            let Some(target) = self.out.node(action.target) else {
                log::debug!("Skipping action `{}`: target not exported", action.name);
                continue;
            };
            let host_action = self.host.create_action(&action.name, target)?;

            for track in action.tracks() {
                let data_path = track.channel.data_path();
                for key in track.keys() {
                    self.host.insert_keyframe(
                        host_action,
                        &KeyframeData {
                            data_path: data_path.clone(),
                            index: track.channel.index,
                            frame: frame_start + key.frame,
                            value: key.value,
                            interpolation: key.interpolation,
                        },
                    )?;
                    self.out.keyframes += 1;
                }
            }
            self.out.actions += 1;
        }
        Ok(())
    }
}
