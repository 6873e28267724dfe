//! Recording host
//!
//! An in-memory [`HostBridge`] that hands out sequential handles, checks
//! references the way a real host would, and records every successful call
//! as a [`HostCommand`]. The command list serializes to a JSON journal that
//! a host-side script can replay.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use forge_core::errors::{HostError, Result};
use forge_core::settings::ExportOptions;
use forge_resources::geometry::MeshPart;
use forge_resources::material::Material;
use forge_scene::camera::Camera;
use forge_scene::light::Light;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::host::{BoneData, HostBridge, HostHandle, HostResult, KeyframeData, TransformData};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum HostCommand {
    CreateMaterial {
        handle: HostHandle,
        material: Material,
    },
    CreateMesh {
        handle: HostHandle,
        name: String,
        parts: Vec<MeshPart>,
    },
    CreateLight {
        handle: HostHandle,
        name: String,
        light: Light,
    },
    CreateCamera {
        handle: HostHandle,
        name: String,
        camera: Camera,
    },
    CreateEmpty {
        handle: HostHandle,
        name: String,
    },
    AttachMaterial {
        object: HostHandle,
        material: HostHandle,
        slot: usize,
    },
    SetTransform {
        object: HostHandle,
        transform: TransformData,
    },
    SetParent {
        child: HostHandle,
        parent: HostHandle,
    },
    CreateArmature {
        handle: HostHandle,
        name: String,
    },
    CreateBone {
        armature: HostHandle,
        bone: BoneData,
    },
    CreateArmatureBinding {
        mesh: HostHandle,
        armature: HostHandle,
    },
    CreateAction {
        handle: HostHandle,
        name: String,
        target: HostHandle,
    },
    InsertKeyframe {
        action: HostHandle,
        key: KeyframeData,
    },
    SetSceneFrameRange {
        start: i32,
        end: i32,
    },
    SetFrameRate {
        fps: u32,
    },
    ExportToInterchangeFormat {
        roots: Vec<HostHandle>,
        path: PathBuf,
        options: ExportOptions,
    },
}

impl HostCommand {
    /// Name of the host capability this command invoked.
    #[must_use]
    pub fn operation(&self) -> &'static str {
        match self {
            Self::CreateMaterial { .. } => "create_material",
            Self::CreateMesh { .. } => "create_mesh",
            Self::CreateLight { .. } => "create_light",
            Self::CreateCamera { .. } => "create_camera",
            Self::CreateEmpty { .. } => "create_empty",
            Self::AttachMaterial { .. } => "attach_material",
            Self::SetTransform { .. } => "set_transform",
            Self::SetParent { .. } => "set_parent",
            Self::CreateArmature { .. } => "create_armature",
            Self::CreateBone { .. } => "create_bone",
            Self::CreateArmatureBinding { .. } => "create_armature_binding",
            Self::CreateAction { .. } => "create_action",
            Self::InsertKeyframe { .. } => "insert_keyframe",
            Self::SetSceneFrameRange { .. } => "set_scene_frame_range",
            Self::SetFrameRate { .. } => "set_frame_rate",
            Self::ExportToInterchangeFormat { .. } => "export_to_interchange_format",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObjectKind {
    Material,
    Mesh,
    Light,
    Camera,
    Empty,
    Armature,
    Action,
}

#[derive(Debug, Default)]
pub struct RecordingHost {
    next_handle: u64,
    kinds: FxHashMap<HostHandle, ObjectKind>,
    names: FxHashSet<String>,
    bones: FxHashMap<HostHandle, FxHashSet<String>>,
    commands: Vec<HostCommand>,
    failure: Option<(String, String)>,
}

impl RecordingHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every call to `operation` fail with `message`.
    #[must_use]
    pub fn fail_on(mut self, operation: impl Into<String>, message: impl Into<String>) -> Self {
        self.failure = Some((operation.into(), message.into()));
        self
    }

    #[must_use]
    pub fn commands(&self) -> &[HostCommand] {
        &self.commands
    }

    /// Number of recorded calls to `operation`.
    #[must_use]
    pub fn count(&self, operation: &str) -> usize {
        self.commands
            .iter()
            .filter(|c| c.operation() == operation)
            .count()
    }

    /// Handle of the object created under `name`.
    #[must_use]
    pub fn handle_of(&self, name: &str) -> Option<HostHandle> {
        self.commands.iter().find_map(|c| match c {
            HostCommand::CreateMesh { handle, name: n, .. }
            | HostCommand::CreateLight { handle, name: n, .. }
            | HostCommand::CreateCamera { handle, name: n, .. }
            | HostCommand::CreateEmpty { handle, name: n }
            | HostCommand::CreateArmature { handle, name: n } => (n == name).then_some(*handle),
            _ => None,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.commands)?)
    }

    /// Writes the command journal as pretty-printed JSON.
    pub fn write_journal(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path.as_ref())?;
        serde_json::to_writer_pretty(BufWriter::new(file), &self.commands)?;
        log::info!(
            "Wrote {} host commands to {}",
            self.commands.len(),
            path.as_ref().display()
        );
        Ok(())
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn check_failure(&self, operation: &str) -> HostResult<()> {
        match &self.failure {
            Some((op, message)) if op == operation => Err(HostError::new(operation, message.clone())),
            _ => Ok(()),
        }
    }

    fn expect_kind(&self, operation: &str, handle: HostHandle, allowed: &[ObjectKind]) -> HostResult<()> {
        match self.kinds.get(&handle) {
            Some(kind) if allowed.contains(kind) => Ok(()),
            Some(kind) => Err(HostError::new(
                operation,
                format!("object {} is a {kind:?}", handle.0),
            )),
            None => Err(HostError::new(operation, format!("unknown object {}", handle.0))),
        }
    }

    fn expect_object(&self, operation: &str, handle: HostHandle) -> HostResult<()> {
        self.expect_kind(
            operation,
            handle,
            &[
                ObjectKind::Mesh,
                ObjectKind::Light,
                ObjectKind::Camera,
                ObjectKind::Empty,
                ObjectKind::Armature,
            ],
        )
    }

    fn allocate(&mut self, operation: &str, name: &str, kind: ObjectKind) -> HostResult<HostHandle> {
        self.check_failure(operation)?;
        if kind != ObjectKind::Action && !self.names.insert(name.to_string()) {
            return Err(HostError::new(operation, format!("name `{name}` is already in use")));
        }
        self.next_handle += 1;
        let handle = HostHandle(self.next_handle);
        self.kinds.insert(handle, kind);
        Ok(handle)
    }
}

impl HostBridge for RecordingHost {
    fn create_material(&mut self, material: &Material) -> HostResult<HostHandle> {
        let handle = self.allocate(
            "create_material",
            &format!("MA:{}", material.name),
            ObjectKind::Material,
        )?;
        self.commands.push(HostCommand::CreateMaterial {
            handle,
            material: material.clone(),
        });
        Ok(handle)
    }

    fn create_mesh(&mut self, name: &str, parts: &[MeshPart]) -> HostResult<HostHandle> {
        if parts.is_empty() {
            return Err(HostError::new("create_mesh", "mesh has no parts"));
        }
        let handle = self.allocate("create_mesh", name, ObjectKind::Mesh)?;
        self.commands.push(HostCommand::CreateMesh {
            handle,
            name: name.to_string(),
            parts: parts.to_vec(),
        });
        Ok(handle)
    }

    fn create_light(&mut self, name: &str, light: &Light) -> HostResult<HostHandle> {
        let handle = self.allocate("create_light", name, ObjectKind::Light)?;
        self.commands.push(HostCommand::CreateLight {
            handle,
            name: name.to_string(),
            light: *light,
        });
        Ok(handle)
    }

    fn create_camera(&mut self, name: &str, camera: &Camera) -> HostResult<HostHandle> {
        let handle = self.allocate("create_camera", name, ObjectKind::Camera)?;
        self.commands.push(HostCommand::CreateCamera {
            handle,
            name: name.to_string(),
            camera: *camera,
        });
        Ok(handle)
    }

    fn create_empty(&mut self, name: &str) -> HostResult<HostHandle> {
        let handle = self.allocate("create_empty", name, ObjectKind::Empty)?;
        self.commands.push(HostCommand::CreateEmpty {
            handle,
            name: name.to_string(),
        });
        Ok(handle)
    }

    fn attach_material(&mut self, object: HostHandle, material: HostHandle, slot: usize) -> HostResult<()> {
        const OP: &str = "attach_material";
        self.check_failure(OP)?;
        self.expect_kind(OP, object, &[ObjectKind::Mesh])?;
        self.expect_kind(OP, material, &[ObjectKind::Material])?;
        let used = self
            .commands
            .iter()
            .filter(|c| matches!(c, HostCommand::AttachMaterial { object: o, .. } if *o == object))
            .count();
        if slot > used {
            return Err(HostError::new(
                OP,
                format!("slot {slot} skips past the {used} slots of object {}", object.0),
            ));
        }
        self.commands.push(HostCommand::AttachMaterial {
            object,
            material,
            slot,
        });
        Ok(())
    }

    fn set_transform(&mut self, object: HostHandle, transform: &TransformData) -> HostResult<()> {
        const OP: &str = "set_transform";
        self.check_failure(OP)?;
        self.expect_object(OP, object)?;
        self.commands.push(HostCommand::SetTransform {
            object,
            transform: *transform,
        });
        Ok(())
    }

    fn set_parent(&mut self, child: HostHandle, parent: HostHandle) -> HostResult<()> {
        const OP: &str = "set_parent";
        self.check_failure(OP)?;
        self.expect_object(OP, child)?;
        self.expect_object(OP, parent)?;
        self.commands.push(HostCommand::SetParent { child, parent });
        Ok(())
    }

    fn create_armature(&mut self, name: &str) -> HostResult<HostHandle> {
        let handle = self.allocate("create_armature", name, ObjectKind::Armature)?;
        self.bones.insert(handle, FxHashSet::default());
        self.commands.push(HostCommand::CreateArmature {
            handle,
            name: name.to_string(),
        });
        Ok(handle)
    }

    fn create_bone(&mut self, armature: HostHandle, bone: &BoneData) -> HostResult<()> {
        const OP: &str = "create_bone";
        self.check_failure(OP)?;
        self.expect_kind(OP, armature, &[ObjectKind::Armature])?;
        let bones = self.bones.entry(armature).or_default();
        if let Some(parent) = &bone.parent
            && !bones.contains(parent)
        {
            return Err(HostError::new(OP, format!("parent bone `{parent}` does not exist")));
        }
        if !bones.insert(bone.name.clone()) {
            return Err(HostError::new(OP, format!("bone `{}` already exists", bone.name)));
        }
        self.commands.push(HostCommand::CreateBone {
            armature,
            bone: bone.clone(),
        });
        Ok(())
    }

    fn create_armature_binding(&mut self, mesh: HostHandle, armature: HostHandle) -> HostResult<()> {
        const OP: &str = "create_armature_binding";
        self.check_failure(OP)?;
        self.expect_kind(OP, mesh, &[ObjectKind::Mesh])?;
        self.expect_kind(OP, armature, &[ObjectKind::Armature])?;
        self.commands
            .push(HostCommand::CreateArmatureBinding { mesh, armature });
        Ok(())
    }

    fn create_action(&mut self, name: &str, target: HostHandle) -> HostResult<HostHandle> {
        const OP: &str = "create_action";
        self.check_failure(OP)?;
        self.expect_object(OP, target)?;
        let handle = self.allocate(OP, name, ObjectKind::Action)?;
        self.commands.push(HostCommand::CreateAction {
            handle,
            name: name.to_string(),
            target,
        });
        Ok(handle)
    }

    fn insert_keyframe(&mut self, action: HostHandle, key: &KeyframeData) -> HostResult<()> {
        const OP: &str = "insert_keyframe";
        self.check_failure(OP)?;
        self.expect_kind(OP, action, &[ObjectKind::Action])?;
        self.commands.push(HostCommand::InsertKeyframe {
            action,
            key: key.clone(),
        });
        Ok(())
    }

    fn set_scene_frame_range(&mut self, start: i32, end: i32) -> HostResult<()> {
        const OP: &str = "set_scene_frame_range";
        self.check_failure(OP)?;
        if end < start {
            return Err(HostError::new(OP, format!("end frame {end} precedes start frame {start}")));
        }
        self.commands.push(HostCommand::SetSceneFrameRange { start, end });
        Ok(())
    }

    fn set_frame_rate(&mut self, fps: u32) -> HostResult<()> {
        const OP: &str = "set_frame_rate";
        self.check_failure(OP)?;
        if fps == 0 {
            return Err(HostError::new(OP, "frame rate must be positive"));
        }
        self.commands.push(HostCommand::SetFrameRate { fps });
        Ok(())
    }

    fn export_to_interchange_format(
        &mut self,
        roots: &[HostHandle],
        path: &Path,
        options: &ExportOptions,
    ) -> HostResult<()> {
        const OP: &str = "export_to_interchange_format";
        self.check_failure(OP)?;
        for &root in roots {
            self.expect_object(OP, root)?;
        }
        self.commands.push(HostCommand::ExportToInterchangeFormat {
            roots: roots.to_vec(),
            path: path.to_path_buf(),
            options: options.clone(),
        });
        Ok(())
    }
}
