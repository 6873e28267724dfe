//! Running figure: six boxes merged into one body, a rig of a spine and
//! five child bones, and a looping run cycle.

use std::f32::consts::PI;

use forge_animation::sampler::{Sampler, Wave};
use forge_core::errors::{ForgeError, Result};
use forge_core::handles::NodeHandle;
use forge_core::settings::GenerationSettings;
use forge_resources::material::Material;
use forge_resources::primitives::create_cube;
use forge_scene::assembler::{NodeDesc, merge_subtree};
use forge_scene::recipe::{PartLink, Recipe};
use forge_scene::skeleton::{BoneSpec, RigBuilder, bind};
use glam::Vec3;

use super::{Stage, bone_rotation};
use crate::pass::{GenerationContext, SceneGenerator};

pub const BODY_RECIPE: Recipe = Recipe::new(
    "running_figure",
    &[
        PartLink::root("Torso"),
        PartLink::child("Head", "Torso"),
        PartLink::child("Arm_L", "Torso"),
        PartLink::child("Arm_R", "Torso"),
        PartLink::child("Leg_L", "Torso"),
        PartLink::child("Leg_R", "Torso"),
    ],
);

pub const ARMATURE_NAME: &str = "Human_Armature";
pub const ACTION_NAME: &str = "RunCycle";

#[derive(Debug, Clone, PartialEq)]
pub struct RunningFigure {
    pub skin: Vec3,
    /// Peak forward lean of the spine (quaternion `x`).
    pub spine_sway: f32,
    pub arm_swing: f32,
    pub leg_swing: f32,
}

impl Default for RunningFigure {
    fn default() -> Self {
        Self {
            skin: Vec3::new(0.8, 0.6, 0.5),
            spine_sway: 0.1,
            arm_swing: 0.5,
            leg_swing: 0.7,
        }
    }
}

impl RunningFigure {
    fn describe(&self, part: &'static str) -> Result<NodeDesc> {
        let torso = Vec3::new(0.0, 0.0, 1.0);
        let primitive = match part {
            "Torso" => create_cube(Vec3::splat(0.2)).location(torso),
            "Head" => create_cube(Vec3::splat(0.2))
                .location(Vec3::new(0.0, 0.0, 1.3) - torso)
                .scale(Vec3::splat(0.8)),
            "Arm_L" | "Arm_R" => {
                let side = if part == "Arm_L" { -1.0 } else { 1.0 };
                create_cube(Vec3::splat(0.1))
                    .location(Vec3::new(0.15 * side, 0.0, 0.9) - torso)
                    .scale(Vec3::new(0.4, 0.6, 1.5))
            }
            "Leg_L" | "Leg_R" => {
                let side = if part == "Leg_L" { -1.0 } else { 1.0 };
                create_cube(Vec3::splat(0.1))
                    .location(Vec3::new(0.06 * side, 0.0, 0.5) - torso)
                    .scale(Vec3::new(0.6, 0.6, 2.0))
            }
            other => {
                return Err(ForgeError::InvalidParameter(format!("unknown figure part `{other}`")));
            }
        };
        Ok(NodeDesc::mesh(part, primitive.build()?)
            .with_appearance(Material::new("SkinMaterial").with_rgb(self.skin)))
    }

    /// Spine, head, both upper arms and both thighs. Limbs hang off the spine.
    #[must_use]
    pub fn rig() -> RigBuilder {
        let limb = |name: &str, x: f32, top: f32, bottom: f32| {
            BoneSpec::new(name, Vec3::new(x, 0.0, top), Vec3::new(x, 0.0, bottom)).parent("Spine")
        };
        RigBuilder::new(ARMATURE_NAME)
            .bone(BoneSpec::new("Spine", Vec3::new(0.0, 0.0, 0.9), Vec3::new(0.0, 0.0, 1.1)))
            .bone(BoneSpec::new("Head", Vec3::new(0.0, 0.0, 1.1), Vec3::new(0.0, 0.0, 1.3)).parent("Spine"))
            .bone(limb("Upper_Arm_R", 0.15, 1.1, 0.9))
            .bone(limb("Upper_Arm_L", -0.15, 1.1, 0.9))
            .bone(limb("Thigh_R", 0.06, 0.9, 0.5))
            .bone(limb("Thigh_L", -0.06, 0.9, 0.5))
    }
}

impl SceneGenerator for RunningFigure {
    fn name(&self) -> &'static str {
        "running_figure"
    }

    fn default_settings(&self) -> GenerationSettings {
        GenerationSettings {
            fps: 24,
            frame_end: 40,
            output: "running_person.fbx".into(),
            ..GenerationSettings::default()
        }
    }

    fn generate(&self, ctx: &mut GenerationContext) -> Result<Vec<NodeHandle>> {
        let parts = BODY_RECIPE.instantiate("", |part| self.describe(part))?;
        let body = ctx.compose(parts)?[0];
        merge_subtree(&mut ctx.scene, body)?;

        let rig = Self::rig().build(&mut ctx.scene)?;
        bind(&mut ctx.scene, body, rig)?;

        // One cycle per span; the left side runs half a cycle behind.
        let cycle = |wave, amplitude, phase| Sampler::oscillation(wave, amplitude, 1.0, phase);
        let zero = || Sampler::Constant(0.0);
        let mut channels = Vec::new();
        channels.extend(bone_rotation("Spine", [cycle(Wave::Sin, self.spine_sway, 0.0), zero(), zero()]));
        channels.extend(bone_rotation("Head", [cycle(Wave::Sin, -0.5 * self.spine_sway, 0.0), zero(), zero()]));
        channels.extend(bone_rotation("Upper_Arm_R", [zero(), zero(), cycle(Wave::Cos, self.arm_swing, 0.0)]));
        channels.extend(bone_rotation("Upper_Arm_L", [zero(), zero(), cycle(Wave::Cos, self.arm_swing, PI)]));
        channels.extend(bone_rotation("Thigh_R", [cycle(Wave::Cos, self.leg_swing, 0.0), zero(), zero()]));
        channels.extend(bone_rotation("Thigh_L", [cycle(Wave::Cos, self.leg_swing, PI), zero(), zero()]));

        let synthesizer = ctx.synthesizer();
        ctx.animate(ACTION_NAME, rig.node, &synthesizer, channels)?;

        Stage::CLOSE_UP.place(ctx)?;
        Ok(ctx.roots())
    }
}
