//! Nature walk: ground, a grass patch, cone trees and a simple walker that
//! crosses the scene on a single-bone rig.

use std::f32::consts::TAU;

use forge_animation::channel::{Channel, Property};
use forge_animation::sampler::Sampler;
use forge_core::errors::{ForgeError, Result};
use forge_core::handles::NodeHandle;
use forge_core::settings::GenerationSettings;
use forge_resources::material::{ColorVariance, Material};
use forge_resources::primitives::{ConeOptions, PlaneOptions, create_cone, create_cube, create_plane};
use forge_scene::appearance::Appearance;
use forge_scene::assembler::{NodeDesc, Part};
use forge_scene::skeleton::{BoneSpec, RigBuilder, bind};
use glam::Vec3;
use rand::Rng;

use super::meadow::ground;
use super::{Stage, scatter};
use crate::pass::{GenerationContext, SceneGenerator};

#[derive(Debug, Clone, PartialEq)]
pub struct NatureWalk {
    pub tree_count: usize,
    pub ground_size: f32,
    /// Approximate blade count of the grass patch; sets its grid density.
    pub grass_density: u32,
    /// Distance covered along +X over the span.
    pub walk_distance: f32,
    pub bob_height: f32,
}

impl Default for NatureWalk {
    fn default() -> Self {
        Self {
            tree_count: 5,
            ground_size: 10.0,
            grass_density: 500,
            walk_distance: 5.0,
            bob_height: 0.1,
        }
    }
}

impl NatureWalk {
    fn grass_patch(&self) -> Result<Part> {
        let segments = (f64::from(self.grass_density).sqrt() as u32).max(1);
        let patch = create_plane(PlaneOptions { size: 1.0, segments })
            .scale(Vec3::new(self.ground_size, self.ground_size, 1.0))
            .build()?;
        Ok((
            NodeDesc::mesh("GrassPatch", patch)
                .with_appearance(Material::new("GrassMaterial").with_rgb(Vec3::new(0.1, 0.5, 0.1))),
            None,
        ))
    }

    fn tree<R: Rng + ?Sized>(&self, index: usize, rng: &mut R) -> Result<Part> {
        let (x, y) = scatter(rng, self.ground_size * 0.5);
        let scale = rng.random_range(0.5..=1.5);
        let cone = create_cone(ConeOptions {
            radius_bottom: 0.5,
            radius_top: 0.0,
            depth: 2.0,
            vertices: 32,
        })
        .location(Vec3::new(x, y, 1.0))
        .scale(Vec3::splat(scale))
        .build()?;
        Ok((
            NodeDesc::mesh(format!("Tree_{index}"), cone).with_appearance(Appearance::varied(
                Material::new("TreeMaterial").with_rgb(Vec3::new(0.1, 0.3, 0.1)),
                ColorVariance::additive(Vec3::new(0.0, 0.2, 0.0)),
            )),
            None,
        ))
    }

    /// Torso with the head hanging off it. The torso's proportions are baked
    /// so the head keeps its own size.
    fn walker() -> Result<Vec<Part>> {
        let skin = Material::new("HumanMaterial").with_rgb(Vec3::new(0.8, 0.6, 0.5));
        let torso = create_cube(Vec3::splat(0.2))
            .location(Vec3::new(0.0, 0.0, 1.0))
            .scale(Vec3::new(1.0, 0.5, 1.5))
            .build()?;
        let head = create_cube(Vec3::splat(0.2))
            .location(Vec3::new(0.0, 0.0, 0.4))
            .scale(Vec3::splat(0.8))
            .build()?;
        Ok(vec![
            (NodeDesc::baked_mesh("Human", torso).with_appearance(skin.clone()), None),
            (
                NodeDesc::mesh("Head", head).with_appearance(skin),
                Some("Human".to_string()),
            ),
        ])
    }
}

impl SceneGenerator for NatureWalk {
    fn name(&self) -> &'static str {
        "nature_walk"
    }

    fn default_settings(&self) -> GenerationSettings {
        GenerationSettings {
            fps: 24,
            frame_end: 50,
            output: "optimized_nature_scene.fbx".into(),
            ..GenerationSettings::default()
        }
    }

    fn generate(&self, ctx: &mut GenerationContext) -> Result<Vec<NodeHandle>> {
        if self.grass_density == 0 {
            return Err(ForgeError::InvalidParameter("grass_density must be positive".into()));
        }

        let mut parts = vec![ground(self.ground_size)?, self.grass_patch()?];
        for i in 0..self.tree_count {
            parts.push(self.tree(i, &mut ctx.rng)?);
        }
        parts.extend(Self::walker()?);
        let handles = ctx.compose(parts)?;
        let human = handles[handles.len() - 2];

        let rig = RigBuilder::new("Human_Armature")
            .bone(BoneSpec::new("Spine", Vec3::new(0.0, 0.0, 0.9), Vec3::new(0.0, 0.0, 1.5)))
            .build(&mut ctx.scene)?;
        bind(&mut ctx.scene, human, rig)?;

        // The whole rig moves, so the walk lives on the armature object.
        let synthesizer = ctx.synthesizer();
        ctx.animate(
            "WalkAction",
            rig.node,
            &synthesizer,
            vec![
                (Channel::object(Property::Location, 0), Sampler::ramp(0.0, self.walk_distance)),
                (Channel::object(Property::Location, 1), Sampler::Constant(0.0)),
                (
                    Channel::object(Property::Location, 2),
                    Sampler::custom({
                        let bob = self.bob_height;
                        move |t| (t * TAU).sin() * bob
                    }),
                ),
            ],
        )?;

        Stage::CLOSE_UP.place(ctx)?;
        Ok(ctx.roots())
    }
}
