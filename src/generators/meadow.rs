//! Meadow: a ground plane scattered with swaying grass blades and rocks.

use std::f32::consts::TAU;

use forge_animation::synthesizer::{Synthesizer, TimeBase};
use forge_animation::tracks::Interpolation;
use forge_core::errors::{ForgeError, Result};
use forge_core::handles::NodeHandle;
use forge_core::random::jitter;
use forge_core::settings::GenerationSettings;
use forge_resources::material::{ColorVariance, Material};
use forge_resources::primitives::{IcoSphereOptions, PlaneOptions, create_box, create_ico_sphere, create_plane};
use forge_scene::appearance::Appearance;
use forge_scene::assembler::{NodeDesc, Part};
use glam::Vec3;
use rand::Rng;

use super::{Stage, scatter, sway};
use crate::pass::{GenerationContext, SceneGenerator};

#[derive(Debug, Clone, PartialEq)]
pub struct GrassAndRocks {
    pub blade_count: usize,
    pub rock_count: usize,
    pub ground_size: f32,
    /// Per-axis scale jitter that roughens each rock.
    pub rock_roughness: f32,
}

impl Default for GrassAndRocks {
    fn default() -> Self {
        Self {
            blade_count: 500,
            rock_count: 20,
            ground_size: 10.0,
            rock_roughness: 0.15,
        }
    }
}

pub(crate) fn ground(size: f32) -> Result<Part> {
    let plane = create_plane(PlaneOptions { size, segments: 1 }).build()?;
    Ok((
        NodeDesc::mesh("Ground", plane)
            .with_appearance(Material::new("GroundMaterial").with_rgb(Vec3::new(0.1, 0.2, 0.05))),
        None,
    ))
}

impl GrassAndRocks {
    /// A thin upright blade with a random heading and a greener-or-not tint.
    fn blade<R: Rng + ?Sized>(&self, index: usize, rng: &mut R) -> Result<NodeDesc> {
        let (x, y) = scatter(rng, self.ground_size * 0.5);
        let height = rng.random_range(0.1..=0.3);
        let heading = rng.random_range(0.0..TAU);
        let blade = create_box(0.01, 0.1, height)
            .location(Vec3::new(x, y, height * 0.5))
            .rotation_euler(Vec3::new(0.0, 0.0, heading))
            .build()?;
        Ok(NodeDesc::mesh(format!("GrassBlade_{index:03}"), blade).with_appearance(Appearance::varied(
            Material::new("GrassMaterial").with_rgb(Vec3::new(0.1, 0.5, 0.1)),
            ColorVariance::additive(Vec3::new(0.0, 0.5, 0.0)),
        )))
    }

    fn rock<R: Rng + ?Sized>(&self, index: usize, rng: &mut R) -> Result<NodeDesc> {
        let (x, y) = scatter(rng, self.ground_size * 0.5);
        let size = rng.random_range(0.2..=0.6);
        let roughness = self.rock_roughness;
        let scale = Vec3::new(
            jitter(rng, 1.0, roughness),
            jitter(rng, 1.0, roughness),
            jitter(rng, 1.0, roughness),
        );
        let rock = create_ico_sphere(IcoSphereOptions {
            radius: size,
            subdivisions: 2,
        })
        .location(Vec3::new(x, y, size * 0.5))
        .scale(scale)
        .build()?;
        Ok(NodeDesc::mesh(format!("Rock_{index:02}"), rock).with_appearance(Appearance::varied(
            Material::new("RockMaterial").with_rgb(Vec3::splat(0.2)),
            ColorVariance::additive(Vec3::splat(0.1)),
        )))
    }
}

impl SceneGenerator for GrassAndRocks {
    fn name(&self) -> &'static str {
        "grass_and_rocks"
    }

    fn default_settings(&self) -> GenerationSettings {
        GenerationSettings {
            fps: 25,
            frame_end: 100,
            output: "swaying_grass_and_rocks.fbx".into(),
            ..GenerationSettings::default()
        }
    }

    fn generate(&self, ctx: &mut GenerationContext) -> Result<Vec<NodeHandle>> {
        if !(0.0..1.0).contains(&self.rock_roughness) {
            return Err(ForgeError::InvalidParameter(format!(
                "rock_roughness must be in [0, 1), got {}",
                self.rock_roughness
            )));
        }
        ctx.compose(vec![ground(self.ground_size)?])?;

        let synthesizer = Synthesizer::new(ctx.span().with_time_base(TimeBase::Seconds))
            .with_interpolation(Interpolation::Linear);

        for i in 0..self.blade_count {
            let desc = self.blade(i, &mut ctx.rng)?;
            let name = desc.name.clone();
            let blade = ctx.compose(vec![(desc, None)])?[0];

            let strength = ctx.rng.random_range(0.1..=0.3);
            let speed = ctx.rng.random_range(1.0..=2.0);
            ctx.animate(&format!("Sway_{name}"), blade, &synthesizer, sway(strength, speed))?;
        }

        let rocks = (0..self.rock_count)
            .map(|i| Ok((self.rock(i, &mut ctx.rng)?, None)))
            .collect::<Result<Vec<Part>>>()?;
        ctx.compose(rocks)?;

        Stage::CLOSE_UP.place(ctx)?;
        Ok(ctx.roots())
    }
}
