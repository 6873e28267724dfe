//! Low-poly forest: trees with a cylinder trunk, an ico-sphere crown and a
//! ring of cone branches, all swaying in the wind.

use std::f32::consts::{FRAC_PI_2, TAU};

use forge_animation::synthesizer::{Synthesizer, TimeBase};
use forge_animation::tracks::Interpolation;
use forge_core::color::{Hsv, vibrant_hsv};
use forge_core::errors::{ForgeError, Result};
use forge_core::handles::NodeHandle;
use forge_core::settings::GenerationSettings;
use forge_resources::material::Material;
use forge_resources::primitives::{
    ConeOptions, CylinderOptions, IcoSphereOptions, PlaneOptions, create_cone, create_cylinder,
    create_ico_sphere, create_plane,
};
use forge_scene::assembler::{NodeDesc, Part};
use forge_scene::recipe::{PartLink, Recipe};
use glam::Vec3;
use rand::Rng;

use super::{Stage, scatter, sway};
use crate::pass::{GenerationContext, SceneGenerator};

pub const TREE_RECIPE: Recipe = Recipe::new(
    "tree",
    &[PartLink::root("Trunk"), PartLink::child("Crown", "Trunk")],
);

/// Random proportions of one tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeShape {
    pub trunk_height: f32,
    pub trunk_radius: f32,
    pub crown_radius: f32,
    pub branch_count: u32,
    pub foliage: Hsv,
}

impl TreeShape {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            trunk_height: rng.random_range(1.0..=2.0),
            trunk_radius: rng.random_range(0.1..=0.2),
            crown_radius: rng.random_range(0.5..=1.0),
            branch_count: rng.random_range(3..=7),
            foliage: vibrant_hsv(rng),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LowPolyForest {
    pub tree_count: usize,
    pub ground_size: f32,
    /// Sway of the crowns as `(strength, speed)`.
    pub crown_sway: (f32, f32),
}

impl Default for LowPolyForest {
    fn default() -> Self {
        Self {
            tree_count: 5,
            ground_size: 10.0,
            crown_sway: (0.05, 1.5),
        }
    }
}

impl LowPolyForest {
    /// Parts of one tree standing at `base`. Branch `j` gets the name
    /// `{prefix}Branch_{j}` and hangs off the trunk.
    pub fn tree_parts<R: Rng + ?Sized>(
        prefix: &str,
        base: Vec3,
        shape: &TreeShape,
        rng: &mut R,
    ) -> Result<Vec<Part>> {
        let h = shape.trunk_height;
        let foliage = Material::new(format!("{prefix}CrownMaterial")).with_rgb(shape.foliage.to_rgb());
        let branch_material =
            Material::new(format!("{prefix}BranchMaterial")).with_rgb(shape.foliage.darken(0.8, 0.8).to_rgb());

        let mut parts = TREE_RECIPE.instantiate(prefix, |part| match part {
            "Trunk" => Ok(NodeDesc::mesh(
                part,
                create_cylinder(CylinderOptions {
                    radius: shape.trunk_radius,
                    depth: h,
                    vertices: 32,
                })
                .location(base + Vec3::new(0.0, 0.0, h * 0.5))
                .build()?,
            )
            .with_appearance(Material::new("TrunkMaterial").with_rgb(Vec3::new(0.3, 0.2, 0.1)))),
            "Crown" => Ok(NodeDesc::mesh(
                part,
                create_ico_sphere(IcoSphereOptions {
                    radius: shape.crown_radius,
                    subdivisions: 1,
                })
                .location(Vec3::new(0.0, 0.0, (h + shape.crown_radius) * 0.5))
                .build()?,
            )
            .with_appearance(foliage.clone())),
            other => Err(ForgeError::InvalidParameter(format!("unknown tree part `{other}`"))),
        })?;

        let trunk = format!("{prefix}Trunk");
        for j in 0..shape.branch_count {
            let angle = rng.random_range(0.0..TAU);
            let height = rng.random_range(0.3 * h..=0.8 * h);
            let (sin, cos) = angle.sin_cos();
            let branch = create_cone(ConeOptions {
                radius_bottom: shape.trunk_radius * 0.2,
                radius_top: 0.0,
                depth: shape.crown_radius,
                vertices: 32,
            })
            // Relative to the trunk's centre.
            .location(Vec3::new(cos * shape.trunk_radius, sin * shape.trunk_radius, height - h * 0.5))
            .rotation_euler(Vec3::new(FRAC_PI_2, 0.0, angle))
            .build()?;
            parts.push((
                NodeDesc::mesh(format!("{prefix}Branch_{j}"), branch).with_appearance(branch_material.clone()),
                Some(trunk.clone()),
            ));
        }
        Ok(parts)
    }
}

impl SceneGenerator for LowPolyForest {
    fn name(&self) -> &'static str {
        "low_poly_forest"
    }

    fn default_settings(&self) -> GenerationSettings {
        GenerationSettings {
            fps: 25,
            frame_end: 100,
            output: "low_poly_trees.fbx".into(),
            ..GenerationSettings::default()
        }
    }

    fn generate(&self, ctx: &mut GenerationContext) -> Result<Vec<NodeHandle>> {
        let ground = create_plane(PlaneOptions {
            size: self.ground_size,
            segments: 1,
        })
        .build()?;
        ctx.compose(vec![(
            NodeDesc::mesh("Ground", ground)
                .with_appearance(Material::new("GroundMaterial").with_rgb(Vec3::new(0.2, 0.5, 0.2))),
            None,
        )])?;

        let synthesizer = Synthesizer::new(ctx.span().with_time_base(TimeBase::Seconds))
            .with_interpolation(Interpolation::Linear);

        let half = self.ground_size * 0.4;
        for i in 0..self.tree_count {
            let prefix = format!("Tree_{i}_");
            let (x, y) = scatter(&mut ctx.rng, half);
            let shape = TreeShape::random(&mut ctx.rng);
            let parts = Self::tree_parts(&prefix, Vec3::new(x, y, 0.0), &shape, &mut ctx.rng)?;

            let names: Vec<String> = parts.iter().map(|(desc, _)| desc.name.clone()).collect();
            let handles = ctx.compose(parts)?;

            for (name, handle) in names.iter().zip(handles) {
                let (strength, speed) = if name.ends_with("Crown") {
                    self.crown_sway
                } else if name.contains("Branch_") {
                    (ctx.rng.random_range(0.1..=0.2), ctx.rng.random_range(1.0..=2.0))
                } else {
                    continue;
                };
                ctx.animate(&format!("Sway_{name}"), handle, &synthesizer, sway(strength, speed))?;
            }
        }

        Stage::CLOSE_UP.place(ctx)?;
        Ok(ctx.roots())
    }
}
