//! Spaceships
//!
//! [`DynamicSpaceship`] weaves along a straight run, rolling as it goes,
//! while its engine lights pulse. [`DetailedSpaceship`] hovers in place, spins its
//! weapons and flickers its thrusters.

use std::f32::consts::{FRAC_PI_2, TAU};

use forge_animation::channel::{Channel, Property};
use forge_animation::sampler::Sampler;
use forge_animation::synthesizer::{FrameSpan, Synthesizer};
use forge_core::errors::{ForgeError, Result};
use forge_core::handles::NodeHandle;
use forge_core::settings::GenerationSettings;
use forge_resources::material::Material;
use forge_resources::primitives::{
    ConeOptions, CylinderOptions, SphereOptions, create_cone, create_cube, create_cylinder, create_sphere,
};
use forge_scene::assembler::{NodeDesc, Part};
use forge_scene::light::Light;
use forge_scene::recipe::{PartLink, Recipe};
use glam::{Quat, Vec3, Vec4};

use super::{Stage, full_turn};
use crate::pass::{GenerationContext, SceneGenerator};

fn engine_light(color: Vec3) -> Light {
    Light::point(color, 10.0, 0.1)
}

// ============================================================================
// Dynamic spaceship
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct DynamicSpaceship {
    pub engine_count: usize,
    /// Length of one engine pulse cycle, in frames.
    pub pulse_frames: u32,
    /// Sideways amplitude of the flight path; the run covers twice this
    /// distance forward.
    pub sweep: f32,
}

impl Default for DynamicSpaceship {
    fn default() -> Self {
        Self {
            engine_count: 3,
            pulse_frames: 60,
            sweep: 10.0,
        }
    }
}

impl DynamicSpaceship {
    /// Tapered hull along +Y, wings, a row of engines with glow lights and a
    /// glass cockpit.
    pub fn parts(&self) -> Result<Vec<Part>> {
        let body = "ShipBody";
        let mut parts: Vec<Part> = Vec::with_capacity(4 + 2 * self.engine_count);

        // The cone's axis is Z; a quarter turn about X points the narrow end forward.
        let hull = create_cone(ConeOptions {
            radius_bottom: 0.5,
            radius_top: 0.25,
            depth: 3.0,
            vertices: 32,
        })
        .rotation(Quat::from_rotation_x(-FRAC_PI_2))
        .build()?;
        parts.push((
            NodeDesc::baked_mesh(body, hull)
                .with_appearance(Material::new("BodyMaterial").with_rgb(Vec3::new(0.1, 0.1, 0.3))),
            None,
        ));

        for (name, side) in [("Wing_L", -1.0), ("Wing_R", 1.0)] {
            let wing = create_cube(Vec3::ONE)
                .location(Vec3::new(0.7 * side, 0.0, 0.0))
                .scale(Vec3::new(1.0, 0.1, 0.5))
                .build()?;
            parts.push((
                NodeDesc::mesh(name, wing)
                    .with_appearance(Material::new("WingMaterial").with_rgb(Vec3::new(0.2, 0.2, 0.4))),
                Some(body.to_string()),
            ));
        }

        let center = (self.engine_count as f32 - 1.0) * 0.5;
        for i in 0..self.engine_count {
            let engine = format!("Engine_{i}");
            let nozzle = create_cylinder(CylinderOptions {
                radius: 0.2,
                depth: 0.5,
                vertices: 32,
            })
            .location(Vec3::new(0.3 * (i as f32 - center), -1.5, -0.1))
            .build()?;
            parts.push((
                NodeDesc::mesh(&engine, nozzle)
                    .with_appearance(Material::new(format!("EngineMaterial_{i}")).with_rgb(Vec3::splat(0.1))),
                Some(body.to_string()),
            ));
            parts.push((
                NodeDesc::light(
                    format!("EngineGlow_{i}"),
                    engine_light(Vec3::new(0.2, 0.5, 1.0)),
                    Vec3::new(0.0, -0.3, 0.0),
                ),
                Some(engine),
            ));
        }

        let cockpit = create_sphere(SphereOptions {
            radius: 0.3,
            segments: 16,
            rings: 8,
        })
        .location(Vec3::new(0.0, 1.2, 0.2))
        .scale(Vec3::new(0.5, 0.7, 0.4))
        .build()?;
        parts.push((
            NodeDesc::mesh("Cockpit", cockpit)
                .with_appearance(Material::new("CockpitMaterial").with_color(Vec4::new(0.8, 0.9, 1.0, 0.3))),
            Some(body.to_string()),
        ));

        Ok(parts)
    }
}

impl SceneGenerator for DynamicSpaceship {
    fn name(&self) -> &'static str {
        "dynamic_spaceship"
    }

    fn default_settings(&self) -> GenerationSettings {
        GenerationSettings {
            fps: 30,
            frame_end: 300,
            output: "dynamic_spaceship.fbx".into(),
            ..GenerationSettings::default()
        }
    }

    fn generate(&self, ctx: &mut GenerationContext) -> Result<Vec<NodeHandle>> {
        if self.engine_count == 0 {
            return Err(ForgeError::InvalidParameter("a spaceship needs at least one engine".into()));
        }
        if self.pulse_frames == 0 {
            return Err(ForgeError::InvalidParameter("pulse_frames must be positive".into()));
        }

        let handles = ctx.compose(self.parts()?)?;
        let body = handles[0];

        // Side to side once, up and down twice, two full rolls over the run.
        let flight = ctx.synthesizer();
        ctx.animate(
            "ComplexFlightPath",
            body,
            &flight,
            vec![
                (Channel::object(Property::Location, 0), Sampler::sin(self.sweep, 1.0)),
                (
                    Channel::object(Property::Location, 1),
                    Sampler::ramp(-self.sweep, self.sweep),
                ),
                (Channel::object(Property::Location, 2), Sampler::sin(0.5 * self.sweep, 2.0)),
                (Channel::object(Property::RotationEuler, 0), Sampler::ramp(0.0, 2.0 * TAU)),
            ],
        )?;

        let pulse = Synthesizer::new(FrameSpan::new(self.pulse_frames, ctx.settings.fps));
        for i in 0..self.engine_count {
            let name = format!("EngineGlow_{i}");
            let light = ctx
                .scene
                .node_by_name(&name)
                .ok_or_else(|| ForgeError::UnknownNode(name.clone()))?;
            ctx.animate(
                &format!("EnginePulse_{name}"),
                light,
                &pulse,
                vec![(
                    Channel::object(Property::LightEnergy, 0),
                    Sampler::sin(5.0, 1.0).plus(Sampler::Constant(10.0)),
                )],
            )?;
        }

        Stage {
            camera_location: Vec3::new(0.0, -20.0, 5.0),
            camera_rotation: Vec3::new(80.0, 0.0, 0.0),
            sun_location: Vec3::new(5.0, 5.0, 10.0),
            sun_energy: 3.0,
        }
        .place(ctx)?;
        Ok(ctx.roots())
    }
}

// ============================================================================
// Detailed spaceship
// ============================================================================

pub const DETAILED_RECIPE: Recipe = Recipe::new(
    "detailed_spaceship",
    &[
        PartLink::root("Body"),
        PartLink::child("Cockpit", "Body"),
        PartLink::child("Wing_L", "Body"),
        PartLink::child("Wing_R", "Body"),
        PartLink::child("Engine_L", "Body"),
        PartLink::child("Engine_R", "Body"),
        PartLink::child("Thruster_L", "Engine_L"),
        PartLink::child("Thruster_R", "Engine_R"),
        PartLink::child("ThrusterGlow_L", "Engine_L"),
        PartLink::child("ThrusterGlow_R", "Engine_R"),
        PartLink::child("Antenna", "Body"),
        PartLink::child("Weapon_L", "Body"),
        PartLink::child("Weapon_R", "Body"),
    ],
);

#[derive(Debug, Clone, PartialEq)]
pub struct DetailedSpaceship {
    pub hover_height: f32,
    /// Half range of the random thruster energy.
    pub flicker: f32,
}

impl Default for DetailedSpaceship {
    fn default() -> Self {
        Self {
            hover_height: 0.2,
            flicker: 2.0,
        }
    }
}

impl DetailedSpaceship {
    fn describe(part: &'static str) -> Result<NodeDesc> {
        let side = if part.ends_with("_L") { -1.0 } else { 1.0 };
        let tinted = |rgba: Vec4| Material::new(format!("{part}Material")).with_color(rgba);
        let cylinder = |radius, depth| {
            create_cylinder(CylinderOptions {
                radius,
                depth,
                vertices: 32,
            })
        };
        // Children of an engine sit behind its nozzle.
        let behind_engine = Vec3::new(0.0, -0.3, 0.0);

        let desc = match part {
            "Body" => NodeDesc::baked_mesh(
                part,
                create_sphere(SphereOptions {
                    radius: 1.0,
                    segments: 16,
                    rings: 8,
                })
                .scale(Vec3::new(1.0, 2.0, 0.5))
                .build()?,
            )
            .with_appearance(tinted(Vec4::new(0.2, 0.2, 0.8, 1.0))),
            "Cockpit" => NodeDesc::mesh(
                part,
                create_sphere(SphereOptions {
                    radius: 0.3,
                    ..SphereOptions::default()
                })
                .location(Vec3::new(0.0, 0.8, 0.3))
                .build()?,
            )
            .with_appearance(tinted(Vec4::new(0.8, 0.8, 1.0, 0.5))),
            "Wing_L" | "Wing_R" => NodeDesc::mesh(
                part,
                create_cube(Vec3::ONE)
                    .location(Vec3::new(0.8 * side, 0.0, 0.0))
                    .scale(Vec3::new(0.5, 1.5, 0.1))
                    .build()?,
            )
            .with_appearance(Material::new("WingMaterial").with_rgb(Vec3::splat(0.5))),
            "Engine_L" | "Engine_R" => NodeDesc::mesh(
                part,
                cylinder(0.2, 0.5)
                    .location(Vec3::new(0.5 * side, -1.0, -0.1))
                    .build()?,
            )
            .with_appearance(Material::new("EngineMaterial").with_rgb(Vec3::splat(0.2))),
            "Thruster_L" | "Thruster_R" => NodeDesc::mesh(
                part,
                create_cone(ConeOptions {
                    radius_bottom: 0.15,
                    radius_top: 0.1,
                    depth: 0.2,
                    vertices: 32,
                })
                .location(behind_engine)
                .build()?,
            )
            .with_appearance(Material::new("ThrusterMaterial").with_rgb(Vec3::new(0.8, 0.4, 0.1))),
            "ThrusterGlow_L" | "ThrusterGlow_R" => {
                NodeDesc::light(part, engine_light(Vec3::new(1.0, 0.5, 0.1)), behind_engine)
            }
            "Antenna" => NodeDesc::mesh(part, cylinder(0.02, 0.3).location(Vec3::new(0.0, 0.0, 0.3)).build()?)
                .with_appearance(tinted(Vec4::new(0.1, 0.1, 0.1, 1.0))),
            "Weapon_L" | "Weapon_R" => NodeDesc::mesh(
                part,
                create_cube(Vec3::splat(0.2))
                    .location(Vec3::new(0.5 * side, 0.5, -0.1))
                    .scale(Vec3::new(0.1, 0.3, 0.1))
                    .build()?,
            )
            .with_appearance(Material::new("WeaponMaterial").with_rgb(Vec3::splat(0.3))),
            other => {
                return Err(ForgeError::InvalidParameter(format!("unknown spaceship part `{other}`")));
            }
        };
        Ok(desc)
    }
}

impl SceneGenerator for DetailedSpaceship {
    fn name(&self) -> &'static str {
        "detailed_spaceship"
    }

    fn default_settings(&self) -> GenerationSettings {
        GenerationSettings {
            fps: 30,
            frame_end: 100,
            output: "detailed_spaceship.fbx".into(),
            ..GenerationSettings::default()
        }
    }

    fn generate(&self, ctx: &mut GenerationContext) -> Result<Vec<NodeHandle>> {
        let parts = DETAILED_RECIPE.instantiate("", Self::describe)?;
        let handles = ctx.compose(parts)?;
        let lookup = |part: &str| -> Result<NodeHandle> {
            DETAILED_RECIPE
                .links
                .iter()
                .position(|link| link.part == part)
                .map(|i| handles[i])
                .ok_or_else(|| ForgeError::UnknownNode(part.to_string()))
        };

        let synthesizer = ctx.synthesizer();
        ctx.animate(
            "HoverAnimation",
            lookup("Body")?,
            &synthesizer,
            vec![(Channel::object(Property::Location, 2), Sampler::sin(self.hover_height, 1.0))],
        )?;

        for weapon in ["Weapon_L", "Weapon_R"] {
            ctx.animate(
                &format!("WeaponRotation_{weapon}"),
                lookup(weapon)?,
                &synthesizer,
                vec![(Channel::object(Property::RotationEuler, 2), full_turn())],
            )?;
        }

        for glow in ["ThrusterGlow_L", "ThrusterGlow_R"] {
            ctx.animate(
                &format!("ThrusterFlicker_{glow}"),
                lookup(glow)?,
                &synthesizer,
                vec![(Channel::object(Property::LightEnergy, 0), Sampler::jitter(10.0, self.flicker))],
            )?;
        }

        Stage::CLOSE_UP.place(ctx)?;
        Ok(ctx.roots())
    }
}
