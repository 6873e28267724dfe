//! Scene recipes
//!
//! Each generator is a small struct holding its tunable counts and sizes;
//! [`SceneGenerator::generate`] turns it into parts, rigs and actions.
//! Every scene also gets a camera and a sun from [`Stage`].

pub mod figure;
pub mod forest;
pub mod meadow;
pub mod nature;
pub mod spaceship;

pub use figure::RunningFigure;
pub use forest::LowPolyForest;
pub use meadow::GrassAndRocks;
pub use nature::NatureWalk;
pub use spaceship::{DetailedSpaceship, DynamicSpaceship};

use std::f32::consts::TAU;

use forge_animation::channel::{Channel, Property};
use forge_animation::sampler::{Sampler, Wave};
use forge_core::errors::Result;
use forge_core::handles::NodeHandle;
use forge_core::transform::euler_to_quat;
use forge_scene::assembler::{NodeDesc, Part};
use forge_scene::camera::Camera;
use forge_scene::light::Light;
use glam::Vec3;
use rand::Rng;

use crate::pass::{GenerationContext, SceneGenerator};

/// Catalog names, in the order [`all`] returns them.
pub const NAMES: [&str; 6] = [
    "running_figure",
    "dynamic_spaceship",
    "detailed_spaceship",
    "low_poly_forest",
    "grass_and_rocks",
    "nature_walk",
];

/// Every generator with its default parameters.
#[must_use]
pub fn all() -> Vec<Box<dyn SceneGenerator>> {
    NAMES.iter().filter_map(|name| by_name(name)).collect()
}

#[must_use]
pub fn by_name(name: &str) -> Option<Box<dyn SceneGenerator>> {
    let generator: Box<dyn SceneGenerator> = match name {
        "running_figure" => Box::new(RunningFigure::default()),
        "dynamic_spaceship" => Box::new(DynamicSpaceship::default()),
        "detailed_spaceship" => Box::new(DetailedSpaceship::default()),
        "low_poly_forest" => Box::new(LowPolyForest::default()),
        "grass_and_rocks" => Box::new(GrassAndRocks::default()),
        "nature_walk" => Box::new(NatureWalk::default()),
        _ => return None,
    };
    Some(generator)
}

// ============================================================================
// Stage
// ============================================================================

/// Camera and sun placement shared by every scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stage {
    pub camera_location: Vec3,
    /// XYZ Euler angles in degrees.
    pub camera_rotation: Vec3,
    pub sun_location: Vec3,
    pub sun_energy: f32,
}

impl Stage {
    /// Camera at `(5, -5, 3)` looking across the origin, sun of energy 2.
    pub const CLOSE_UP: Self = Self {
        camera_location: Vec3::new(5.0, -5.0, 3.0),
        camera_rotation: Vec3::new(60.0, 0.0, 45.0),
        sun_location: Vec3::new(5.0, 5.0, 10.0),
        sun_energy: 2.0,
    };

    #[must_use]
    pub fn parts(&self) -> Vec<Part> {
        let r = self.camera_rotation;
        let rotation = euler_to_quat(Vec3::new(r.x.to_radians(), r.y.to_radians(), r.z.to_radians()));
        vec![
            (
                NodeDesc::camera("Camera", Camera::default(), self.camera_location, rotation),
                None,
            ),
            (
                NodeDesc::light("Sun", Light::sun(self.sun_energy), self.sun_location),
                None,
            ),
        ]
    }

    pub fn place(&self, ctx: &mut GenerationContext) -> Result<Vec<NodeHandle>> {
        ctx.compose(self.parts())
    }
}

// ============================================================================
// Shared helpers
// ============================================================================

/// Uniform point in the square `[-half, half]²` on the ground.
pub(crate) fn scatter<R: Rng + ?Sized>(rng: &mut R, half: f32) -> (f32, f32) {
    (rng.random_range(-half..=half), rng.random_range(-half..=half))
}

/// Wind sway on `rotation_euler` X and Y with time in seconds:
/// `x = sin(speed t) strength`, `y = cos(0.7 speed t) strength / 2`.
pub(crate) fn sway(strength: f32, speed: f32) -> Vec<(Channel, Sampler)> {
    vec![
        (
            Channel::object(Property::RotationEuler, 0),
            Sampler::angular(Wave::Sin, strength, speed, 0.0),
        ),
        (
            Channel::object(Property::RotationEuler, 1),
            Sampler::angular(Wave::Cos, strength * 0.5, speed * 0.7, 0.0),
        ),
    ]
}

/// The four `rotation_quaternion` components of a pose bone: `w` held at 1,
/// `x y z` from `axes`.
pub(crate) fn bone_rotation(bone: &str, axes: [Sampler; 3]) -> Vec<(Channel, Sampler)> {
    let mut channels = vec![(
        Channel::bone(bone, Property::RotationQuaternion, 0),
        Sampler::Constant(1.0),
    )];
    channels.extend(
        axes.into_iter()
            .enumerate()
            .map(|(i, sampler)| (Channel::bone(bone, Property::RotationQuaternion, i + 1), sampler)),
    );
    channels
}

/// One full turn per span.
pub(crate) fn full_turn() -> Sampler {
    Sampler::ramp(0.0, TAU)
}
