use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LightKind {
    /// Omnidirectional light with a soft-shadow radius.
    Point { radius: f32 },
    /// Directional light; `angle` is the angular diameter of the source.
    Sun { angle: f32 },
}

/// Light component of a scene node. Energy is in host units (watts for
/// point lights, irradiance for suns).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub color: Vec3,
    pub energy: f32,
    pub kind: LightKind,
}

impl Light {
    #[must_use]
    pub fn point(color: Vec3, energy: f32, radius: f32) -> Self {
        Self {
            color,
            energy,
            kind: LightKind::Point { radius },
        }
    }

    #[must_use]
    pub fn sun(energy: f32) -> Self {
        Self {
            color: Vec3::ONE,
            energy,
            kind: LightKind::Sun { angle: 0.00918 },
        }
    }
}
