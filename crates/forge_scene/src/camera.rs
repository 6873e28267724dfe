use serde::{Deserialize, Serialize};

/// Perspective camera component. The camera looks down its local -Z axis
/// with +Y up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov_y: 39.6_f32.to_radians(),
            near: 0.1,
            far: 100.0,
        }
    }
}
