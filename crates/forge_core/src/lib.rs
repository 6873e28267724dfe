//! Core types shared by every Scene Forge crate.
//!
//! - [`errors`]: the [`ForgeError`] taxonomy and crate-wide [`Result`]
//! - [`handles`]: generational keys for nodes, materials, armatures and actions
//! - [`transform`]: local TRS with cached matrices
//! - [`color`]: HSV conversion and colour helpers
//! - [`random`]: the seedable random source threaded through a pass
//! - [`settings`]: [`GenerationSettings`] and [`ExportOptions`]

pub mod color;
pub mod errors;
pub mod handles;
pub mod random;
pub mod settings;
pub mod transform;

pub use color::{Hsv, hsv_to_rgb};
pub use errors::{ErrorKind, ForgeError, HostError, Result};
pub use handles::{ActionKey, ArmatureKey, MaterialKey, NodeHandle};
pub use random::ForgeRng;
pub use settings::{ExportOptions, GenerationSettings, PathMode};
pub use transform::Transform;

pub use glam;
pub use rand;
