//! Scene graph assembly for Scene Forge.
//!
//! - [`Scene`]: node, material and armature storage with a name index
//! - [`assembler`]: `compose` and `merge_subtree`
//! - [`recipe`]: static part/parent tables
//! - [`appearance`]: material binding
//! - [`skeleton`]: armatures, the rig builder and mesh binding

pub mod appearance;
pub mod assembler;
pub mod camera;
pub mod light;
pub mod node;
pub mod recipe;
pub mod scene;
pub mod skeleton;
pub mod transform_system;

pub use appearance::{Appearance, assign};
pub use assembler::{MergeReport, NodeDesc, Part, compose, merge_subtree};
pub use camera::Camera;
pub use light::{Light, LightKind};
pub use node::{Node, NodeContent, SkinBinding};
pub use recipe::{PartLink, Recipe};
pub use scene::Scene;
pub use skeleton::{Armature, Bone, BoneSpec, Rig, RigBuilder, bind};
