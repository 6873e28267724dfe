//! Handle types shared by every Scene Forge crate.
//!
//! Keys are generational (`slotmap`), so a handle from a removed entity never
//! aliases a newer one.

use slotmap::new_key_type;

new_key_type! {
    /// A node in the scene graph.
    pub struct NodeHandle;
    /// A material owned by the scene.
    pub struct MaterialKey;
    /// An armature (bone hierarchy) owned by the scene.
    pub struct ArmatureKey;
    /// An animation action owned by the animation library.
    pub struct ActionKey;
}
