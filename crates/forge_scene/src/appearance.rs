//! Appearance Binder
//!
//! Attaches materials to nodes. A plain [`Appearance`] binds its material by
//! name, creating it the first time and reusing it afterwards, so every
//! node sharing an appearance shares one material. An appearance with a
//! [`ColorVariance`] derives a fresh material per node instead.

use forge_core::errors::Result;
use forge_core::handles::{MaterialKey, NodeHandle};
use forge_resources::material::{ColorVariance, Material};
use rand::Rng;

use crate::scene::Scene;

#[derive(Debug, Clone, PartialEq)]
pub struct Appearance {
    pub material: Material,
    pub variance: Option<ColorVariance>,
}

impl Appearance {
    #[must_use]
    pub fn shared(material: Material) -> Self {
        Self {
            material,
            variance: None,
        }
    }

    #[must_use]
    pub fn varied(material: Material, variance: ColorVariance) -> Self {
        Self {
            material,
            variance: Some(variance),
        }
    }

    /// Checks the base material and, if present, the variance.
    pub fn validate(&self) -> Result<()> {
        self.material.validate()?;
        if let Some(variance) = &self.variance {
            variance.validate()?;
        }
        Ok(())
    }
}

impl From<Material> for Appearance {
    fn from(material: Material) -> Self {
        Self::shared(material)
    }
}

/// Binds `appearance` to `node` and returns the material used.
///
/// Without variance no random draws are made, so the result only depends on
/// the scene's existing materials.
pub fn assign<R: Rng + ?Sized>(
    scene: &mut Scene,
    node: NodeHandle,
    appearance: &Appearance,
    rng: &mut R,
) -> Result<MaterialKey> {
    let node_name = scene.require(node)?.name().to_string();

    let key = match &appearance.variance {
        None => match scene.material_by_name(&appearance.material.name) {
            Some(existing) => existing,
            None => scene.add_material(appearance.material.clone())?,
        },
        Some(variance) => {
            variance.validate()?;
            let mut material = appearance.material.clone();
            material.base_color = variance.apply(material.base_color, rng);
            material.name = scene.unique_material_name(&format!("{node_name}_Material"));
            scene.add_material(material)?
        }
    };

    scene.attach_material(node, key)?;
    log::trace!("Bound material {key:?} to `{node_name}`");
    Ok(key)
}
