//! Materials
//!
//! A [`Material`] is the flat surface description handed to the host: base
//! colour, roughness, metallic and an optional emission used for engine glow.
//! [`ColorVariance`] derives per-node colours from a base material.

use forge_core::color::{clamp_rgba, is_unit_rgba};
use forge_core::errors::{ForgeError, Result};
use glam::{Vec3, Vec4};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    /// Linear RGBA, each channel in `[0, 1]`.
    pub base_color: Vec4,
    pub roughness: f32,
    pub metallic: f32,
    pub emission: Vec3,
    pub emission_strength: f32,
}

impl Material {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_color: Vec4::ONE,
            roughness: 0.5,
            metallic: 0.0,
            emission: Vec3::ZERO,
            emission_strength: 0.0,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: Vec4) -> Self {
        self.base_color = color;
        self
    }

    #[must_use]
    pub fn with_rgb(mut self, rgb: Vec3) -> Self {
        self.base_color = rgb.extend(1.0);
        self
    }

    #[must_use]
    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness;
        self
    }

    #[must_use]
    pub fn with_metallic(mut self, metallic: f32) -> Self {
        self.metallic = metallic;
        self
    }

    #[must_use]
    pub fn with_emission(mut self, color: Vec3, strength: f32) -> Self {
        self.emission = color;
        self.emission_strength = strength;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !is_unit_rgba(self.base_color) {
            return Err(ForgeError::InvalidParameter(format!(
                "material `{}` base colour {} is outside [0, 1]",
                self.name, self.base_color
            )));
        }
        for (label, value) in [("roughness", self.roughness), ("metallic", self.metallic)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ForgeError::InvalidParameter(format!(
                    "material `{}` {label} {value} is outside [0, 1]",
                    self.name
                )));
            }
        }
        if !(self.emission_strength.is_finite() && self.emission_strength >= 0.0) {
            return Err(ForgeError::InvalidParameter(format!(
                "material `{}` emission strength must be non-negative",
                self.name
            )));
        }
        Ok(())
    }
}

/// How [`ColorVariance`] draws its per-channel offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VarianceMode {
    /// Uniform in `[-spread, spread]`.
    #[default]
    Symmetric,
    /// Uniform in `[0, spread]`.
    Additive,
}

/// Bounded random perturbation of a colour's RGB channels. Alpha is kept.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorVariance {
    pub spread: Vec3,
    pub mode: VarianceMode,
}

impl ColorVariance {
    #[must_use]
    pub fn symmetric(spread: Vec3) -> Self {
        Self {
            spread,
            mode: VarianceMode::Symmetric,
        }
    }

    #[must_use]
    pub fn additive(spread: Vec3) -> Self {
        Self {
            spread,
            mode: VarianceMode::Additive,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.spread.is_finite() {
            return Err(ForgeError::InvalidParameter(format!(
                "colour variance spread {} must be finite",
                self.spread
            )));
        }
        Ok(())
    }

    /// Perturbs `color` and clamps the result into `[0, 1]`.
    ///
    /// The spread must be finite; see [`ColorVariance::validate`].
    pub fn apply<R: Rng + ?Sized>(&self, color: Vec4, rng: &mut R) -> Vec4 {
        let mut offset = [0.0f32; 3];
        for (channel, spread) in offset.iter_mut().zip(self.spread.abs().to_array()) {
            if spread == 0.0 {
                continue;
            }
            *channel = match self.mode {
                VarianceMode::Symmetric => rng.random_range(-spread..=spread),
                VarianceMode::Additive => rng.random_range(0.0..=spread),
            };
        }
        clamp_rgba(color + Vec3::from_array(offset).extend(0.0))
    }
}
