//! Generation Settings & Export Options
//!
//! [`GenerationSettings`] carries everything a generation pass needs besides
//! the generator itself: timeline, frame rate, random seed, destination and
//! the options handed to the host's interchange writer.
//!
//! Every field has a default, so a settings file only needs the keys it
//! changes.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use forge_core::settings::GenerationSettings;
//!
//! let settings = GenerationSettings::from_json_str(r#"{ "fps": 30, "seed": 7 }"#)?;
//! assert_eq!(settings.frame_end, 100);
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{ForgeError, Result};

// ---------------------------------------------------------------------------
// ExportOptions
// ---------------------------------------------------------------------------

/// How referenced files (textures) are written next to the interchange file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathMode {
    /// Let the host decide.
    #[default]
    Auto,
    /// Copy referenced files to the destination.
    Copy,
    /// Keep absolute paths.
    Absolute,
}

/// Options forwarded to the host's interchange writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Bake every action, not only the active one.
    pub bake_all_actions: bool,
    /// Sampling step, in frames, used when baking.
    pub sample_step: f32,
    /// Curve simplification applied when baking; 0 keeps every sample.
    pub bake_simplify_factor: f32,
    /// Embed textures into the interchange file.
    pub embed_textures: bool,
    /// Export only the selected roots rather than the whole document.
    pub use_selection: bool,
    /// Apply mesh modifiers (armature deformation) on export.
    pub use_mesh_modifiers: bool,
    pub path_mode: PathMode,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            bake_all_actions: true,
            sample_step: 1.0,
            bake_simplify_factor: 1.0,
            embed_textures: true,
            use_selection: true,
            use_mesh_modifiers: true,
            path_mode: PathMode::Copy,
        }
    }
}

impl ExportOptions {
    pub fn validate(&self) -> Result<()> {
        if !(self.sample_step.is_finite() && self.sample_step > 0.0) {
            return Err(ForgeError::InvalidParameter(format!(
                "export sample_step must be positive, got {}",
                self.sample_step
            )));
        }
        if !(self.bake_simplify_factor.is_finite() && self.bake_simplify_factor >= 0.0) {
            return Err(ForgeError::InvalidParameter(format!(
                "export bake_simplify_factor must be non-negative, got {}",
                self.bake_simplify_factor
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// GenerationSettings
// ---------------------------------------------------------------------------

/// Timeline, randomness and output configuration of one generation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Scene frame rate.
    pub fps: u32,
    /// First frame of the scene timeline.
    pub frame_start: i32,
    /// Last frame of the scene timeline (inclusive).
    pub frame_end: i32,
    /// Seed for the pass's random source; `None` draws from the OS.
    pub seed: Option<u64>,
    /// Interchange file the host writes.
    pub output: PathBuf,
    pub export: ExportOptions,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            fps: 24,
            frame_start: 0,
            frame_end: 100,
            seed: None,
            output: PathBuf::from("scene.fbx"),
            export: ExportOptions::default(),
        }
    }
}

impl GenerationSettings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        log::debug!("Loading generation settings from {}", path.as_ref().display());
        Self::from_json_str(&text)
    }

    /// Applies the keys present in `json` on top of `self`. Nested objects
    /// are merged key by key, so `{"export": {"embed_textures": false}}`
    /// leaves the other export options untouched.
    pub fn overlay_json(&self, json: &str) -> Result<Self> {
        let mut base = serde_json::to_value(self)?;
        let patch: serde_json::Value = serde_json::from_str(json)?;
        merge_values(&mut base, patch);

        let settings: Self = serde_json::from_value(base)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Number of frames after the start frame; keyframes cover
    /// `[0, frame_count]` relative to `frame_start`.
    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> u32 {
        (self.frame_end - self.frame_start).max(0) as u32
    }

    pub fn validate(&self) -> Result<()> {
        if self.fps == 0 {
            return Err(ForgeError::InvalidParameter("fps must be positive".into()));
        }
        if self.frame_end < self.frame_start {
            return Err(ForgeError::InvalidParameter(format!(
                "frame_end {} precedes frame_start {}",
                self.frame_end, self.frame_start
            )));
        }
        self.export.validate()
    }
}

fn merge_values(base: &mut serde_json::Value, patch: serde_json::Value) {
    match (base, patch) {
        (serde_json::Value::Object(base), serde_json::Value::Object(patch)) => {
            for (key, value) in patch {
                match base.get_mut(&key) {
                    Some(slot) => merge_values(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
