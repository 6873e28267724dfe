//! # Scene Forge
//!
//! Procedural 3D scene generation: shapes are composed into parented
//! hierarchies, optionally rigged and animated, and the finished scene is
//! handed to an external 3D host for export.
//!
//! The work is split across the member crates, re-exported here:
//!
//! - [`core`]: errors, handles, transforms, colour maths, random source, settings
//! - [`resources`]: shape descriptors, geometry and materials
//! - [`scene`]: the scene graph, composition, appearance binding and rigs
//! - [`animation`]: keyframe tracks, actions and curve synthesis
//! - [`assets`]: the host interface and the exporter
//!
//! [`pass`] drives one generation pass end to end and [`generators`] holds
//! the scene recipes.
//!
//! ```rust,ignore
//! use forge::assets::RecordingHost;
//! use forge::generators;
//! use forge::pass::run_pass;
//!
//! let generator = generators::by_name("running_figure").unwrap();
//! let mut host = RecordingHost::new();
//! let report = run_pass(generator.as_ref(), generator.default_settings(), &mut host)?;
//! println!("{} keyframes", report.keyframes);
//! ```

pub use forge_animation as animation;
pub use forge_assets as assets;
pub use forge_core as core;
pub use forge_resources as resources;
pub use forge_scene as scene;

pub mod generators;
pub mod pass;

pub use forge_core::{ForgeError, GenerationSettings, Result};
pub use pass::{GenerationContext, PassReport, SceneGenerator, run_pass};
