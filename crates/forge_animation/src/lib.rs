//! Animation data and curve synthesis for Scene Forge.
//!
//! An [`Action`] holds the [`KeyframeTrack`]s of one animated node. The
//! [`Synthesizer`] fills tracks by sampling a [`Sampler`] over a
//! [`FrameSpan`]; the [`AnimationLibrary`] owns every action of a pass.

pub mod action;
pub mod channel;
pub mod library;
pub mod sampler;
pub mod synthesizer;
pub mod tracks;

pub use action::Action;
pub use channel::{Channel, Property};
pub use library::AnimationLibrary;
pub use sampler::{Sampler, Wave};
pub use synthesizer::{FrameSpan, SynthesisPolicy, Synthesizer, TimeBase};
pub use tracks::{Interpolation, Keyframe, KeyframeTrack};
