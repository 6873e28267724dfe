//! Animation Curve Synthesizer
//!
//! Evaluates samplers at every integer frame of a [`FrameSpan`] and writes
//! one keyframe per frame into an action. The resulting tracks cover
//! `[0, frame_count]` with no gaps or repeats.
//!
//! ```rust,ignore
//! let synth = Synthesizer::new(FrameSpan::new(40, 24));
//! synth.synthesize(
//!     action,
//!     Channel::bone("Spine", Property::RotationQuaternion, 1),
//!     &Sampler::sin(0.1, 1.0),
//!     &mut rng,
//! )?;
//! ```

use forge_core::errors::{ForgeError, Result};
use rand::Rng;

use crate::action::Action;
use crate::channel::Channel;
use crate::sampler::Sampler;
use crate::tracks::{Interpolation, KeyframeTrack};

/// What the `t` passed to samplers means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeBase {
    /// `frame / frame_count`, so the span runs from 0 to 1.
    #[default]
    Normalized,
    /// The frame number itself.
    Frame,
    /// `frame / fps`.
    Seconds,
}

/// Frames `0..=frame_count` at a frame rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSpan {
    pub frame_count: u32,
    pub fps: u32,
    pub time_base: TimeBase,
}

impl FrameSpan {
    #[must_use]
    pub fn new(frame_count: u32, fps: u32) -> Self {
        Self {
            frame_count,
            fps,
            time_base: TimeBase::Normalized,
        }
    }

    #[must_use]
    pub fn with_time_base(mut self, time_base: TimeBase) -> Self {
        self.time_base = time_base;
        self
    }

    pub fn frames(&self) -> impl Iterator<Item = i32> + use<> {
        0..=self.frame_count as i32
    }

    /// Number of keys a full synthesis produces.
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.frame_count as usize + 1
    }

    #[must_use]
    pub fn time_at(&self, frame: i32) -> f32 {
        match self.time_base {
            TimeBase::Normalized if self.frame_count == 0 => 0.0,
            TimeBase::Normalized => frame as f32 / self.frame_count as f32,
            TimeBase::Frame => frame as f32,
            TimeBase::Seconds => frame as f32 / self.fps.max(1) as f32,
        }
    }
}

/// What happens when a channel already has a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SynthesisPolicy {
    /// Fail with [`ForgeError::DuplicateTrack`].
    #[default]
    Reject,
    /// Discard the old track.
    Replace,
}

#[derive(Debug, Clone, Copy)]
pub struct Synthesizer {
    pub span: FrameSpan,
    pub policy: SynthesisPolicy,
    pub interpolation: Interpolation,
}

impl Synthesizer {
    #[must_use]
    pub fn new(span: FrameSpan) -> Self {
        Self {
            span,
            policy: SynthesisPolicy::Reject,
            interpolation: Interpolation::Bezier,
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: SynthesisPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Samples `sampler` on every frame of the span into a new track for
    /// `channel`. Returns the number of keys written.
    pub fn synthesize<R: Rng + ?Sized>(
        &self,
        action: &mut Action,
        channel: Channel,
        sampler: &Sampler,
        rng: &mut R,
    ) -> Result<usize> {
        self.check_channel(action, &channel)?;
        sampler.validate()?;
        let track = self.build_track(channel, sampler, rng)?;
        self.store(action, track)
    }

    /// Synthesizes several channels over the same span.
    ///
    /// All channels are checked before any track is written. Samplers run
    /// one channel at a time, in the given order, so random draws are
    /// reproducible for a given seed.
    pub fn synthesize_composite<R: Rng + ?Sized>(
        &self,
        action: &mut Action,
        channels: Vec<(Channel, Sampler)>,
        rng: &mut R,
    ) -> Result<usize> {
        for (i, (channel, sampler)) in channels.iter().enumerate() {
            self.check_channel(action, channel)?;
            sampler.validate()?;
            if channels[..i].iter().any(|(c, _)| c == channel) {
                return Err(ForgeError::DuplicateTrack {
                    action: action.name.clone(),
                    channel: channel.to_string(),
                });
            }
        }

        let tracks = channels
            .into_iter()
            .map(|(channel, sampler)| self.build_track(channel, &sampler, rng))
            .collect::<Result<Vec<_>>>()?;

        let mut written = 0;
        for track in tracks {
            written += self.store(action, track)?;
        }
        Ok(written)
    }

    fn check_channel(&self, action: &Action, channel: &Channel) -> Result<()> {
        if !channel.is_valid() {
            return Err(ForgeError::InvalidChannel {
                path: channel.data_path(),
                arity: channel.property.arity(),
                index: channel.index,
            });
        }
        if self.policy == SynthesisPolicy::Reject && action.has_track(channel) {
            return Err(ForgeError::DuplicateTrack {
                action: action.name.clone(),
                channel: channel.to_string(),
            });
        }
        Ok(())
    }

    fn build_track<R: Rng + ?Sized>(
        &self,
        channel: Channel,
        sampler: &Sampler,
        rng: &mut R,
    ) -> Result<KeyframeTrack> {
        let mut track = KeyframeTrack::with_capacity(channel, self.interpolation, self.span.key_count());
        for frame in self.span.frames() {
            let t = self.span.time_at(frame);
            track.push(frame, sampler.sample(t, rng))?;
        }
        Ok(track)
    }

    fn store(&self, action: &mut Action, track: KeyframeTrack) -> Result<usize> {
        if action.remove_track(&track.channel).is_some() {
            log::warn!("Replacing track `{}` in action `{}`", track.channel, action.name);
        }
        let written = track.len();
        log::debug!(
            "Synthesized {written} keys for `{}` in action `{}`",
            track.channel,
            action.name
        );
        action.add_track(track)?;
        Ok(written)
    }
}
