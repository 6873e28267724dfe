use forge_core::errors::{ForgeError, Result};
use serde::{Deserialize, Serialize};

use crate::channel::Channel;

/// How a segment is evaluated from its first key to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    Constant,
    Linear,
    /// Smooth cubic through the keys, with automatic tangents.
    #[default]
    Bezier,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub frame: i32,
    pub value: f32,
    pub interpolation: Interpolation,
}

/// Keys of one channel, strictly increasing in frame.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframeTrack {
    pub channel: Channel,
    pub interpolation: Interpolation,
    keys: Vec<Keyframe>,
}

impl KeyframeTrack {
    #[must_use]
    pub fn new(channel: Channel, interpolation: Interpolation) -> Self {
        Self {
            channel,
            interpolation,
            keys: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_capacity(channel: Channel, interpolation: Interpolation, capacity: usize) -> Self {
        Self {
            channel,
            interpolation,
            keys: Vec::with_capacity(capacity),
        }
    }

    /// Appends a key with the track's interpolation. The frame must be after
    /// the last key.
    pub fn push(&mut self, frame: i32, value: f32) -> Result<()> {
        self.push_key(Keyframe {
            frame,
            value,
            interpolation: self.interpolation,
        })
    }

    pub fn push_key(&mut self, key: Keyframe) -> Result<()> {
        if let Some(last) = self.keys.last()
            && key.frame <= last.frame
        {
            return Err(ForgeError::NonIncreasingKeyframe {
                channel: self.channel.to_string(),
                last: last.frame,
                frame: key.frame,
            });
        }
        if !key.value.is_finite() {
            return Err(ForgeError::InvalidParameter(format!(
                "non-finite value at frame {} in `{}`",
                key.frame, self.channel
            )));
        }
        self.keys.push(key);
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// First and last frame.
    #[must_use]
    pub fn frame_range(&self) -> Option<(i32, i32)> {
        Some((self.keys.first()?.frame, self.keys.last()?.frame))
    }

    /// Value of the key exactly at `frame`.
    #[must_use]
    pub fn value_at(&self, frame: i32) -> Option<f32> {
        self.keys
            .binary_search_by_key(&frame, |k| k.frame)
            .ok()
            .map(|i| self.keys[i].value)
    }

    /// Evaluates the curve at a (possibly fractional) frame. Outside the
    /// keyed range the nearest end key holds.
    #[must_use]
    pub fn sample(&self, frame: f32) -> Option<f32> {
        let first = self.keys.first()?;
        let last = self.keys.last()?;
        if frame <= first.frame as f32 {
            return Some(first.value);
        }
        if frame >= last.frame as f32 {
            return Some(last.value);
        }

        // First key strictly after `frame`; at least 1 and below len here.
        let next = self.keys.partition_point(|k| k.frame as f32 <= frame);
        let index = next - 1;
        let k0 = self.keys[index];
        let k1 = self.keys[next];

        let dt = (k1.frame - k0.frame) as f32;
        let t = ((frame - k0.frame as f32) / dt).clamp(0.0, 1.0);

        Some(match k0.interpolation {
            Interpolation::Constant => k0.value,
            Interpolation::Linear => k0.value + (k1.value - k0.value) * t,
            Interpolation::Bezier => {
                let m0 = self.tangent(index);
                let m1 = self.tangent(next);
                hermite(k0.value, m0, k1.value, m1, t, dt)
            }
        })
    }

    /// Catmull-Rom slope (value per frame) at a key; flat at the ends.
    fn tangent(&self, index: usize) -> f32 {
        if index == 0 || index + 1 >= self.keys.len() {
            return 0.0;
        }
        let prev = self.keys[index - 1];
        let next = self.keys[index + 1];
        (next.value - prev.value) / (next.frame - prev.frame) as f32
    }
}

fn hermite(v0: f32, m0: f32, v1: f32, m1: f32, t: f32, dt: f32) -> f32 {
    let t2 = t * t;
    let t3 = t2 * t;

    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;

    h00 * v0 + h10 * dt * m0 + h01 * v1 + h11 * dt * m1
}
