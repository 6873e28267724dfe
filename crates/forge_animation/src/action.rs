use forge_core::errors::{ForgeError, Result};
use forge_core::handles::NodeHandle;
use smallvec::SmallVec;

use crate::channel::{Channel, Property};
use crate::tracks::KeyframeTrack;

/// Named set of tracks bound to one target node.
///
/// Tracks are only ever added during synthesis; a channel has at most one
/// track.
#[derive(Debug, Clone)]
pub struct Action {
    pub name: String,
    pub target: NodeHandle,
    tracks: Vec<KeyframeTrack>,
}

impl Action {
    #[must_use]
    pub fn new(name: impl Into<String>, target: NodeHandle) -> Self {
        Self {
            name: name.into(),
            target,
            tracks: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn tracks(&self) -> &[KeyframeTrack] {
        &self.tracks
    }

    #[must_use]
    pub fn track(&self, channel: &Channel) -> Option<&KeyframeTrack> {
        self.tracks.iter().find(|t| &t.channel == channel)
    }

    #[must_use]
    pub fn has_track(&self, channel: &Channel) -> bool {
        self.track(channel).is_some()
    }

    /// Adds a track. A second track for the same channel is rejected.
    pub fn add_track(&mut self, track: KeyframeTrack) -> Result<()> {
        if self.has_track(&track.channel) {
            return Err(ForgeError::DuplicateTrack {
                action: self.name.clone(),
                channel: track.channel.to_string(),
            });
        }
        self.tracks.push(track);
        Ok(())
    }

    /// Removes and returns the track of `channel`.
    pub fn remove_track(&mut self, channel: &Channel) -> Option<KeyframeTrack> {
        let pos = self.tracks.iter().position(|t| &t.channel == channel)?;
        Some(self.tracks.remove(pos))
    }

    #[must_use]
    pub fn keyframe_count(&self) -> usize {
        self.tracks.iter().map(KeyframeTrack::len).sum()
    }

    /// Smallest first frame and largest last frame over all tracks.
    #[must_use]
    pub fn frame_range(&self) -> Option<(i32, i32)> {
        self.tracks
            .iter()
            .filter_map(KeyframeTrack::frame_range)
            .reduce(|(a0, a1), (b0, b1)| (a0.min(b0), a1.max(b1)))
    }

    /// Every component of `property` at `frame`. Components without a track
    /// take the property's rest value.
    #[must_use]
    pub fn sample_property(&self, bone: Option<&str>, property: Property, frame: f32) -> SmallVec<[f32; 4]> {
        Channel::components(bone, property)
            .map(|channel| {
                self.track(&channel)
                    .and_then(|t| t.sample(frame))
                    .unwrap_or_else(|| property.rest_value(channel.index))
            })
            .collect()
    }

    /// Bone names animated by this action, in first-seen order.
    #[must_use]
    pub fn animated_bones(&self) -> Vec<&str> {
        let mut bones: Vec<&str> = Vec::new();
        for bone in self.tracks.iter().filter_map(|t| t.channel.bone.as_deref()) {
            if !bones.contains(&bone) {
                bones.push(bone);
            }
        }
        bones
    }
}
