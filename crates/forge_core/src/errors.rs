//! Error Types
//!
//! This module defines the error types used throughout Scene Forge.
//!
//! # Overview
//!
//! The main error type [`ForgeError`] covers every failure mode of a
//! generation pass:
//! - Validation of shape, rig and channel parameters
//! - Structural problems in composition recipes
//! - Keyframe track conflicts during synthesis
//! - Failures reported by the external 3D host
//! - Settings parsing and I/O
//!
//! Each variant belongs to one [`ErrorKind`], so the pass driver can decide
//! how to report a failure without matching on every variant.
//!
//! # Usage
//!
//! ```rust,ignore
//! use forge_core::errors::{ForgeError, Result};
//!
//! fn build_part() -> Result<()> {
//!     Err(ForgeError::InvalidParameter("radius must be positive".into()))
//! }
//! ```

use thiserror::Error;

/// Error reported by the external 3D host.
///
/// The core never interprets or retries these: the host owns its document
/// state, so the error is carried to the caller exactly as reported.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("host rejected `{operation}`: {message}")]
pub struct HostError {
    /// Name of the host capability that failed (e.g. `attach_material`).
    pub operation: String,
    /// Message as reported by the host.
    pub message: String,
}

impl HostError {
    pub fn new(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

/// Broad category of a [`ForgeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed parameters detected eagerly at construction time.
    Validation,
    /// Dangling or cyclic references in a composition.
    Structure,
    /// Conflicting keyframe tracks.
    Animation,
    /// The host rejected an operation.
    HostInvocation,
    /// Settings could not be read or parsed.
    Config,
}

/// The main error type for Scene Forge.
#[derive(Error, Debug)]
pub enum ForgeError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    /// A primitive shape was given degenerate dimensions or segment counts.
    #[error("Invalid {shape} parameters: {reason}")]
    InvalidShape {
        /// Shape kind being built
        shape: &'static str,
        /// What was wrong with the parameters
        reason: String,
    },

    /// A generic parameter outside its allowed domain.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Two scene nodes share a name.
    #[error("Duplicate node name: {0}")]
    DuplicateNode(String),

    /// Two materials share a name.
    #[error("Duplicate material name: {0}")]
    DuplicateMaterial(String),

    /// Two bones of one armature share a name.
    #[error("Duplicate bone `{bone}` in armature `{armature}`")]
    DuplicateBone {
        /// Armature being built
        armature: String,
        /// Offending bone name
        bone: String,
    },

    /// A bone names a parent that has not been created yet.
    #[error("Bone `{bone}` references parent `{parent}` before it was created")]
    ForwardBoneReference {
        /// Bone being created
        bone: String,
        /// Missing parent bone
        parent: String,
    },

    /// A bone with identical head and tail.
    #[error("Bone `{0}` has zero length")]
    ZeroLengthBone(String),

    /// More than one root bone in an armature that was not declared multi-rooted.
    #[error("Armature `{armature}` has {roots} root bones but is not multi-rooted")]
    MultipleRootBones {
        /// Armature being built
        armature: String,
        /// Number of parentless bones
        roots: usize,
    },

    /// A node handle or name that does not resolve in the scene.
    #[error("Unknown node: {0}")]
    UnknownNode(String),

    /// A bone name that does not resolve in its armature.
    #[error("Unknown bone `{bone}` in armature `{armature}`")]
    UnknownBone {
        /// Armature searched
        armature: String,
        /// Missing bone name
        bone: String,
    },

    /// A channel component index past the property's arity.
    #[error("Channel `{path}` has {arity} components, index {index} is out of range")]
    InvalidChannel {
        /// Property path of the channel
        path: String,
        /// Number of components of the property
        arity: usize,
        /// Requested component
        index: usize,
    },

    // ========================================================================
    // Structure Errors
    // ========================================================================
    /// A composition part references a parent that is not present.
    #[error("Part `{part}` references missing parent `{parent}`")]
    MissingParent {
        /// Part being composed
        part: String,
        /// Parent name that could not be resolved
        parent: String,
    },

    /// Attaching would make a node its own ancestor.
    #[error("Attaching `{child}` under `{parent}` would create a cycle")]
    CyclicHierarchy {
        /// Node being attached
        child: String,
        /// Intended parent
        parent: String,
    },

    /// A merge was requested on a subtree without mesh geometry.
    #[error("Nothing to merge under `{0}`")]
    EmptyMerge(String),

    // ========================================================================
    // Animation Errors
    // ========================================================================
    /// A track for the channel already exists in the action.
    #[error("Action `{action}` already has a track for `{channel}`")]
    DuplicateTrack {
        /// Action name
        action: String,
        /// Channel description (path and component)
        channel: String,
    },

    /// A keyframe would not be strictly after the previous one.
    #[error("Keyframe at frame {frame} is not after frame {last} in `{channel}`")]
    NonIncreasingKeyframe {
        /// Channel description
        channel: String,
        /// Last frame in the track
        last: i32,
        /// Rejected frame
        frame: i32,
    },

    // ========================================================================
    // Host Errors
    // ========================================================================
    /// The external host rejected an operation.
    #[error(transparent)]
    HostInvocation(#[from] HostError),

    // ========================================================================
    // Config & I/O Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl ForgeError {
    /// Returns the category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidShape { .. }
            | Self::InvalidParameter(_)
            | Self::DuplicateNode(_)
            | Self::DuplicateMaterial(_)
            | Self::DuplicateBone { .. }
            | Self::ForwardBoneReference { .. }
            | Self::ZeroLengthBone(_)
            | Self::MultipleRootBones { .. }
            | Self::UnknownNode(_)
            | Self::UnknownBone { .. }
            | Self::InvalidChannel { .. } => ErrorKind::Validation,
            Self::MissingParent { .. } | Self::CyclicHierarchy { .. } | Self::EmptyMerge(_) => {
                ErrorKind::Structure
            }
            Self::DuplicateTrack { .. } | Self::NonIncreasingKeyframe { .. } => {
                ErrorKind::Animation
            }
            Self::HostInvocation(_) => ErrorKind::HostInvocation,
            Self::IoError(_) | Self::JsonError(_) => ErrorKind::Config,
        }
    }
}

/// Alias for `Result<T, ForgeError>`.
pub type Result<T> = std::result::Result<T, ForgeError>;
