use std::fmt;

use serde::{Deserialize, Serialize};

/// Animatable property of an object or pose bone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    Location,
    RotationEuler,
    /// Stored `w, x, y, z`, the host's component order.
    RotationQuaternion,
    Scale,
    /// Energy of a light's data block.
    LightEnergy,
}

impl Property {
    /// Number of scalar components.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::Location | Self::RotationEuler | Self::Scale => 3,
            Self::RotationQuaternion => 4,
            Self::LightEnergy => 1,
        }
    }

    /// Host data path of the property.
    #[must_use]
    pub const fn data_path(self) -> &'static str {
        match self {
            Self::Location => "location",
            Self::RotationEuler => "rotation_euler",
            Self::RotationQuaternion => "rotation_quaternion",
            Self::Scale => "scale",
            Self::LightEnergy => "energy",
        }
    }

    /// Rest value of a component, used when a channel has no track.
    #[must_use]
    pub const fn rest_value(self, index: usize) -> f32 {
        match self {
            Self::Scale => 1.0,
            Self::RotationQuaternion if index == 0 => 1.0,
            _ => 0.0,
        }
    }
}

/// One scalar animation channel: a property component, optionally on a
/// pose bone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Channel {
    pub bone: Option<String>,
    pub property: Property,
    pub index: usize,
}

impl Channel {
    /// Channel on the target object itself.
    #[must_use]
    pub fn object(property: Property, index: usize) -> Self {
        Self {
            bone: None,
            property,
            index,
        }
    }

    /// Channel on a pose bone of the target armature.
    #[must_use]
    pub fn bone(bone: impl Into<String>, property: Property, index: usize) -> Self {
        Self {
            bone: Some(bone.into()),
            property,
            index,
        }
    }

    /// All components of `property`, in index order.
    pub fn components(bone: Option<&str>, property: Property) -> impl Iterator<Item = Channel> {
        let bone = bone.map(str::to_string);
        (0..property.arity()).map(move |index| Self {
            bone: bone.clone(),
            property,
            index,
        })
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.index < self.property.arity()
    }

    /// Host data path without the component index.
    #[must_use]
    pub fn data_path(&self) -> String {
        match &self.bone {
            Some(bone) => format!("pose.bones[\"{bone}\"].{}", self.property.data_path()),
            None => self.property.data_path().to_string(),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.data_path(), self.index)
    }
}
