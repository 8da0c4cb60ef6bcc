use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// Canonical semantic animation slot.
///
/// Roles are resolved against an arbitrary clip set by case-insensitive
/// substring match on the clip name (see [`ClipLibrary`](super::ClipLibrary)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationRole {
    Idle,
    Walk,
    Run,
}

impl AnimationRole {
    /// Every role a character rig must provide, in resolution order.
    pub const ALL: [AnimationRole; 3] = [Self::Idle, Self::Walk, Self::Run];

    /// The role an entity starts in once its clips are resolved.
    pub const INITIAL: AnimationRole = Self::Idle;

    /// Lowercase name, also the substring matched against clip names.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Walk => "walk",
            Self::Run => "run",
        }
    }
}

impl fmt::Display for AnimationRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnimationRole {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "idle" => Ok(Self::Idle),
            "walk" => Ok(Self::Walk),
            "run" => Ok(Self::Run),
            _ => Err(Error::UnknownRole(s.to_string())),
        }
    }
}
