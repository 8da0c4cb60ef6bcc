use serde::{Deserialize, Serialize};

/// A named, fixed-duration animation sample for a rig.
///
/// Keyframe data stays with the external skinning system; the simulation
/// only needs the name for role resolution and the duration for looping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    pub name: String,
    /// Length in seconds.
    pub duration: f32,
}

impl AnimationClip {
    #[must_use]
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration,
        }
    }

    /// Case-insensitive substring match used for role resolution.
    #[must_use]
    pub fn name_contains(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(&needle.to_lowercase())
    }
}
