use std::sync::Arc;

use glam::Mat4;
use smallvec::SmallVec;

use crate::animation::clip::AnimationClip;
use crate::animation::library::ClipLibrary;

/// Immutable data shared by every entity cloned from one loaded rig.
#[derive(Debug)]
pub struct RigTemplate {
    pub name: String,
    /// Joint names in skinning order.
    pub joint_names: Vec<String>,
    pub clips: ClipLibrary,
}

impl RigTemplate {
    #[must_use]
    pub fn new(name: impl Into<String>, joint_names: Vec<String>, clips: ClipLibrary) -> Self {
        Self {
            name: name.into(),
            joint_names,
            clips,
        }
    }

    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.joint_names.len()
    }
}

/// Per-entity mutable side of a rig.
///
/// Joint matrices are written by the external skinning system from the
/// entity's [`PoseSnapshot`]; the simulation only allocates them.
#[derive(Debug, Clone)]
pub struct RigInstance {
    template: Arc<RigTemplate>,
    joint_matrices: Vec<Mat4>,
}

impl RigInstance {
    #[must_use]
    pub fn new(template: Arc<RigTemplate>) -> Self {
        let joint_matrices = vec![Mat4::IDENTITY; template.joint_count()];
        Self {
            template,
            joint_matrices,
        }
    }

    #[must_use]
    pub fn template(&self) -> &Arc<RigTemplate> {
        &self.template
    }

    #[must_use]
    pub fn joint_matrices(&self) -> &[Mat4] {
        &self.joint_matrices
    }

    pub fn joint_matrices_mut(&mut self) -> &mut [Mat4] {
        &mut self.joint_matrices
    }
}

/// One clip's contribution to a pose.
#[derive(Debug, Clone)]
pub struct ClipSample {
    pub clip: Arc<AnimationClip>,
    pub time: f32,
    pub weight: f32,
}

/// Opaque-to-the-core pose description handed to external skinning.
///
/// Lists every action with non-zero weight. Empty for entities without a
/// resolved clip set (static pose).
#[derive(Debug, Clone, Default)]
pub struct PoseSnapshot {
    pub samples: SmallVec<[ClipSample; 3]>,
}

impl PoseSnapshot {
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub fn total_weight(&self) -> f32 {
        self.samples.iter().map(|s| s.weight).sum()
    }

    /// The sample with the highest weight.
    #[must_use]
    pub fn dominant(&self) -> Option<&ClipSample> {
        self.samples
            .iter()
            .max_by(|a, b| a.weight.total_cmp(&b.weight))
    }
}
