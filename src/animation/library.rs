use std::sync::Arc;

use smallvec::SmallVec;

use crate::animation::clip::AnimationClip;
use crate::animation::role::AnimationRole;
use crate::errors::{Error, Result};

/// Role → clip mapping produced by a successful [`ClipLibrary::resolve`].
///
/// Always complete for the roles it was resolved against.
#[derive(Debug, Clone, Default)]
pub struct ResolvedClips {
    entries: SmallVec<[(AnimationRole, Arc<AnimationClip>); 3]>,
}

impl ResolvedClips {
    #[must_use]
    pub fn get(&self, role: AnimationRole) -> Option<&Arc<AnimationClip>> {
        self.entries
            .iter()
            .find(|(r, _)| *r == role)
            .map(|(_, clip)| clip)
    }

    pub fn iter(&self) -> impl Iterator<Item = (AnimationRole, &Arc<AnimationClip>)> {
        self.entries.iter().map(|(role, clip)| (*role, clip))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The named clip set supplied by asset loading for one rig.
///
/// Read-only once built; clips are shared with every action bound to them.
#[derive(Debug, Clone, Default)]
pub struct ClipLibrary {
    clips: Vec<Arc<AnimationClip>>,
}

impl ClipLibrary {
    #[must_use]
    pub fn new(clips: Vec<Arc<AnimationClip>>) -> Self {
        Self { clips }
    }

    #[must_use]
    pub fn from_clips(clips: impl IntoIterator<Item = AnimationClip>) -> Self {
        Self {
            clips: clips.into_iter().map(Arc::new).collect(),
        }
    }

    #[must_use]
    pub fn clips(&self) -> &[Arc<AnimationClip>] {
        &self.clips
    }

    /// Exact name lookup.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Arc<AnimationClip>> {
        self.clips.iter().find(|c| c.name == name)
    }

    /// Resolves every role in `roles` to the first clip whose name contains
    /// the role string, ignoring case.
    ///
    /// Resolution is all-or-nothing: if any role is unmatched the whole call
    /// fails with [`Error::IncompleteClipSet`].
    pub fn resolve(&self, roles: &[AnimationRole]) -> Result<ResolvedClips> {
        let mut resolved = ResolvedClips::default();
        let mut missing = Vec::new();

        for &role in roles {
            match self.clips.iter().find(|c| c.name_contains(role.as_str())) {
                Some(clip) => resolved.entries.push((role, Arc::clone(clip))),
                None => missing.push(role.as_str().to_string()),
            }
        }

        if missing.is_empty() {
            Ok(resolved)
        } else {
            Err(Error::IncompleteClipSet {
                missing,
                available: self.clips.iter().map(|c| c.name.clone()).collect(),
            })
        }
    }

    /// Resolves the canonical `idle`/`walk`/`run` set.
    pub fn resolve_all(&self) -> Result<ResolvedClips> {
        self.resolve(&AnimationRole::ALL)
    }
}
