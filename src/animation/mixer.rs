use std::sync::Arc;

use crate::animation::action::AnimationAction;
use crate::animation::blend::{AnimationDirector, BlendPolicy, RoleActions};
use crate::animation::library::ResolvedClips;
use crate::animation::rig::{ClipSample, PoseSnapshot, RigInstance, RigTemplate};
use crate::animation::role::AnimationRole;

/// Per-entity animation state: one action per role plus the director that
/// decides their weights.
///
/// A mixer whose clip set failed to resolve has no actions. It still
/// accepts every call, but role switches do nothing and the pose stays
/// static.
#[derive(Debug, Default)]
pub struct AnimationMixer {
    actions: RoleActions,
    director: AnimationDirector,
    rig: Option<RigInstance>,
}

impl AnimationMixer {
    /// A mixer with no rig and no actions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a rig instance from `template` and resolves its clips.
    ///
    /// An incomplete clip set is logged and leaves the mixer without
    /// actions; it is never an error.
    #[must_use]
    pub fn from_template(template: &Arc<RigTemplate>) -> Self {
        let rig = RigInstance::new(Arc::clone(template));
        let mut mixer = Self::new();

        match template.clips.resolve_all() {
            Ok(resolved) => mixer.initialize(rig, &resolved),
            Err(err) => {
                log::warn!("Rig '{}' left unanimated: {err}", template.name);
                mixer.rig = Some(rig);
            }
        }
        mixer
    }

    #[must_use]
    pub fn with_policy(mut self, policy: Box<dyn BlendPolicy>) -> Self {
        self.director.set_policy(policy);
        self
    }

    /// Creates one playing action per resolved role.
    ///
    /// Every action starts its clock; only [`AnimationRole::INITIAL`] gets
    /// weight 1.
    pub fn initialize(&mut self, rig: RigInstance, resolved: &ResolvedClips) {
        self.actions.clear();
        for (role, clip) in resolved.iter() {
            let mut action = AnimationAction::new(Arc::clone(clip));
            action.set_weight(0.0);
            action.play();
            self.actions.insert(role, action);
        }
        self.rig = Some(rig);

        if !self.director.set_active(&mut self.actions, AnimationRole::INITIAL) {
            // Resolved against a custom role list without the initial role
            if let Some(role) = AnimationRole::ALL
                .into_iter()
                .find(|r| self.actions.contains_key(r))
            {
                self.director.set_active(&mut self.actions, role);
            }
        }
    }

    /// Switches to `role` immediately through the blend policy.
    ///
    /// No-op when `role` is not resolved.
    pub fn set_active(&mut self, role: AnimationRole) -> bool {
        self.director.set_active(&mut self.actions, role)
    }

    /// Queues `role` for the next [`update`](Self::update).
    pub fn request_role(&mut self, role: AnimationRole) {
        self.director.request(role);
    }

    /// Applies pending requests and advances every playing action.
    pub fn update(&mut self, dt: f32) {
        self.director.advance(&mut self.actions, dt);
        for action in self.actions.values_mut() {
            action.update(dt);
        }
    }

    #[must_use]
    pub fn active_role(&self) -> Option<AnimationRole> {
        self.director.active()
    }

    #[must_use]
    pub fn is_animated(&self) -> bool {
        !self.actions.is_empty()
    }

    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.director.is_transitioning()
    }

    #[must_use]
    pub fn action(&self, role: AnimationRole) -> Option<&AnimationAction> {
        self.actions.get(&role)
    }

    pub fn action_mut(&mut self, role: AnimationRole) -> Option<&mut AnimationAction> {
        self.actions.get_mut(&role)
    }

    pub fn actions(&self) -> impl Iterator<Item = (AnimationRole, &AnimationAction)> {
        self.actions.iter().map(|(role, action)| (*role, action))
    }

    #[must_use]
    pub fn total_weight(&self) -> f32 {
        self.actions.values().map(AnimationAction::weight).sum()
    }

    #[must_use]
    pub fn rig(&self) -> Option<&RigInstance> {
        self.rig.as_ref()
    }

    pub fn rig_mut(&mut self) -> Option<&mut RigInstance> {
        self.rig.as_mut()
    }

    /// Contributing actions in role order.
    #[must_use]
    pub fn pose(&self) -> PoseSnapshot {
        let samples = AnimationRole::ALL
            .iter()
            .filter_map(|role| self.actions.get(role))
            .filter(|action| action.weight() > 0.0)
            .map(|action| ClipSample {
                clip: Arc::clone(action.clip()),
                time: action.time,
                weight: action.weight(),
            })
            .collect();
        PoseSnapshot { samples }
    }
}
