//! Blend Policies
//!
//! A [`BlendPolicy`] decides how action weights move when the active role
//! changes. The [`AnimationDirector`] owns one policy per entity together
//! with the active and requested roles.
//!
//! # Policies
//!
//! - [`InstantSwitch`] (default): a hard cut. Every weight is zeroed and the
//!   target role gets weight 1 in the same call. No interpolation over time.
//! - [`Crossfade`]: ramps weights linearly from their values at switch time
//!   to the target distribution over a fixed duration. Weights sum to 1 at
//!   every sampled instant as long as they summed to 1 when the switch began.
//!
//! Both keep every action's clock running; only weights are touched.

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::animation::action::AnimationAction;
use crate::animation::role::AnimationRole;

/// Per-entity action set keyed by role.
pub type RoleActions = FxHashMap<AnimationRole, AnimationAction>;

/// Strategy for moving weights between roles.
///
/// Implementations may assume `target` is present in `actions`; the
/// director filters unknown roles before calling in.
pub trait BlendPolicy: fmt::Debug + Send {
    /// Begins a switch to `target`.
    fn switch_to(&mut self, actions: &mut RoleActions, target: AnimationRole);

    /// Progresses an in-flight transition by `dt` seconds.
    fn advance(&mut self, _actions: &mut RoleActions, _dt: f32) {}

    /// Whether weights are still moving.
    fn is_transitioning(&self) -> bool {
        false
    }
}

/// Hard cut between roles.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantSwitch;

impl BlendPolicy for InstantSwitch {
    fn switch_to(&mut self, actions: &mut RoleActions, target: AnimationRole) {
        for action in actions.values_mut() {
            action.set_weight(0.0);
        }
        if let Some(action) = actions.get_mut(&target) {
            action.set_weight(1.0);
        }
    }
}

/// Linear weight ramp over `duration` seconds.
#[derive(Debug, Clone)]
pub struct Crossfade {
    duration: f32,
    elapsed: f32,
    target: Option<AnimationRole>,
    start_weights: SmallVec<[(AnimationRole, f32); 3]>,
}

impl Crossfade {
    #[must_use]
    pub fn new(duration: f32) -> Self {
        Self {
            duration: duration.max(0.0),
            elapsed: 0.0,
            target: None,
            start_weights: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    fn apply(&self, actions: &mut RoleActions, target: AnimationRole, t: f32) {
        for &(role, start) in &self.start_weights {
            let end = if role == target { 1.0 } else { 0.0 };
            if let Some(action) = actions.get_mut(&role) {
                action.set_weight(start + (end - start) * t);
            }
        }
    }
}

impl BlendPolicy for Crossfade {
    fn switch_to(&mut self, actions: &mut RoleActions, target: AnimationRole) {
        if self.duration <= 0.0 {
            InstantSwitch.switch_to(actions, target);
            self.target = None;
            return;
        }

        self.start_weights = actions
            .iter()
            .map(|(role, action)| (*role, action.weight()))
            .collect();
        self.elapsed = 0.0;
        self.target = Some(target);
    }

    fn advance(&mut self, actions: &mut RoleActions, dt: f32) {
        let Some(target) = self.target else {
            return;
        };

        self.elapsed += dt;
        let t = (self.elapsed / self.duration).min(1.0);
        self.apply(actions, target, t);

        if t >= 1.0 {
            self.target = None;
        }
    }

    fn is_transitioning(&self) -> bool {
        self.target.is_some()
    }
}

/// Serializable policy selection.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum BlendMode {
    #[default]
    Instant,
    Crossfade {
        duration: f32,
    },
}

impl BlendMode {
    #[must_use]
    pub fn build(self) -> Box<dyn BlendPolicy> {
        match self {
            Self::Instant => Box::new(InstantSwitch),
            Self::Crossfade { duration } => Box::new(Crossfade::new(duration)),
        }
    }
}

/// Owns the active role and the blend policy of one entity.
///
/// Role requests from the control layer are stored as plain assignments
/// and applied at the start of the next [`advance`](Self::advance).
#[derive(Debug)]
pub struct AnimationDirector {
    policy: Box<dyn BlendPolicy>,
    active: Option<AnimationRole>,
    pending: Option<AnimationRole>,
}

impl Default for AnimationDirector {
    fn default() -> Self {
        Self::new(Box::new(InstantSwitch))
    }
}

impl AnimationDirector {
    #[must_use]
    pub fn new(policy: Box<dyn BlendPolicy>) -> Self {
        Self {
            policy,
            active: None,
            pending: None,
        }
    }

    #[must_use]
    pub fn active(&self) -> Option<AnimationRole> {
        self.active
    }

    #[must_use]
    pub fn pending(&self) -> Option<AnimationRole> {
        self.pending
    }

    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.policy.is_transitioning()
    }

    pub fn set_policy(&mut self, policy: Box<dyn BlendPolicy>) {
        self.policy = policy;
    }

    /// Makes `role` the active one immediately.
    ///
    /// Returns `false` (and changes nothing) when the role has no action,
    /// which includes every call on an empty action set.
    pub fn set_active(&mut self, actions: &mut RoleActions, role: AnimationRole) -> bool {
        if !actions.contains_key(&role) {
            log::debug!("Ignoring switch to unresolved role '{role}'");
            return false;
        }
        self.policy.switch_to(actions, role);
        if self.active != Some(role) {
            log::debug!("Animation role {:?} -> {role}", self.active);
        }
        self.active = Some(role);
        true
    }

    pub fn request(&mut self, role: AnimationRole) {
        self.pending = Some(role);
    }

    /// Applies a pending request, then lets the policy progress.
    pub fn advance(&mut self, actions: &mut RoleActions, dt: f32) {
        if let Some(role) = self.pending.take() {
            self.set_active(actions, role);
        }
        self.policy.advance(actions, dt);
    }
}
