//! # Marionette
//!
//! Animation-state and instanced-transform core for rigged crowd scenes.
//!
//! Each animated entity owns an [`AnimationMixer`] with one action per
//! canonical role (`idle`, `walk`, `run`), all running in phase, of which
//! exactly one carries full weight under the default hard-cut policy.
//! Every entity, animated or not, lives in an [`EntityPool`] moved by a
//! pluggable [`MovementPolicy`] and is written each frame into an
//! [`InstancedTransformBuffer`] that a renderer consumes.
//!
//! ```rust,ignore
//! use marionette::prelude::*;
//!
//! let mut sim = Simulation::from_config(&ScenarioConfig::soldier_conveyor())?;
//! sim.attach_rig(0, &template)?;
//! sim.set_active_role(0, AnimationRole::Run)?;
//! sim.tick(1.0 / 60.0);
//! if sim.consume_dirty() {
//!     upload(sim.buffer().as_bytes());
//! }
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod animation;
pub mod assets;
pub mod config;
pub mod errors;
pub mod simulation;

pub use animation::{
    AnimationAction, AnimationClip, AnimationMixer, AnimationRole, BlendMode, ClipLibrary,
    LoopMode, PoseSnapshot, RigTemplate,
};
pub use assets::{LoadedRig, ManifestLoader, RigLoader, RigStorage};
pub use config::ScenarioConfig;
pub use errors::{Error, Result};
pub use simulation::{
    Color, EntityPool, InstancedTransformBuffer, MovementPolicy, Simulation,
};

pub mod prelude {
    pub use crate::animation::{AnimationRole, BlendMode, RigTemplate};
    pub use crate::assets::{LoadedRig, RigLoader, RigStorage};
    pub use crate::config::ScenarioConfig;
    pub use crate::errors::{Error, Result};
    pub use crate::simulation::{Color, EventEffect, Simulation};
}
