pub mod action;
pub mod blend;
pub mod clip;
pub mod library;
pub mod mixer;
pub mod rig;
pub mod role;

pub use action::{AnimationAction, LoopMode};
pub use blend::{AnimationDirector, BlendMode, BlendPolicy, Crossfade, InstantSwitch, RoleActions};
pub use clip::AnimationClip;
pub use library::{ClipLibrary, ResolvedClips};
pub use mixer::AnimationMixer;
pub use rig::{ClipSample, PoseSnapshot, RigInstance, RigTemplate};
pub use role::AnimationRole;
