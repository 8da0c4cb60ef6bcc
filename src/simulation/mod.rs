//! Instanced Simulation
//!
//! Per-instance spatial state, the movement rules that update it, the
//! deferred one-shot events that mutate it, and the renderer-facing buffer
//! it is written into each tick.
//!
//! - [`EntityPool`]: fixed-size arena of [`InstancedEntity`] values
//! - [`MovementPolicy`]: pluggable per-tick update ([`Conveyor`], [`Frozen`], [`Grid`], [`Drift`])
//! - [`DeferredEventScheduler`]: simulation-time one-shot events
//! - [`InstancedTransformBuffer`]: packed, dirty-tracked output
//! - [`Simulation`]: the orchestrator the frame driver calls

pub mod buffer;
pub mod entity;
pub mod movement;
pub mod pool;
pub mod scheduler;
pub mod step;

pub use buffer::{InstanceRaw, InstancedTransformBuffer};
pub use entity::{Color, InstancedEntity, SpawnState};
pub use movement::{Conveyor, Drift, Frozen, Grid, MovementPolicy};
pub use pool::EntityPool;
pub use scheduler::{DeferredEventScheduler, EventEffect, EventId, ScheduledEvent};
pub use step::Simulation;
