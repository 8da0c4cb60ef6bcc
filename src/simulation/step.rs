use std::sync::Arc;

use crate::animation::{AnimationMixer, AnimationRole, BlendMode, PoseSnapshot, RigTemplate};
use crate::config::ScenarioConfig;
use crate::errors::{Error, Result};
use crate::simulation::buffer::InstancedTransformBuffer;
use crate::simulation::entity::{Color, InstancedEntity};
use crate::simulation::movement::MovementPolicy;
use crate::simulation::pool::EntityPool;
use crate::simulation::scheduler::{DeferredEventScheduler, EventEffect, EventId};

/// Per-frame orchestrator.
///
/// Owns every per-entity context in one place: the entity pool, a mixer per
/// entity (empty for entities without a rig), the event scheduler and the
/// renderer-facing buffer. All mutation happens inside [`tick`](Self::tick)
/// or the control calls, on the caller's thread.
///
/// # Tick order
///
/// 1. Apply pending role requests and advance every mixer.
/// 2. Apply the movement policy to every entity.
/// 3. Accumulate elapsed time (in `f64`) and fire due events.
/// 4. Write transforms, colors and visibility into the buffer.
///
/// The buffer is left dirty for the renderer to consume.
#[derive(Debug)]
pub struct Simulation {
    pool: EntityPool,
    mixers: Vec<AnimationMixer>,
    scheduler: DeferredEventScheduler,
    buffer: InstancedTransformBuffer,
    blend: BlendMode,

    elapsed: f64,
    frame_count: u64,
}

impl Simulation {
    /// Builds a simulation around an already spawned pool.
    #[must_use]
    pub fn new(pool: EntityPool) -> Self {
        let count = pool.len();
        let mut sim = Self {
            mixers: (0..count).map(|_| AnimationMixer::new()).collect(),
            pool,
            scheduler: DeferredEventScheduler::new(),
            buffer: InstancedTransformBuffer::new(count),
            blend: BlendMode::Instant,
            elapsed: 0.0,
            frame_count: 0,
        };
        sim.sync_buffer();
        sim
    }

    /// Spawns `count` entities under `policy`.
    pub fn with_policy(count: usize, policy: Box<dyn MovementPolicy>, seed: u64) -> Result<Self> {
        Ok(Self::new(EntityPool::new(count, policy, seed)?))
    }

    /// Builds pool, blend mode and events from a scenario.
    pub fn from_config(config: &ScenarioConfig) -> Result<Self> {
        config.validate()?;
        let mut sim = Self::with_policy(config.count, config.movement.build(), config.seed)?;
        sim.blend = config.blend;
        for event in &config.events {
            sim.schedule(event.target, event.at, event.effect.build())?;
        }
        log::info!(
            "Scenario '{}': {} entities, {} scheduled events",
            config.name,
            config.count,
            config.events.len()
        );
        Ok(sim)
    }

    // ========================================================================
    // Setup
    // ========================================================================

    /// Gives `entity` its own instance of `template` and starts its clips.
    ///
    /// An incomplete clip set leaves the entity static; only an invalid
    /// index is an error.
    pub fn attach_rig(&mut self, entity: usize, template: &Arc<RigTemplate>) -> Result<()> {
        let count = self.mixers.len();
        let slot = self
            .mixers
            .get_mut(entity)
            .ok_or_else(|| Error::out_of_range("attach rig", entity, count))?;
        *slot = AnimationMixer::from_template(template).with_policy(self.blend.build());
        Ok(())
    }

    /// Schedules a one-shot event on `target` at simulation time `threshold`.
    pub fn schedule(&mut self, target: usize, threshold: f32, effect: EventEffect) -> Result<EventId> {
        if target >= self.pool.len() {
            return Err(Error::out_of_range("schedule event", target, self.pool.len()));
        }
        Ok(self.scheduler.schedule(target, threshold, effect))
    }

    // ========================================================================
    // Frame driver
    // ========================================================================

    /// Advances the whole simulation by `dt` seconds.
    ///
    /// Negative or non-finite `dt` is treated as zero.
    pub fn tick(&mut self, dt: f32) {
        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            log::warn!("Ignoring invalid frame delta {dt}, using 0");
            0.0
        };

        for mixer in &mut self.mixers {
            mixer.update(dt);
        }

        self.pool.step(dt);

        self.elapsed += f64::from(dt);
        self.scheduler.tick(self.elapsed, &mut self.pool);

        self.sync_buffer();
        self.frame_count += 1;
    }

    fn sync_buffer(&mut self) {
        for entity in self.pool.iter_mut() {
            entity.update_transform();
            let id = entity.id;
            // Pool and buffer share one length, so these writes cannot fail
            let _ = self.buffer.set_transform(id, entity.transform());
            if self.buffer.color(id).ok() != Some(entity.color) {
                let _ = self.buffer.set_color(id, entity.color);
            }
            if self.buffer.is_visible(id).ok() != Some(entity.visible) {
                let _ = self.buffer.set_visible(id, entity.visible);
            }
        }
    }

    // ========================================================================
    // Control interface
    // ========================================================================

    /// Requests a role switch, effective on the next tick.
    ///
    /// Roles the entity cannot play are ignored at that point.
    pub fn set_active_role(&mut self, entity: usize, role: AnimationRole) -> Result<()> {
        let count = self.mixers.len();
        self.mixers
            .get_mut(entity)
            .ok_or_else(|| Error::out_of_range("set active role", entity, count))?
            .request_role(role);
        Ok(())
    }

    /// Shows or hides an entity, effective on the next tick.
    pub fn set_visible(&mut self, entity: usize, visible: bool) -> Result<()> {
        self.pool.entity_mut(entity)?.visible = visible;
        Ok(())
    }

    // ========================================================================
    // Render interface
    // ========================================================================

    pub fn transform(&self, index: usize) -> Result<glam::Mat4> {
        self.buffer.transform(index)
    }

    pub fn color(&self, index: usize) -> Result<Color> {
        self.buffer.color(index)
    }

    pub fn consume_dirty(&mut self) -> bool {
        self.buffer.consume_dirty()
    }

    pub fn pose(&self, entity: usize) -> Result<PoseSnapshot> {
        Ok(self.mixer(entity)?.pose())
    }

    #[must_use]
    pub fn buffer(&self) -> &InstancedTransformBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut InstancedTransformBuffer {
        &mut self.buffer
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    #[must_use]
    pub fn len(&self) -> usize {
        self.pool.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// Sum of every accepted `dt`, in seconds.
    #[must_use]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    #[must_use]
    pub fn pool(&self) -> &EntityPool {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut EntityPool {
        &mut self.pool
    }

    pub fn entity(&self, id: usize) -> Result<&InstancedEntity> {
        self.pool.entity(id)
    }

    pub fn mixer(&self, entity: usize) -> Result<&AnimationMixer> {
        self.mixers
            .get(entity)
            .ok_or_else(|| Error::out_of_range("mixer", entity, self.mixers.len()))
    }

    pub fn mixer_mut(&mut self, entity: usize) -> Result<&mut AnimationMixer> {
        let count = self.mixers.len();
        self.mixers
            .get_mut(entity)
            .ok_or_else(|| Error::out_of_range("mixer", entity, count))
    }

    #[must_use]
    pub fn scheduler(&self) -> &DeferredEventScheduler {
        &self.scheduler
    }
}
