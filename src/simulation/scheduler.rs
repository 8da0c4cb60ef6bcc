use std::fmt;

use serde::{Deserialize, Serialize};

use crate::simulation::entity::{Color, InstancedEntity};
use crate::simulation::pool::EntityPool;

/// Handle returned by [`DeferredEventScheduler::schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub usize);

/// What a scheduled event does to its target.
pub enum EventEffect {
    Recolor(Color),
    SetVisible(bool),
    Callback(Box<dyn FnOnce(&mut InstancedEntity) + Send>),
}

impl EventEffect {
    fn apply(self, entity: &mut InstancedEntity) {
        match self {
            Self::Recolor(color) => entity.color = color,
            Self::SetVisible(visible) => entity.visible = visible,
            Self::Callback(f) => f(entity),
        }
        entity.mark_dirty();
    }
}

impl fmt::Debug for EventEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recolor(color) => f.debug_tuple("Recolor").field(color).finish(),
            Self::SetVisible(visible) => f.debug_tuple("SetVisible").field(visible).finish(),
            Self::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

/// One-shot mutation keyed to simulation-elapsed time.
#[derive(Debug)]
pub struct ScheduledEvent {
    pub id: EventId,
    pub target: usize,
    pub threshold: f32,
    // Taken when fired, which is what makes the effect run at most once
    effect: Option<EventEffect>,
}

impl ScheduledEvent {
    #[must_use]
    pub fn is_fired(&self) -> bool {
        self.effect.is_none()
    }
}

/// Fires events once accumulated simulation time reaches their threshold.
///
/// Time is whatever the caller passes to [`tick`](Self::tick), normally the
/// sum of every `dt` so far, so firing does not depend on tick cadence or
/// wall-clock jitter.
#[derive(Debug, Default)]
pub struct DeferredEventScheduler {
    events: Vec<ScheduledEvent>,
}

impl DeferredEventScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, target: usize, threshold: f32, effect: EventEffect) -> EventId {
        let id = EventId(self.events.len());
        self.events.push(ScheduledEvent {
            id,
            target,
            threshold,
            effect: Some(effect),
        });
        id
    }

    /// Runs every unfired event with `threshold <= elapsed`.
    ///
    /// Returns the number of events that fired during this call.
    pub fn tick(&mut self, elapsed: f64, pool: &mut EntityPool) -> usize {
        let mut fired = 0;
        for event in &mut self.events {
            if event.is_fired() || f64::from(event.threshold) > elapsed {
                continue;
            }
            let Some(effect) = event.effect.take() else {
                continue;
            };
            fired += 1;

            match pool.get_mut(event.target) {
                Some(entity) => {
                    log::debug!(
                        "Event {:?} fired at {elapsed:.3}s on entity {}: {effect:?}",
                        event.id,
                        event.target
                    );
                    effect.apply(entity);
                }
                None => log::warn!(
                    "Event {:?} targets missing entity {} (pool size {}), dropped",
                    event.id,
                    event.target,
                    pool.len()
                ),
            }
        }
        fired
    }

    /// Number of events that have not fired yet.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.events.iter().filter(|e| !e.is_fired()).count()
    }

    #[must_use]
    pub fn is_fired(&self, id: EventId) -> Option<bool> {
        self.events.get(id.0).map(ScheduledEvent::is_fired)
    }

    pub fn events(&self) -> impl Iterator<Item = &ScheduledEvent> {
        self.events.iter()
    }
}
