use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::errors::{Error, Result};
use crate::simulation::entity::InstancedEntity;
use crate::simulation::movement::MovementPolicy;

/// Fixed-size, ordered set of instances sharing one movement policy.
///
/// The index of an entity is its stable identity for the lifetime of the
/// pool; there is no partial removal.
#[derive(Debug)]
pub struct EntityPool {
    entities: Vec<InstancedEntity>,
    policy: Box<dyn MovementPolicy>,
}

impl EntityPool {
    /// Spawns `count` entities laid out by `policy`.
    ///
    /// `seed` drives every random draw made at spawn, so equal seeds give
    /// identical layouts.
    pub fn new(count: usize, policy: Box<dyn MovementPolicy>, seed: u64) -> Result<Self> {
        policy.validate()?;
        if let Some(capacity) = policy.capacity() {
            if count > capacity {
                return Err(Error::InvalidConfig(format!(
                    "{count} entities do not fit a layout of {capacity} slots"
                )));
            }
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let entities = (0..count)
            .map(|id| InstancedEntity::new(id, policy.spawn(id, &mut rng)))
            .collect();

        log::debug!("Spawned {count} entities with {policy:?}");
        Ok(Self { entities, policy })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: usize) -> Option<&InstancedEntity> {
        self.entities.get(id)
    }

    pub fn get_mut(&mut self, id: usize) -> Option<&mut InstancedEntity> {
        self.entities.get_mut(id)
    }

    /// Like [`get`](Self::get) but fails with [`Error::IndexOutOfRange`].
    pub fn entity(&self, id: usize) -> Result<&InstancedEntity> {
        let count = self.len();
        self.entities
            .get(id)
            .ok_or_else(|| Error::out_of_range("entity pool", id, count))
    }

    pub fn entity_mut(&mut self, id: usize) -> Result<&mut InstancedEntity> {
        let count = self.len();
        self.entities
            .get_mut(id)
            .ok_or_else(|| Error::out_of_range("entity pool", id, count))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, InstancedEntity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, InstancedEntity> {
        self.entities.iter_mut()
    }

    #[must_use]
    pub fn policy(&self) -> &dyn MovementPolicy {
        self.policy.as_ref()
    }

    /// Replaces the movement policy for subsequent ticks.
    ///
    /// Positions are kept; only the update rule changes.
    pub fn set_policy(&mut self, policy: Box<dyn MovementPolicy>) -> Result<()> {
        policy.validate()?;
        self.policy = policy;
        Ok(())
    }

    /// Applies the movement policy to every entity once.
    pub fn step(&mut self, dt: f32) {
        for entity in &mut self.entities {
            self.policy.step(entity, dt);
        }
    }
}

impl<'a> IntoIterator for &'a EntityPool {
    type Item = &'a InstancedEntity;
    type IntoIter = std::slice::Iter<'a, InstancedEntity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.iter()
    }
}
