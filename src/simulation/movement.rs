//! Movement Policies
//!
//! A [`MovementPolicy`] picks each entity's spawn state and updates its
//! position once per tick. Policies are stateless with respect to each
//! other: every instance only reads its own parameters and the entity it is
//! handed.
//!
//! | Policy      | Spawn                                  | Per tick                         |
//! |-------------|----------------------------------------|----------------------------------|
//! | [`Conveyor`]| `start`                                | `x -= speed * steps_per_tick`, wrap |
//! | [`Frozen`]  | `origin`                               | `position = origin`              |
//! | [`Grid`]    | `(col * spacing, 0, row * spacing)`    | none                             |
//! | [`Drift`]   | random in cube, random velocity        | `position += velocity`, unclamped |
//!
//! Conveyor and drift steps are per tick, not scaled by `dt`.

use std::fmt;

use glam::Vec3;
use rand::RngExt;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::simulation::entity::{InstancedEntity, SpawnState};

/// Per-entity spatial update rule.
pub trait MovementPolicy: fmt::Debug + Send {
    /// Initial position and velocity for the entity at `index`.
    fn spawn(&self, index: usize, rng: &mut StdRng) -> SpawnState;

    /// Advances one entity by one tick.
    fn step(&self, entity: &mut InstancedEntity, dt: f32);

    /// Maximum number of entities the layout can place, if bounded.
    fn capacity(&self) -> Option<usize> {
        None
    }

    /// Rejects parameters that would make the policy meaningless.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

fn ensure_non_negative(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!(
            "{name} must be finite and non-negative, got {value}"
        )))
    }
}

fn symmetric(rng: &mut StdRng, half_extent: f32) -> f32 {
    if half_extent > 0.0 {
        rng.random_range(-half_extent..half_extent)
    } else {
        0.0
    }
}

fn symmetric_vec3(rng: &mut StdRng, half_extent: f32) -> Vec3 {
    Vec3::new(
        symmetric(rng, half_extent),
        symmetric(rng, half_extent),
        symmetric(rng, half_extent),
    )
}

// ============================================================================
// Conveyor
// ============================================================================

/// Moves along -X and wraps from `lower_bound` back to `upper_bound`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conveyor {
    pub speed: f32,
    pub steps_per_tick: f32,
    pub lower_bound: f32,
    pub upper_bound: f32,
    pub start: Vec3,
}

impl Default for Conveyor {
    fn default() -> Self {
        Self {
            speed: 0.02,
            steps_per_tick: 1.0,
            lower_bound: -10.0,
            upper_bound: 10.0,
            start: Vec3::ZERO,
        }
    }
}

impl MovementPolicy for Conveyor {
    fn spawn(&self, _index: usize, _rng: &mut StdRng) -> SpawnState {
        SpawnState {
            position: self.start,
            velocity: Vec3::new(-self.speed * self.steps_per_tick, 0.0, 0.0),
        }
    }

    fn step(&self, entity: &mut InstancedEntity, _dt: f32) {
        entity.position.x -= self.speed * self.steps_per_tick;
        if entity.position.x < self.lower_bound {
            entity.position.x = self.upper_bound;
        }
        entity.mark_dirty();
    }

    fn validate(&self) -> Result<()> {
        ensure_non_negative("conveyor speed", self.speed)?;
        ensure_non_negative("conveyor steps_per_tick", self.steps_per_tick)?;
        if self.lower_bound < self.upper_bound {
            Ok(())
        } else {
            Err(Error::InvalidConfig(format!(
                "conveyor bounds must satisfy lower < upper, got [{}, {}]",
                self.lower_bound, self.upper_bound
            )))
        }
    }
}

// ============================================================================
// Frozen
// ============================================================================

/// Pins every entity to `origin`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Frozen {
    pub origin: Vec3,
}

impl MovementPolicy for Frozen {
    fn spawn(&self, _index: usize, _rng: &mut StdRng) -> SpawnState {
        SpawnState {
            position: self.origin,
            velocity: Vec3::ZERO,
        }
    }

    fn step(&self, entity: &mut InstancedEntity, _dt: f32) {
        entity.position = self.origin;
        entity.mark_dirty();
    }
}

// ============================================================================
// Grid
// ============================================================================

/// Static row-major layout on the XZ plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Grid {
    pub rows: usize,
    pub cols: usize,
    pub spacing: f32,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            rows: 3,
            cols: 5,
            spacing: 2.5,
        }
    }
}

impl Grid {
    /// Position of the cell at `index`, enumerated row-major.
    #[must_use]
    pub fn cell(&self, index: usize) -> Vec3 {
        let cols = self.cols.max(1);
        let row = index / cols;
        let col = index % cols;
        Vec3::new(col as f32 * self.spacing, 0.0, row as f32 * self.spacing)
    }
}

impl MovementPolicy for Grid {
    fn spawn(&self, index: usize, _rng: &mut StdRng) -> SpawnState {
        SpawnState {
            position: self.cell(index),
            velocity: Vec3::ZERO,
        }
    }

    fn step(&self, _entity: &mut InstancedEntity, _dt: f32) {}

    fn capacity(&self) -> Option<usize> {
        Some(self.rows * self.cols)
    }

    fn validate(&self) -> Result<()> {
        ensure_non_negative("grid spacing", self.spacing)?;
        if self.cols == 0 || self.rows == 0 {
            return Err(Error::InvalidConfig(format!(
                "grid must have at least one row and column, got {}x{}",
                self.rows, self.cols
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Drift
// ============================================================================

/// Constant random velocity per entity, no bounds.
///
/// Spawn positions are uniform in a cube of half extent `spread`; each
/// velocity component is uniform in `(-speed / 2, speed / 2)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Drift {
    pub speed: f32,
    pub spread: f32,
}

impl Default for Drift {
    fn default() -> Self {
        Self {
            speed: 0.05,
            spread: 5.0,
        }
    }
}

impl MovementPolicy for Drift {
    fn spawn(&self, _index: usize, rng: &mut StdRng) -> SpawnState {
        let position = symmetric_vec3(rng, self.spread);
        let velocity = symmetric_vec3(rng, self.speed * 0.5);
        SpawnState { position, velocity }
    }

    fn step(&self, entity: &mut InstancedEntity, _dt: f32) {
        entity.position += entity.velocity;
        entity.mark_dirty();
    }

    fn validate(&self) -> Result<()> {
        ensure_non_negative("drift speed", self.speed)?;
        ensure_non_negative("drift spread", self.spread)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_drift_velocity_within_half_speed() {
        let drift = Drift {
            speed: 0.4,
            spread: 3.0,
        };
        let mut rng = StdRng::seed_from_u64(7);
        for i in 0..256 {
            let spawn = drift.spawn(i, &mut rng);
            assert!(spawn.velocity.abs().max_element() <= 0.2);
            assert!(spawn.position.abs().max_element() <= 3.0);
        }
    }

    #[test]
    fn test_zero_speed_drift_is_still() {
        let drift = Drift {
            speed: 0.0,
            spread: 0.0,
        };
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(drift.spawn(0, &mut rng), SpawnState::default());
    }

    #[test]
    fn test_validate_rejects_negative_speed() {
        let conveyor = Conveyor {
            speed: -1.0,
            ..Conveyor::default()
        };
        assert!(matches!(conveyor.validate(), Err(Error::InvalidConfig(_))));
    }
}
