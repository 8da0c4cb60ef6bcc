//! Scenario Configuration
//!
//! A [`ScenarioConfig`] describes one scene: how many instances, how they
//! move, how animated entities blend, and which one-shot events to fire.
//! It deserializes from JSON so scenes can be swapped without recompiling.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use marionette::config::ScenarioConfig;
//! use marionette::Simulation;
//!
//! let config = ScenarioConfig::from_json(r#"{
//!     "count": 200,
//!     "movement": { "kind": "drift", "speed": 0.05, "spread": 5.0 },
//!     "events": [ { "target": 0, "at": 2.0, "effect": { "type": "recolor", "color": { "r": 1.0, "g": 0.0, "b": 0.0 } } } ]
//! }"#)?;
//! let mut sim = Simulation::from_config(&config)?;
//! ```
//!
//! # Presets
//!
//! | Preset               | Count | Movement                        | Events                  |
//! |----------------------|-------|---------------------------------|-------------------------|
//! | `soldier_conveyor`   | 1     | conveyor, 0.02/tick, [-10, 10]  | none                    |
//! | `frozen`             | 1     | frozen at origin                | none                    |
//! | `grid`               | 15    | 3×5 grid, spacing 2.5           | none                    |
//! | `drift`              | 100   | drift, speed 0.05, spread 5     | none                    |
//! | `drift_recolor`      | 100   | drift, speed 0.05, spread 5     | recolor entity 0 at 2 s |

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::animation::BlendMode;
use crate::errors::{Error, Result};
use crate::simulation::entity::Color;
use crate::simulation::movement::{Conveyor, Drift, Frozen, Grid, MovementPolicy};
use crate::simulation::scheduler::EventEffect;

/// Threshold of the recolor event in the `drift_recolor` preset.
pub const DEFAULT_EVENT_THRESHOLD: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MovementConfig {
    Conveyor(Conveyor),
    Frozen(Frozen),
    Grid(Grid),
    Drift(Drift),
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self::Conveyor(Conveyor::default())
    }
}

impl MovementConfig {
    #[must_use]
    pub fn build(self) -> Box<dyn MovementPolicy> {
        match self {
            Self::Conveyor(p) => Box::new(p),
            Self::Frozen(p) => Box::new(p),
            Self::Grid(p) => Box::new(p),
            Self::Drift(p) => Box::new(p),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventEffectConfig {
    Recolor { color: Color },
    Hide,
    Show,
}

impl EventEffectConfig {
    #[must_use]
    pub fn build(self) -> EventEffect {
        match self {
            Self::Recolor { color } => EventEffect::Recolor(color),
            Self::Hide => EventEffect::SetVisible(false),
            Self::Show => EventEffect::SetVisible(true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventConfig {
    #[serde(default)]
    pub target: usize,
    #[serde(default = "default_threshold")]
    pub at: f32,
    pub effect: EventEffectConfig,
}

fn default_threshold() -> f32 {
    DEFAULT_EVENT_THRESHOLD
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub name: String,
    pub count: usize,
    pub seed: u64,
    pub movement: MovementConfig,
    pub blend: BlendMode,
    pub events: Vec<EventConfig>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self::soldier_conveyor()
    }
}

impl ScenarioConfig {
    // ========================================================================
    // Presets
    // ========================================================================

    #[must_use]
    pub fn soldier_conveyor() -> Self {
        Self {
            name: "soldier_conveyor".to_string(),
            count: 1,
            seed: 0,
            movement: MovementConfig::Conveyor(Conveyor::default()),
            blend: BlendMode::Instant,
            events: Vec::new(),
        }
    }

    #[must_use]
    pub fn frozen() -> Self {
        Self {
            name: "frozen".to_string(),
            movement: MovementConfig::Frozen(Frozen::default()),
            ..Self::soldier_conveyor()
        }
    }

    #[must_use]
    pub fn grid() -> Self {
        let grid = Grid::default();
        Self {
            name: "grid".to_string(),
            count: grid.rows * grid.cols,
            movement: MovementConfig::Grid(grid),
            ..Self::soldier_conveyor()
        }
    }

    #[must_use]
    pub fn drift() -> Self {
        Self {
            name: "drift".to_string(),
            count: 100,
            seed: 42,
            movement: MovementConfig::Drift(Drift::default()),
            ..Self::soldier_conveyor()
        }
    }

    #[must_use]
    pub fn drift_recolor() -> Self {
        Self {
            name: "drift_recolor".to_string(),
            events: vec![EventConfig {
                target: 0,
                at: DEFAULT_EVENT_THRESHOLD,
                effect: EventEffectConfig::Recolor { color: Color::RED },
            }],
            ..Self::drift()
        }
    }

    /// Looks up a preset by name.
    #[must_use]
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "soldier_conveyor" => Some(Self::soldier_conveyor()),
            "frozen" => Some(Self::frozen()),
            "grid" => Some(Self::grid()),
            "drift" => Some(Self::drift()),
            "drift_recolor" => Some(Self::drift_recolor()),
            _ => None,
        }
    }

    // ========================================================================
    // Loading
    // ========================================================================

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks movement parameters, layout capacity and event targets.
    pub fn validate(&self) -> Result<()> {
        let policy = self.movement.build();
        policy.validate()?;
        if let Some(capacity) = policy.capacity() {
            if self.count > capacity {
                return Err(Error::InvalidConfig(format!(
                    "scenario '{}' asks for {} entities but the layout holds {capacity}",
                    self.name, self.count
                )));
            }
        }
        if let BlendMode::Crossfade { duration } = self.blend {
            if !(duration.is_finite() && duration >= 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "crossfade duration must be finite and non-negative, got {duration}"
                )));
            }
        }
        for event in &self.events {
            if event.target >= self.count {
                return Err(Error::out_of_range("scenario event target", event.target, self.count));
            }
            if !event.at.is_finite() {
                return Err(Error::InvalidConfig(format!(
                    "event threshold must be finite, got {}",
                    event.at
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        for name in ["soldier_conveyor", "frozen", "grid", "drift", "drift_recolor"] {
            let config = ScenarioConfig::preset(name).unwrap();
            config.validate().unwrap();
            assert_eq!(config.name, name);
        }
        assert!(ScenarioConfig::preset("unknown").is_none());
    }

    #[test]
    fn test_json_defaults_fill_in() {
        let config = ScenarioConfig::from_json(
            r#"{ "count": 4, "movement": { "kind": "drift", "speed": 0.1 } }"#,
        )
        .unwrap();
        assert_eq!(config.count, 4);
        assert_eq!(
            config.movement,
            MovementConfig::Drift(Drift {
                speed: 0.1,
                spread: Drift::default().spread
            })
        );
        assert_eq!(config.blend, BlendMode::Instant);
    }

    #[test]
    fn test_event_target_out_of_range_rejected() {
        let mut config = ScenarioConfig::drift_recolor();
        config.events[0].target = config.count;
        assert!(matches!(
            config.validate(),
            Err(Error::IndexOutOfRange { .. })
        ));
    }
}
