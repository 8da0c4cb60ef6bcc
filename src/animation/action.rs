use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::animation::clip::AnimationClip;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopMode {
    Once,
    #[default]
    Loop,
    PingPong,
}

/// One playable binding of a clip to a rig instance.
///
/// An action keeps its own clock. It advances while `playing` regardless of
/// its weight, so a zero-weight action stays in phase and can be brought in
/// without restarting.
#[derive(Debug, Clone)]
pub struct AnimationAction {
    clip: Arc<AnimationClip>,

    pub time: f32,
    pub time_scale: f32,
    pub loop_mode: LoopMode,

    weight: f32,
    playing: bool,
    // Unreflected position within the 2x period, PingPong only
    ping_pong_phase: f32,
}

impl AnimationAction {
    /// Creates a stopped action at full weight.
    #[must_use]
    pub fn new(clip: Arc<AnimationClip>) -> Self {
        Self {
            clip,
            time: 0.0,
            time_scale: 1.0,
            loop_mode: LoopMode::Loop,
            weight: 1.0,
            playing: false,
            ping_pong_phase: 0.0,
        }
    }

    #[must_use]
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    #[must_use]
    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// Sets the effective weight, clamped to `[0, 1]`.
    pub fn set_weight(&mut self, weight: f32) {
        self.weight = if weight.is_nan() {
            0.0
        } else {
            weight.clamp(0.0, 1.0)
        };
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    /// Stops playback and rewinds to the start of the clip.
    pub fn stop(&mut self) {
        self.playing = false;
        self.time = 0.0;
        self.ping_pong_phase = 0.0;
    }

    /// Advances local time by `dt * time_scale` and applies the loop mode.
    pub fn update(&mut self, dt: f32) {
        if !self.playing {
            return;
        }

        let duration = self.clip.duration;
        if duration <= 0.0 {
            return;
        }

        let step = dt * self.time_scale;

        match self.loop_mode {
            LoopMode::Once => {
                self.time += step;
                if self.time >= duration {
                    self.time = duration;
                    self.playing = false;
                } else if self.time < 0.0 {
                    self.time = 0.0;
                    self.playing = false;
                }
            }
            LoopMode::Loop => {
                self.time = (self.time + step).rem_euclid(duration);
            }
            LoopMode::PingPong => {
                let period = duration * 2.0;
                self.ping_pong_phase = (self.ping_pong_phase + step).rem_euclid(period);
                let t = self.ping_pong_phase;
                // Second half of the period plays backwards
                self.time = if t > duration { period - t } else { t };
            }
        }
    }
}
