//! Simulation tunables.
//!
//! Every physics constant is expressed per fixed tick. The tick length is
//! `1 / tick_rate` simulated seconds and is independent of how often frames
//! are rendered, see [`FixedTimestep`](crate::timestep::FixedTimestep).

use core::ops::RangeInclusive;

use crate::error::ConfigError;

/// Parameters shared by every body in a [`World`](crate::world::World).
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Physics ticks per simulated second.
    pub tick_rate: f32,
    /// Amount subtracted from `velocity.y` every tick.
    pub gravity_per_tick: f32,
    /// Half-size of the invisible cube the bodies live in.
    pub bound: f32,
    /// Fraction of velocity kept (with flipped sign) after hitting a wall.
    pub restitution: f32,
    /// Seconds a collision highlight stays on a body.
    pub highlight_duration: f32,
    /// Lower end of the speed range used by random bounces.
    pub bounce_speed_min: f32,
    /// Upper end of the speed range used by random bounces.
    pub bounce_speed_max: f32,
    /// Most ticks a single frame may run when catching up.
    pub max_ticks_per_frame: u32,
    /// Seed for the world's random number generator.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            gravity_per_tick: 0.01,
            bound: 5.0,
            restitution: 0.8,
            highlight_duration: 0.5,
            bounce_speed_min: 0.2,
            bounce_speed_max: 0.5,
            max_ticks_per_frame: 5,
            seed: 0x5eed_b0b5,
        }
    }
}

impl SimConfig {
    /// Builder: set the physics tick rate (ticks per second).
    pub fn with_tick_rate(mut self, tick_rate: f32) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    /// Builder: set the per-tick gravity decrement.
    pub fn with_gravity_per_tick(mut self, gravity: f32) -> Self {
        self.gravity_per_tick = gravity;
        self
    }

    /// Builder: set the half-size of the bounding cube.
    pub fn with_bound(mut self, bound: f32) -> Self {
        self.bound = bound;
        self
    }

    /// Builder: set wall restitution.
    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    /// Builder: set how long collision highlights last, in seconds.
    pub fn with_highlight_duration(mut self, seconds: f32) -> Self {
        self.highlight_duration = seconds;
        self
    }

    /// Builder: set the random bounce speed range.
    pub fn with_bounce_speed(mut self, min: f32, max: f32) -> Self {
        self.bounce_speed_min = min;
        self.bounce_speed_max = max;
        self
    }

    /// Builder: set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Length of one physics tick in seconds.
    #[inline]
    pub fn tick_seconds(&self) -> f32 {
        1.0 / self.tick_rate
    }

    #[inline]
    pub fn bounce_speed(&self) -> RangeInclusive<f32> {
        self.bounce_speed_min..=self.bounce_speed_max
    }

    /// Check that every parameter is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(name: &'static str, reason: &'static str) -> Result<(), ConfigError> {
            Err(ConfigError::InvalidParameter { name, reason })
        }

        if !(self.tick_rate > 0.0 && self.tick_rate.is_finite()) {
            return invalid("tick_rate", "must be positive and finite");
        }
        if !self.gravity_per_tick.is_finite() {
            return invalid("gravity_per_tick", "must be finite");
        }
        if !(self.bound > 0.0 && self.bound.is_finite()) {
            return invalid("bound", "must be positive and finite");
        }
        if !(0.0..=1.0).contains(&self.restitution) {
            return invalid("restitution", "must be within 0.0..=1.0");
        }
        if !(self.highlight_duration >= 0.0 && self.highlight_duration.is_finite()) {
            return invalid("highlight_duration", "must be non-negative and finite");
        }
        if !(self.bounce_speed_min >= 0.0 && self.bounce_speed_max.is_finite()) {
            return invalid("bounce_speed", "must be non-negative and finite");
        }
        if self.bounce_speed_min > self.bounce_speed_max {
            return invalid("bounce_speed", "min exceeds max");
        }
        if self.max_ticks_per_frame == 0 {
            return invalid("max_ticks_per_frame", "must be at least 1");
        }
        Ok(())
    }
}
