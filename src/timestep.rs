//! Fixed-timestep accumulator.
//!
//! Physics always advances in ticks of `1 / tick_rate` seconds, no matter how
//! long a rendered frame took. The accumulator collects wall-clock time and
//! hands out whole ticks, carrying the remainder over to the next frame.

use log::debug;

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq)]
pub struct FixedTimestep {
    tick: f32,
    accumulator: f32,
    max_ticks_per_frame: u32,
}

impl FixedTimestep {
    pub fn new(tick_rate: f32, max_ticks_per_frame: u32) -> Result<Self, ConfigError> {
        if !(tick_rate > 0.0 && tick_rate.is_finite()) {
            return Err(ConfigError::InvalidParameter {
                name: "tick_rate",
                reason: "must be positive and finite",
            });
        }
        if max_ticks_per_frame == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "max_ticks_per_frame",
                reason: "must be at least 1",
            });
        }
        Ok(Self {
            tick: 1.0 / tick_rate,
            accumulator: 0.0,
            max_ticks_per_frame,
        })
    }

    /// Length of one tick in seconds.
    #[inline]
    pub fn tick(&self) -> f32 {
        self.tick
    }

    /// Time carried over that has not yet filled a whole tick.
    #[inline]
    pub fn pending(&self) -> f32 {
        self.accumulator
    }

    /// Feed `elapsed` seconds and return how many ticks to run now.
    ///
    /// At most `max_ticks_per_frame` ticks are returned; any backlog beyond
    /// that is dropped so a slow frame cannot snowball.
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        if elapsed.is_finite() && elapsed > 0.0 {
            self.accumulator += elapsed;
        }

        // Tolerate rounding so a frame of exactly one tick yields one tick
        let slack = self.tick * 1e-3;
        let mut ticks = 0;
        while self.accumulator + slack >= self.tick {
            if ticks == self.max_ticks_per_frame {
                debug!(
                    "dropping {:.4}s of simulation backlog",
                    self.accumulator
                );
                self.accumulator = 0.0;
                break;
            }
            self.accumulator = (self.accumulator - self.tick).max(0.0);
            ticks += 1;
        }
        ticks
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
