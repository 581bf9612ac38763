//! Frame pacing.
//!
//! A [`FramePacer`] blocks until the next frame is due and reports how much
//! wall-clock time passed since the previous call. The simulation loop feeds
//! that figure into its fixed-timestep accumulator.

/// Source of frame timing.
pub trait FramePacer {
    /// Block until the next frame is due. Returns the seconds elapsed since
    /// the previous call (or since the pacer was created).
    fn wait_for_next_frame(&mut self) -> f32;
}

/// Pacer that reports a constant frame time without blocking.
///
/// Useful for headless runs and tests, where the simulation should advance
/// as fast as the host can go.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedPacer {
    frame_seconds: f32,
}

impl FixedPacer {
    pub fn new(fps: f32) -> Self {
        Self {
            frame_seconds: if fps > 0.0 { 1.0 / fps } else { 0.0 },
        }
    }
}

impl FramePacer for FixedPacer {
    fn wait_for_next_frame(&mut self) -> f32 {
        self.frame_seconds
    }
}

#[cfg(feature = "std")]
pub use self::sleep::SleepPacer;

#[cfg(feature = "std")]
mod sleep {
    use super::FramePacer;
    use std::thread;
    use std::time::{Duration, Instant};

    /// Sleeps so that frames start at most `fps` times per second.
    #[derive(Debug)]
    pub struct SleepPacer {
        frame: Duration,
        last: Instant,
    }

    impl SleepPacer {
        pub fn new(fps: u32) -> Self {
            Self {
                frame: Duration::from_micros(1_000_000 / u64::from(fps.max(1))),
                last: Instant::now(),
            }
        }

        /// Target frame duration.
        pub fn frame_duration(&self) -> Duration {
            self.frame
        }
    }

    impl FramePacer for SleepPacer {
        fn wait_for_next_frame(&mut self) -> f32 {
            let busy = self.last.elapsed();
            if busy < self.frame {
                thread::sleep(self.frame - busy);
            }
            let now = Instant::now();
            let elapsed = now.saturating_duration_since(self.last);
            self.last = now;
            elapsed.as_secs_f32()
        }
    }
}
