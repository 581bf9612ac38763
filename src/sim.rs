//! Frame loop.
//!
//! [`SimulationLoop`] drives a [`World`] from a host that supplies input and
//! draws frames. Each frame runs in a fixed order:
//!
//! 1. drain pending input events,
//! 2. run the physics ticks that are due (collisions, then motion),
//! 3. render every body,
//! 4. wait for the next frame.

use log::info;

use crate::body::Body;
use crate::collision::{CollisionSystem, FaceAabbCollision};
use crate::error::ConfigError;
use crate::pacing::FramePacer;
use crate::timestep::FixedTimestep;
use crate::world::World;

/// User input understood by the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Stop after the current frame.
    Quit,
    /// Kick every body in a random direction.
    Trigger,
    /// Switch between filled and outlined faces.
    ToggleWireframe,
}

/// Supplies input events. Polled until it returns `None` once per frame.
pub trait InputSource {
    fn poll_event(&mut self) -> Option<InputEvent>;
}

/// Draws one frame of bodies.
pub trait Renderer {
    type Error;

    fn begin_frame(&mut self) -> Result<(), Self::Error>;
    fn draw_body(&mut self, body: &Body<'_>, wireframe: bool) -> Result<(), Self::Error>;
    /// Present the finished frame.
    fn end_frame(&mut self) -> Result<(), Self::Error>;
}

/// What happened during one call to [`SimulationLoop::run_frame`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Physics ticks run this frame.
    pub ticks: u32,
    /// Colliding face pairs summed over those ticks.
    pub face_hits: usize,
    /// A quit event was received.
    pub quit: bool,
}

pub struct SimulationLoop<'a, const N: usize, C = FaceAabbCollision> {
    world: World<'a, N, C>,
    timestep: FixedTimestep,
    running: bool,
    wireframe: bool,
    frames: u64,
}

impl<'a, const N: usize, C: CollisionSystem> SimulationLoop<'a, N, C> {
    pub fn new(world: World<'a, N, C>) -> Result<Self, ConfigError> {
        let config = world.config();
        let timestep = FixedTimestep::new(config.tick_rate, config.max_ticks_per_frame)?;
        Ok(Self {
            world,
            timestep,
            running: true,
            wireframe: false,
            frames: 0,
        })
    }

    #[inline]
    pub fn world(&self) -> &World<'a, N, C> {
        &self.world
    }

    #[inline]
    pub fn world_mut(&mut self) -> &mut World<'a, N, C> {
        &mut self.world
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    pub fn wireframe(&self) -> bool {
        self.wireframe
    }

    pub fn set_wireframe(&mut self, wireframe: bool) {
        self.wireframe = wireframe;
    }

    /// Frames rendered so far.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Apply one input event.
    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::Quit => self.running = false,
            InputEvent::Trigger => self.world.trigger_bounce(),
            InputEvent::ToggleWireframe => self.wireframe = !self.wireframe,
        }
    }

    /// Run one frame given `elapsed` wall-clock seconds since the last one.
    ///
    /// Renderer errors abort the frame and are returned unchanged.
    pub fn run_frame<H>(&mut self, host: &mut H, elapsed: f32) -> Result<FrameReport, H::Error>
    where
        H: InputSource + Renderer,
    {
        let mut report = FrameReport::default();

        while let Some(event) = host.poll_event() {
            if event == InputEvent::Quit {
                report.quit = true;
            }
            self.handle_event(event);
        }

        report.ticks = self.timestep.advance(elapsed);
        report.face_hits = self.world.step_n(report.ticks);

        host.begin_frame()?;
        for (_, body) in self.world.bodies() {
            host.draw_body(body, self.wireframe)?;
        }
        host.end_frame()?;

        self.frames += 1;
        Ok(report)
    }

    /// Run frames until a quit event arrives. Returns the number of frames
    /// rendered.
    ///
    /// The first frame always runs exactly one tick; later frames use the
    /// time reported by `pacer`.
    pub fn run<H, P>(&mut self, host: &mut H, pacer: &mut P) -> Result<u64, H::Error>
    where
        H: InputSource + Renderer,
        P: FramePacer,
    {
        info!("simulation started with {} bodies", self.world.body_count());
        self.running = true;
        let start = self.frames;

        let mut elapsed = self.timestep.tick();
        while self.running {
            self.run_frame(host, elapsed)?;
            if !self.running {
                break;
            }
            elapsed = pacer.wait_for_next_frame();
        }

        let frames = self.frames - start;
        info!(
            "simulation stopped after {} frames, {} ticks ({:.2}s simulated)",
            frames,
            self.world.ticks(),
            self.world.time()
        );
        Ok(frames)
    }

    /// Tear down the loop and hand the world back.
    pub fn into_world(self) -> World<'a, N, C> {
        self.world
    }
}
