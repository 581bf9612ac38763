//! Mesh Collision Demo
//!
//! Loads a pyramid, a sphere and two cubes from `resources/` and lets them
//! fall inside a 10x10x10 box. Faces that touch another body turn red for
//! half a second.
//!
//! Controls:
//! - Mouse click: kick every body in a random direction
//! - W: toggle wireframe
//! - ESC: Exit
//!
//! Set `MESHBOUNCE_ASSET_DIR` to load the meshes from somewhere other than
//! the current directory, and `RUST_LOG` to change the log level.

use std::collections::VecDeque;
use std::convert::Infallible;
use std::error::Error;
use std::fmt::Write as _;

use embedded_graphics::mono_font::{ascii::FONT_6X10, MonoTextStyle};
use embedded_graphics::text::Text;
use embedded_graphics_core::pixelcolor::{Rgb565, RgbColor};
use embedded_graphics_core::prelude::*;
use embedded_graphics_simulator::{
    sdl2::Keycode, OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window,
};
use meshbounce::body::Body;
use meshbounce::pacing::SleepPacer;
use meshbounce::scene::Scene;
use meshbounce::{FaceRenderer, InputEvent, InputSource, Renderer, SimConfig, SimulationLoop, World};
use tracing_subscriber::EnvFilter;

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;
const MAX_BODIES: usize = 8;

/// Simulator window acting as both input source and renderer.
struct SimulatorHost {
    renderer: FaceRenderer<SimulatorDisplay<Rgb565>>,
    window: Window,
    pending: VecDeque<InputEvent>,
    polled: bool,
    highlighted: usize,
    wireframe: bool,
    hud: String,
}

impl SimulatorHost {
    fn new(bound: f32) -> Self {
        let display = SimulatorDisplay::<Rgb565>::new(Size::new(WIDTH, HEIGHT));
        let output_settings = OutputSettingsBuilder::new().scale(1).build();
        let mut window = Window::new("Mesh Collisions - click=bounce W=wireframe ESC=exit", &output_settings);
        // The window only exists after the first update
        window.update(&display);

        Self {
            renderer: FaceRenderer::new(display, bound),
            window,
            pending: VecDeque::new(),
            polled: false,
            highlighted: 0,
            wireframe: false,
            hud: String::new(),
        }
    }
}

impl InputSource for SimulatorHost {
    fn poll_event(&mut self) -> Option<InputEvent> {
        if !self.polled {
            self.polled = true;
            for event in self.window.events() {
                let mapped = match event {
                    SimulatorEvent::Quit => Some(InputEvent::Quit),
                    SimulatorEvent::MouseButtonDown { .. } => Some(InputEvent::Trigger),
                    SimulatorEvent::KeyDown { keycode, .. } => match keycode {
                        Keycode::Escape => Some(InputEvent::Quit),
                        Keycode::W => Some(InputEvent::ToggleWireframe),
                        _ => None,
                    },
                    _ => None,
                };
                self.pending.extend(mapped);
            }
        }
        self.pending.pop_front()
    }
}

impl Renderer for SimulatorHost {
    type Error = Infallible;

    fn begin_frame(&mut self) -> Result<(), Self::Error> {
        self.highlighted = 0;
        self.renderer.begin_frame()
    }

    fn draw_body(&mut self, body: &Body<'_>, wireframe: bool) -> Result<(), Self::Error> {
        if body.is_highlighted() {
            self.highlighted += 1;
        }
        self.wireframe = wireframe;
        self.renderer.draw_body(body, wireframe)
    }

    fn end_frame(&mut self) -> Result<(), Self::Error> {
        let text_style = MonoTextStyle::new(&FONT_6X10, Rgb565::WHITE);
        self.hud.clear();
        write!(
            self.hud,
            "colliding: {}  mode: {}",
            self.highlighted,
            if self.wireframe { "wireframe" } else { "solid" }
        )
        .ok();
        let display = self.renderer.target_mut();
        Text::new(&self.hud, Point::new(10, 15), text_style).draw(display)?;
        Text::new("click=bounce W=wireframe ESC=exit", Point::new(10, HEIGHT as i32 - 10), text_style)
            .draw(display)?;

        self.window.update(self.renderer.target());
        self.polled = false;
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = SimConfig::default();
    let scene = Scene::demo();
    let meshes = scene.load_meshes()?;

    let mut world = World::<MAX_BODIES>::new(config.clone())?;
    scene.populate(&mut world, &meshes)?;

    let mut host = SimulatorHost::new(config.bound);
    let mut pacer = SleepPacer::new(config.tick_rate as u32);
    let mut sim = SimulationLoop::new(world)?;

    let frames = sim.run(&mut host, &mut pacer)?;
    let world = sim.into_world();
    println!(
        "{} frames, {:.1}s simulated, {} bodies",
        frames,
        world.time(),
        world.body_count()
    );
    Ok(())
}
