//! Bouncing-mesh collision sandbox.
//!
//! Triangle meshes loaded from OBJ files fall under gravity inside a
//! box, bounce off its walls and highlight the faces that touch each other.
//! Physics runs on a fixed timestep in [`world::World`]; [`sim::SimulationLoop`]
//! connects it to input, rendering and frame pacing supplied by the host.
//!
//! The core is `no_std` + `alloc`. The `std` feature (on by default) adds file
//! loading, scenes and a sleeping frame pacer.

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod aabb;
pub mod body;
pub mod camera;
pub mod collision;
pub mod config;
pub mod draw;
pub mod error;
pub mod mesh;
pub mod obj;
pub mod pacing;
pub mod render;
#[cfg(feature = "std")]
pub mod scene;
pub mod sim;
pub mod timestep;
pub mod vecmath;
pub mod world;

pub use body::Body;
pub use config::SimConfig;
pub use error::{ConfigError, MeshError};
pub use mesh::Mesh;
pub use render::FaceRenderer;
pub use sim::{FrameReport, InputEvent, InputSource, Renderer, SimulationLoop};
pub use world::{BodyId, World};
