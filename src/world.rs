//! The simulation world.
//!
//! A [`World`] owns every body, the simulated clock, the random number
//! generator used for bounces and the [`CollisionSystem`]. One call to
//! [`World::step`] is one fixed tick:
//!
//! 1. every unordered pair of bodies is checked once for face collisions,
//! 2. every body integrates gravity and bounces off the walls,
//! 3. the clock advances by `1 / tick_rate`.
//!
//! # Example
//! ```
//! use meshbounce::config::SimConfig;
//! use meshbounce::mesh::Mesh;
//! use meshbounce::world::World;
//! use nalgebra::Vector3;
//!
//! let cube = Mesh::from_arrays(
//!     &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
//!     &[[0, 1, 2]],
//! )
//! .unwrap();
//!
//! let mut world = World::<4>::new(SimConfig::default()).unwrap();
//! let a = world.spawn(&cube, Vector3::new(0.0, 0.0, 0.0)).unwrap();
//! world.spawn(&cube, Vector3::new(0.5, 0.5, 0.0)).unwrap();
//!
//! let hits = world.step();
//! assert_eq!(hits, 1);
//! assert!(world.body(a).unwrap().is_highlighted());
//! ```

use log::{debug, info, warn};
use nalgebra::Vector3;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::body::{Body, COLLISION_COLOR};
use crate::collision::{CollisionSystem, FaceAabbCollision};
use crate::config::SimConfig;
use crate::error::ConfigError;
use crate::mesh::Mesh;

/// Unique identifier for a body within a [`World`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(usize);

impl BodyId {
    /// Position of the body in insertion order.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Fixed-capacity collection of bodies plus the state needed to step them.
///
/// # Type Parameters
/// * `N` - Maximum number of bodies (compile-time capacity).
/// * `C` - Collision strategy, [`FaceAabbCollision`] by default.
pub struct World<'a, const N: usize, C = FaceAabbCollision> {
    bodies: heapless::Vec<Body<'a>, N>,
    collision: C,
    config: SimConfig,
    rng: SmallRng,
    ticks: u64,
}

impl<'a, const N: usize> World<'a, N, FaceAabbCollision> {
    /// Create an empty world using the default collision system.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        Self::with_collision_system(config, FaceAabbCollision::new())
    }
}

impl<'a, const N: usize, C: CollisionSystem> World<'a, N, C> {
    /// Create an empty world with a custom collision system.
    pub fn with_collision_system(config: SimConfig, collision: C) -> Result<Self, ConfigError> {
        config.validate()?;
        info!(
            "world: capacity {}, {} ticks/s, bound {}",
            N, config.tick_rate, config.bound
        );
        Ok(Self {
            bodies: heapless::Vec::new(),
            collision,
            rng: SmallRng::seed_from_u64(config.seed),
            config,
            ticks: 0,
        })
    }

    #[inline]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Add a body. Returns its [`BodyId`], or `None` if the world is full.
    pub fn add_body(&mut self, body: Body<'a>) -> Option<BodyId> {
        let id = BodyId(self.bodies.len());
        if self.bodies.push(body).is_err() {
            warn!("world is full ({} bodies), body dropped", N);
            return None;
        }
        Some(id)
    }

    /// Add a body for `mesh` at rest at `position`, using the configured
    /// highlight duration.
    pub fn spawn(&mut self, mesh: &'a Mesh, position: Vector3<f32>) -> Option<BodyId> {
        let body = Body::new(mesh, position).with_highlight_duration(self.config.highlight_duration);
        self.add_body(body)
    }

    /// Get an immutable reference to a body by its ID.
    pub fn body(&self, id: BodyId) -> Option<&Body<'a>> {
        self.bodies.get(id.0)
    }

    /// Get a mutable reference to a body by its ID.
    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body<'a>> {
        self.bodies.get_mut(id.0)
    }

    /// Iterate over all bodies immutably.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &Body<'a>)> {
        self.bodies.iter().enumerate().map(|(i, b)| (BodyId(i), b))
    }

    /// Iterate over all bodies mutably.
    pub fn bodies_mut(&mut self) -> impl Iterator<Item = (BodyId, &mut Body<'a>)> {
        self.bodies.iter_mut().enumerate().map(|(i, b)| (BodyId(i), b))
    }

    #[inline]
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        N
    }

    /// Number of ticks stepped so far.
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Simulated seconds elapsed.
    #[inline]
    pub fn time(&self) -> f32 {
        (self.ticks as f64 / self.config.tick_rate as f64) as f32
    }

    /// Kick every body in a random direction and highlight its first face.
    pub fn trigger_bounce(&mut self) {
        let speed = self.config.bounce_speed();
        for body in self.bodies.iter_mut() {
            body.apply_random_bounce(&mut self.rng, speed.clone());
            body.set_face_color(0, COLLISION_COLOR);
        }
        debug!("bounce triggered on {} bodies at t={}", self.bodies.len(), self.time());
    }

    /// Check every unordered pair of bodies once at the current time.
    ///
    /// Returns the total number of colliding face pairs.
    pub fn detect_collisions(&mut self) -> usize {
        let now = self.time();
        let len = self.bodies.len();
        let mut hits = 0;

        for i in 0..len {
            for j in (i + 1)..len {
                let (a, b) = pair_mut(&mut self.bodies, i, j);
                hits += self.collision.check_pair(a, b, now);
            }
        }

        hits
    }

    /// Advance every body by one tick of motion.
    pub fn integrate(&mut self) {
        for body in self.bodies.iter_mut() {
            body.update(&self.config);
        }
    }

    /// Run one full tick: collisions, integration, clock.
    ///
    /// Returns the number of colliding face pairs found this tick.
    pub fn step(&mut self) -> usize {
        let hits = self.detect_collisions();
        self.integrate();
        self.ticks += 1;
        hits
    }

    /// Run `ticks` ticks back to back. Returns the summed face hits.
    pub fn step_n(&mut self, ticks: u32) -> usize {
        (0..ticks).map(|_| self.step()).sum()
    }
}

/// Borrow two distinct elements mutably. Requires `i < j`.
fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    debug_assert!(i < j);
    let (head, tail) = items.split_at_mut(j);
    (&mut head[i], &mut tail[0])
}
