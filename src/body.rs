//! Mesh-backed bodies.
//!
//! A [`Body`] borrows an immutable [`Mesh`] and adds the mutable simulation
//! state: position, linear velocity, per-face colors and the time of its most
//! recent collision.
//!
//! Velocity is measured in world units per tick. [`Body::update`] advances the
//! body by exactly one fixed tick: gravity, then position, then reflection off
//! the walls of the bounding cube.
//!
//! # Example
//! ```
//! use meshbounce::body::Body;
//! use meshbounce::config::SimConfig;
//! use meshbounce::mesh::Mesh;
//! use nalgebra::Vector3;
//!
//! let mesh = Mesh::from_arrays(
//!     &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
//!     &[[0, 1, 2]],
//! )
//! .unwrap();
//! let mut body = Body::new(&mesh, Vector3::new(0.0, 2.0, 0.0));
//!
//! body.update(&SimConfig::default());
//! assert!(body.position.y < 2.0);
//! ```

use alloc::vec;
use alloc::vec::Vec;
use core::ops::RangeInclusive;

use embedded_graphics_core::pixelcolor::{Rgb565, RgbColor};
use log::trace;
use nalgebra::Vector3;
use rand::Rng;

use crate::aabb::Aabb;
use crate::config::SimConfig;
use crate::mesh::Mesh;
use crate::vecmath;

/// Color of a face that is not highlighted.
pub const DEFAULT_FACE_COLOR: Rgb565 = Rgb565::WHITE;

/// Color of a face involved in a collision.
pub const COLLISION_COLOR: Rgb565 = Rgb565::RED;

/// Default number of seconds a collision highlight persists.
pub const DEFAULT_HIGHLIGHT_DURATION: f32 = 0.5;

/// A rigid, non-rotating body made of a triangle mesh.
#[derive(Debug, Clone)]
pub struct Body<'a> {
    mesh: &'a Mesh,
    /// World-space translation applied to every mesh vertex.
    pub position: Vector3<f32>,
    /// World units per tick.
    pub velocity: Vector3<f32>,
    /// Stored for callers that want it; integration ignores it.
    pub angular_velocity: Vector3<f32>,
    face_colors: Vec<Rgb565>,
    /// Simulated time of the most recent collision. `None` means never.
    last_collision: Option<f32>,
    /// Seconds a collision highlight stays before every face reverts to white.
    pub highlight_duration: f32,
}

impl<'a> Body<'a> {
    /// Create a body at rest at `position`, with all faces white.
    pub fn new(mesh: &'a Mesh, position: Vector3<f32>) -> Self {
        Self {
            mesh,
            position,
            velocity: Vector3::zeros(),
            angular_velocity: Vector3::zeros(),
            face_colors: vec![DEFAULT_FACE_COLOR; mesh.face_count()],
            last_collision: None,
            highlight_duration: DEFAULT_HIGHLIGHT_DURATION,
        }
    }

    /// Builder: set initial velocity.
    pub fn with_velocity(mut self, velocity: Vector3<f32>) -> Self {
        self.velocity = velocity;
        self
    }

    /// Builder: set angular velocity.
    pub fn with_angular_velocity(mut self, angular_velocity: Vector3<f32>) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    /// Builder: set how long collision highlights last.
    pub fn with_highlight_duration(mut self, seconds: f32) -> Self {
        self.highlight_duration = seconds;
        self
    }

    #[inline]
    pub fn mesh(&self) -> &'a Mesh {
        self.mesh
    }

    #[inline]
    pub fn face_colors(&self) -> &[Rgb565] {
        &self.face_colors
    }

    #[inline]
    pub fn face_color(&self, index: usize) -> Option<Rgb565> {
        self.face_colors.get(index).copied()
    }

    #[inline]
    pub fn last_collision(&self) -> Option<f32> {
        self.last_collision
    }

    /// Record a collision at simulated time `now`.
    #[inline]
    pub fn mark_collision(&mut self, now: f32) {
        self.last_collision = Some(now);
    }

    /// Set the color of face `index`.
    ///
    /// Out-of-range indices are ignored. Returns whether a face was changed.
    pub fn set_face_color(&mut self, index: usize, color: Rgb565) -> bool {
        match self.face_colors.get_mut(index) {
            Some(slot) => {
                *slot = color;
                true
            }
            None => {
                trace!(
                    "ignoring color for face {} of a {}-face body",
                    index,
                    self.face_colors.len()
                );
                false
            }
        }
    }

    /// Turn every face back to [`DEFAULT_FACE_COLOR`].
    pub fn reset_face_colors(&mut self) {
        self.face_colors.fill(DEFAULT_FACE_COLOR);
    }

    /// Returns `true` if any face currently differs from the default color.
    pub fn is_highlighted(&self) -> bool {
        self.face_colors.iter().any(|&c| c != DEFAULT_FACE_COLOR)
    }

    /// Whether the highlight window has run out at time `now`.
    ///
    /// A body that never collided is always expired.
    #[inline]
    pub fn highlight_expired(&self, now: f32) -> bool {
        match self.last_collision {
            Some(t) => now - t > self.highlight_duration,
            None => true,
        }
    }

    /// Advance one tick: gravity, translation, then reflection off the walls
    /// of the `[-bound, bound]` cube.
    pub fn update(&mut self, config: &SimConfig) {
        self.velocity.y -= config.gravity_per_tick;
        self.position = vecmath::add(&self.position, &self.velocity);

        let bound = config.bound;
        for axis in 0..3 {
            if self.position[axis] < -bound {
                self.position[axis] = -bound;
                self.velocity[axis] = -self.velocity[axis] * config.restitution;
            } else if self.position[axis] > bound {
                self.position[axis] = bound;
                self.velocity[axis] = -self.velocity[axis] * config.restitution;
            }
        }
    }

    /// Kick the body in a random direction.
    ///
    /// Each direction component is drawn independently from `[-1, 1]` and the
    /// result is scaled by a speed drawn from `speed`. The direction is not
    /// renormalized, so directions are uniform over the cube rather than the
    /// sphere.
    pub fn apply_random_bounce<R: Rng + ?Sized>(&mut self, rng: &mut R, speed: RangeInclusive<f32>) {
        let direction: Vector3<f32> = Vector3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        let magnitude = rng.gen_range(speed);
        self.velocity = vecmath::scale(&direction, magnitude);
    }

    /// World-space corners of face `index`.
    ///
    /// # Panics
    /// Panics if `index` is not a valid face index.
    pub fn face_world_vertices(&self, index: usize) -> [Vector3<f32>; 3] {
        self.mesh.face_vertices(index).map(|v| v + self.position)
    }

    /// World-space bounds of face `index`.
    ///
    /// # Panics
    /// Panics if `index` is not a valid face index.
    #[inline]
    pub fn face_bounds(&self, index: usize) -> Aabb {
        self.mesh.face_bounds(index, &self.position)
    }

    /// World-space bounds of the whole mesh.
    #[inline]
    pub fn bounds(&self) -> Aabb {
        self.mesh.bounds(&self.position)
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.face_colors.len()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn triangle() -> Mesh {
        Mesh::from_arrays(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]], &[[0, 1, 2]])
            .unwrap()
    }

    fn quad() -> Mesh {
        Mesh::from_arrays(
            &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
            &[[0, 1, 2], [0, 2, 3]],
        )
        .unwrap()
    }

    #[test]
    fn test_body_creation() {
        let mesh = quad();
        let body = Body::new(&mesh, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(body.position, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(body.velocity, Vector3::zeros());
        assert_eq!(body.angular_velocity, Vector3::zeros());
        assert_eq!(body.face_colors(), &[Rgb565::WHITE, Rgb565::WHITE]);
        assert_eq!(body.last_collision(), None);
        assert!(approx_eq(body.highlight_duration, 0.5));
    }

    #[test]
    fn test_builder_pattern() {
        let mesh = triangle();
        let body = Body::new(&mesh, Vector3::zeros())
            .with_velocity(Vector3::new(0.1, 0.0, 0.0))
            .with_angular_velocity(Vector3::new(0.0, 1.0, 0.0))
            .with_highlight_duration(2.0);
        assert_eq!(body.velocity, Vector3::new(0.1, 0.0, 0.0));
        assert_eq!(body.angular_velocity, Vector3::new(0.0, 1.0, 0.0));
        assert!(approx_eq(body.highlight_duration, 2.0));
    }

    #[test]
    fn test_update_applies_gravity_then_moves() {
        let mesh = triangle();
        let mut body = Body::new(&mesh, Vector3::new(0.0, 1.0, 0.0))
            .with_velocity(Vector3::new(0.1, 0.0, -0.2));
        body.update(&SimConfig::default());

        assert!(approx_eq(body.velocity.y, -0.01));
        assert!(approx_eq(body.position.x, 0.1));
        assert!(approx_eq(body.position.y, 0.99));
        assert!(approx_eq(body.position.z, -0.2));
    }

    #[test]
    fn test_update_floor_bounce() {
        let mesh = triangle();
        let mut body = Body::new(&mesh, Vector3::new(0.0, -4.95, 0.0))
            .with_velocity(Vector3::new(0.0, -0.2, 0.0));
        body.update(&SimConfig::default());

        // -4.95 + (-0.21) overshoots the floor
        assert!(approx_eq(body.position.y, -5.0));
        assert!(approx_eq(body.velocity.y, 0.21 * 0.8));
    }

    #[test]
    fn test_update_ceiling_and_walls() {
        let mesh = triangle();
        let mut body = Body::new(&mesh, Vector3::new(4.9, 4.99, -4.9))
            .with_velocity(Vector3::new(0.5, 0.5, -0.5));
        body.update(&SimConfig::default());

        assert!(approx_eq(body.position.x, 5.0));
        assert!(approx_eq(body.position.y, 5.0));
        assert!(approx_eq(body.position.z, -5.0));
        assert!(approx_eq(body.velocity.x, -0.4));
        assert!(approx_eq(body.velocity.y, -0.49 * 0.8));
        assert!(approx_eq(body.velocity.z, 0.4));
    }

    #[test]
    fn test_update_unclamped_axis_untouched() {
        let mesh = triangle();
        let mut body = Body::new(&mesh, Vector3::new(4.9, 0.0, 0.0))
            .with_velocity(Vector3::new(0.5, 0.0, 0.3));
        body.update(&SimConfig::default());

        assert!(approx_eq(body.velocity.x, -0.4));
        assert!(approx_eq(body.velocity.z, 0.3));
        assert!(approx_eq(body.position.z, 0.3));
    }

    #[test]
    fn test_update_stays_in_bounds() {
        let mesh = triangle();
        let config = SimConfig::default();
        let mut rng = SmallRng::seed_from_u64(7);
        let mut body = Body::new(&mesh, Vector3::new(0.0, 5.0, 0.0));

        for i in 0..2000 {
            if i % 50 == 0 {
                // Large kicks so walls are hit on every axis
                body.velocity = Vector3::new(
                    rng.gen_range(-3.0..=3.0),
                    rng.gen_range(-3.0..=3.0),
                    rng.gen_range(-3.0..=3.0),
                );
            }
            body.update(&config);
            for axis in 0..3 {
                assert!(body.position[axis] >= -5.0 && body.position[axis] <= 5.0);
            }
        }
    }

    #[test]
    fn test_angular_velocity_has_no_effect() {
        let mesh = triangle();
        let config = SimConfig::default();
        let mut spinning = Body::new(&mesh, Vector3::new(0.0, 3.0, 0.0))
            .with_angular_velocity(Vector3::new(5.0, 5.0, 5.0));
        let mut still = Body::new(&mesh, Vector3::new(0.0, 3.0, 0.0));

        for _ in 0..100 {
            spinning.update(&config);
            still.update(&config);
        }
        assert_eq!(spinning.position, still.position);
        assert_eq!(spinning.velocity, still.velocity);
    }

    #[test]
    fn test_set_face_color_in_range() {
        let mesh = quad();
        let mut body = Body::new(&mesh, Vector3::zeros());
        assert!(body.set_face_color(1, Rgb565::RED));
        assert_eq!(body.face_color(0), Some(Rgb565::WHITE));
        assert_eq!(body.face_color(1), Some(Rgb565::RED));
        assert!(body.is_highlighted());
    }

    #[test]
    fn test_set_face_color_out_of_range_is_noop() {
        let mesh = quad();
        let mut body = Body::new(&mesh, Vector3::zeros());
        assert!(!body.set_face_color(2, Rgb565::RED));
        assert!(!body.set_face_color(usize::MAX, Rgb565::RED));
        assert_eq!(body.face_colors(), &[Rgb565::WHITE, Rgb565::WHITE]);
    }

    #[test]
    fn test_reset_face_colors() {
        let mesh = quad();
        let mut body = Body::new(&mesh, Vector3::zeros());
        body.set_face_color(0, Rgb565::RED);
        body.set_face_color(1, Rgb565::BLUE);
        body.reset_face_colors();
        assert!(!body.is_highlighted());
    }

    #[test]
    fn test_highlight_expired() {
        let mesh = triangle();
        let mut body = Body::new(&mesh, Vector3::zeros());
        assert!(body.highlight_expired(0.0));

        body.mark_collision(1.0);
        assert!(!body.highlight_expired(1.0));
        assert!(!body.highlight_expired(1.5));
        assert!(body.highlight_expired(1.5001));
    }

    #[test]
    fn test_random_bounce_sampling() {
        let mesh = triangle();
        let mut body = Body::new(&mesh, Vector3::zeros());
        let mut rng = SmallRng::seed_from_u64(42);
        // 0.5 * sqrt(3)
        let max_speed = 0.866_025_4;

        let mut longest = 0.0f32;
        let mut sum = Vector3::zeros();
        for _ in 0..1000 {
            body.apply_random_bounce(&mut rng, 0.2..=0.5);
            let v = body.velocity;
            for axis in 0..3 {
                assert!(v[axis].abs() <= 0.5 + EPSILON);
            }
            let speed = v.norm();
            assert!(speed <= max_speed + EPSILON);
            longest = longest.max(speed);
            sum += v;
        }

        // Cube sampling regularly produces speeds beyond the 0.5 cap a
        // renormalized direction would give.
        assert!(longest > 0.5);
        // Symmetric around zero
        let mean = sum / 1000.0;
        for axis in 0..3 {
            assert!(mean[axis].abs() < 0.05);
        }
    }

    #[test]
    fn test_random_bounce_replaces_velocity() {
        let mesh = triangle();
        let mut body = Body::new(&mesh, Vector3::zeros()).with_velocity(Vector3::new(100.0, 0.0, 0.0));
        let mut rng = SmallRng::seed_from_u64(1);
        body.apply_random_bounce(&mut rng, 0.2..=0.5);
        assert!(body.velocity.x.abs() <= 0.5);
    }

    #[test]
    fn test_face_world_vertices_and_bounds() {
        let mesh = triangle();
        let body = Body::new(&mesh, Vector3::new(0.5, 0.5, 0.0));
        let [a, b, c] = body.face_world_vertices(0);
        assert_eq!(a, Vector3::new(0.5, 0.5, 0.0));
        assert_eq!(b, Vector3::new(1.5, 0.5, 0.0));
        assert_eq!(c, Vector3::new(0.5, 1.5, 0.0));

        let aabb = body.face_bounds(0);
        assert_eq!(aabb.min, Vector3::new(0.5, 0.5, 0.0));
        assert_eq!(aabb.max, Vector3::new(1.5, 1.5, 0.0));
        assert_eq!(body.bounds(), aabb);
    }
}
