//! Face-level AABB collision between bodies.
//!
//! Every face of one body is tested against every face of the other using the
//! axis-aligned bounds of their world-space triangles. This is an
//! approximation: two triangles whose boxes touch count as colliding even if
//! the triangles themselves do not.
//!
//! Colliding faces turn [`COLLISION_COLOR`] and both bodies remember the time.
//! Once a body has gone `highlight_duration` seconds without any contact, all
//! of its faces are reset to white in one sweep.
//!
//! The cross product costs `O(faces_a * faces_b)` per pair, which makes the
//! whole step `O(bodies² * faces²)`. [`CollisionSystem`] is the seam for
//! replacing it with something smarter.

use alloc::vec::Vec;

use log::trace;

use crate::aabb::Aabb;
use crate::body::{Body, COLLISION_COLOR};

/// Strategy for detecting and reporting contact between two bodies.
pub trait CollisionSystem {
    /// Test `a` against `b` at simulated time `now`, updating face colors and
    /// collision times on both.
    ///
    /// Returns the number of colliding face pairs found.
    fn check_pair(&mut self, a: &mut Body<'_>, b: &mut Body<'_>, now: f32) -> usize;
}

/// Brute-force face cross product with an optional whole-body pre-filter.
#[derive(Debug, Clone)]
pub struct FaceAabbCollision {
    /// Skip the face loop when the whole-body boxes do not touch.
    pub coarse_prefilter: bool,
    // Reused between calls to avoid reallocating every pair.
    scratch: Vec<Aabb>,
}

impl Default for FaceAabbCollision {
    fn default() -> Self {
        Self::new()
    }
}

impl FaceAabbCollision {
    pub fn new() -> Self {
        Self {
            coarse_prefilter: true,
            scratch: Vec::new(),
        }
    }

    /// A system that always runs the full face cross product.
    pub fn without_prefilter() -> Self {
        Self {
            coarse_prefilter: false,
            scratch: Vec::new(),
        }
    }
}

impl CollisionSystem for FaceAabbCollision {
    fn check_pair(&mut self, a: &mut Body<'_>, b: &mut Body<'_>, now: f32) -> usize {
        let hits = if self.coarse_prefilter && !bodies_overlap(a, b) {
            0
        } else {
            self.scratch.clear();
            self.scratch.extend((0..b.face_count()).map(|j| b.face_bounds(j)));
            mark_face_hits(a, b, &self.scratch, now)
        };

        expire_highlight(a, now);
        expire_highlight(b, now);
        hits
    }
}

/// Whole-body AABB test over every vertex of both meshes.
pub fn bodies_overlap(a: &Body<'_>, b: &Body<'_>) -> bool {
    a.bounds().overlaps(&b.bounds())
}

/// Run the full face cross product between `a` and `b`, then expire stale
/// highlights on both.
///
/// Returns the number of colliding face pairs.
pub fn check_collision(a: &mut Body<'_>, b: &mut Body<'_>, now: f32) -> usize {
    FaceAabbCollision::without_prefilter().check_pair(a, b, now)
}

/// Reset every face of `body` to white if its highlight window has passed.
///
/// Returns `true` if the faces were reset.
pub fn expire_highlight(body: &mut Body<'_>, now: f32) -> bool {
    if body.highlight_expired(now) {
        body.reset_face_colors();
        true
    } else {
        false
    }
}

fn mark_face_hits(a: &mut Body<'_>, b: &mut Body<'_>, b_faces: &[Aabb], now: f32) -> usize {
    let mut hits = 0;
    for i in 0..a.face_count() {
        let face_a = a.face_bounds(i);
        for (j, face_b) in b_faces.iter().enumerate() {
            if face_a.overlaps(face_b) {
                a.set_face_color(i, COLLISION_COLOR);
                b.set_face_color(j, COLLISION_COLOR);
                a.mark_collision(now);
                b.mark_collision(now);
                hits += 1;
            }
        }
    }
    if hits > 0 {
        trace!("{} face pairs in contact at t={}", hits, now);
    }
    hits
}

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;
    use crate::body::DEFAULT_FACE_COLOR;
    use crate::mesh::Mesh;
    use embedded_graphics_core::pixelcolor::{Rgb565, RgbColor};
    use nalgebra::Vector3;

    fn triangle() -> Mesh {
        Mesh::from_arrays(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]], &[[0, 1, 2]])
            .unwrap()
    }

    /// Two faces: one at z=0 and one far away at z=10.
    fn two_face_mesh() -> Mesh {
        Mesh::from_arrays(
            &[
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0, 10.0],
                [1.0, 0.0, 10.0],
                [0.0, 1.0, 10.0],
            ],
            &[[0, 1, 2], [3, 4, 5]],
        )
        .unwrap()
    }

    #[test]
    fn test_overlapping_triangles_turn_red() {
        let mesh = triangle();
        let mut a = Body::new(&mesh, Vector3::new(0.0, 0.0, 0.0));
        let mut b = Body::new(&mesh, Vector3::new(0.5, 0.5, 0.0));

        let hits = check_collision(&mut a, &mut b, 3.0);

        assert_eq!(hits, 1);
        assert_eq!(a.face_color(0), Some(Rgb565::RED));
        assert_eq!(b.face_color(0), Some(Rgb565::RED));
        assert_eq!(a.last_collision(), Some(3.0));
        assert_eq!(b.last_collision(), Some(3.0));
    }

    #[test]
    fn test_separated_triangles_stay_white() {
        let mesh = triangle();
        let mut a = Body::new(&mesh, Vector3::new(0.0, 0.0, 0.0));
        let mut b = Body::new(&mesh, Vector3::new(3.0, 0.0, 0.0));

        assert_eq!(check_collision(&mut a, &mut b, 0.0), 0);
        assert!(!a.is_highlighted());
        assert!(!b.is_highlighted());
        assert_eq!(a.last_collision(), None);
    }

    #[test]
    fn test_touching_triangles_collide() {
        let mesh = triangle();
        let mut a = Body::new(&mesh, Vector3::new(0.0, 0.0, 0.0));
        let mut b = Body::new(&mesh, Vector3::new(1.0, 0.0, 0.0));

        assert_eq!(check_collision(&mut a, &mut b, 0.0), 1);
    }

    #[test]
    fn test_only_colliding_faces_marked() {
        let mesh = two_face_mesh();
        let mut a = Body::new(&mesh, Vector3::zeros());
        let mut b = Body::new(&mesh, Vector3::new(0.5, 0.5, 0.0));

        // Near faces touch near faces, far faces touch far faces
        let hits = check_collision(&mut a, &mut b, 1.0);
        assert_eq!(hits, 2);

        let mesh_single = triangle();
        let mut e = Body::new(&mesh_single, Vector3::new(0.2, 0.2, 10.0));
        let mut f = Body::new(&mesh, Vector3::zeros());
        let hits = check_collision(&mut e, &mut f, 2.0);
        assert_eq!(hits, 1);
        assert_eq!(f.face_color(0), Some(Rgb565::WHITE));
        assert_eq!(f.face_color(1), Some(Rgb565::RED));
        assert_eq!(e.face_color(0), Some(Rgb565::RED));
    }

    #[test]
    fn test_highlight_expires_after_duration() {
        let mesh = triangle();
        let mut a = Body::new(&mesh, Vector3::zeros());
        let mut b = Body::new(&mesh, Vector3::new(0.5, 0.5, 0.0));

        check_collision(&mut a, &mut b, 10.0);
        assert!(a.is_highlighted() && b.is_highlighted());

        // Separate them
        b.position = Vector3::new(4.0, 0.0, 0.0);

        check_collision(&mut a, &mut b, 10.5);
        assert!(a.is_highlighted(), "still inside the highlight window");
        assert!(b.is_highlighted());

        check_collision(&mut a, &mut b, 10.5 + 0.01);
        assert!(!a.is_highlighted());
        assert!(!b.is_highlighted());
        assert!(a.face_colors().iter().all(|&c| c == DEFAULT_FACE_COLOR));
        // The last collision time is kept
        assert_eq!(a.last_collision(), Some(10.0));
    }

    #[test]
    fn test_continuous_contact_keeps_highlight() {
        let mesh = triangle();
        let mut a = Body::new(&mesh, Vector3::zeros());
        let mut b = Body::new(&mesh, Vector3::new(0.5, 0.5, 0.0));

        for step in 0..100 {
            let now = step as f32 * 0.1;
            check_collision(&mut a, &mut b, now);
            assert!(a.is_highlighted());
            assert_eq!(a.last_collision(), Some(now));
        }
    }

    #[test]
    fn test_manual_highlight_cleared_without_recent_contact() {
        let mesh = triangle();
        let mut a = Body::new(&mesh, Vector3::zeros());
        let mut b = Body::new(&mesh, Vector3::new(4.0, 0.0, 0.0));

        // A forced highlight on a body that never collided does not survive a check
        a.set_face_color(0, Rgb565::RED);
        check_collision(&mut a, &mut b, 0.0);
        assert!(!a.is_highlighted());
    }

    #[test]
    fn test_expiry_is_per_body() {
        let mesh = triangle();
        let mut a = Body::new(&mesh, Vector3::zeros()).with_highlight_duration(5.0);
        let mut b = Body::new(&mesh, Vector3::new(0.5, 0.5, 0.0));

        check_collision(&mut a, &mut b, 0.0);
        b.position = Vector3::new(4.0, 0.0, 0.0);
        check_collision(&mut a, &mut b, 1.0);

        assert!(a.is_highlighted());
        assert!(!b.is_highlighted());
    }

    #[test]
    fn test_bodies_overlap() {
        let mesh = triangle();
        let a = Body::new(&mesh, Vector3::zeros());
        let b = Body::new(&mesh, Vector3::new(1.0, 1.0, 0.0));
        let c = Body::new(&mesh, Vector3::new(1.0, 0.0, 0.0));
        let far = Body::new(&mesh, Vector3::new(0.0, 0.0, 0.5));
        assert!(bodies_overlap(&a, &b));
        assert!(bodies_overlap(&a, &c));
        assert!(!bodies_overlap(&a, &far));
    }

    #[test]
    fn test_prefilter_matches_full_check() {
        let mesh = two_face_mesh();
        let offsets = [
            Vector3::new(0.5, 0.5, 0.0),
            Vector3::new(3.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 10.0),
            Vector3::new(0.9, -0.9, 10.5),
        ];
        for offset in offsets.iter() {
            let mut a1 = Body::new(&mesh, Vector3::zeros());
            let mut b1 = Body::new(&mesh, *offset);
            let mut a2 = a1.clone();
            let mut b2 = b1.clone();

            let full = FaceAabbCollision::without_prefilter().check_pair(&mut a1, &mut b1, 1.0);
            let filtered = FaceAabbCollision::new().check_pair(&mut a2, &mut b2, 1.0);

            assert_eq!(full, filtered);
            assert_eq!(a1.face_colors(), a2.face_colors());
            assert_eq!(b1.face_colors(), b2.face_colors());
            assert_eq!(a1.last_collision(), a2.last_collision());
        }
    }

    #[test]
    fn test_prefilter_still_expires_highlights() {
        let mesh = triangle();
        let mut a = Body::new(&mesh, Vector3::zeros());
        let mut b = Body::new(&mesh, Vector3::new(50.0, 0.0, 0.0));
        a.mark_collision(0.0);
        a.set_face_color(0, Rgb565::RED);

        FaceAabbCollision::new().check_pair(&mut a, &mut b, 1.0);
        assert!(!a.is_highlighted());
    }
}
