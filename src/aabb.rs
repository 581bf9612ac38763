//! Axis-aligned bounding boxes.
//!
//! Boxes are closed: two boxes that only share a boundary plane, edge or
//! corner count as overlapping.

use nalgebra::Vector3;

/// An axis-aligned box given by its minimum and maximum corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl Aabb {
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Smallest box holding every point translated by `offset`.
    ///
    /// Returns `None` for an empty point set.
    pub fn from_points<'p, I>(points: I, offset: &Vector3<f32>) -> Option<Self>
    where
        I: IntoIterator<Item = &'p Vector3<f32>>,
    {
        let mut points = points.into_iter();
        let first = points.next()? + offset;
        let mut aabb = Self::new(first, first);
        for p in points {
            aabb.grow(&(p + offset));
        }
        Some(aabb)
    }

    /// Extend the box so it contains `point`.
    #[inline]
    pub fn grow(&mut self, point: &Vector3<f32>) {
        for i in 0..3 {
            self.min[i] = self.min[i].min(point[i]);
            self.max[i] = self.max[i].max(point[i]);
        }
    }

    /// Inclusive overlap test, see [`overlaps`].
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        overlaps(&self.min, &self.max, &other.min, &other.max)
    }

    #[inline]
    pub fn contains(&self, point: &Vector3<f32>) -> bool {
        (0..3).all(|i| self.min[i] <= point[i] && point[i] <= self.max[i])
    }

    #[inline]
    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }
}

/// Per-axis min/max of `points`, each translated by `offset`.
pub fn compute_bounds(points: &[Vector3<f32>], offset: &Vector3<f32>) -> Option<Aabb> {
    Aabb::from_points(points, offset)
}

/// `true` iff the boxes intersect or touch on every axis.
#[inline]
pub fn overlaps(
    min_a: &Vector3<f32>,
    max_a: &Vector3<f32>,
    min_b: &Vector3<f32>,
    max_b: &Vector3<f32>,
) -> bool {
    (0..3).all(|i| min_a[i] <= max_b[i] && max_a[i] >= min_b[i])
}
