//! Small vector helpers on top of `nalgebra`.

use nalgebra::Vector3;

// ComplexField provides sqrt() for f32 in no_std via libm
#[allow(unused_imports)]
use nalgebra::ComplexField;

/// Component-wise sum.
#[inline]
pub fn add(a: &Vector3<f32>, b: &Vector3<f32>) -> Vector3<f32> {
    a + b
}

/// Multiply every component by `s`.
#[inline]
pub fn scale(v: &Vector3<f32>, s: f32) -> Vector3<f32> {
    v * s
}

/// Euclidean length.
#[inline]
pub fn magnitude(v: &Vector3<f32>) -> f32 {
    v.norm()
}

/// Unit vector in the direction of `v`.
///
/// The zero vector normalizes to itself instead of producing NaNs.
#[inline]
pub fn normalize(v: &Vector3<f32>) -> Vector3<f32> {
    let mag = magnitude(v);
    if mag > 0.0 {
        v / mag
    } else {
        Vector3::zeros()
    }
}
