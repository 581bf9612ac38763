use alloc::vec::Vec;

use log::error;
use nalgebra::Vector3;

use crate::aabb::Aabb;
use crate::error::MeshError;

/// Immutable triangle mesh in body-local space.
///
/// Construction validates that the mesh has vertices and that every face
/// index is in range, so the collision code can index freely afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vector3<f32>>,
    faces: Vec<[usize; 3]>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vector3<f32>>, faces: Vec<[usize; 3]>) -> Result<Self, MeshError> {
        check_validity(&vertices, &faces)?;
        Ok(Self { vertices, faces })
    }

    /// Build a mesh from plain arrays, the layout used by hand-written geometry.
    pub fn from_arrays(vertices: &[[f32; 3]], faces: &[[usize; 3]]) -> Result<Self, MeshError> {
        let vertices = vertices
            .iter()
            .map(|v| Vector3::new(v[0], v[1], v[2]))
            .collect();
        Self::new(vertices, faces.to_vec())
    }

    #[inline]
    pub fn vertices(&self) -> &[Vector3<f32>] {
        &self.vertices
    }

    #[inline]
    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// The three local-space corners of face `index`.
    ///
    /// # Panics
    /// Panics if `index` is not a valid face index.
    #[inline]
    pub fn face_vertices(&self, index: usize) -> [Vector3<f32>; 3] {
        let [a, b, c] = self.faces[index];
        [self.vertices[a], self.vertices[b], self.vertices[c]]
    }

    /// Bounds of the whole mesh translated by `offset`.
    pub fn bounds(&self, offset: &Vector3<f32>) -> Aabb {
        // Non-empty by construction
        Aabb::from_points(&self.vertices, offset)
            .unwrap_or_else(|| Aabb::new(*offset, *offset))
    }

    /// Bounds of face `index` translated by `offset`.
    ///
    /// # Panics
    /// Panics if `index` is not a valid face index.
    pub fn face_bounds(&self, index: usize, offset: &Vector3<f32>) -> Aabb {
        let [a, b, c] = self.face_vertices(index);
        let mut aabb = Aabb::new(a + offset, a + offset);
        aabb.grow(&(b + offset));
        aabb.grow(&(c + offset));
        aabb
    }
}

fn check_validity(vertices: &[Vector3<f32>], faces: &[[usize; 3]]) -> Result<(), MeshError> {
    if vertices.is_empty() {
        error!("Vertices are empty");
        return Err(MeshError::NoVertices);
    }

    for (face, indices) in faces.iter().enumerate() {
        if let Some(&index) = indices.iter().find(|&&i| i >= vertices.len()) {
            error!("Face {} vertex {} is out of bounds", face, index);
            return Err(MeshError::FaceIndexOutOfRange {
                face,
                index,
                vertex_count: vertices.len(),
            });
        }
    }

    Ok(())
}
