//! Wavefront OBJ loading.
//!
//! Only geometry is read: `v x y z` vertex records and `f ...` face records.
//! Everything else (normals, texture coordinates, groups, materials,
//! comments) is skipped. Face corners may use any of the `i`, `i/t`, `i//n`
//! and `i/t/n` forms; only the vertex index is kept. Polygons with more than
//! three corners are split into a triangle fan.

use alloc::vec::Vec;

use log::error;
use nalgebra::Vector3;

use crate::error::MeshError;
use crate::mesh::Mesh;

/// Parse OBJ text into a validated [`Mesh`].
pub fn parse_obj(source: &str) -> Result<Mesh, MeshError> {
    let mut vertices: Vec<Vector3<f32>> = Vec::new();
    let mut faces: Vec<[usize; 3]> = Vec::new();

    for (number, line) in source.lines().enumerate() {
        let line_no = number + 1;
        let mut parts = line.split_whitespace();

        match parts.next() {
            Some("v") => {
                let vertex = parse_vertex(&mut parts).map_err(|reason| {
                    error!("OBJ line {}: {}", line_no, reason);
                    MeshError::Parse { line: line_no, reason }
                })?;
                vertices.push(vertex);
            }
            Some("f") => {
                // Fan around the first corner as the corners arrive
                let mut first = 0;
                let mut prev = 0;
                let mut corners = 0usize;
                for token in parts {
                    let index = parse_index(token, vertices.len()).map_err(|reason| {
                        error!("OBJ line {}: {}", line_no, reason);
                        MeshError::Parse { line: line_no, reason }
                    })?;
                    match corners {
                        0 => first = index,
                        1 => {}
                        _ => faces.push([first, prev, index]),
                    }
                    prev = index;
                    corners += 1;
                }
                if corners < 3 {
                    return Err(MeshError::Parse {
                        line: line_no,
                        reason: "face needs at least three corners",
                    });
                }
            }
            _ => {}
        }
    }

    Mesh::new(vertices, faces)
}

fn parse_vertex<'s, I>(parts: &mut I) -> Result<Vector3<f32>, &'static str>
where
    I: Iterator<Item = &'s str>,
{
    let mut xyz = [0.0f32; 3];
    for slot in xyz.iter_mut() {
        let token = parts.next().ok_or("vertex needs three coordinates")?;
        *slot = token.parse().map_err(|_| "vertex coordinate is not a number")?;
    }
    // A fourth `w` component is allowed and ignored
    Ok(Vector3::new(xyz[0], xyz[1], xyz[2]))
}

/// Resolve one face corner to a 0-based vertex index.
///
/// OBJ indices are 1-based; negative indices count back from the most
/// recently declared vertex.
fn parse_index(token: &str, vertex_count: usize) -> Result<usize, &'static str> {
    let raw = token.split('/').next().unwrap_or("");
    let index: i64 = raw.parse().map_err(|_| "face index is not an integer")?;

    if index > 0 {
        Ok(index as usize - 1)
    } else if index < 0 {
        let back = index.unsigned_abs() as usize;
        if back > vertex_count {
            return Err("relative face index points before the first vertex");
        }
        Ok(vertex_count - back)
    } else {
        Err("face index 0 is not valid")
    }
}

/// Read and parse an OBJ file.
#[cfg(feature = "std")]
pub fn load_obj<P: AsRef<std::path::Path>>(path: P) -> Result<Mesh, crate::scene::LoadError> {
    use crate::scene::LoadError;

    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mesh = parse_obj(&source).map_err(|source| LoadError::Mesh {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!(
        "loaded {}: {} vertices, {} faces",
        path.display(),
        mesh.vertices().len(),
        mesh.face_count()
    );
    Ok(mesh)
}
