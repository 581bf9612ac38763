//! Scene description and asset loading.

use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::vec::Vec;

use log::info;
use nalgebra::Vector3;
use thiserror::Error;

use crate::collision::CollisionSystem;
use crate::error::{ConfigError, MeshError};
use crate::mesh::Mesh;
use crate::obj::load_obj;
use crate::world::{BodyId, World};

/// Environment variable pointing at a bundled asset directory.
pub const ASSET_DIR_ENV: &str = "MESHBOUNCE_ASSET_DIR";

/// Failure to load a mesh file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid mesh in {}: {source}", .path.display())]
    Mesh {
        path: PathBuf,
        #[source]
        source: MeshError,
    },
}

/// Resolve `relative` against the bundled asset directory if one is
/// configured, otherwise against the current directory.
pub fn resource_path<P: AsRef<Path>>(relative: P) -> PathBuf {
    let base = env::var_os(ASSET_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    base.join(relative)
}

/// One mesh file placed in the world.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneEntry {
    /// Path relative to the asset directory.
    pub mesh: PathBuf,
    pub position: Vector3<f32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub entries: Vec<SceneEntry>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry<P: Into<PathBuf>>(mut self, mesh: P, position: Vector3<f32>) -> Self {
        self.entries.push(SceneEntry {
            mesh: mesh.into(),
            position,
        });
        self
    }

    /// Pyramid, sphere and two cubes stacked up the left half of the box.
    pub fn demo() -> Self {
        Self::new()
            .with_entry("resources/pyramid.obj", Vector3::new(-3.0, 3.0, 0.0))
            .with_entry("resources/sphere.obj", Vector3::new(-1.5, 4.0, 0.0))
            .with_entry("resources/cube.obj", Vector3::new(0.0, 5.0, 0.0))
            .with_entry("resources/cube24.obj", Vector3::new(1.5, 6.0, 0.0))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load every mesh through [`resource_path`], in entry order.
    pub fn load_meshes(&self) -> Result<Vec<Mesh>, LoadError> {
        self.entries
            .iter()
            .map(|entry| load_obj(resource_path(&entry.mesh)))
            .collect()
    }

    /// Add one body per entry, pairing entries with `meshes` in order.
    ///
    /// Extra meshes or entries without a mesh are ignored. Fails if the world
    /// runs out of room.
    pub fn populate<'a, const N: usize, C: CollisionSystem>(
        &self,
        world: &mut World<'a, N, C>,
        meshes: &'a [Mesh],
    ) -> Result<Vec<BodyId>, ConfigError> {
        let mut ids = Vec::with_capacity(self.entries.len());
        for (entry, mesh) in self.entries.iter().zip(meshes) {
            let id = world
                .spawn(mesh, entry.position)
                .ok_or(ConfigError::Capacity { capacity: N })?;
            ids.push(id);
        }
        info!("scene populated with {} bodies", ids.len());
        Ok(ids)
    }
}
