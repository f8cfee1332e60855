use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::trace;
use meshweld_assets::AssetFormatError;
use meshweld_assets::mesh::types::MeshAssetData;
use meshweld_assets::mesh::writer::MeshWriter;
use thiserror::Error;

use crate::geometry::types::SubmeshedMesh;

/// File extension of persisted mesh containers.
pub const MESH_ASSET_EXTENSION: &str = "mwm";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Format(#[from] AssetFormatError),

    #[error(transparent)]
    IOError(#[from] std::io::Error),
}

/// Where combined meshes end up. The filesystem store is the normal
/// implementation, the in-memory store serves headless embedders and tests.
pub trait AssetStore {
    /// Creates the destination location when it does not exist yet.
    fn ensure_folder(&mut self) -> Result<(), StoreError>;

    fn exists(&self, name: &str) -> bool;

    /// Appends a numeric suffix until the name no longer collides with an
    /// already persisted asset.
    fn unique_name(&self, base: &str) -> String {
        if !self.exists(base) {
            return base.to_string();
        }
        let mut counter = 1;
        loop {
            let candidate = format!("{}_{}", base, counter);
            if !self.exists(&candidate) {
                return candidate;
            }
            counter += 1;
        }
    }

    /// Persists the mesh under `name` and returns where it ended up.
    fn persist_mesh(&mut self, name: &str, mesh: &SubmeshedMesh) -> Result<PathBuf, StoreError>;

    /// The host's save-all hook. Stores that write eagerly treat this as a
    /// no-op.
    fn flush(&mut self) -> Result<(), StoreError>;
}

pub fn mesh_to_asset_data(mesh: &SubmeshedMesh) -> MeshAssetData {
    MeshAssetData {
        name: mesh.name.clone(),
        positions: mesh.vertex_buffers.positions.iter().map(|v| v.to_array()).collect(),
        normals: mesh.vertex_buffers.normals.iter().map(|v| v.to_array()).collect(),
        tangents: mesh.vertex_buffers.tangents.iter().map(|v| v.to_array()).collect(),
        texcoords_0: mesh.vertex_buffers.uvs_0.iter().map(|v| v.to_array()).collect(),
        texcoords_1: mesh.vertex_buffers.uvs_1.iter().map(|v| v.to_array()).collect(),
        colors_0: mesh.vertex_buffers.colors_0.clone(),
        submeshes: mesh.submeshes.clone(),
    }
}

/// Writes `.mwm` containers into a flat asset folder.
pub struct FsAssetStore {
    folder: PathBuf,
}

impl FsAssetStore {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
        }
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    fn asset_path(&self, name: &str) -> PathBuf {
        self.folder.join(format!("{}.{}", name, MESH_ASSET_EXTENSION))
    }
}

impl AssetStore for FsAssetStore {
    fn ensure_folder(&mut self) -> Result<(), StoreError> {
        if !self.folder.is_dir() {
            std::fs::create_dir_all(&self.folder)?;
        }
        Ok(())
    }

    fn exists(&self, name: &str) -> bool {
        self.asset_path(name).exists()
    }

    fn persist_mesh(&mut self, name: &str, mesh: &SubmeshedMesh) -> Result<PathBuf, StoreError> {
        let path = self.asset_path(name);
        let mut writer = BufWriter::new(File::create(&path)?);
        MeshWriter::write(&mut writer, &mesh_to_asset_data(mesh))?;
        writer.flush()?;
        trace!("Persisted {} ({} submeshes)", path.display(), mesh.submesh_count());
        Ok(path)
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        // files are written eagerly in persist_mesh
        Ok(())
    }
}

/// Keeps persisted containers in memory, addressable by asset name.
#[derive(Default)]
pub struct MemoryAssetStore {
    assets: HashMap<String, MeshAssetData>,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn asset(&self, name: &str) -> Option<&MeshAssetData> {
        self.assets.get(name)
    }

    pub fn asset_count(&self) -> usize {
        self.assets.len()
    }
}

impl AssetStore for MemoryAssetStore {
    fn ensure_folder(&mut self) -> Result<(), StoreError> {
        Ok(())
    }

    fn exists(&self, name: &str) -> bool {
        self.assets.contains_key(name)
    }

    fn persist_mesh(&mut self, name: &str, mesh: &SubmeshedMesh) -> Result<PathBuf, StoreError> {
        self.assets.insert(name.to_string(), mesh_to_asset_data(mesh));
        Ok(PathBuf::from(format!("{}.{}", name, MESH_ASSET_EXTENSION)))
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::BufReader;

    use glam::Vec3;
    use meshweld_assets::mesh::reader::MeshReader;

    use super::*;
    use crate::geometry::types::VertexBuffers;

    fn triangle(name: &str) -> SubmeshedMesh {
        SubmeshedMesh {
            name: name.to_string(),
            vertex_buffers: VertexBuffers {
                positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
                normals: vec![Vec3::Z; 3],
                tangents: vec![],
                uvs_0: vec![],
                uvs_1: vec![],
                colors_0: vec![],
            },
            submeshes: vec![vec![0, 1, 2]],
        }
    }

    #[test]
    fn fs_store_persists_a_readable_container() -> Result<(), anyhow::Error> {
        let dir = tempfile::tempdir()?;
        let mut store = FsAssetStore::new(dir.path().join("assets"));
        store.ensure_folder()?;

        let path = store.persist_mesh("combined_mesh_0", &triangle("combined_mesh_0"))?;
        assert!(store.exists("combined_mesh_0"));

        let read_back = MeshReader::read(&mut BufReader::new(File::open(path)?))?;
        assert_eq!(read_back.name, "combined_mesh_0");
        assert_eq!(read_back.vertex_count(), 3);
        assert_eq!(read_back.submesh_count(), 1);
        Ok(())
    }

    #[test]
    fn unique_name_appends_a_numeric_suffix() -> Result<(), anyhow::Error> {
        let mut store = MemoryAssetStore::new();
        store.persist_mesh("combined_mesh_1", &triangle("combined_mesh_1"))?;
        store.persist_mesh("combined_mesh_1_1", &triangle("combined_mesh_1_1"))?;

        assert_eq!(store.unique_name("combined_mesh_0"), "combined_mesh_0");
        assert_eq!(store.unique_name("combined_mesh_1"), "combined_mesh_1_2");
        Ok(())
    }
}
