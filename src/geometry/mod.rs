/// Mesh and material intermediate representation, independent of both the
/// scene document and the persisted asset container.
pub mod types;

/// Merging of submesh slices into per-material meshes and the final
/// submesh-per-material combined mesh.
pub mod mesh_merger;
