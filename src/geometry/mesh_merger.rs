use std::collections::HashMap;
use std::sync::Arc;

use glam::Affine3A;
use itertools::Itertools;
use log::warn;

use crate::geometry::types::{Mesh, SubmeshedMesh, VertexBuffers};

/// One submesh slice of a source mesh, scheduled for merging under a single
/// material bucket. The transform brings the slice into the combine root's
/// local space.
#[derive(Debug, Clone)]
pub struct CombineEntry {
    pub mesh: Arc<SubmeshedMesh>,
    pub submesh: usize,
    pub transform: Affine3A,
}

pub enum MeshMerger {}

impl MeshMerger {
    /// Extracts one submesh into a standalone mesh, compacting the vertex
    /// buffers down to the vertices the submesh actually references.
    /// Remapped indices keep first-use order, so extraction is deterministic.
    pub fn extract_submesh(mesh: &SubmeshedMesh, submesh: usize) -> Mesh {
        let indices = &mesh.submeshes[submesh];
        let mut remap: HashMap<u32, u32> = HashMap::with_capacity(indices.len());
        let mut extracted = Mesh {
            vertex_buffers: VertexBuffers::default(),
            index_buffer: Vec::with_capacity(indices.len()),
        };

        for &index in indices {
            let mapped = match remap.get(&index) {
                Some(&mapped) => mapped,
                None => {
                    let mapped = remap.len() as u32;
                    remap.insert(index, mapped);
                    extracted
                        .vertex_buffers
                        .push_from(&mesh.vertex_buffers, index as usize);
                    mapped
                }
            };
            extracted.index_buffer.push(mapped);
        }

        extracted
    }

    /// Bakes a transform into the mesh. Normals and tangents rotate with the
    /// inverse-transpose so non-uniform scale keeps them perpendicular.
    pub fn bake_transform(mesh: &mut Mesh, transform: Affine3A) {
        for position in &mut mesh.vertex_buffers.positions {
            *position = transform.transform_point3(*position);
        }

        let normal_matrix = transform.matrix3.inverse().transpose();
        for normal in &mut mesh.vertex_buffers.normals {
            *normal = (normal_matrix * *normal).normalize_or_zero();
        }
        for tangent in &mut mesh.vertex_buffers.tangents {
            *tangent = (normal_matrix * *tangent).normalize_or_zero();
        }
    }

    /// Merges all entries of one material bucket into a single-submesh mesh:
    /// every entry's submesh is extracted, baked into root-local space and
    /// concatenated, with indices offset by the running vertex count.
    pub fn merge_entries(entries: &[CombineEntry]) -> Mesh {
        if entries.is_empty() {
            warn!("Merging 0 entries");
            return Mesh::default();
        }

        let parts = entries
            .iter()
            .map(|entry| {
                let mut part = Self::extract_submesh(&entry.mesh, entry.submesh);
                Self::bake_transform(&mut part, entry.transform);
                part
            })
            .collect_vec();

        let mut merged = Mesh::default();
        for part in &parts {
            let offset = merged.vertex_buffers.vertex_count() as u32;
            merged.vertex_buffers.append(&part.vertex_buffers);
            merged
                .index_buffer
                .extend(part.index_buffer.iter().map(|&index| index + offset));
        }
        merged
    }

    /// Merges the ordered per-material meshes into one mesh with exactly one
    /// submesh per input, preserving order. Inputs are already in root-local
    /// space, no further transform is applied.
    pub fn compose_submeshes(parts: Vec<Mesh>) -> SubmeshedMesh {
        let mut combined = SubmeshedMesh {
            name: String::new(),
            vertex_buffers: VertexBuffers::default(),
            submeshes: Vec::with_capacity(parts.len()),
        };

        for part in &parts {
            let offset = combined.vertex_buffers.vertex_count() as u32;
            combined.vertex_buffers.append(&part.vertex_buffers);
            combined.submeshes.push(
                part.index_buffer
                    .iter()
                    .map(|&index| index + offset)
                    .collect_vec(),
            );
        }
        combined
    }
}

#[cfg(test)]
mod tests {
    use glam::{Quat, Vec2, Vec3};

    use super::*;

    fn quad_mesh(name: &str) -> SubmeshedMesh {
        SubmeshedMesh {
            name: name.to_string(),
            vertex_buffers: VertexBuffers {
                positions: vec![
                    Vec3::new(0.0, 0.0, 0.0),
                    Vec3::new(1.0, 0.0, 0.0),
                    Vec3::new(0.0, 1.0, 0.0),
                    Vec3::new(1.0, 1.0, 0.0),
                ],
                normals: vec![Vec3::Z; 4],
                tangents: vec![],
                uvs_0: vec![Vec2::ZERO, Vec2::X, Vec2::Y, Vec2::ONE],
                uvs_1: vec![],
                colors_0: vec![],
            },
            // two triangles as two submeshes, sharing the vertex buffer
            submeshes: vec![vec![0, 1, 2], vec![2, 1, 3]],
        }
    }

    #[test]
    fn extraction_compacts_the_vertex_buffer() {
        let mesh = quad_mesh("quad");

        let extracted = MeshMerger::extract_submesh(&mesh, 1);

        assert_eq!(extracted.index_buffer, vec![0, 1, 2]);
        assert_eq!(extracted.vertex_buffers.vertex_count(), 3);
        assert_eq!(extracted.vertex_buffers.positions[0], Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(extracted.vertex_buffers.positions[2], Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(extracted.vertex_buffers.uvs_0.len(), 3);
        assert!(extracted.vertex_buffers.tangents.is_empty());
    }

    #[test]
    fn extraction_keeps_shared_vertices_shared() {
        let mesh = quad_mesh("quad");

        let extracted = MeshMerger::extract_submesh(&mesh, 0);

        assert_eq!(extracted.index_buffer.len(), 3);
        assert_eq!(extracted.vertex_buffers.vertex_count(), 3);
    }

    #[test]
    fn baked_transform_moves_positions_and_rotates_normals() {
        let mesh = Arc::new(quad_mesh("quad"));
        let transform = Affine3A::from_rotation_translation(
            Quat::from_rotation_x(std::f32::consts::FRAC_PI_2),
            Vec3::new(0.0, 0.0, 5.0),
        );

        let merged = MeshMerger::merge_entries(&[CombineEntry {
            mesh,
            submesh: 0,
            transform,
        }]);

        // (1, 0, 0) stays on the x axis, (0, 1, 0) rotates onto +z
        assert!(merged.vertex_buffers.positions[1].abs_diff_eq(Vec3::new(1.0, 0.0, 5.0), 1e-5));
        assert!(merged.vertex_buffers.positions[2].abs_diff_eq(Vec3::new(0.0, 0.0, 6.0), 1e-5));
        // the quad normal +z rotates onto -y
        assert!(merged.vertex_buffers.normals[0].abs_diff_eq(Vec3::new(0.0, -1.0, 0.0), 1e-5));
    }

    #[test]
    fn normals_survive_non_uniform_scale() {
        let mesh = Arc::new(quad_mesh("quad"));
        let transform = Affine3A::from_scale(Vec3::new(4.0, 1.0, 0.5));

        let merged = MeshMerger::merge_entries(&[CombineEntry {
            mesh,
            submesh: 0,
            transform,
        }]);

        // a plain scale of the normal would shrink it, the inverse-transpose
        // keeps it unit length and perpendicular to the quad
        assert!(merged.vertex_buffers.normals[0].abs_diff_eq(Vec3::Z, 1e-5));
    }

    #[test]
    fn merging_offsets_indices_by_the_running_vertex_count() {
        let mesh = Arc::new(quad_mesh("quad"));
        let entries = [
            CombineEntry {
                mesh: mesh.clone(),
                submesh: 0,
                transform: Affine3A::IDENTITY,
            },
            CombineEntry {
                mesh,
                submesh: 1,
                transform: Affine3A::from_translation(Vec3::new(2.0, 0.0, 0.0)),
            },
        ];

        let merged = MeshMerger::merge_entries(&entries);

        assert_eq!(merged.vertex_buffers.vertex_count(), 6);
        assert_eq!(merged.index_buffer, vec![0, 1, 2, 3, 4, 5]);
        assert!(merged.vertex_buffers.positions[3].abs_diff_eq(Vec3::new(2.0, 1.0, 0.0), 1e-5));
    }

    #[test]
    fn ragged_attributes_are_dropped_on_merge() {
        let with_normals = Arc::new(quad_mesh("quad"));
        let mut without_normals = quad_mesh("bare");
        without_normals.vertex_buffers.normals.clear();
        without_normals.vertex_buffers.uvs_0.clear();

        let merged = MeshMerger::merge_entries(&[
            CombineEntry {
                mesh: with_normals,
                submesh: 0,
                transform: Affine3A::IDENTITY,
            },
            CombineEntry {
                mesh: Arc::new(without_normals),
                submesh: 0,
                transform: Affine3A::IDENTITY,
            },
        ]);

        assert_eq!(merged.vertex_buffers.vertex_count(), 6);
        assert!(merged.vertex_buffers.normals.is_empty());
        assert!(merged.vertex_buffers.uvs_0.is_empty());
    }

    #[test]
    fn composition_keeps_one_submesh_per_input() {
        let first = MeshMerger::extract_submesh(&quad_mesh("a"), 0);
        let second = MeshMerger::extract_submesh(&quad_mesh("b"), 1);
        let first_positions = first.vertex_buffers.positions.clone();

        let combined = MeshMerger::compose_submeshes(vec![first, second]);

        assert_eq!(combined.submesh_count(), 2);
        assert_eq!(combined.submeshes[0], vec![0, 1, 2]);
        assert_eq!(combined.submeshes[1], vec![3, 4, 5]);
        assert_eq!(combined.vertex_buffers.positions[..3], first_positions[..]);
    }
}
