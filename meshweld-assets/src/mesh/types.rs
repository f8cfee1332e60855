/// Payload of a persisted mesh container.
///
/// Buffers are kept as plain arrays so the format crate does not pull in any
/// math types. Attribute buffers are either empty (attribute not carried) or
/// exactly `vertex_count` long. Submesh `i` holds the triangle indices that
/// the owning renderer draws with material slot `i`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshAssetData {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub tangents: Vec<[f32; 3]>,
    pub texcoords_0: Vec<[f32; 2]>,
    pub texcoords_1: Vec<[f32; 2]>,
    pub colors_0: Vec<[u8; 4]>,
    pub submeshes: Vec<Vec<u32>>,
}

impl MeshAssetData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn submesh_count(&self) -> usize {
        self.submeshes.len()
    }
}
