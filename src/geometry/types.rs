use std::fmt::{Debug, Formatter};

use glam::{Vec2, Vec3, Vec4};

/// A single-submesh geometry buffer. The merge pipeline uses this as the
/// per-material intermediate before the final composition.
#[derive(Clone, Default)]
pub struct Mesh {
    pub vertex_buffers: VertexBuffers,
    pub index_buffer: Vec<u32>,
}

impl Debug for Mesh {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{ vertex_buffers: {:?}, ", self.vertex_buffers)?;
        write!(f, "index_buffer: [{}] }}", self.index_buffer.len())
    }
}

/// One vertex buffer shared by several submeshes, each submesh being its own
/// index buffer. Submesh `i` is drawn with the owning renderer's material
/// slot `i`.
#[derive(Clone)]
pub struct SubmeshedMesh {
    pub name: String,
    pub vertex_buffers: VertexBuffers,
    pub submeshes: Vec<Vec<u32>>,
}

impl SubmeshedMesh {
    pub fn submesh_count(&self) -> usize {
        self.submeshes.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_buffers.vertex_count()
    }
}

impl Debug for SubmeshedMesh {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{ name: {:?}, vertex_buffers: {:?}, ", self.name, self.vertex_buffers)?;
        write!(f, "submeshes: [{}] }}", self.submeshes.len())
    }
}

#[derive(Clone, Default)]
pub struct VertexBuffers {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub tangents: Vec<Vec3>,
    pub uvs_0: Vec<Vec2>,
    pub uvs_1: Vec<Vec2>,
    pub colors_0: Vec<[u8; 4]>,
}

impl VertexBuffers {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Copies one vertex worth of attributes from `source`. Attribute
    /// buffers the source does not carry stay empty on self as well.
    pub fn push_from(&mut self, source: &VertexBuffers, index: usize) {
        self.positions.push(source.positions[index]);
        if !source.normals.is_empty() {
            self.normals.push(source.normals[index]);
        }
        if !source.tangents.is_empty() {
            self.tangents.push(source.tangents[index]);
        }
        if !source.uvs_0.is_empty() {
            self.uvs_0.push(source.uvs_0[index]);
        }
        if !source.uvs_1.is_empty() {
            self.uvs_1.push(source.uvs_1[index]);
        }
        if !source.colors_0.is_empty() {
            self.colors_0.push(source.colors_0[index]);
        }
    }

    /// Appends all buffers of `other`. An attribute only one side carries is
    /// dropped from the result so the buffers never go ragged.
    pub fn append(&mut self, other: &VertexBuffers) {
        let had_vertices = !self.positions.is_empty();
        self.positions.extend_from_slice(&other.positions);
        Self::append_attribute(had_vertices, &mut self.normals, &other.normals);
        Self::append_attribute(had_vertices, &mut self.tangents, &other.tangents);
        Self::append_attribute(had_vertices, &mut self.uvs_0, &other.uvs_0);
        Self::append_attribute(had_vertices, &mut self.uvs_1, &other.uvs_1);
        Self::append_attribute(had_vertices, &mut self.colors_0, &other.colors_0);
    }

    fn append_attribute<T: Clone>(had_vertices: bool, target: &mut Vec<T>, source: &[T]) {
        if !had_vertices {
            target.extend_from_slice(source);
            return;
        }
        if target.is_empty() {
            // the attribute was already absent on our side, keep it dropped
            return;
        }
        if source.is_empty() {
            target.clear();
            return;
        }
        target.extend_from_slice(source);
    }
}

impl Debug for VertexBuffers {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{ positions: [{}], ", self.positions.len())?;
        write!(f, "normals: [{}], ", self.normals.len())?;
        write!(f, "tangents: [{}], ", self.tangents.len())?;
        write!(f, "uvs_0: [{}], ", self.uvs_0.len())?;
        write!(f, "uvs_1: [{}], ", self.uvs_1.len())?;
        write!(f, "colors_0: [{}] }}", self.colors_0.len())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AlbedoType {
    Value(Vec4),
    TextureWithName(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransparencyType {
    Opaque,
    Cutout { cutout: f32 },
}

/// A shading configuration. The combine command only ever compares material
/// identity (via the registry id), it never interprets these fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub albedo: AlbedoType,
    pub transparency: TransparencyType,
}

impl Material {
    /// The stand-in for submeshes whose renderer carries no material at all.
    /// Its appearance is cosmetic, only its identity matters.
    pub fn fallback() -> Self {
        Self {
            name: "Fallback".to_string(),
            albedo: AlbedoType::Value(Vec4::new(0.6, 0.6, 0.6, 1.0)),
            transparency: TransparencyType::Opaque,
        }
    }
}
