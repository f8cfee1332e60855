use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::AssetFormatError;
use crate::common::chunk::IffChunk;
use crate::mesh::reader::CONTAINER_VERSION;
use crate::mesh::types::MeshAssetData;

pub struct MeshWriter {}

impl MeshWriter {
    /// Writes the chunk sequence for one mesh container. The version chunk
    /// always comes first, attribute chunks are only emitted for buffers the
    /// mesh actually carries.
    pub fn write<W: Write>(wtr: &mut W, mesh: &MeshAssetData) -> Result<(), AssetFormatError> {
        let mut version = Vec::new();
        version.write_u32::<LittleEndian>(CONTAINER_VERSION)?;
        IffChunk::new(b"MWVR", version).write(wtr)?;

        IffChunk::new(b"MWMH", Self::header_payload(mesh)?).write(wtr)?;
        IffChunk::new(b"MWPS", Self::f32_payload(&mesh.positions)?).write(wtr)?;

        if !mesh.normals.is_empty() {
            IffChunk::new(b"MWNR", Self::f32_payload(&mesh.normals)?).write(wtr)?;
        }
        if !mesh.tangents.is_empty() {
            IffChunk::new(b"MWTG", Self::f32_payload(&mesh.tangents)?).write(wtr)?;
        }
        if !mesh.texcoords_0.is_empty() {
            IffChunk::new(b"MWT0", Self::f32_payload(&mesh.texcoords_0)?).write(wtr)?;
        }
        if !mesh.texcoords_1.is_empty() {
            IffChunk::new(b"MWT1", Self::f32_payload(&mesh.texcoords_1)?).write(wtr)?;
        }
        if !mesh.colors_0.is_empty() {
            IffChunk::new(b"MWC0", Self::color_payload(&mesh.colors_0)?).write(wtr)?;
        }

        IffChunk::new(b"MWIX", Self::index_payload(&mesh.submeshes)?).write(wtr)?;
        Ok(())
    }

    fn header_payload(mesh: &MeshAssetData) -> Result<Vec<u8>, AssetFormatError> {
        let name = mesh.name.as_bytes();
        let mut payload = Vec::with_capacity(12 + name.len());
        payload.write_u32::<LittleEndian>(name.len() as u32)?;
        payload.write_all(name)?;
        payload.write_u32::<LittleEndian>(mesh.vertex_count() as u32)?;
        payload.write_u32::<LittleEndian>(mesh.submesh_count() as u32)?;
        Ok(payload)
    }

    fn f32_payload<const N: usize>(buffer: &[[f32; N]]) -> Result<Vec<u8>, AssetFormatError> {
        let mut payload = Vec::with_capacity(4 + buffer.len() * N * 4);
        payload.write_u32::<LittleEndian>(buffer.len() as u32)?;
        for element in buffer {
            for &value in element {
                payload.write_f32::<LittleEndian>(value)?;
            }
        }
        Ok(payload)
    }

    fn color_payload(buffer: &[[u8; 4]]) -> Result<Vec<u8>, AssetFormatError> {
        let mut payload = Vec::with_capacity(4 + buffer.len() * 4);
        payload.write_u32::<LittleEndian>(buffer.len() as u32)?;
        for element in buffer {
            payload.write_all(element)?;
        }
        Ok(payload)
    }

    fn index_payload(submeshes: &[Vec<u32>]) -> Result<Vec<u8>, AssetFormatError> {
        let mut payload = Vec::new();
        payload.write_u32::<LittleEndian>(submeshes.len() as u32)?;
        for index_buffer in submeshes {
            payload.write_u32::<LittleEndian>(index_buffer.len() as u32)?;
            for &index in index_buffer {
                payload.write_u32::<LittleEndian>(index)?;
            }
        }
        Ok(payload)
    }
}
