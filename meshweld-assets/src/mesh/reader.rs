use std::io::ErrorKind::UnexpectedEof;
use std::io::{Cursor, Read};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::AssetFormatError;
use crate::common::chunk::{IffChunk, chunk_magic};
use crate::mesh::types::MeshAssetData;

pub const CONTAINER_VERSION: u32 = 1;

struct Header {
    name: String,
    vertex_count: u32,
    submesh_count: u32,
}

pub struct MeshReader {}

impl MeshReader {
    pub fn read<R: Read>(rdr: &mut R) -> Result<MeshAssetData, AssetFormatError> {
        let version_chunk = IffChunk::read_next_chunk(rdr)?;
        if version_chunk.magic != chunk_magic(b"MWVR") {
            return Err(AssetFormatError::InvalidMagicValue {
                magic: version_chunk.magic,
            });
        }

        let version = Cursor::new(&version_chunk.data).read_u32::<LittleEndian>()?;
        if version != CONTAINER_VERSION {
            return Err(AssetFormatError::UnsupportedVersion { version });
        }

        let mut header = None;
        let mut mesh = MeshAssetData::default();

        loop {
            let chunk = match IffChunk::read_next_chunk(rdr) {
                Ok(chunk) => chunk,
                Err(AssetFormatError::IOError(error)) if error.kind() == UnexpectedEof => break,
                Err(error) => return Err(error),
            };

            match &chunk.magic.to_le_bytes() {
                b"MWMH" => header = Some(Self::parse_header(&chunk.data)?),
                b"MWPS" => mesh.positions = Self::parse_f32_buffer(&chunk.data)?,
                b"MWNR" => mesh.normals = Self::parse_f32_buffer(&chunk.data)?,
                b"MWTG" => mesh.tangents = Self::parse_f32_buffer(&chunk.data)?,
                b"MWT0" => mesh.texcoords_0 = Self::parse_f32_buffer(&chunk.data)?,
                b"MWT1" => mesh.texcoords_1 = Self::parse_f32_buffer(&chunk.data)?,
                b"MWC0" => mesh.colors_0 = Self::parse_color_buffer(&chunk.data)?,
                b"MWIX" => mesh.submeshes = Self::parse_index_buffers(&chunk.data)?,
                // unknown chunks are skipped so the format can grow
                _ => {}
            }
        }

        let Some(header) = header else {
            return Err(AssetFormatError::FormatError {
                reason: "Missing MWMH header chunk",
            });
        };

        Self::validate(&mesh, &header)?;
        mesh.name = header.name;
        Ok(mesh)
    }

    fn validate(mesh: &MeshAssetData, header: &Header) -> Result<(), AssetFormatError> {
        if mesh.vertex_count() != header.vertex_count as usize {
            return Err(AssetFormatError::FormatError {
                reason: "Position buffer does not match the header vertex count",
            });
        }
        if mesh.submesh_count() != header.submesh_count as usize {
            return Err(AssetFormatError::FormatError {
                reason: "Submesh count does not match the header",
            });
        }

        let vertex_count = mesh.vertex_count();
        let attribute_lengths = [
            mesh.normals.len(),
            mesh.tangents.len(),
            mesh.texcoords_0.len(),
            mesh.texcoords_1.len(),
            mesh.colors_0.len(),
        ];
        if attribute_lengths
            .iter()
            .any(|&len| len != 0 && len != vertex_count)
        {
            return Err(AssetFormatError::FormatError {
                reason: "Attribute buffer length does not match the vertex count",
            });
        }
        Ok(())
    }

    fn parse_header(data: &[u8]) -> Result<Header, AssetFormatError> {
        let mut cursor = Cursor::new(data);
        let name_len = cursor.read_u32::<LittleEndian>()? as usize;
        let mut name = vec![0; name_len];
        cursor.read_exact(&mut name)?;
        let name = String::from_utf8(name).map_err(|_| AssetFormatError::FormatError {
            reason: "Mesh name is not valid UTF-8",
        })?;

        Ok(Header {
            name,
            vertex_count: cursor.read_u32::<LittleEndian>()?,
            submesh_count: cursor.read_u32::<LittleEndian>()?,
        })
    }

    fn parse_f32_buffer<const N: usize>(data: &[u8]) -> Result<Vec<[f32; N]>, AssetFormatError> {
        let mut cursor = Cursor::new(data);
        let count = cursor.read_u32::<LittleEndian>()? as usize;
        let mut buffer = Vec::with_capacity(count);
        for _ in 0..count {
            let mut element = [0f32; N];
            for value in &mut element {
                *value = cursor.read_f32::<LittleEndian>()?;
            }
            buffer.push(element);
        }
        Ok(buffer)
    }

    fn parse_color_buffer(data: &[u8]) -> Result<Vec<[u8; 4]>, AssetFormatError> {
        let mut cursor = Cursor::new(data);
        let count = cursor.read_u32::<LittleEndian>()? as usize;
        let mut buffer = Vec::with_capacity(count);
        for _ in 0..count {
            let mut element = [0u8; 4];
            cursor.read_exact(&mut element)?;
            buffer.push(element);
        }
        Ok(buffer)
    }

    fn parse_index_buffers(data: &[u8]) -> Result<Vec<Vec<u32>>, AssetFormatError> {
        let mut cursor = Cursor::new(data);
        let buffer_count = cursor.read_u32::<LittleEndian>()? as usize;
        let mut submeshes = Vec::with_capacity(buffer_count);
        for _ in 0..buffer_count {
            let index_count = cursor.read_u32::<LittleEndian>()? as usize;
            let mut indices = Vec::with_capacity(index_count);
            for _ in 0..index_count {
                indices.push(cursor.read_u32::<LittleEndian>()?);
            }
            submeshes.push(indices);
        }
        Ok(submeshes)
    }
}
