use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::AssetFormatError;

/// Turns a four byte tag into the on-disk magic value.
pub const fn chunk_magic(tag: &[u8; 4]) -> u32 {
    u32::from_le_bytes(*tag)
}

/// A single IFF-style chunk: four byte tag, little endian payload size,
/// payload bytes. A container is a flat sequence of these.
#[derive(Debug)]
pub struct IffChunk {
    pub magic: u32,
    pub data: Vec<u8>,
}

impl IffChunk {
    pub fn new(tag: &[u8; 4], data: Vec<u8>) -> Self {
        Self {
            magic: chunk_magic(tag),
            data,
        }
    }

    pub fn magic_str(&self) -> String {
        String::from_utf8_lossy(&self.magic.to_le_bytes()).into_owned()
    }

    pub fn read_next_chunk<R: Read>(rdr: &mut R) -> Result<IffChunk, AssetFormatError> {
        let magic = rdr.read_u32::<LittleEndian>()?;
        let size = rdr.read_u32::<LittleEndian>()?;
        let mut data = vec![0; size as usize];
        rdr.read_exact(&mut data)?;

        Ok(IffChunk { magic, data })
    }

    pub fn write<W: Write>(&self, wtr: &mut W) -> Result<(), AssetFormatError> {
        let size = u32::try_from(self.data.len()).map_err(|_| AssetFormatError::FormatError {
            reason: "Chunk payload exceeds the u32 size field",
        })?;

        wtr.write_u32::<LittleEndian>(self.magic)?;
        wtr.write_u32::<LittleEndian>(size)?;
        wtr.write_all(&self.data)?;
        Ok(())
    }
}
