use std::io::Cursor;

use crate::AssetFormatError;
use crate::mesh::reader::MeshReader;
use crate::mesh::types::MeshAssetData;
use crate::mesh::writer::MeshWriter;

fn sample_mesh() -> MeshAssetData {
    MeshAssetData {
        name: "combined_mesh_7".to_string(),
        positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]],
        normals: vec![[0.0, 0.0, 1.0]; 4],
        tangents: vec![],
        texcoords_0: vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]],
        texcoords_1: vec![],
        colors_0: vec![[255, 255, 255, 255]; 4],
        submeshes: vec![vec![0, 1, 2], vec![2, 1, 3]],
    }
}

#[test]
fn round_trip_preserves_all_buffers() -> Result<(), anyhow::Error> {
    let mesh = sample_mesh();

    let mut buffer = Vec::new();
    MeshWriter::write(&mut buffer, &mesh)?;
    let read_back = MeshReader::read(&mut Cursor::new(&buffer))?;

    assert_eq!(mesh, read_back);
    Ok(())
}

#[test]
fn empty_attribute_buffers_stay_empty() -> Result<(), anyhow::Error> {
    let mesh = sample_mesh();

    let mut buffer = Vec::new();
    MeshWriter::write(&mut buffer, &mesh)?;
    let read_back = MeshReader::read(&mut Cursor::new(&buffer))?;

    assert!(read_back.tangents.is_empty());
    assert!(read_back.texcoords_1.is_empty());
    Ok(())
}

#[test]
fn rejects_wrong_leading_magic() -> Result<(), anyhow::Error> {
    let mut buffer = Vec::new();
    MeshWriter::write(&mut buffer, &sample_mesh())?;
    buffer[0..4].copy_from_slice(b"NOPE");

    let result = MeshReader::read(&mut Cursor::new(&buffer));
    assert!(matches!(
        result,
        Err(AssetFormatError::InvalidMagicValue { .. })
    ));
    Ok(())
}

#[test]
fn rejects_unknown_version() -> Result<(), anyhow::Error> {
    let mut buffer = Vec::new();
    MeshWriter::write(&mut buffer, &sample_mesh())?;
    // the version payload sits right behind the first chunk header
    buffer[8] = 99;

    let result = MeshReader::read(&mut Cursor::new(&buffer));
    assert!(matches!(
        result,
        Err(AssetFormatError::UnsupportedVersion { version: 99 })
    ));
    Ok(())
}

#[test]
fn rejects_ragged_attribute_buffer() -> Result<(), anyhow::Error> {
    let mut mesh = sample_mesh();
    mesh.normals.truncate(2);

    let mut buffer = Vec::new();
    MeshWriter::write(&mut buffer, &mesh)?;

    let result = MeshReader::read(&mut Cursor::new(&buffer));
    assert!(matches!(result, Err(AssetFormatError::FormatError { .. })));
    Ok(())
}

#[test]
fn rejects_truncated_container() -> Result<(), anyhow::Error> {
    let mut buffer = Vec::new();
    MeshWriter::write(&mut buffer, &sample_mesh())?;
    // losing the index chunk drops the submeshes the header promised
    buffer.truncate(buffer.len() / 2);

    assert!(MeshReader::read(&mut Cursor::new(&buffer)).is_err());
    Ok(())
}
