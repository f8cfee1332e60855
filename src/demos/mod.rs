use std::sync::Arc;

use glam::{Affine3A, Quat, Vec2, Vec3};
use log::{info, warn};

use crate::commands::combine_meshes::{CombineError, combine_selected_meshes};
use crate::commands::rename::rename_selected;
use crate::geometry::types::{AlbedoType, Material, SubmeshedMesh, TransparencyType, VertexBuffers};
use crate::io::asset_store::FsAssetStore;
use crate::scene::document::{MeshRenderer, NodeId, SceneDocument};
use crate::scene::selection::Selection;
use crate::scene::undo::UndoJournal;

pub struct DemoScene {
    pub prop_root: NodeId,
    pub props: Vec<NodeId>,
}

/// Drives the combine command over the showcase scene, persisting the result
/// into `asset_dir`. Validation failures are reported as warnings, exactly
/// like a host editor surfaces them, and do not abort the process.
pub fn run_combine_demo(asset_dir: &str, isolated: bool) -> anyhow::Result<()> {
    let mut document = SceneDocument::new();
    let demo = build_demo_scene(&mut document);
    let mut selection = Selection::of(demo.props.clone());
    let mut store = FsAssetStore::new(asset_dir);
    let mut undo = UndoJournal::default();
    let isolation = isolated.then_some(demo.prop_root);

    match combine_selected_meshes(&mut document, &mut selection, isolation, &mut store, &mut undo) {
        Ok(outcome) => {
            info!(
                "Demo scene combined: node {:?} under {:?}, {} undo steps recorded",
                outcome.combined_node,
                document.node(outcome.combined_node).parent(),
                undo.steps().len()
            );
            Ok(())
        }
        Err(
            error @ (CombineError::EmptySelection
            | CombineError::NoGeometryFound
            | CombineError::NoCombinableSubmeshes),
        ) => {
            warn!("{}", error);
            Ok(())
        }
        Err(error) => Err(error.into()),
    }
}

/// Renames the showcase scene's props with the given prefix.
pub fn run_rename_demo(prefix: &str) -> anyhow::Result<()> {
    let mut document = SceneDocument::new();
    let demo = build_demo_scene(&mut document);
    let selection = Selection::of(demo.props.clone());
    let mut undo = UndoJournal::default();

    let renamed = rename_selected(&mut document, &selection, prefix, &mut undo);

    for &node in &demo.props {
        info!("  {:?} -> {}", node, document.node(node).name);
    }
    info!("Renamed {} nodes", renamed);
    Ok(())
}

/// Builds the small showcase scene the demo commands operate on: floor tiles
/// and crates sharing two materials below one prop root, plus a marker node
/// whose renderer has no mesh assigned (it exercises the skip path).
pub fn build_demo_scene(document: &mut SceneDocument) -> DemoScene {
    let stone = document.add_material(Material {
        name: "Stone".to_string(),
        albedo: AlbedoType::Value(glam::Vec4::new(0.55, 0.55, 0.6, 1.0)),
        transparency: TransparencyType::Opaque,
    });
    let wood = document.add_material(Material {
        name: "WoodPlanks".to_string(),
        albedo: AlbedoType::TextureWithName("textures/wood_planks".to_string()),
        transparency: TransparencyType::Opaque,
    });

    let prop_root = document.create_node("Props", None);
    document.set_local_transform(prop_root, Affine3A::from_translation(Vec3::new(2.0, 0.0, 0.0)));

    let tile_mesh = Arc::new(floor_tile_mesh());
    let crate_mesh = Arc::new(crate_mesh());
    let mut props = Vec::new();

    for (index, x) in [0.0f32, 1.0, 2.0].into_iter().enumerate() {
        let tile = document.create_node(&format!("Tile{}", index), Some(prop_root));
        document.set_local_transform(tile, Affine3A::from_translation(Vec3::new(x, 0.0, 0.0)));
        document.set_renderer(
            tile,
            MeshRenderer {
                mesh: Some(tile_mesh.clone()),
                materials: vec![stone],
                enabled: true,
            },
        );
        props.push(tile);
    }

    let crate_a = document.create_node("CrateA", Some(prop_root));
    document.set_local_transform(crate_a, Affine3A::from_translation(Vec3::new(0.0, 0.5, 1.0)));
    document.set_renderer(
        crate_a,
        MeshRenderer {
            mesh: Some(crate_mesh.clone()),
            materials: vec![wood, stone],
            enabled: true,
        },
    );
    props.push(crate_a);

    let crate_b = document.create_node("CrateB", Some(prop_root));
    document.set_local_transform(
        crate_b,
        Affine3A::from_rotation_translation(
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_4),
            Vec3::new(2.0, 0.5, 1.0),
        ),
    );
    document.set_renderer(
        crate_b,
        MeshRenderer {
            mesh: Some(crate_mesh),
            materials: vec![wood, stone],
            enabled: true,
        },
    );
    props.push(crate_b);

    let marker = document.create_node("SpawnMarker", Some(prop_root));
    document.set_renderer(
        marker,
        MeshRenderer {
            mesh: None,
            materials: vec![],
            enabled: true,
        },
    );
    props.push(marker);

    DemoScene { prop_root, props }
}

/// A unit quad in the xz plane, facing up.
fn floor_tile_mesh() -> SubmeshedMesh {
    SubmeshedMesh {
        name: "floor_tile".to_string(),
        vertex_buffers: VertexBuffers {
            positions: vec![
                Vec3::new(-0.5, 0.0, -0.5),
                Vec3::new(0.5, 0.0, -0.5),
                Vec3::new(-0.5, 0.0, 0.5),
                Vec3::new(0.5, 0.0, 0.5),
            ],
            normals: vec![Vec3::Y; 4],
            tangents: vec![],
            uvs_0: vec![Vec2::ZERO, Vec2::X, Vec2::Y, Vec2::ONE],
            uvs_1: vec![],
            colors_0: vec![],
        },
        submeshes: vec![vec![0, 1, 2, 2, 1, 3]],
    }
}

/// A unit box with the four side faces in submesh 0 and the caps in
/// submesh 1, so one crate shows off two material slots.
fn crate_mesh() -> SubmeshedMesh {
    let mut buffers = VertexBuffers::default();
    let mut sides = Vec::new();
    let mut caps = Vec::new();

    for normal in [Vec3::X, Vec3::NEG_X, Vec3::Z, Vec3::NEG_Z] {
        push_box_face(&mut buffers, &mut sides, normal);
    }
    for normal in [Vec3::Y, Vec3::NEG_Y] {
        push_box_face(&mut buffers, &mut caps, normal);
    }

    SubmeshedMesh {
        name: "crate".to_string(),
        vertex_buffers: buffers,
        submeshes: vec![sides, caps],
    }
}

fn push_box_face(buffers: &mut VertexBuffers, submesh: &mut Vec<u32>, normal: Vec3) {
    let up = if normal.y.abs() > 0.5 { Vec3::Z } else { Vec3::Y };
    let right = normal.cross(up);
    let base = buffers.vertex_count() as u32;

    for (du, dv) in [(-0.5, -0.5), (0.5, -0.5), (-0.5, 0.5), (0.5, 0.5)] {
        buffers.positions.push(normal * 0.5 + right * du + up * dv);
        buffers.normals.push(normal);
        buffers.uvs_0.push(Vec2::new(du + 0.5, dv + 0.5));
    }
    submesh.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 1, base + 3]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combine_demo_writes_an_asset() -> Result<(), anyhow::Error> {
        let dir = tempfile::tempdir()?;
        let asset_dir = dir.path().join("assets");

        run_combine_demo(asset_dir.to_str().expect("utf-8 temp path"), false)?;

        // without isolation the root is the active node, the first tile (id 1)
        assert!(asset_dir.join("combined_mesh_1.mwm").is_file());
        Ok(())
    }

    #[test]
    fn demo_scene_keeps_two_material_groups() {
        let mut document = SceneDocument::new();
        let demo = build_demo_scene(&mut document);
        let mut selection = Selection::of(demo.props.clone());
        let mut store = crate::io::asset_store::MemoryAssetStore::new();
        let mut undo = UndoJournal::default();

        let outcome = combine_selected_meshes(
            &mut document,
            &mut selection,
            Some(demo.prop_root),
            &mut store,
            &mut undo,
        )
        .expect("combine failed");

        // stone and wood, nothing else: the marker contributes no bucket
        assert_eq!(outcome.submesh_count, 2);
        assert_eq!(document.node(outcome.combined_node).parent(), Some(demo.prop_root));
    }
}
