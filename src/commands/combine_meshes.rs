use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use itertools::Itertools;
use log::{debug, info, trace};
use thiserror::Error;

use crate::geometry::mesh_merger::{CombineEntry, MeshMerger};
use crate::geometry::types::SubmeshedMesh;
use crate::io::asset_store::{AssetStore, StoreError};
use crate::scene::document::{MaterialId, MeshRenderer, NodeId, SceneDocument};
use crate::scene::selection::Selection;
use crate::scene::undo::{UndoJournal, UndoStep};

#[derive(Error, Debug)]
pub enum CombineError {
    #[error("Nothing is selected")]
    EmptySelection,

    #[error("The selection does not contain any mesh renderers")]
    NoGeometryFound,

    #[error("The collected renderers yielded no combinable submeshes")]
    NoCombinableSubmeshes,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What a successful combine left behind.
#[derive(Debug)]
pub struct CombineOutcome {
    pub combined_node: NodeId,
    pub asset_path: PathBuf,
    pub submesh_count: usize,
    pub disabled_renderers: usize,
}

/// Merges the meshes below the selected nodes into one combined mesh with
/// one submesh per distinct material, persists it through `store` and
/// attaches it to a newly created node. The original renderers are disabled,
/// never deleted.
///
/// The three validation failures abort before the document is touched; once
/// the merge starts, the operation runs to completion.
pub fn combine_selected_meshes(
    document: &mut SceneDocument,
    selection: &mut Selection,
    isolation: Option<NodeId>,
    store: &mut dyn AssetStore,
    undo: &mut UndoJournal,
) -> Result<CombineOutcome, CombineError> {
    let (root, targets) = resolve_targets(document, selection, isolation)?;
    let collected = collect_renderers(document, &targets)?;
    let buckets = group_by_material(document, root, &collected)?;

    let material_order = buckets.iter().map(|bucket| bucket.material).collect_vec();
    let per_material = buckets
        .iter()
        .map(|bucket| MeshMerger::merge_entries(&bucket.entries))
        .collect_vec();

    let mut combined = MeshMerger::compose_submeshes(per_material);

    store.ensure_folder()?;
    combined.name = store.unique_name(&format!("combined_mesh_{}", root.0));
    let asset_path = store.persist_mesh(&combined.name, &combined)?;
    store.flush()?;

    // inside an isolated context the result stays below the context root,
    // otherwise it lands at the scene's top level
    let parent = isolation.map(|_| root);
    let combined_node = document.create_node("CombinedMesh", parent);
    undo.record(UndoStep::CreatedNode(combined_node));

    let submesh_count = combined.submesh_count();
    document.set_renderer(
        combined_node,
        MeshRenderer {
            mesh: Some(Arc::new(combined)),
            materials: material_order,
            enabled: true,
        },
    );

    for source in &collected {
        undo.record(UndoStep::MutatedRenderer(source.node));
        document.set_renderer_enabled(source.node, false);
    }

    document.mark_dirty();
    selection.set_active_only(combined_node);

    info!(
        "Combined {} renderers into CombinedMesh ({} submeshes, asset: {})",
        collected.len(),
        submesh_count,
        asset_path.display()
    );

    Ok(CombineOutcome {
        combined_node,
        asset_path,
        submesh_count,
        disabled_renderers: collected.len(),
    })
}

struct CollectedRenderer {
    node: NodeId,
    mesh: Option<Arc<SubmeshedMesh>>,
    materials: Vec<MaterialId>,
}

struct MaterialBucket {
    material: MaterialId,
    entries: Vec<CombineEntry>,
}

/// Determines the coordinate-space root and the nodes to scan. With an
/// isolated editing context active, only selected nodes inside that context
/// count, and the context root steps in when none survive the filter.
fn resolve_targets(
    document: &SceneDocument,
    selection: &Selection,
    isolation: Option<NodeId>,
) -> Result<(NodeId, Vec<NodeId>), CombineError> {
    if selection.is_empty() {
        return Err(CombineError::EmptySelection);
    }

    if let Some(root) = isolation {
        let mut targets = selection
            .nodes
            .iter()
            .copied()
            .filter(|&node| node == root || document.is_descendant_of(node, root))
            .collect_vec();
        if targets.is_empty() {
            targets.push(root);
        }
        return Ok((root, targets));
    }

    let root = selection.active.unwrap_or(selection.nodes[0]);
    Ok((root, selection.nodes.clone()))
}

/// Walks every target's hierarchy and gathers all mesh renderers, disabled
/// ones included. Renderers without a mesh reference stay in the list (they
/// get disabled like any other source), grouping skips them later.
fn collect_renderers(
    document: &SceneDocument,
    targets: &[NodeId],
) -> Result<Vec<CollectedRenderer>, CombineError> {
    let mut collected = Vec::new();
    for &target in targets {
        for node in document.descendants(target) {
            let Some(renderer) = document.renderer(node) else {
                continue;
            };
            trace!("Collected renderer on {:?} ({})", node, document.node(node).name);
            collected.push(CollectedRenderer {
                node,
                mesh: renderer.mesh.clone(),
                materials: renderer.materials.clone(),
            });
        }
    }

    if collected.is_empty() {
        return Err(CombineError::NoGeometryFound);
    }
    Ok(collected)
}

/// Buckets every (mesh, submesh) pair by the material it renders with.
/// Bucket order is first-seen order and becomes the submesh order of the
/// combined mesh, so it must stay deterministic.
fn group_by_material(
    document: &mut SceneDocument,
    root: NodeId,
    collected: &[CollectedRenderer],
) -> Result<Vec<MaterialBucket>, CombineError> {
    let root_world_inverse = document.world_transform(root).inverse();

    let mut buckets: Vec<MaterialBucket> = Vec::new();
    let mut bucket_index: HashMap<MaterialId, usize> = HashMap::new();

    for source in collected {
        let Some(mesh) = &source.mesh else {
            continue;
        };
        let entry_transform = root_world_inverse * document.world_transform(source.node);

        for submesh in 0..mesh.submesh_count() {
            // out-of-bounds slots fall back to the first material, renderers
            // without any material get the shared stand-in
            let material = match source.materials.get(submesh) {
                Some(&id) => id,
                None => match source.materials.first() {
                    Some(&id) => id,
                    None => document.fallback_material(),
                },
            };

            let index = match bucket_index.get(&material) {
                Some(&index) => index,
                None => {
                    buckets.push(MaterialBucket {
                        material,
                        entries: Vec::new(),
                    });
                    bucket_index.insert(material, buckets.len() - 1);
                    buckets.len() - 1
                }
            };
            buckets[index].entries.push(CombineEntry {
                mesh: mesh.clone(),
                submesh,
                transform: entry_transform,
            });
        }
    }

    if buckets.is_empty() {
        return Err(CombineError::NoCombinableSubmeshes);
    }
    debug!(
        "Grouped {} submesh entries into {} material buckets",
        buckets.iter().map(|bucket| bucket.entries.len()).sum::<usize>(),
        buckets.len()
    );
    Ok(buckets)
}
