use std::sync::Arc;

use glam::Affine3A;

use crate::geometry::types::{Material, SubmeshedMesh};

/// Index of a node in the document arena. Stable for the lifetime of the
/// document: the editor commands only disable renderers, they never remove
/// nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Index into the document's material registry. Grouping during a combine
/// compares these ids, never the material contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(pub u32);

/// A renderable mesh attachment. The mesh reference is optional: a renderer
/// can sit on a node with its mesh slot unassigned, the combine command
/// skips those silently.
#[derive(Debug, Clone)]
pub struct MeshRenderer {
    pub mesh: Option<Arc<SubmeshedMesh>>,
    pub materials: Vec<MaterialId>,
    pub enabled: bool,
}

#[derive(Debug)]
pub struct SceneNode {
    pub name: String,
    pub local_transform: Affine3A,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    pub renderer: Option<MeshRenderer>,
}

impl SceneNode {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// A hierarchical scene with a material registry and an unsaved-changes
/// flag. Mutations never mark the document dirty on their own, that is the
/// calling command's responsibility (mirroring how a host editor separates
/// edits from dirty tracking).
#[derive(Debug, Default)]
pub struct SceneDocument {
    nodes: Vec<SceneNode>,
    materials: Vec<Material>,
    fallback_material: Option<MaterialId>,
    dirty: bool,
}

impl SceneDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_node(&mut self, name: &str, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(SceneNode {
            name: name.to_string(),
            local_transform: Affine3A::IDENTITY,
            parent,
            children: Vec::new(),
            renderer: None,
        });
        if let Some(parent) = parent {
            self.nodes[parent.0 as usize].children.push(id);
        }
        id
    }

    pub fn node(&self, id: NodeId) -> &SceneNode {
        &self.nodes[id.0 as usize]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn set_name(&mut self, id: NodeId, name: &str) {
        self.nodes[id.0 as usize].name = name.to_string();
    }

    pub fn set_local_transform(&mut self, id: NodeId, transform: Affine3A) {
        self.nodes[id.0 as usize].local_transform = transform;
    }

    pub fn set_renderer(&mut self, id: NodeId, renderer: MeshRenderer) {
        self.nodes[id.0 as usize].renderer = Some(renderer);
    }

    pub fn renderer(&self, id: NodeId) -> Option<&MeshRenderer> {
        self.nodes[id.0 as usize].renderer.as_ref()
    }

    pub fn set_renderer_enabled(&mut self, id: NodeId, enabled: bool) {
        if let Some(renderer) = self.nodes[id.0 as usize].renderer.as_mut() {
            renderer.enabled = enabled;
        }
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        let id = MaterialId(self.materials.len() as u32);
        self.materials.push(material);
        id
    }

    pub fn material(&self, id: MaterialId) -> &Material {
        &self.materials[id.0 as usize]
    }

    /// The shared stand-in material for submeshes without any assigned
    /// material, registered on first use.
    pub fn fallback_material(&mut self) -> MaterialId {
        match self.fallback_material {
            Some(id) => id,
            None => {
                let id = self.add_material(Material::fallback());
                self.fallback_material = Some(id);
                id
            }
        }
    }

    /// Strict descendant test, `node == ancestor` is not a descendant.
    pub fn is_descendant_of(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = self.node(node).parent;
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.node(parent).parent;
        }
        false
    }

    pub fn world_transform(&self, id: NodeId) -> Affine3A {
        let node = self.node(id);
        match node.parent {
            Some(parent) => self.world_transform(parent) * node.local_transform,
            None => node.local_transform,
        }
    }

    /// Depth-first preorder walk starting at (and including) `id`.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut ordered = Vec::new();
        self.collect_descendants(id, &mut ordered);
        ordered
    }

    fn collect_descendants(&self, id: NodeId, ordered: &mut Vec<NodeId>) {
        ordered.push(id);
        for &child in self.node(id).children() {
            self.collect_descendants(child, ordered);
        }
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn world_transforms_compose_down_the_hierarchy() {
        let mut document = SceneDocument::new();
        let root = document.create_node("root", None);
        let child = document.create_node("child", Some(root));
        document.set_local_transform(root, Affine3A::from_translation(Vec3::new(1.0, 0.0, 0.0)));
        document.set_local_transform(child, Affine3A::from_translation(Vec3::new(0.0, 2.0, 0.0)));

        let world = document.world_transform(child);

        assert!(
            world
                .transform_point3(Vec3::ZERO)
                .abs_diff_eq(Vec3::new(1.0, 2.0, 0.0), 1e-6)
        );
    }

    #[test]
    fn descendants_walk_preorder() {
        let mut document = SceneDocument::new();
        let root = document.create_node("root", None);
        let a = document.create_node("a", Some(root));
        let a1 = document.create_node("a1", Some(a));
        let b = document.create_node("b", Some(root));

        assert_eq!(document.descendants(root), vec![root, a, a1, b]);
    }

    #[test]
    fn descendant_test_is_strict() {
        let mut document = SceneDocument::new();
        let root = document.create_node("root", None);
        let a = document.create_node("a", Some(root));
        let a1 = document.create_node("a1", Some(a));
        let stray = document.create_node("stray", None);

        assert!(document.is_descendant_of(a1, root));
        assert!(!document.is_descendant_of(root, root));
        assert!(!document.is_descendant_of(stray, root));
    }

    #[test]
    fn fallback_material_is_registered_once() {
        let mut document = SceneDocument::new();

        let first = document.fallback_material();
        let second = document.fallback_material();

        assert_eq!(first, second);
        assert_eq!(document.material(first).name, "Fallback");
    }
}
