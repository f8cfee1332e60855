use crate::scene::document::NodeId;

/// The host editor's current selection: an ordered node list plus the
/// "primary" node the UI highlights. The active node, when present, is also
/// part of `nodes`.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub nodes: Vec<NodeId>,
    pub active: Option<NodeId>,
}

impl Selection {
    pub fn of(nodes: Vec<NodeId>) -> Self {
        Self {
            active: nodes.first().copied(),
            nodes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Collapses the selection onto a single node, as a host does after an
    /// operation produced a new object.
    pub fn set_active_only(&mut self, node: NodeId) {
        self.nodes = vec![node];
        self.active = Some(node);
    }
}
