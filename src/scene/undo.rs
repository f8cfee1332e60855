use log::trace;

use crate::scene::document::NodeId;

/// One registration a command would hand to the host's undo stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoStep {
    CreatedNode(NodeId),
    MutatedRenderer(NodeId),
    Renamed { node: NodeId, previous_name: String },
}

/// Stand-in for the host's undo system. Actual undo/redo stays host
/// territory, commands only record what they would register so embedders
/// and tests can inspect it.
#[derive(Debug, Default)]
pub struct UndoJournal {
    steps: Vec<UndoStep>,
}

impl UndoJournal {
    pub fn record(&mut self, step: UndoStep) {
        trace!("Undo step: {:?}", step);
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[UndoStep] {
        &self.steps
    }
}
