use log::info;

use crate::scene::document::SceneDocument;
use crate::scene::selection::Selection;
use crate::scene::undo::{UndoJournal, UndoStep};

/// Renames every selected node to `{prefix}_{index}` with a 1-based index in
/// selection order. An empty selection renames nothing. Returns how many
/// nodes were renamed.
pub fn rename_selected(
    document: &mut SceneDocument,
    selection: &Selection,
    prefix: &str,
    undo: &mut UndoJournal,
) -> usize {
    for (index, &node) in selection.nodes.iter().enumerate() {
        let previous_name = document.node(node).name.clone();
        undo.record(UndoStep::Renamed {
            node,
            previous_name,
        });
        document.set_name(node, &format!("{}_{}", prefix, index + 1));
    }

    if !selection.is_empty() {
        document.mark_dirty();
        info!("Renamed {} nodes with prefix {}", selection.nodes.len(), prefix);
    }
    selection.nodes.len()
}
