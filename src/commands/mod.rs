/// Merges the selected nodes' meshes into one combined mesh grouped by
/// material, persists it and attaches it to a new node.
pub mod combine_meshes;
/// Renames the selection with a prefix and a sequential index.
pub mod rename;
