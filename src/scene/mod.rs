/// The in-memory scene document the editor commands operate on.
pub mod document;
/// The host editor's selection state.
pub mod selection;
/// Bookkeeping for what a command would register with the host's undo stack.
pub mod undo;
