/// The storage seam the combine command persists through.
pub mod asset_store;
