use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "Meshweld")]
#[command(version)]
#[command(about = "Scene mesh combining and batch rename toolkit")]
pub struct CliArgs {
    /// Folder the combined mesh containers are persisted into.
    #[arg(long, env = "MESHWELD_ASSET_DIR", default_value_t = default_asset_dir())]
    pub asset_dir: String,

    #[command(subcommand)]
    pub operation_mode: OperationMode,
}

pub fn default_asset_dir() -> String {
    std::env::current_dir()
        .expect("Can't read current working directory!")
        .join("_assets")
        .to_string_lossy()
        .to_string()
}

#[derive(Subcommand, Debug)]
pub enum OperationMode {
    /// Builds the showcase scene, combines the selected meshes and persists
    /// the result.
    Combine {
        /// Run inside an isolated editing context rooted at the prop root,
        /// parenting the combined node below it.
        #[arg(long, default_value_t = false)]
        isolated: bool,
    },
    /// Builds the showcase scene and renames the selection with a
    /// sequential label.
    Rename {
        #[arg(long, env = "MESHWELD_RENAME_PREFIX", default_value = "Prop")]
        prefix: String,
    },
}
