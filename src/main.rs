use clap::Parser;
use meshweld::demos;
use meshweld::settings::{CliArgs, OperationMode};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = CliArgs::parse();
    log::trace!("Starting with args: {:?}", args);

    match args.operation_mode {
        OperationMode::Combine { isolated } => demos::run_combine_demo(&args.asset_dir, isolated),
        OperationMode::Rename { prefix } => demos::run_rename_demo(&prefix),
    }
}
