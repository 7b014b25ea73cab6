use super::Paths;
use clap::Args;
use cubeforge::error::CfResult;
use cubeforge::loader;
use std::fs;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct MappingsArgs {
    /// Output file; stdout when omitted
    #[arg(short, long)]
    pub output: Option<String>,
}

pub fn run(args: MappingsArgs, paths: &Paths) -> CfResult<()> {
    let table = loader::load_move_table(paths.mappings.as_deref())?;
    let json = table.to_json_string()?;

    match args.output {
        Some(path) => {
            fs::write(&path, json)?;
            info!("💾 Move table written to {}", path);
        }
        None => println!("{}", json),
    }
    Ok(())
}
