use super::Paths;
use crate::reports;
use clap::Args;
use cubeforge::cube::{parse_sequence, CubeState};
use cubeforge::error::CfResult;
use cubeforge::loader;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct ApplyArgs {
    /// Moves to apply, space separated ("R U Rb Ub")
    #[arg(short = 'M', long)]
    pub moves: String,

    /// Inline state (54 codes) instead of the start position file
    #[arg(long)]
    pub state: Option<String>,
}

pub fn run(args: ApplyArgs, paths: &Paths) -> CfResult<()> {
    let table = loader::load_move_table(paths.mappings.as_deref())?;
    let state: CubeState = match &args.state {
        Some(inline) => inline.parse()?,
        None => loader::load_start_position(&paths.start)?,
    };
    let moves = parse_sequence(&args.moves)?;

    reports::print_cube_net("BEFORE", &state);
    reports::print_piece_status(&state);

    let after = table.apply_sequence(&state, moves.as_slice());
    info!("Applied {} move(s): {}", moves.len(), moves);

    reports::print_cube_net("AFTER", &after);
    reports::print_piece_status(&after);
    println!("{}", after.to_symbols());
    Ok(())
}
