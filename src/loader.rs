use crate::consts::{CSV_DELIMITER, FACELET_COUNT};
use crate::cube::{CubeState, Move, MoveSequence, MoveTable};
use crate::error::{CfResult, CubeForgeError};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, info};

/// Reads the start-position CSV: row 1 is a header (1..54), row 2 holds the
/// 54 color codes.
pub fn load_start_position<P: AsRef<Path>>(path: P) -> CfResult<CubeState> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let state = read_start_position(file)?;
    info!("📂 Loaded start position from {}", path.display());
    Ok(state)
}

pub fn read_start_position<R: Read>(reader: R) -> CfResult<CubeState> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(CSV_DELIMITER)
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let rows: Vec<csv::StringRecord> = rdr.records().collect::<Result<_, _>>()?;
    if rows.len() < 2 {
        return Err(CubeForgeError::InvalidState(format!(
            "start position needs a header row and a color row, found {} row(s)",
            rows.len()
        )));
    }

    let colors: Vec<&str> = rows[1].iter().collect();
    debug!("Start position row has {} cells", colors.len());
    CubeState::from_symbols(&colors)
}

/// Writes a state in the same two-row layout `read_start_position` expects.
pub fn write_start_position<W: Write>(writer: W, state: &CubeState) -> CfResult<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(CSV_DELIMITER)
        .from_writer(writer);

    let header: Vec<String> = (1..=FACELET_COUNT).map(|i| i.to_string()).collect();
    wtr.write_record(&header)?;
    let colors: Vec<String> = state.facelets().iter().map(|c| c.to_string()).collect();
    wtr.write_record(&colors)?;
    wtr.flush()?;
    Ok(())
}

/// Move table from a JSON file, or the geometry-derived table when no path
/// is given.
pub fn load_move_table<P: AsRef<Path>>(path: Option<P>) -> CfResult<MoveTable> {
    match path {
        Some(p) => {
            info!("📂 Loading move table: {}", p.as_ref().display());
            MoveTable::load_from_file(p)
        }
        None => {
            debug!("Using built-in quarter-turn table");
            Ok(MoveTable::standard())
        }
    }
}

/// Applies `count` uniformly random canonical moves.
pub fn shuffle(
    state: &CubeState,
    count: usize,
    table: &MoveTable,
    rng: &mut fastrand::Rng,
) -> (CubeState, MoveSequence) {
    let moves: Vec<Move> = (0..count)
        .map(|_| Move::ALL[rng.usize(0..Move::ALL.len())])
        .collect();
    let shuffled = table.apply_sequence(state, &moves);
    (shuffled, MoveSequence::new(moves))
}
