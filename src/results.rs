use crate::consts::CSV_DELIMITER;
use crate::cube::{CubeState, MoveSequence};
use crate::error::CfResult;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs::OpenOptions;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

pub const HEADER: [&str; 7] = [
    "RunID",
    "RunDateTime",
    "Start State",
    "Solution Time",
    "Solution Iterations",
    "Solution Move Sequence",
    "Total Moves",
];

/// One solved (or partially solved) run as written to the results file.
#[derive(Debug, Clone, Serialize)]
pub struct ResultRow {
    #[serde(rename = "RunID")]
    pub run_id: usize,
    #[serde(rename = "RunDateTime")]
    pub run_datetime: String,
    #[serde(rename = "Start State")]
    pub start_state: String,
    #[serde(rename = "Solution Time")]
    pub solution_time: String,
    #[serde(rename = "Solution Iterations")]
    pub iterations: usize,
    #[serde(rename = "Solution Move Sequence")]
    pub moves: String,
    #[serde(rename = "Total Moves")]
    pub total_moves: usize,
}

impl ResultRow {
    pub fn new(
        run_id: usize,
        run_started: DateTime<Local>,
        start_state: &CubeState,
        elapsed: Duration,
        iterations: usize,
        moves: &MoveSequence,
    ) -> Self {
        Self {
            run_id,
            run_datetime: run_started.format("%Y-%m-%d %H:%M:%S").to_string(),
            start_state: start_state.to_symbols(),
            solution_time: format_hms(elapsed),
            iterations,
            moves: moves.to_string(),
            total_moves: moves.len(),
        }
    }
}

/// `hh:mm:ss`; hours are not wrapped at 24.
pub fn format_hms(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

/// Appends `row`, writing the header first when the file is new or empty.
pub fn append_result<P: AsRef<Path>>(path: P, row: &ResultRow) -> CfResult<()> {
    let path = path.as_ref();
    let needs_header = std::fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let mut wtr = csv::WriterBuilder::new()
        .delimiter(CSV_DELIMITER)
        .has_headers(false)
        .from_writer(file);
    if needs_header {
        wtr.write_record(HEADER)?;
    }
    wtr.serialize(row)?;
    wtr.flush()?;

    debug!("Result row {} appended to {}", row.run_id, path.display());
    Ok(())
}
