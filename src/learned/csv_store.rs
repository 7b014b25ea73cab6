use super::memory::{poisoned, Rows};
use super::{LearnedEntry, SequenceStore};
use crate::consts::CSV_DELIMITER;
use crate::cube::MoveSequence;
use crate::error::{CfResult, CubeForgeError};
use crate::pieces::PieceMask;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, info, warn};

pub const HEADER: [&str; 7] = [
    "Start Count",
    "End Count",
    "Improvement Count",
    "Starting Positions",
    "Move Sequence",
    "Move Count",
    "Value",
];

#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    #[serde(rename = "Start Count")]
    start_count: usize,
    #[serde(rename = "End Count")]
    end_count: usize,
    #[serde(rename = "Improvement Count")]
    improvement: usize,
    #[serde(rename = "Starting Positions", default)]
    starting_positions: String,
    #[serde(rename = "Move Sequence")]
    move_sequence: String,
    #[serde(rename = "Move Count")]
    move_count: usize,
    #[serde(rename = "Value")]
    value: f64,
}

impl From<&LearnedEntry> for CsvRow {
    fn from(e: &LearnedEntry) -> Self {
        Self {
            start_count: e.start_count,
            end_count: e.end_count,
            improvement: e.improvement,
            starting_positions: e.required.to_string(),
            move_sequence: e.sequence.to_string(),
            move_count: e.move_count,
            value: e.value,
        }
    }
}

impl CsvRow {
    fn into_entry(self) -> CfResult<LearnedEntry> {
        let sequence: MoveSequence = self.move_sequence.parse()?;
        let required = PieceMask::parse_names(&self.starting_positions)?;
        // Improvement, move count and value are recomputed, not trusted.
        LearnedEntry::new(self.start_count, self.end_count, sequence, required)
    }
}

/// Learned sequences backed by an append-only `;`-delimited file.
///
/// The whole file is indexed in memory on open; `record` appends one row
/// and flushes before returning. Appends happen under the index write
/// lock, so concurrent `record` calls are serialized.
#[derive(Debug)]
pub struct CsvStore {
    path: PathBuf,
    rows: RwLock<Rows>,
}

impl CsvStore {
    /// Opens (or creates) the store at `path`. Malformed rows are skipped.
    pub fn open<P: AsRef<Path>>(path: P) -> CfResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut rows = Rows::default();

        if path.exists() && std::fs::metadata(&path)?.len() > 0 {
            let mut rdr = csv::ReaderBuilder::new()
                .delimiter(CSV_DELIMITER)
                .has_headers(true)
                .flexible(true)
                .from_path(&path)?;

            let mut skipped = 0usize;
            let mut duplicates = 0usize;
            for (line, result) in rdr.deserialize::<CsvRow>().enumerate() {
                let entry = result
                    .map_err(CubeForgeError::from)
                    .and_then(CsvRow::into_entry);
                match entry {
                    Ok(e) => {
                        if !rows.insert(e) {
                            duplicates += 1;
                        }
                    }
                    Err(err) => {
                        warn!("⚠️ Skipping learned row {}: {}", line + 2, err);
                        skipped += 1;
                    }
                }
            }
            debug!(
                "Learned store: {} skipped, {} duplicate row(s)",
                skipped, duplicates
            );
        }

        info!(
            "📚 Learned store {} ({} entries)",
            path.display(),
            rows.entries.len()
        );

        Ok(Self {
            path,
            rows: RwLock::new(rows),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, entry: &LearnedEntry) -> CfResult<()> {
        let needs_header = match std::fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        };
        let file: File = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut wtr = csv::WriterBuilder::new()
            .delimiter(CSV_DELIMITER)
            .has_headers(false)
            .from_writer(file);
        if needs_header {
            wtr.write_record(HEADER)?;
        }
        wtr.serialize(CsvRow::from(entry))?;
        wtr.flush()?;
        Ok(())
    }
}

impl SequenceStore for CsvStore {
    fn scan(&self, visit: &mut dyn FnMut(&LearnedEntry)) -> CfResult<()> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        rows.entries.iter().for_each(|e| visit(e));
        Ok(())
    }

    fn record(
        &self,
        start_count: usize,
        end_count: usize,
        sequence: &MoveSequence,
        required: PieceMask,
    ) -> CfResult<bool> {
        let entry = LearnedEntry::new(start_count, end_count, sequence.clone(), required)?;
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        if rows.keys.contains(&entry.key()) {
            return Ok(false);
        }
        self.append(&entry)?;
        rows.insert(entry);
        Ok(true)
    }

    fn len(&self) -> CfResult<usize> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.entries.len())
    }
}
