use crate::consts::{CSV_DELIMITER, DEFAULT_ATTEMPTS_PER_WORKER};
use crate::error::{CfResult, CubeForgeError};
use crate::pieces::Level;
use clap::{ArgAction, Args};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use tracing::debug;

pub const MAX_ITERATIONS: &str = "MAX_ITERATIONS";
pub const MAX_MOVES_PER_SEQUENCE: &str = "MAX_MOVES_PER_SEQUENCE";
pub const TARGET_CORRECT_STONES: &str = "TARGET_CORRECT_STONES";
pub const NO_IMPROVEMENT_THRESHOLD: &str = "NO_IMPROVEMENT_THRESHOLD";
pub const VARIABILITY: &str = "VARIABILITY";
pub const NO_MOVES_TO_SHUFFLE: &str = "NO_MOVES_TO_SHUFFLE";
pub const TOTAL_RUNS: &str = "TOTAL_RUNS";
pub const SOLUTIONS_PER_RUN: &str = "SOLUTIONS_PER_RUN";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    #[serde(default)]
    pub search: SearchParams,
    #[serde(default)]
    pub run: RunParams,
    #[serde(default = "default_levels")]
    pub levels: BTreeMap<Level, LevelParams>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            search: SearchParams::default(),
            run: RunParams::default(),
            levels: default_levels(),
        }
    }
}

fn default_levels() -> BTreeMap<Level, LevelParams> {
    Level::ALL
        .iter()
        .map(|&l| (l, LevelParams::defaults_for(l)))
        .collect()
}

/// Knobs of the search machinery itself, exposed on the command line.
#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    /// Workers per batch (0 = available parallelism)
    #[arg(long, default_value_t = 0)]
    pub workers: usize,

    /// Random trials each worker runs per batch
    #[arg(long, default_value_t = DEFAULT_ATTEMPTS_PER_WORKER)]
    pub attempts_per_worker: usize,

    /// Seed for reproducible runs
    #[arg(short = 'S', long)]
    pub seed: Option<u64>,

    /// Reject learned sequences that break an already-correct piece
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub guard_learned_reuse: bool,

    /// Try learned sequences in random order during recall
    #[arg(long, default_value_t = false)]
    pub shuffle_learned: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            workers: 0,
            attempts_per_worker: DEFAULT_ATTEMPTS_PER_WORKER,
            seed: None,
            guard_learned_reuse: true,
            shuffle_learned: false,
        }
    }
}

impl SearchParams {
    pub fn resolved_workers(&self) -> usize {
        if self.workers > 0 {
            self.workers
        } else {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(crate::consts::FALLBACK_WORKERS)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunParams {
    pub no_moves_to_shuffle: usize,
    pub total_runs: usize,
    pub solutions_per_run: usize,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            no_moves_to_shuffle: 0,
            total_runs: 1,
            solutions_per_run: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelParams {
    pub max_iterations: usize,
    pub max_moves_per_sequence: usize,
    pub target_correct_stones: usize,
    pub no_improvement_threshold: usize,
    /// Percent (0-100) of the canonical moves each trial may use.
    pub variability: u8,
}

impl LevelParams {
    pub fn defaults_for(level: Level) -> Self {
        match level {
            Level::E1 => Self {
                max_iterations: 2_000,
                max_moves_per_sequence: 6,
                target_correct_stones: 8,
                no_improvement_threshold: 30,
                variability: 100,
            },
            Level::E2 => Self {
                max_iterations: 3_000,
                max_moves_per_sequence: 8,
                target_correct_stones: 12,
                no_improvement_threshold: 40,
                variability: 100,
            },
            Level::E3 => Self {
                max_iterations: 5_000,
                max_moves_per_sequence: 10,
                target_correct_stones: 20,
                no_improvement_threshold: 50,
                variability: 100,
            },
        }
    }

    pub fn validate(&self, level: Level) -> CfResult<()> {
        if self.variability > 100 {
            return Err(CubeForgeError::Config(format!(
                "{} {} must be within 0..=100, got {}",
                VARIABILITY, level, self.variability
            )));
        }
        if self.max_moves_per_sequence == 0 {
            return Err(CubeForgeError::Config(format!(
                "{} {} must be at least 1",
                MAX_MOVES_PER_SEQUENCE, level
            )));
        }
        if self.target_correct_stones == 0 || self.target_correct_stones > level.piece_count() {
            return Err(CubeForgeError::Config(format!(
                "{} {} must be within 1..={}, got {}",
                TARGET_CORRECT_STONES,
                level,
                level.piece_count(),
                self.target_correct_stones
            )));
        }
        Ok(())
    }
}

impl SolverConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> CfResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: SolverConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn level(&self, level: Level) -> CfResult<&LevelParams> {
        self.levels.get(&level).ok_or_else(|| {
            CubeForgeError::Config(format!("no parameters configured for level {}", level))
        })
    }

    pub fn validate(&self) -> CfResult<()> {
        for level in Level::ALL {
            self.level(level)?.validate(level)?;
        }
        Ok(())
    }
}

/// One column of the parameter sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSet {
    pub name: String,
    values: BTreeMap<String, String>,
}

impl ParameterSet {
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    fn parse_value(&self, key: &str, raw: &str) -> CfResult<usize> {
        // "10.000" is ten thousand in the sheet's locale.
        let cleaned = raw.trim().replace('.', "");
        cleaned.parse::<usize>().map_err(|_| {
            CubeForgeError::Config(format!(
                "parameter '{}' in set '{}' is not a non-negative integer: '{}'",
                key, self.name, raw
            ))
        })
    }

    pub fn require(&self, key: &str) -> CfResult<usize> {
        let raw = self.raw(key).ok_or_else(|| {
            CubeForgeError::Config(format!(
                "parameter '{}' missing from set '{}'",
                key, self.name
            ))
        })?;
        self.parse_value(key, raw)
    }

    pub fn optional(&self, key: &str, default: usize) -> CfResult<usize> {
        match self.raw(key) {
            Some(raw) => self.parse_value(key, raw),
            None => Ok(default),
        }
    }

    pub fn max_iterations(&self, level: Level) -> CfResult<usize> {
        self.require(&format!("{} {}", MAX_ITERATIONS, level))
    }

    pub fn level_params(&self, level: Level) -> CfResult<LevelParams> {
        let key = |name: &str| format!("{} {}", name, level);
        let variability = self.require(&key(VARIABILITY))?;
        let params = LevelParams {
            max_iterations: self.require(&key(MAX_ITERATIONS))?,
            max_moves_per_sequence: self.require(&key(MAX_MOVES_PER_SEQUENCE))?,
            target_correct_stones: self.require(&key(TARGET_CORRECT_STONES))?,
            no_improvement_threshold: self.require(&key(NO_IMPROVEMENT_THRESHOLD))?,
            variability: u8::try_from(variability).unwrap_or(u8::MAX),
        };
        params.validate(level)?;
        Ok(params)
    }

    pub fn run_params(&self) -> CfResult<RunParams> {
        let defaults = RunParams::default();
        Ok(RunParams {
            no_moves_to_shuffle: self.optional(NO_MOVES_TO_SHUFFLE, defaults.no_moves_to_shuffle)?,
            total_runs: self.optional(TOTAL_RUNS, defaults.total_runs)?,
            solutions_per_run: self.optional(SOLUTIONS_PER_RUN, defaults.solutions_per_run)?,
        })
    }

    /// Full solver configuration; every level-scoped parameter is required.
    pub fn to_config(&self, search: SearchParams) -> CfResult<SolverConfig> {
        let mut levels = BTreeMap::new();
        for level in Level::ALL {
            levels.insert(level, self.level_params(level)?);
        }
        Ok(SolverConfig {
            search,
            run: self.run_params()?,
            levels,
        })
    }
}

/// The `;`-delimited parameter sheet: first column holds parameter names
/// (`MAX_ITERATIONS E2`), each further column is a named parameter set.
#[derive(Debug, Clone)]
pub struct ParameterSheet {
    pub sets: Vec<ParameterSet>,
}

impl ParameterSheet {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> CfResult<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> CfResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(CSV_DELIMITER)
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let header = rdr.headers()?.clone();
        if header.len() < 2 {
            return Err(CubeForgeError::Config(
                "parameter sheet needs a name column and at least one set".to_string(),
            ));
        }

        let mut sets: Vec<ParameterSet> = header
            .iter()
            .skip(1)
            .map(|name| ParameterSet {
                name: name.trim().to_string(),
                values: BTreeMap::new(),
            })
            .collect();

        for record in rdr.records() {
            let record = record?;
            let key = match record.get(0).map(str::trim) {
                Some(k) if !k.is_empty() => k.to_string(),
                _ => continue,
            };
            for (i, set) in sets.iter_mut().enumerate() {
                if let Some(value) = record.get(i + 1) {
                    let value = value.trim();
                    if !value.is_empty() {
                        set.values.insert(key.clone(), value.to_string());
                    }
                }
            }
        }

        debug!("Parameter sheet: {} set(s)", sets.len());
        Ok(Self { sets })
    }

    pub fn set(&self, name: &str) -> CfResult<&ParameterSet> {
        self.sets
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| CubeForgeError::Config(format!("parameter set '{}' not found", name)))
    }

    /// A named set, or a uniformly random one when no name is given.
    pub fn choose(&self, name: Option<&str>, rng: &mut fastrand::Rng) -> CfResult<&ParameterSet> {
        match name {
            Some(n) => self.set(n),
            None if self.sets.is_empty() => {
                Err(CubeForgeError::Config("parameter sheet is empty".to_string()))
            }
            None => Ok(&self.sets[rng.usize(0..self.sets.len())]),
        }
    }
}
