pub mod apply;
pub mod mappings;
pub mod recall;
pub mod solve;

use cubeforge::config::{ParameterSheet, SearchParams, SolverConfig};
use cubeforge::error::CfResult;
use tracing::info;

/// File locations shared by every subcommand.
#[derive(Debug, Clone)]
pub struct Paths {
    pub start: String,
    pub mappings: Option<String>,
    pub params: String,
    pub set: Option<String>,
    pub learned: String,
    pub results: String,
}

pub fn seeded_rng(seed: Option<u64>) -> fastrand::Rng {
    match seed {
        Some(s) => fastrand::Rng::with_seed(s),
        None => fastrand::Rng::new(),
    }
}

/// Solver configuration from a JSON file when given, else from the
/// parameter sheet. Command-line search knobs always win.
pub fn load_config(
    paths: &Paths,
    search: SearchParams,
    config_json: Option<&str>,
    rng: &mut fastrand::Rng,
) -> CfResult<SolverConfig> {
    if let Some(path) = config_json {
        info!("📂 Loading config: {}", path);
        let mut config = SolverConfig::load_from_file(path)?;
        config.search = search;
        return Ok(config);
    }

    info!("📂 Loading parameters: {}", paths.params);
    let sheet = ParameterSheet::load_from_file(&paths.params)?;
    let set = sheet.choose(paths.set.as_deref(), rng)?;
    info!("🎛️  Parameter set: {}", set.name);
    set.to_config(search)
}
