use thiserror::Error;

#[derive(Error, Debug)]
pub enum CubeForgeError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid State: {0}")]
    InvalidState(String),

    #[error("Unknown Move: '{0}'")]
    UnknownMove(String),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Data Validation Error: {0}")]
    Validation(String),

    #[error("Search Exhausted: level {level} ended at {correct}/{target} correct pieces")]
    SearchExhausted {
        level: String,
        correct: usize,
        target: usize,
    },
}

pub type CfResult<T> = Result<T, CubeForgeError>;
