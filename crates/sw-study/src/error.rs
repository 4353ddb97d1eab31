//! Error types for the study layer.

use crate::config::ConfigError;

/// Study error type that wraps errors from the backend crates and provides
/// a single error interface for front ends.
#[derive(Debug, thiserror::Error)]
pub enum StudyError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Series '{series}' has {times} times but {values} values")]
    RaggedSeries {
        series: String,
        times: usize,
        values: usize,
    },

    #[error("Non-finite value in series '{series}' at sample {index} (t = {t})")]
    NonFinite {
        series: String,
        index: usize,
        t: f64,
    },
}

/// Result type for study operations.
pub type StudyResult<T> = Result<T, StudyError>;

impl From<sw_sim::SimError> for StudyError {
    fn from(err: sw_sim::SimError) -> Self {
        StudyError::Simulation(err.to_string())
    }
}
