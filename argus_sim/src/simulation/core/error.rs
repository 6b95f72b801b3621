// argus_sim/src/simulation/core/error.rs

use argus_core::error::ArgusError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("scenario file not found at {}", .0.display())]
    ScenarioNotFound(PathBuf),

    #[error("failed to parse scenario: {0}")]
    Config(#[from] figment::Error),

    #[error("invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("invalid sensor noise: {0}")]
    Noise(#[from] rand_distr::NormalError),

    #[error(transparent)]
    Core(#[from] ArgusError),

    #[error("failed to render run summary: {0}")]
    Summary(#[from] toml::ser::Error),
}
