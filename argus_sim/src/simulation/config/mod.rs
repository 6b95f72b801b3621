// argus_sim/src/simulation/config/mod.rs

//! Loading and validating scenario files.

pub mod structs;

use figment::{
    providers::{Format, Serialized, Toml},
    Figment,
};
use log::info;
use std::path::Path;

use crate::simulation::core::error::SimError;
pub use structs::{ScenarioConfig, Sensor, Simulation, Smoother, Surveillance, Target};

impl ScenarioConfig {
    /// Reads a scenario file on top of the built-in defaults and validates it.
    pub fn load(path: &Path) -> Result<Self, SimError> {
        if !path.is_file() {
            return Err(SimError::ScenarioNotFound(path.to_path_buf()));
        }
        info!("Loading scenario from: {}", path.display());
        Self::from_figment(Self::defaults().merge(Toml::file(path)))
    }

    /// Parses an in-memory scenario on top of the built-in defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, SimError> {
        Self::from_figment(Self::defaults().merge(Toml::string(source)))
    }

    fn defaults() -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
    }

    fn from_figment(figment: Figment) -> Result<Self, SimError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<(), SimError> {
        let invalid = |msg: String| Err(SimError::InvalidScenario(msg));

        if !(self.simulation.dt > 0.0) {
            return invalid(format!(
                "simulation.dt must be positive, got {}",
                self.simulation.dt
            ));
        }
        if !matches!(self.target.initial_state.len(), 8 | 9) {
            return invalid(format!(
                "target.initial_state must have 8 or 9 entries, got {}",
                self.target.initial_state.len()
            ));
        }
        if !(self.sensor.noise_stddev > 0.0) {
            return invalid(format!(
                "sensor.noise_stddev must be positive, got {}",
                self.sensor.noise_stddev
            ));
        }
        // Position-only measurements need two epochs to pin down a velocity.
        if self.smoother.window < 2 {
            return invalid(format!(
                "smoother.window must be at least 2, got {}",
                self.smoother.window
            ));
        }
        if self.smoother.resolved_target_step() >= self.smoother.window {
            return invalid(format!(
                "smoother.target_step {} is outside a window of {}",
                self.smoother.resolved_target_step(),
                self.smoother.window
            ));
        }
        if !(self.smoother.process_noise_intensity > 0.0) {
            return invalid(format!(
                "smoother.process_noise_intensity must be positive, got {}",
                self.smoother.process_noise_intensity
            ));
        }
        if self.simulation.steps < self.smoother.window {
            return invalid(format!(
                "simulation.steps ({}) is shorter than the smoothing window ({})",
                self.simulation.steps, self.smoother.window
            ));
        }
        let region = &self.surveillance;
        if region.min.iter().zip(&region.max).any(|(lo, hi)| lo > hi) {
            return invalid("surveillance.min must not exceed surveillance.max".to_string());
        }
        if !(region.gate_radius >= 0.0) {
            return invalid(format!(
                "surveillance.gate_radius must be non-negative, got {}",
                region.gate_radius
            ));
        }

        Ok(())
    }
}
