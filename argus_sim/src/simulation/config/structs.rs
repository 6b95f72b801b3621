// argus_sim/src/simulation/config/structs.rs

use serde::{Deserialize, Serialize};

// =========================================================================
// == Top-Level Configuration ==
// =========================================================================

/// # ScenarioConfig
/// All configuration for one harness run, parsed from a `scenario.toml` file.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(deny_unknown_fields)] // Fail if the TOML has fields not in our struct
pub struct ScenarioConfig {
    #[serde(default)] // Use default if the [simulation] section is missing
    pub simulation: Simulation,

    #[serde(default)]
    pub target: Target,

    #[serde(default)]
    pub sensor: Sensor,

    #[serde(default)]
    pub smoother: Smoother,

    #[serde(default)]
    pub surveillance: Surveillance,
}

// =========================================================================
// == Configuration Sub-Structs ==
// These map directly to the sections in the scenario file.
// =========================================================================

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Simulation {
    /// Optional seed for the pseudo-random number generator for determinism.
    pub seed: Option<u64>,
    /// Sensor sampling interval in seconds.
    pub dt: f64,
    /// Number of measurement epochs.
    pub steps: usize,
}

impl Default for Simulation {
    fn default() -> Self {
        Self {
            seed: None,
            dt: 1.0,
            steps: 120,
        }
    }
}

/// Initial maneuvering state of the target:
/// `[px, py, pz, azimuth, elevation, speed, azimuth_rate, elevation_rate(, speed_rate)]`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Target {
    pub initial_state: Vec<f64>,
}

impl Default for Target {
    fn default() -> Self {
        Self {
            // A level 200 m/s coordinated turn at 1.5 km altitude.
            initial_state: vec![0.0, 0.0, 1500.0, 0.0, 0.0, 200.0, 0.03, 0.0],
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Sensor {
    /// Per-axis standard deviation of the position measurements in meters.
    pub noise_stddev: f64,
}

impl Default for Sensor {
    fn default() -> Self {
        Self { noise_stddev: 30.0 }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Smoother {
    /// Number of measurement epochs in the sliding window.
    pub window: usize,
    /// Zero-based step of the window that is estimated. Defaults to the centre.
    pub target_step: Option<usize>,
    /// Spectral density of the white-acceleration process noise.
    pub process_noise_intensity: f64,
}

impl Smoother {
    /// The step the smoother estimates, resolving the centre default.
    pub fn resolved_target_step(&self) -> usize {
        self.target_step.unwrap_or(self.window / 2)
    }
}

impl Default for Smoother {
    fn default() -> Self {
        Self {
            window: 11,
            target_step: None,
            process_noise_intensity: 5.0,
        }
    }
}

/// An axis-aligned surveillance volume plus the gate radius around each
/// smoothed position.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Surveillance {
    pub min: [f64; 3],
    pub max: [f64; 3],
    pub gate_radius: f64,
}

impl Default for Surveillance {
    fn default() -> Self {
        Self {
            min: [-5000.0, -1000.0, 0.0],
            max: [5000.0, 12000.0, 3000.0],
            gate_radius: 500.0,
        }
    }
}
