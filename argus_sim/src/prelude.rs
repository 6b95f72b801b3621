// argus_sim/src/prelude.rs

// Re-export the entire argus_core prelude so you can easily access
// pure types like `State`, `DriftModel`, `FirWindow`, etc.
pub use argus_core::prelude::*;

// Re-export common harness types for easy access.
pub use crate::cli::Cli;
pub use crate::simulation::config::structs::*;
pub use crate::simulation::core::{error::SimError, prng::SimulationRng};
pub use crate::simulation::runner::{run_scenario, RunSummary};
pub use crate::simulation::sensor::PositionSensor;
pub use crate::simulation::target::{generate_truth, TruthSample};
pub use crate::simulation::tracker::{SurveillanceGate, WindowSmoother};
