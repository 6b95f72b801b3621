// argus_sim/src/simulation/target.rs

//! Ground-truth trajectory of the maneuvering target.

use argus_core::models::dynamics::{spherical::SphericalManeuverModel, DriftModel};
use argus_core::types::State;
use argus_core::utils::integrators::RK4;
use log::debug;
use nalgebra::{DVector, Vector3};

use crate::simulation::core::error::SimError;

/// One epoch of the true target state.
#[derive(Debug, Clone, PartialEq)]
pub struct TruthSample {
    pub time: f64,
    pub state: State,
}

impl TruthSample {
    pub fn position(&self) -> Vector3<f64> {
        Vector3::new(self.state[0], self.state[1], self.state[2])
    }
}

/// Integrates the spherical maneuver dynamics from `initial_state` with RK4,
/// returning `steps` samples spaced `dt` apart, starting at t = 0.
pub fn generate_truth(
    initial_state: &[f64],
    dt: f64,
    steps: usize,
) -> Result<Vec<TruthSample>, SimError> {
    let x0 = DVector::from_column_slice(initial_state);
    let model = SphericalManeuverModel::for_state(&x0)?;

    let mut samples = Vec::with_capacity(steps);
    let mut x = x0;
    for k in 0..steps {
        let time = k as f64 * dt;
        if k > 0 {
            x = model.propagate(&x, time - dt, dt, &RK4)?;
        }
        samples.push(TruthSample {
            time,
            state: x.clone(),
        });
    }

    if let Some(last) = samples.last() {
        debug!(
            "Truth trajectory: {} samples, final position {:?}",
            samples.len(),
            last.position().as_slice()
        );
    }
    Ok(samples)
}
