// argus_sim/src/simulation/runner.rs

use log::{debug, info};
use nalgebra::{DVector, Vector3};
use serde::Serialize;

use crate::simulation::config::ScenarioConfig;
use crate::simulation::core::{error::SimError, prng::SimulationRng};
use crate::simulation::sensor::PositionSensor;
use crate::simulation::target::generate_truth;
use crate::simulation::tracker::{position_sigma, SurveillanceGate, WindowSmoother};

/// Aggregate results of one run. Errors are position RMSEs in meters.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RunSummary {
    pub seed: Option<u64>,
    pub steps: usize,
    pub window: usize,
    pub target_step: usize,
    /// Number of window positions the smoother was evaluated at.
    pub windows: usize,
    pub raw_rmse: f64,
    pub smoothed_rmse: f64,
    /// Same windows, estimating the newest step instead of `target_step`.
    pub filtered_rmse: f64,
    /// Position error the smoother itself predicts.
    pub predicted_sigma: f64,
    pub gated_in: usize,
    pub gated_out: usize,
}

impl RunSummary {
    pub fn to_toml(&self) -> Result<String, SimError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

fn rmse(squared_errors: &[f64]) -> f64 {
    if squared_errors.is_empty() {
        return 0.0;
    }
    (squared_errors.iter().sum::<f64>() / squared_errors.len() as f64).sqrt()
}

fn position_of(x: &DVector<f64>) -> Vector3<f64> {
    Vector3::new(x[0], x[1], x[2])
}

/// Runs one scenario end to end: truth, measurements, smoothing, gating.
pub fn run_scenario(
    config: &ScenarioConfig,
    rng: &mut SimulationRng,
) -> Result<RunSummary, SimError> {
    config.validate()?;
    let dt = config.simulation.dt;

    let truth = generate_truth(&config.target.initial_state, dt, config.simulation.steps)?;

    let sensor = PositionSensor::new(config.sensor.noise_stddev)?;
    let measurements: Vec<DVector<f64>> = truth
        .iter()
        .map(|sample| sensor.measure(&sample.position(), rng))
        .collect();

    let raw_errors: Vec<f64> = truth
        .iter()
        .zip(&measurements)
        .map(|(sample, z)| (position_of(z) - sample.position()).norm_squared())
        .collect();

    let r = sensor.measurement_covariance();
    let smoother = WindowSmoother::new(&config.smoother, dt, &r)?;
    let filter = WindowSmoother::with_target_step(
        &config.smoother,
        config.smoother.window - 1,
        dt,
        &r,
    )?;
    let gate = SurveillanceGate::new(&config.surveillance);

    let window = smoother.window();
    let target_step = smoother.target_step();
    let mut smoothed_errors = Vec::new();
    let mut filtered_errors = Vec::new();
    let mut gated_in = 0;

    for (start, zs) in measurements.windows(window).enumerate() {
        let smoothed = position_of(&smoother.smooth(zs)?);
        let filtered = position_of(&filter.smooth(zs)?);

        let truth_at_target = &truth[start + target_step];
        let error = (smoothed - truth_at_target.position()).norm_squared();
        smoothed_errors.push(error);
        filtered_errors.push((filtered - truth[start + window - 1].position()).norm_squared());

        let admitted = gate.admits(&smoothed);
        if admitted {
            gated_in += 1;
        }
        debug!(
            "t={:.2}s: smoothed {:?}, error {:.2} m, gate {}",
            truth_at_target.time,
            smoothed.as_slice(),
            error.sqrt(),
            if admitted { "in" } else { "out" }
        );
    }

    let windows = smoothed_errors.len();
    let summary = RunSummary {
        seed: config.simulation.seed,
        steps: config.simulation.steps,
        window,
        target_step,
        windows,
        raw_rmse: rmse(&raw_errors),
        smoothed_rmse: rmse(&smoothed_errors),
        filtered_rmse: rmse(&filtered_errors),
        predicted_sigma: position_sigma(smoother.covariance()),
        gated_in,
        gated_out: windows - gated_in,
    };

    info!(
        "Smoothed {} windows: RMSE {:.2} m (filtered {:.2} m, raw {:.2} m), {} in gate, {} out",
        summary.windows,
        summary.smoothed_rmse,
        summary.filtered_rmse,
        summary.raw_rmse,
        summary.gated_in,
        summary.gated_out
    );
    Ok(summary)
}
