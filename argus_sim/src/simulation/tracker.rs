// argus_sim/src/simulation/tracker.rs

//! Sliding-window position smoothing and surveillance gating.

use argus_core::estimation::fir_smoother::{
    kalman_fir_smoother_coeffs, FirModelSequence, FirSmootherCoefficients,
};
use argus_core::geometry::bounds_intersect_ball;
use log::debug;
use nalgebra::{DMatrix, DVector, Vector3};

use crate::simulation::config::{Smoother, Surveillance};
use crate::simulation::core::error::SimError;

/// Dimension of the `[px, py, pz, vx, vy, vz]` tracking state.
pub const CV_STATE_DIM: usize = 6;

/// The nearly-constant-velocity (white acceleration) model, discretized at `dt`.
pub fn constant_velocity_model(
    dt: f64,
    process_noise_intensity: f64,
    measurement_covariance: &DMatrix<f64>,
    window: usize,
) -> FirModelSequence {
    let mut f = DMatrix::identity(CV_STATE_DIM, CV_STATE_DIM);
    let mut q = DMatrix::zeros(CV_STATE_DIM, CV_STATE_DIM);
    let q_pp = process_noise_intensity * dt.powi(3) / 3.0;
    let q_pv = process_noise_intensity * dt.powi(2) / 2.0;
    let q_vv = process_noise_intensity * dt;
    for axis in 0..3 {
        let vel = axis + 3;
        f[(axis, vel)] = dt;
        q[(axis, axis)] = q_pp;
        q[(axis, vel)] = q_pv;
        q[(vel, axis)] = q_pv;
        q[(vel, vel)] = q_vv;
    }

    // Positions only.
    let h = DMatrix::identity(3, CV_STATE_DIM);

    FirModelSequence::time_invariant(&h, &f, measurement_covariance, &q, window)
}

/// A fixed-lag smoother over a sliding window of position measurements.
///
/// The model is time invariant, so one set of coefficients serves every
/// window position.
#[derive(Debug, Clone)]
pub struct WindowSmoother {
    coefficients: FirSmootherCoefficients,
}

impl WindowSmoother {
    pub fn new(
        config: &Smoother,
        dt: f64,
        measurement_covariance: &DMatrix<f64>,
    ) -> Result<Self, SimError> {
        let target_step = config.resolved_target_step();
        Self::with_target_step(config, target_step, dt, measurement_covariance)
    }

    /// Same model as [`WindowSmoother::new`], estimating `target_step` instead.
    pub fn with_target_step(
        config: &Smoother,
        target_step: usize,
        dt: f64,
        measurement_covariance: &DMatrix<f64>,
    ) -> Result<Self, SimError> {
        let model = constant_velocity_model(
            dt,
            config.process_noise_intensity,
            measurement_covariance,
            config.window,
        );
        let coefficients = kalman_fir_smoother_coeffs(&model.as_window(), target_step)?;
        debug!(
            "FIR coefficients for step {} of {}: position sigma {:.3}",
            target_step,
            config.window,
            position_sigma(&coefficients.covariance)
        );
        Ok(Self { coefficients })
    }

    pub fn window(&self) -> usize {
        self.coefficients.measurement_coeffs.len()
    }

    pub fn target_step(&self) -> usize {
        self.coefficients.target_step
    }

    pub fn covariance(&self) -> &DMatrix<f64> {
        &self.coefficients.covariance
    }

    /// Estimates the CV state at the target step from exactly [`Self::window`]
    /// measurements.
    pub fn smooth(&self, measurements: &[DVector<f64>]) -> Result<DVector<f64>, SimError> {
        Ok(self.coefficients.estimate(measurements, &[])?)
    }
}

/// Root of the summed position variances.
pub fn position_sigma(covariance: &DMatrix<f64>) -> f64 {
    (0..3).map(|i| covariance[(i, i)]).sum::<f64>().sqrt()
}

/// Decides whether a position falls within `gate_radius` of the surveillance region.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveillanceGate {
    min: [f64; 3],
    max: [f64; 3],
    squared_radius: f64,
}

impl SurveillanceGate {
    pub fn new(config: &Surveillance) -> Self {
        Self {
            min: config.min,
            max: config.max,
            squared_radius: config.gate_radius * config.gate_radius,
        }
    }

    pub fn admits(&self, position: &Vector3<f64>) -> bool {
        bounds_intersect_ball(position.as_slice(), self.squared_radius, &self.min, &self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn smoother_config(window: usize, target_step: Option<usize>) -> Smoother {
        Smoother {
            window,
            target_step,
            process_noise_intensity: 1.0,
        }
    }

    #[test]
    fn model_has_position_velocity_coupling() {
        let r = DMatrix::identity(3, 3);
        let model = constant_velocity_model(0.5, 2.0, &r, 4);
        assert_eq!(model.measurement_matrices.len(), 4);
        assert_eq!(model.transition_matrices.len(), 3);

        let f = &model.transition_matrices[0];
        assert_eq!(f[(0, 3)], 0.5);
        assert_eq!(f[(3, 0)], 0.0);
        let q = &model.process_noise_covariances[0];
        assert_abs_diff_eq!(q[(1, 1)], 2.0 * 0.125 / 3.0);
        assert_abs_diff_eq!(q[(1, 4)], 2.0 * 0.25 / 2.0);
        assert_abs_diff_eq!(q[(4, 4)], 1.0);
        assert_eq!(*q, q.transpose());
    }

    #[test]
    fn noise_free_constant_velocity_track_is_recovered() {
        let dt = 0.5;
        let start = Vector3::new(100.0, -40.0, 900.0);
        let velocity = Vector3::new(12.0, 3.0, -1.5);
        let r = DMatrix::identity(3, 3) * 25.0;

        for target in [0, 3, 6] {
            let smoother =
                WindowSmoother::with_target_step(&smoother_config(7, None), target, dt, &r)
                    .unwrap();
            let measurements: Vec<DVector<f64>> = (0..7)
                .map(|k| {
                    let p = start + velocity * (k as f64 * dt);
                    DVector::from_column_slice(p.as_slice())
                })
                .collect();

            let x = smoother.smooth(&measurements).unwrap();
            let expected = start + velocity * (target as f64 * dt);
            for axis in 0..3 {
                assert_abs_diff_eq!(x[axis], expected[axis], epsilon = 1e-6);
                assert_abs_diff_eq!(x[axis + 3], velocity[axis], epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn centred_estimate_is_tighter_than_the_window_edge() {
        let r = DMatrix::identity(3, 3) * 100.0;
        let config = smoother_config(9, None);
        let centre = WindowSmoother::new(&config, 1.0, &r).unwrap();
        let edge = WindowSmoother::with_target_step(&config, 8, 1.0, &r).unwrap();

        assert_eq!(centre.target_step(), 4);
        assert_eq!(centre.window(), 9);
        assert!(position_sigma(centre.covariance()) < position_sigma(edge.covariance()));
        // Both beat a single raw measurement.
        assert!(position_sigma(edge.covariance()) < 10.0 * 3f64.sqrt());
    }

    #[test]
    fn wrong_number_of_measurements_is_rejected() {
        let r = DMatrix::identity(3, 3);
        let smoother = WindowSmoother::new(&smoother_config(3, None), 1.0, &r).unwrap();
        let err = smoother.smooth(&[DVector::zeros(3), DVector::zeros(3)]).unwrap_err();
        assert!(matches!(err, SimError::Core(_)));
    }

    #[test]
    fn gate_admits_points_near_the_region() {
        let gate = SurveillanceGate::new(&Surveillance {
            min: [0.0, 0.0, 0.0],
            max: [100.0, 100.0, 50.0],
            gate_radius: 10.0,
        });
        assert!(gate.admits(&Vector3::new(50.0, 50.0, 25.0)));
        assert!(gate.admits(&Vector3::new(105.0, 50.0, 25.0)));
        // Exactly one gate radius away only touches the region.
        assert!(!gate.admits(&Vector3::new(110.0, 50.0, 25.0)));
        assert!(!gate.admits(&Vector3::new(108.0, 108.0, 25.0)));
    }
}
