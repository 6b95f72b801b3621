// argus_sim/src/simulation/sensor.rs

use nalgebra::{DMatrix, DVector, Vector3};
use rand_distr::{Distribution, Normal};

use crate::simulation::core::{error::SimError, prng::SimulationRng};

/// A position sensor with independent Gaussian noise on each axis.
#[derive(Debug, Clone)]
pub struct PositionSensor {
    noise_stddev: f64,
    // Store the noise distribution for efficiency
    noise_dist: Normal<f64>,
}

impl PositionSensor {
    pub fn new(noise_stddev: f64) -> Result<Self, SimError> {
        Ok(Self {
            noise_stddev,
            noise_dist: Normal::new(0.0, noise_stddev)?,
        })
    }

    /// Samples one noisy measurement of `true_position`.
    pub fn measure(&self, true_position: &Vector3<f64>, rng: &mut SimulationRng) -> DVector<f64> {
        DVector::from_fn(3, |i, _| true_position[i] + self.noise_dist.sample(&mut rng.0))
    }

    /// The 3x3 noise covariance the smoother should assume.
    pub fn measurement_covariance(&self) -> DMatrix<f64> {
        DMatrix::identity(3, 3) * self.noise_stddev.powi(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sample_spread_matches_configured_noise() {
        let sensor = PositionSensor::new(2.0).unwrap();
        let mut rng = SimulationRng::from_seed_option(Some(11));
        let truth = Vector3::new(10.0, -5.0, 3.0);

        let samples: Vec<DVector<f64>> =
            (0..4000).map(|_| sensor.measure(&truth, &mut rng)).collect();
        let count = samples.len() as f64;
        for axis in 0..3 {
            let mean = samples.iter().map(|z| z[axis]).sum::<f64>() / count;
            let var = samples.iter().map(|z| (z[axis] - mean).powi(2)).sum::<f64>() / count;
            assert_relative_eq!(mean, truth[axis], epsilon = 0.15);
            assert_relative_eq!(var, 4.0, max_relative = 0.1);
        }
        assert_eq!(sensor.measurement_covariance()[(2, 2)], 4.0);
    }

    #[test]
    fn invalid_noise_is_rejected() {
        assert!(matches!(
            PositionSensor::new(f64::NAN),
            Err(SimError::Noise(_))
        ));
    }
}
