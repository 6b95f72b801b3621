// argus_core/src/models/dynamics/spherical.rs

//! Maneuvering-target motion with the velocity kept in spherical form.
//!
//! The state is `[x, y, z, az, el, v, az_rate, el_rate]`, optionally followed
//! by `v_rate`. The velocity direction uses a right-handed convention:
//! azimuth is measured counter-clockwise from the first axis in the
//! first/second-axis plane and elevation is measured up from that plane, so
//!
//! ```text
//! x_dot = v * cos(el) * cos(az)
//! y_dot = v * cos(el) * sin(az)
//! z_dot = v * sin(el)
//! ```
//!
//! Note the first axis takes `cos(az)` and the second `sin(az)`. This is the
//! X/Y swap relative to the formula that measures azimuth from the second
//! axis, and it must stay this way for the angles to mean what the layout
//! says they mean.
//!
//! The rates are the derivatives of their angle (and of speed when present);
//! every higher-order term is zero.

use crate::error::ArgusError;
use crate::frames::layout::{
    AZIMUTH, AZIMUTH_RATE, ELEVATION, MANEUVER_STATE_DIM, MANEUVER_STATE_DIM_WITH_SPEED_RATE, PX,
    PY, PZ, SPEED,
};
use crate::frames::{layout::maneuver_state_layout, ManeuverVariable};
use crate::models::dynamics::DriftModel;
use crate::types::State;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// How many outputs a caller wants. Each level includes all the ones before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DerivativeOrder {
    Drift,
    Jacobian,
    Hessian,
    TimePartial,
}

/// The tiered result of [`spherical_maneuver_derivatives`].
/// Only the requested prefix is `Some`.
#[derive(Debug, Clone, PartialEq)]
pub struct DriftDerivatives {
    pub drift: DVector<f64>,
    pub jacobian: Option<DMatrix<f64>>,
    /// `hessian[i][(j, k)] = ∂²f_i/∂x_j∂x_k`
    pub hessian: Option<Vec<DMatrix<f64>>>,
    pub time_partial: Option<DVector<f64>>,
}

/// Trig terms shared by all three derivative levels.
struct Heading {
    sin_az: f64,
    cos_az: f64,
    sin_el: f64,
    cos_el: f64,
    speed: f64,
}

impl Heading {
    fn from_state(x: &State) -> Self {
        let (sin_az, cos_az) = x[AZIMUTH].sin_cos();
        let (sin_el, cos_el) = x[ELEVATION].sin_cos();
        Self {
            sin_az,
            cos_az,
            sin_el,
            cos_el,
            speed: x[SPEED],
        }
    }
}

fn validate_dim(state: &State) -> Result<usize, ArgusError> {
    match state.nrows() {
        n @ (MANEUVER_STATE_DIM | MANEUVER_STATE_DIM_WITH_SPEED_RATE) => Ok(n),
        found => Err(ArgusError::InvalidStateDimension { found }),
    }
}

fn drift(n: usize, x: &State, h: &Heading) -> DVector<f64> {
    let mut x_dot = DVector::zeros(n);

    // 1. Position derivative: the velocity rebuilt from (az, el, v).
    x_dot[PX] = h.speed * h.cos_el * h.cos_az;
    x_dot[PY] = h.speed * h.cos_el * h.sin_az;
    x_dot[PZ] = h.speed * h.sin_el;

    // 2. Each rate drives the variable three slots before it.
    for i in AZIMUTH_RATE..n {
        x_dot[i - 3] = x[i];
    }

    // 3. Angular (and speed) accelerations stay zero.
    x_dot
}

fn jacobian(n: usize, h: &Heading) -> DMatrix<f64> {
    let mut a = DMatrix::zeros(n, n);
    let v = h.speed;

    // d(velocity)/d(az)
    a[(PX, AZIMUTH)] = -v * h.cos_el * h.sin_az;
    a[(PY, AZIMUTH)] = v * h.cos_el * h.cos_az;

    // d(velocity)/d(el)
    a[(PX, ELEVATION)] = -v * h.sin_el * h.cos_az;
    a[(PY, ELEVATION)] = -v * h.sin_el * h.sin_az;
    a[(PZ, ELEVATION)] = v * h.cos_el;

    // d(velocity)/d(v)
    a[(PX, SPEED)] = h.cos_el * h.cos_az;
    a[(PY, SPEED)] = h.cos_el * h.sin_az;
    a[(PZ, SPEED)] = h.sin_el;

    // Rate pass-through block.
    for i in AZIMUTH_RATE..n {
        a[(i - 3, i)] = 1.0;
    }

    a
}

fn set_symmetric(m: &mut DMatrix<f64>, j: usize, k: usize, value: f64) {
    m[(j, k)] = value;
    m[(k, j)] = value;
}

fn hessian(n: usize, h: &Heading) -> Vec<DMatrix<f64>> {
    let mut hess = vec![DMatrix::zeros(n, n); n];
    let v = h.speed;

    // x_dot = v cos(el) cos(az)
    let hx = &mut hess[PX];
    hx[(AZIMUTH, AZIMUTH)] = -v * h.cos_el * h.cos_az;
    set_symmetric(hx, AZIMUTH, ELEVATION, v * h.sin_el * h.sin_az);
    set_symmetric(hx, AZIMUTH, SPEED, -h.cos_el * h.sin_az);
    hx[(ELEVATION, ELEVATION)] = -v * h.cos_el * h.cos_az;
    set_symmetric(hx, ELEVATION, SPEED, -h.sin_el * h.cos_az);

    // y_dot = v cos(el) sin(az)
    let hy = &mut hess[PY];
    hy[(AZIMUTH, AZIMUTH)] = -v * h.cos_el * h.sin_az;
    set_symmetric(hy, AZIMUTH, ELEVATION, -v * h.sin_el * h.cos_az);
    set_symmetric(hy, AZIMUTH, SPEED, h.cos_el * h.cos_az);
    hy[(ELEVATION, ELEVATION)] = -v * h.cos_el * h.sin_az;
    set_symmetric(hy, ELEVATION, SPEED, -h.sin_el * h.sin_az);

    // z_dot = v sin(el)
    let hz = &mut hess[PZ];
    hz[(ELEVATION, ELEVATION)] = -v * h.sin_el;
    set_symmetric(hz, ELEVATION, SPEED, h.cos_el);

    hess
}

/// Evaluates the spherical maneuvering drift and, depending on `order`, its
/// Jacobian, Hessian and time partial.
///
/// # Errors
/// [`ArgusError::InvalidStateDimension`] if `state` does not have 8 or 9 entries.
pub fn spherical_maneuver_derivatives(
    state: &State,
    order: DerivativeOrder,
) -> Result<DriftDerivatives, ArgusError> {
    let n = validate_dim(state)?;
    let heading = Heading::from_state(state);

    Ok(DriftDerivatives {
        drift: drift(n, state, &heading),
        jacobian: (order >= DerivativeOrder::Jacobian).then(|| jacobian(n, &heading)),
        hessian: (order >= DerivativeOrder::Hessian).then(|| hessian(n, &heading)),
        // The field does not depend on time.
        time_partial: (order >= DerivativeOrder::TimePartial).then(|| DVector::zeros(n)),
    })
}

pub fn spherical_drift(state: &State) -> Result<DVector<f64>, ArgusError> {
    let n = validate_dim(state)?;
    Ok(drift(n, state, &Heading::from_state(state)))
}

pub fn spherical_drift_with_jacobian(
    state: &State,
) -> Result<(DVector<f64>, DMatrix<f64>), ArgusError> {
    let n = validate_dim(state)?;
    let heading = Heading::from_state(state);
    Ok((drift(n, state, &heading), jacobian(n, &heading)))
}

pub fn spherical_drift_with_hessian(
    state: &State,
) -> Result<(DVector<f64>, DMatrix<f64>, Vec<DMatrix<f64>>), ArgusError> {
    let n = validate_dim(state)?;
    let heading = Heading::from_state(state);
    Ok((
        drift(n, state, &heading),
        jacobian(n, &heading),
        hessian(n, &heading),
    ))
}

/// The spherical maneuvering model as a [`DriftModel`], so it can be
/// propagated with an integrator or handed to generic estimation code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SphericalManeuverModel {
    /// Carry a speed rate as the ninth state.
    #[serde(default)]
    pub with_speed_rate: bool,
}

impl SphericalManeuverModel {
    pub fn new(with_speed_rate: bool) -> Self {
        Self { with_speed_rate }
    }

    /// Picks the variant matching the length of `state`.
    pub fn for_state(state: &State) -> Result<Self, ArgusError> {
        let n = validate_dim(state)?;
        Ok(Self::new(n == MANEUVER_STATE_DIM_WITH_SPEED_RATE))
    }

    pub fn get_state_layout(&self) -> Vec<ManeuverVariable> {
        maneuver_state_layout(self.with_speed_rate)
    }
}

impl DriftModel for SphericalManeuverModel {
    fn get_state_dim(&self) -> usize {
        if self.with_speed_rate {
            MANEUVER_STATE_DIM_WITH_SPEED_RATE
        } else {
            MANEUVER_STATE_DIM
        }
    }

    fn get_derivatives(&self, x: &State, _t: f64) -> State {
        drift(self.get_state_dim(), x, &Heading::from_state(x))
    }

    fn calculate_jacobian(&self, x: &State, _t: f64) -> DMatrix<f64> {
        jacobian(self.get_state_dim(), &Heading::from_state(x))
    }

    fn calculate_hessian(&self, x: &State, _t: f64) -> Vec<DMatrix<f64>> {
        hessian(self.get_state_dim(), &Heading::from_state(x))
    }

    fn calculate_time_partial(&self, _x: &State, _t: f64) -> State {
        DVector::zeros(self.get_state_dim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::layout::{ELEVATION_RATE, SPEED_RATE};
    use crate::utils::integrators::RK4;
    use crate::utils::numerics::central_difference_jacobian;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use std::f64::consts::PI;

    fn random_state(rng: &mut ChaCha8Rng, n: usize) -> State {
        let mut x = DVector::zeros(n);
        for i in 0..3 {
            x[i] = rng.gen_range(-1000.0..1000.0);
        }
        x[AZIMUTH] = rng.gen_range(-PI..PI);
        x[ELEVATION] = rng.gen_range(-PI / 2.0..PI / 2.0);
        x[SPEED] = rng.gen_range(1.0..300.0);
        for i in AZIMUTH_RATE..n {
            x[i] = rng.gen_range(-0.5..0.5);
        }
        x
    }

    #[test]
    fn velocity_norm_equals_speed() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for n in [8, 9] {
            for _ in 0..50 {
                let x = random_state(&mut rng, n);
                let f = spherical_drift(&x).unwrap();
                let vel = f.fixed_rows::<3>(0);
                assert_relative_eq!(vel.norm_squared(), x[SPEED] * x[SPEED], max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn velocity_components_follow_axis_convention() {
        let az = 0.7;
        let el = 0.3;
        let x = DVector::from_vec(vec![0.0, 0.0, 0.0, az, el, 10.0, 0.0, 0.0]);
        let f = spherical_drift(&x).unwrap();

        // y/x = tan(az), z / |xy| = tan(el)
        assert_relative_eq!(f[PY] / f[PX], az.tan(), max_relative = 1e-12);
        let horizontal = (f[PX] * f[PX] + f[PY] * f[PY]).sqrt();
        assert_relative_eq!(f[PZ] / horizontal, el.tan(), max_relative = 1e-12);

        // Zero azimuth and elevation points along the first axis.
        let along_x = DVector::from_vec(vec![0.0, 0.0, 0.0, 0.0, 0.0, 5.0, 0.0, 0.0]);
        let f = spherical_drift(&along_x).unwrap();
        assert_abs_diff_eq!(f[PX], 5.0, epsilon = 1e-15);
        assert_abs_diff_eq!(f[PY], 0.0, epsilon = 1e-15);

        // A quarter turn of azimuth points along the second axis.
        let along_y = DVector::from_vec(vec![0.0, 0.0, 0.0, PI / 2.0, 0.0, 5.0, 0.0, 0.0]);
        let f = spherical_drift(&along_y).unwrap();
        assert_abs_diff_eq!(f[PX], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(f[PY], 5.0, epsilon = 1e-12);
    }

    #[test]
    fn rates_pass_through_and_accelerations_are_zero() {
        let x8 = DVector::from_vec(vec![1.0, 2.0, 3.0, 0.1, 0.2, 50.0, 0.01, -0.02]);
        let f8 = spherical_drift(&x8).unwrap();
        assert_eq!(f8[AZIMUTH], 0.01);
        assert_eq!(f8[ELEVATION], -0.02);
        assert_eq!(f8[SPEED], 0.0);
        assert_eq!(f8[AZIMUTH_RATE], 0.0);
        assert_eq!(f8[ELEVATION_RATE], 0.0);

        let x9 = DVector::from_vec(vec![1.0, 2.0, 3.0, 0.1, 0.2, 50.0, 0.01, -0.02, 1.5]);
        let f9 = spherical_drift(&x9).unwrap();
        assert_eq!(f9[SPEED], 1.5);
        assert_eq!(f9[SPEED_RATE], 0.0);
    }

    #[test]
    fn jacobian_matches_finite_differences() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for n in [8, 9] {
            for _ in 0..25 {
                let x = random_state(&mut rng, n);
                let (_, a) = spherical_drift_with_jacobian(&x).unwrap();
                let numeric =
                    central_difference_jacobian(|xp| spherical_drift(xp).unwrap(), &x, 1e-6);
                assert_abs_diff_eq!(a, numeric, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn hessian_is_symmetric_and_matches_jacobian_differences() {
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        for n in [8, 9] {
            for _ in 0..25 {
                let x = random_state(&mut rng, n);
                let (_, _, hess) = spherical_drift_with_hessian(&x).unwrap();
                assert_eq!(hess.len(), n);
                for h_i in &hess {
                    assert_eq!(h_i, &h_i.transpose());
                }

                // Column k of the differenced Jacobian row i is ∂²f_i/∂x_j∂x_k.
                for i in 0..3 {
                    let numeric = central_difference_jacobian(
                        |xp| {
                            let (_, a) = spherical_drift_with_jacobian(xp).unwrap();
                            a.row(i).transpose()
                        },
                        &x,
                        1e-6,
                    );
                    assert_abs_diff_eq!(hess[i], numeric, epsilon = 1e-4);
                }
                for h_i in hess.iter().skip(3) {
                    assert_eq!(h_i.norm(), 0.0);
                }
            }
        }
    }

    #[test]
    fn time_partial_is_exactly_zero() {
        let x = DVector::from_vec(vec![1.0, 2.0, 3.0, 0.4, -0.2, 80.0, 0.1, 0.0, 2.0]);
        let out = spherical_maneuver_derivatives(&x, DerivativeOrder::TimePartial).unwrap();
        assert_eq!(out.time_partial, Some(DVector::zeros(9)));
    }

    #[test]
    fn outputs_are_tiered_by_order() {
        let x = DVector::from_vec(vec![0.0, 0.0, 0.0, 0.4, -0.2, 80.0, 0.1, 0.0]);

        let drift_only = spherical_maneuver_derivatives(&x, DerivativeOrder::Drift).unwrap();
        assert!(drift_only.jacobian.is_none());
        assert!(drift_only.hessian.is_none());
        assert!(drift_only.time_partial.is_none());

        let with_jac = spherical_maneuver_derivatives(&x, DerivativeOrder::Jacobian).unwrap();
        assert!(with_jac.jacobian.is_some());
        assert!(with_jac.hessian.is_none());

        let with_hess = spherical_maneuver_derivatives(&x, DerivativeOrder::Hessian).unwrap();
        assert!(with_hess.hessian.is_some());
        assert!(with_hess.time_partial.is_none());
        assert_eq!(with_hess.drift, drift_only.drift);
        assert_eq!(with_hess.jacobian, with_jac.jacobian);
    }

    #[test]
    fn rejects_states_of_the_wrong_length() {
        for n in [0, 7, 10] {
            let x = DVector::zeros(n);
            assert_eq!(
                spherical_maneuver_derivatives(&x, DerivativeOrder::Drift),
                Err(ArgusError::InvalidStateDimension { found: n })
            );
            assert!(spherical_drift(&x).is_err());
            assert!(SphericalManeuverModel::for_state(&x).is_err());
        }
    }

    #[test]
    fn model_agrees_with_free_functions() {
        let x = DVector::from_vec(vec![5.0, -3.0, 1.0, 1.1, 0.2, 30.0, 0.05, 0.01, -0.5]);
        let model = SphericalManeuverModel::for_state(&x).unwrap();
        assert!(model.with_speed_rate);
        assert_eq!(model.get_state_layout().len(), model.get_state_dim());

        let (f, a, h) = spherical_drift_with_hessian(&x).unwrap();
        assert_eq!(model.get_derivatives(&x, 0.0), f);
        assert_eq!(model.calculate_jacobian(&x, 0.0), a);
        assert_eq!(model.calculate_hessian(&x, 0.0), h);
        assert_eq!(model.calculate_time_partial(&x, 3.0), DVector::zeros(9));
    }

    #[test]
    fn outputs_follow_the_model_dimension_not_the_input_length() {
        // An eight-state model reads only the first eight entries of a longer state.
        let x9 = DVector::from_vec(vec![5.0, -3.0, 1.0, 1.1, 0.2, 30.0, 0.05, 0.01, -0.5]);
        let x8 = x9.rows(0, MANEUVER_STATE_DIM).into_owned();
        let model = SphericalManeuverModel::new(false);

        let f = model.get_derivatives(&x9, 0.0);
        assert_eq!(f.nrows(), model.get_state_dim());
        assert_eq!(f, spherical_drift(&x8).unwrap());
        assert_eq!(model.calculate_jacobian(&x9, 0.0).shape(), (8, 8));
        assert_eq!(model.calculate_hessian(&x9, 0.0).len(), 8);
        assert_eq!(model.calculate_time_partial(&x9, 0.0).nrows(), 8);
    }

    #[test]
    fn coordinated_turn_closes_a_circle() {
        // Level flight with a constant azimuth rate traces a circle of
        // radius v / omega and returns to the start after one period.
        let omega = 0.1;
        let speed = 20.0;
        let model = SphericalManeuverModel::new(false);
        let x0 = DVector::from_vec(vec![0.0, 0.0, 100.0, 0.0, 0.0, speed, omega, 0.0]);

        let period = 2.0 * PI / omega;
        let steps = 2000;
        let dt = period / steps as f64;
        let mut x = x0.clone();
        for k in 0..steps {
            x = model.propagate(&x, k as f64 * dt, dt, &RK4).unwrap();
        }

        assert_abs_diff_eq!(x[PX], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(x[PY], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(x[PZ], 100.0, epsilon = 1e-9);
        assert_relative_eq!(x[AZIMUTH], 2.0 * PI, max_relative = 1e-12);

        // Halfway round, the target sits on the far side of the circle.
        let mut x = x0;
        for k in 0..steps / 2 {
            x = model.propagate(&x, k as f64 * dt, dt, &RK4).unwrap();
        }
        assert_abs_diff_eq!(x[PY], 2.0 * speed / omega, epsilon = 1e-6);
    }
}
