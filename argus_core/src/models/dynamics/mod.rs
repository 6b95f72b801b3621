// argus_core/src/models/dynamics/mod.rs

use crate::error::ArgusError;
use crate::types::State;
use crate::utils::integrators::Integrator;
use crate::utils::numerics::central_difference_jacobian;
use dyn_clone::DynClone;
use nalgebra::{DMatrix, DVector};
use std::fmt::Debug;

/// Step used by the finite-difference fallbacks below.
const FD_EPSILON: f64 = 1e-6;
/// Outer step for the Hessian, which differences an already-differenced Jacobian.
const FD_HESSIAN_EPSILON: f64 = 1e-4;

/// A continuous-time, uncontrolled dynamic model `x_dot = f(x, t)`.
///
/// Implementors must provide the drift itself. The Jacobian, Hessian and
/// time partial have finite-difference defaults; models with closed-form
/// derivatives should override them.
///
/// The derivative methods expect a state of length [`DriftModel::get_state_dim`];
/// use [`DriftModel::check_state`] first when the input comes from outside.
pub trait DriftModel: DynClone + Debug + Send + Sync {
    /// Returns the number of states (the length of `x`).
    fn get_state_dim(&self) -> usize;

    /// Computes the time derivative of the state vector: `x_dot = f(x, t)`.
    fn get_derivatives(&self, x: &State, t: f64) -> State;

    /// The Jacobian `A = ∂f/∂x` (an NxN matrix).
    fn calculate_jacobian(&self, x: &State, t: f64) -> DMatrix<f64> {
        central_difference_jacobian(|xp| self.get_derivatives(xp, t), x, FD_EPSILON)
    }

    /// The Hessian of every drift component. Entry `i` holds
    /// `∂²f_i/∂x_j∂x_k` at `(j, k)`.
    fn calculate_hessian(&self, x: &State, t: f64) -> Vec<DMatrix<f64>> {
        let n = self.get_state_dim();
        // Column k of the differenced Jacobian stacks ∂/∂x_k of every entry of A.
        let stacked = central_difference_jacobian(
            |xp| {
                let a = self.calculate_jacobian(xp, t);
                DVector::from_column_slice(a.as_slice())
            },
            x,
            FD_HESSIAN_EPSILON,
        );

        (0..n)
            .map(|i| {
                DMatrix::from_fn(n, n, |j, k| {
                    // A is column-major: entry (i, j) lives at j * n + i.
                    stacked[(j * n + i, k)]
                })
            })
            .collect()
    }

    /// The partial derivative `∂f/∂t`.
    fn calculate_time_partial(&self, x: &State, t: f64) -> State {
        let forward = self.get_derivatives(x, t + FD_EPSILON);
        let backward = self.get_derivatives(x, t - FD_EPSILON);
        (forward - backward) / (2.0 * FD_EPSILON)
    }

    /// Verifies that `x` has the dimension this model expects.
    fn check_state(&self, x: &State) -> Result<(), ArgusError> {
        if x.nrows() != self.get_state_dim() {
            return Err(ArgusError::length_mismatch(
                "drift model state",
                self.get_state_dim(),
                x.nrows(),
            ));
        }
        Ok(())
    }

    /// Propagates the state forward in time using a numerical integrator.
    ///
    /// # Arguments
    /// * `x`: Current state vector.
    /// * `t`: Current time.
    /// * `dt`: Time step duration. Must be non-negative.
    /// * `integrator`: The integration scheme (e.g., `RK4`).
    fn propagate(
        &self,
        x: &State,
        t: f64,
        dt: f64,
        integrator: &dyn Integrator<f64>,
    ) -> Result<State, ArgusError> {
        assert!(dt >= 0.0, "DriftModel::propagate: dt cannot be negative");
        self.check_state(x)?;

        let func = |func_x: &State, func_t: f64| -> State { self.get_derivatives(func_x, func_t) };
        Ok(integrator.step(&func, x, t, t + dt))
    }
}

// This macro automatically generates the implementation of `Clone` for `Box<dyn DriftModel>`.
dyn_clone::clone_trait_object!(DriftModel);

pub mod spherical;
