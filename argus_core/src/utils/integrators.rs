// argus_core/src/utils/integrators.rs

use nalgebra::{DVector, RealField};

/// A fixed-step ODE integrator for `x_dot = f(x, t)`.
pub trait Integrator<T: RealField + Copy> {
    /// Advances `x` from `t0` to `t1` in a single step.
    fn step(
        &self,
        f: &dyn Fn(&DVector<T>, T) -> DVector<T>,
        x: &DVector<T>,
        t0: T,
        t1: T,
    ) -> DVector<T>;
}

/// Forward Euler. First order; mostly useful as a reference in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct Euler;

impl<T: RealField + Copy> Integrator<T> for Euler {
    fn step(
        &self,
        f: &dyn Fn(&DVector<T>, T) -> DVector<T>,
        x: &DVector<T>,
        t0: T,
        t1: T,
    ) -> DVector<T> {
        let h = t1 - t0;
        x + f(x, t0) * h
    }
}

/// Classic fourth-order Runge-Kutta.
#[derive(Debug, Clone, Copy, Default)]
pub struct RK4;

impl<T: RealField + Copy> Integrator<T> for RK4 {
    fn step(
        &self,
        f: &dyn Fn(&DVector<T>, T) -> DVector<T>,
        x: &DVector<T>,
        t0: T,
        t1: T,
    ) -> DVector<T> {
        let h = t1 - t0;
        let two = T::one() + T::one();
        let half_h = h / two;

        let k1 = f(x, t0);
        let k2 = f(&(x + &k1 * half_h), t0 + half_h);
        let k3 = f(&(x + &k2 * half_h), t0 + half_h);
        let k4 = f(&(x + &k3 * h), t1);

        let six = two * (two + T::one());
        x + (k1 + k2 * two + k3 * two + k4) * (h / six)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    // x_dot = -x, exact solution x(t) = x0 * exp(-t)
    fn decay(x: &DVector<f64>, _t: f64) -> DVector<f64> {
        -x
    }

    #[test]
    fn rk4_tracks_exponential_decay() {
        let x0 = DVector::from_vec(vec![1.0, -2.0]);
        let mut x = x0.clone();
        let dt = 0.1;
        for k in 0..10 {
            let t = k as f64 * dt;
            x = RK4.step(&decay, &x, t, t + dt);
        }
        let expected = x0 * (-1.0f64).exp();
        assert_abs_diff_eq!(x, expected, epsilon = 1e-6);
    }

    #[test]
    fn euler_is_exact_for_constant_field() {
        let f = |_x: &DVector<f64>, _t: f64| DVector::from_vec(vec![2.0, 0.5]);
        let x = Euler.step(&f, &DVector::zeros(2), 1.0, 3.0);
        assert_abs_diff_eq!(x, DVector::from_vec(vec![4.0, 1.0]), epsilon = 1e-12);
    }
}
