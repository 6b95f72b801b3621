// argus_core/src/utils/numerics.rs

use nalgebra::{DMatrix, DVector};

/// Central-difference approximation of `∂f/∂x`: `(f(x+h) - f(x-h)) / 2h`,
/// one column per state component.
pub fn central_difference_jacobian<F>(f: F, x: &DVector<f64>, epsilon: f64) -> DMatrix<f64>
where
    F: Fn(&DVector<f64>) -> DVector<f64>,
{
    let rows = f(x).nrows();
    let mut jac = DMatrix::zeros(rows, x.nrows());

    for j in 0..x.nrows() {
        let mut x_plus = x.clone();
        let mut x_minus = x.clone();
        x_plus[j] += epsilon;
        x_minus[j] -= epsilon;

        let derivative_column = (f(&x_plus) - f(&x_minus)) / (2.0 * epsilon);
        jac.column_mut(j).copy_from(&derivative_column);
    }

    jac
}

/// Forces exact symmetry on a matrix that is symmetric up to round-off.
pub fn symmetrize(m: &DMatrix<f64>) -> DMatrix<f64> {
    (m + m.transpose()) * 0.5
}
