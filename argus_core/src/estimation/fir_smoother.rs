// argus_core/src/estimation/fir_smoother.rs

//! Closed-form coefficients of the Kalman FIR smoother.
//!
//! Model, for a window of `N` steps:
//!
//! ```text
//! x_{k+1} = F_k x_k + u_k + w_k,   w_k ~ N(0, Q_k),   k = 0..N-1
//! z_k     = H_k x_k + v_k,         v_k ~ N(0, R_k),   k = 0..N
//! ```
//!
//! There is no prior on the initial state. The smoothed estimate at the
//! target step `t` is a fixed linear combination of the window's data:
//!
//! ```text
//! x_t = sum_j A_j z_j + sum_{j < N-1} B_j u_j
//! ```
//!
//! The coefficients come from a forward information filter over `0..t` and a
//! backward one over `N-1..t`. Matrix products along each pass do not commute,
//! so the accumulation order below is load-bearing.

use crate::error::ArgusError;
use crate::types::{Control, State};
use crate::utils::numerics::symmetrize;
use log::{debug, trace};
use nalgebra::{Cholesky, DMatrix, DVector};

/// Borrowed model sequences for one smoothing window.
///
/// `measurement_matrices` and `measurement_covariances` have one entry per
/// step. `transition_matrices` and `process_noise_covariances` describe the
/// transitions between consecutive steps and have one entry fewer.
#[derive(Debug, Clone, Copy)]
pub struct FirWindow<'a> {
    pub measurement_matrices: &'a [DMatrix<f64>],
    pub transition_matrices: &'a [DMatrix<f64>],
    pub measurement_covariances: &'a [DMatrix<f64>],
    pub process_noise_covariances: &'a [DMatrix<f64>],
}

impl<'a> FirWindow<'a> {
    /// Number of steps in the window.
    pub fn len(&self) -> usize {
        self.measurement_matrices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measurement_matrices.is_empty()
    }

    /// Checks that every sequence has the right length and every matrix the
    /// right shape. Returns the state dimension.
    pub fn validate(&self) -> Result<usize, ArgusError> {
        let len = self.len();
        if len == 0 {
            return Err(ArgusError::EmptyWindow);
        }
        if self.measurement_covariances.len() != len {
            return Err(ArgusError::length_mismatch(
                "measurement covariance sequence",
                len,
                self.measurement_covariances.len(),
            ));
        }
        if self.transition_matrices.len() != len - 1 {
            return Err(ArgusError::length_mismatch(
                "transition matrix sequence",
                len - 1,
                self.transition_matrices.len(),
            ));
        }
        if self.process_noise_covariances.len() != len - 1 {
            return Err(ArgusError::length_mismatch(
                "process noise sequence",
                len - 1,
                self.process_noise_covariances.len(),
            ));
        }

        let n = self.measurement_matrices[0].ncols();
        for (h, r) in self
            .measurement_matrices
            .iter()
            .zip(self.measurement_covariances)
        {
            let m = h.nrows();
            if h.ncols() != n {
                return Err(ArgusError::shape_mismatch(
                    "measurement matrix",
                    (m, n),
                    h.shape(),
                ));
            }
            if r.shape() != (m, m) {
                return Err(ArgusError::shape_mismatch(
                    "measurement covariance",
                    (m, m),
                    r.shape(),
                ));
            }
        }
        for (f, q) in self
            .transition_matrices
            .iter()
            .zip(self.process_noise_covariances)
        {
            if f.shape() != (n, n) {
                return Err(ArgusError::shape_mismatch("transition matrix", (n, n), f.shape()));
            }
            if q.shape() != (n, n) {
                return Err(ArgusError::shape_mismatch("process noise", (n, n), q.shape()));
            }
        }

        Ok(n)
    }
}

/// Owned model sequences, for callers that build the window themselves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FirModelSequence {
    pub measurement_matrices: Vec<DMatrix<f64>>,
    pub transition_matrices: Vec<DMatrix<f64>>,
    pub measurement_covariances: Vec<DMatrix<f64>>,
    pub process_noise_covariances: Vec<DMatrix<f64>>,
}

impl FirModelSequence {
    /// Repeats one time-invariant model over a window of `len` steps.
    pub fn time_invariant(
        h: &DMatrix<f64>,
        f: &DMatrix<f64>,
        r: &DMatrix<f64>,
        q: &DMatrix<f64>,
        len: usize,
    ) -> Self {
        let transitions = len.saturating_sub(1);
        Self {
            measurement_matrices: vec![h.clone(); len],
            transition_matrices: vec![f.clone(); transitions],
            measurement_covariances: vec![r.clone(); len],
            process_noise_covariances: vec![q.clone(); transitions],
        }
    }

    pub fn as_window(&self) -> FirWindow<'_> {
        FirWindow {
            measurement_matrices: &self.measurement_matrices,
            transition_matrices: &self.transition_matrices,
            measurement_covariances: &self.measurement_covariances,
            process_noise_covariances: &self.process_noise_covariances,
        }
    }
}

/// The output of [`kalman_fir_smoother_coeffs`].
#[derive(Debug, Clone, PartialEq)]
pub struct FirSmootherCoefficients {
    pub target_step: usize,
    /// `A_j`, one `n x m_j` matrix per step.
    pub measurement_coeffs: Vec<DMatrix<f64>>,
    /// `B_j`, one `n x n` matrix per transition. The last step has none.
    pub control_coeffs: Vec<DMatrix<f64>>,
    /// Error covariance of the estimate at the target step.
    pub covariance: DMatrix<f64>,
}

impl FirSmootherCoefficients {
    /// Evaluates `sum_j A_j z_j + sum_j B_j u_j`.
    ///
    /// `controls` may be empty (no control input), have one entry per
    /// transition, or one entry per step; a control at the last step drives
    /// nothing inside the window and is ignored.
    pub fn estimate(
        &self,
        measurements: &[DVector<f64>],
        controls: &[Control],
    ) -> Result<State, ArgusError> {
        let len = self.measurement_coeffs.len();
        if measurements.len() != len {
            return Err(ArgusError::length_mismatch(
                "measurement sequence",
                len,
                measurements.len(),
            ));
        }
        let transitions = len.saturating_sub(1);
        if !controls.is_empty() && controls.len() != transitions && controls.len() != len {
            return Err(ArgusError::length_mismatch(
                "control sequence",
                transitions,
                controls.len(),
            ));
        }

        let n = self.covariance.nrows();
        let mut x = DVector::zeros(n);
        for (j, (a, z)) in self.measurement_coeffs.iter().zip(measurements).enumerate() {
            if a.ncols() != z.nrows() {
                return Err(ArgusError::DimensionMismatch {
                    what: "measurement",
                    expected: format!("{} rows at step {}", a.ncols(), j),
                    found: z.nrows().to_string(),
                });
            }
            x += a * z;
        }
        for (b, u) in self.control_coeffs.iter().zip(controls) {
            if u.nrows() != n {
                return Err(ArgusError::length_mismatch("control input", n, u.nrows()));
            }
            x += b * u;
        }

        Ok(x)
    }
}

fn invert(m: DMatrix<f64>, what: &'static str, step: usize) -> Result<DMatrix<f64>, ArgusError> {
    m.try_inverse()
        .ok_or(ArgusError::SingularMatrix { what, step })
}

/// Computes the Kalman FIR smoother coefficients for `target_step` of the
/// window. Steps are zero-based: the first step is `0`, the last is
/// `window.len() - 1`.
///
/// # Errors
/// * [`ArgusError::EmptyWindow`] / [`ArgusError::DimensionMismatch`] for
///   malformed model sequences.
/// * [`ArgusError::TargetStepOutOfRange`] unless `target_step < window.len()`.
///   A one-based index equal to the window length is out of range.
/// * [`ArgusError::SingularMatrix`] if a measurement covariance, a transition
///   matrix or an intermediate combination cannot be inverted, or if the
///   window does not make the target state observable.
pub fn kalman_fir_smoother_coeffs(
    window: &FirWindow,
    target_step: usize,
) -> Result<FirSmootherCoefficients, ArgusError> {
    let n = window.validate()?;
    let len = window.len();
    let t = target_step;
    if t >= len {
        return Err(ArgusError::TargetStepOutOfRange { step: t, len });
    }
    debug!(
        "FIR smoother coefficients: window of {} steps, state dim {}, target step {}",
        len, n, t
    );

    let h = window.measurement_matrices;
    let f = window.transition_matrices;
    let q = window.process_noise_covariances;
    let identity = DMatrix::<f64>::identity(n, n);

    // H_k^T R_k^-1, and the information each measurement contributes.
    let weighted_h = h
        .iter()
        .zip(window.measurement_covariances)
        .enumerate()
        .map(|(k, (h_k, r_k))| {
            let r_inv = invert(r_k.clone(), "measurement noise covariance", k)?;
            Ok(h_k.transpose() * r_inv)
        })
        .collect::<Result<Vec<_>, ArgusError>>()?;
    let info_increment: Vec<DMatrix<f64>> = weighted_h
        .iter()
        .zip(h)
        .map(|(wh, h_k)| wh * h_k)
        .collect();
    let f_inv = f
        .iter()
        .enumerate()
        .map(|(k, f_k)| invert(f_k.clone(), "transition matrix", k))
        .collect::<Result<Vec<_>, ArgusError>>()?;

    // --- 1. Forward pass over 0..t ---
    // forward_gain[k] = G_k = (F_k^T + I_k F_k^-1 Q_k)^-1
    // forward_pred[k] = Ipred_{k+1} = G_k I_k F_k^-1
    let mut forward_gain = Vec::with_capacity(t);
    let mut forward_pred = Vec::with_capacity(t);
    let mut info_pred = DMatrix::<f64>::zeros(n, n);
    for k in 0..t {
        let info = &info_pred + &info_increment[k];
        // Q_k multiplies on the right. Moving it to the left gives a
        // different (wrong) matrix whenever the factors do not commute.
        let combination = f[k].transpose() + &info * &f_inv[k] * &q[k];
        let gain = invert(combination, "forward propagation term", k)?;
        info_pred = &gain * &info * &f_inv[k];
        trace!("forward step {}: predicted information {:?}", k + 1, info_pred);
        forward_gain.push(gain);
        forward_pred.push(info_pred.clone());
    }

    // --- 2. Backward pass over N-1..t, with F^-1 as the transition ---
    // backward_gain[k - t] = Gb_k = F_k^T (I + Ib_{k+1} Q_k)^-1
    // backward_pred[k - t] = Ibpred_k = Gb_k Ib_{k+1} F_k
    let mut backward_gain = Vec::with_capacity(len - 1 - t);
    let mut backward_pred = Vec::with_capacity(len - 1 - t);
    let mut info_back_pred = DMatrix::<f64>::zeros(n, n);
    for k in (t..len - 1).rev() {
        let info_next = &info_back_pred + &info_increment[k + 1];
        let combination = &identity + &info_next * &q[k];
        let gain = f[k].transpose() * invert(combination, "backward propagation term", k)?;
        info_back_pred = &gain * &info_next * &f[k];
        trace!("backward step {}: predicted information {:?}", k, info_back_pred);
        backward_gain.push(gain);
        backward_pred.push(info_back_pred.clone());
    }
    backward_gain.reverse();
    backward_pred.reverse();

    // --- 3. Combine at the target step ---
    // Forward prediction from t-1, the measurement at t, backward prediction from t+1.
    let total_info = symmetrize(&(&info_pred + &info_increment[t] + &info_back_pred));
    let covariance = Cholesky::new(total_info)
        .map(|chol| symmetrize(&chol.inverse()))
        .ok_or(ArgusError::SingularMatrix {
            what: "smoothed information",
            step: t,
        })?;

    // --- 4. Coefficients ---
    let mut measurement_coeffs = vec![DMatrix::zeros(0, 0); len];
    let mut control_coeffs = vec![DMatrix::zeros(0, 0); len - 1];
    measurement_coeffs[t] = &covariance * &weighted_h[t];

    // Forward side, accumulated in reverse index order:
    // phi = P G_{t-1} G_{t-2} ... G_j
    let mut phi = covariance.clone();
    for j in (0..t).rev() {
        control_coeffs[j] = &phi * &forward_pred[j];
        phi = &phi * &forward_gain[j];
        measurement_coeffs[j] = &phi * &weighted_h[j];
    }

    // Backward side, accumulated in forward index order:
    // phi = P Gb_t Gb_{t+1} ... Gb_j
    let mut phi = covariance.clone();
    for j in t..len - 1 {
        control_coeffs[j] = -(&phi * &backward_pred[j - t] * &f_inv[j]);
        phi = &phi * &backward_gain[j - t];
        measurement_coeffs[j + 1] = &phi * &weighted_h[j + 1];
    }

    Ok(FirSmootherCoefficients {
        target_step: t,
        measurement_coeffs,
        control_coeffs,
        covariance,
    })
}
