// argus_core/src/estimation/mod.rs

//! Estimation routines that work on whole windows of data rather than on a
//! running filter state.

pub mod fir_smoother;

pub use fir_smoother::{
    kalman_fir_smoother_coeffs, FirModelSequence, FirSmootherCoefficients, FirWindow,
};
