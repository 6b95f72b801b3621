// argus_core/src/prelude.rs

// --- Core Abstractions ---
pub use crate::error::ArgusError;
pub use crate::models::dynamics::DriftModel;
pub use crate::types::{Control, State};
pub use crate::utils::integrators::{Euler, Integrator, RK4};

// --- Core Data Structures ---
pub use crate::frames::layout::maneuver_state_layout;
pub use crate::frames::ManeuverVariable;

// --- Routines ---
pub use crate::estimation::fir_smoother::{
    kalman_fir_smoother_coeffs, FirModelSequence, FirSmootherCoefficients, FirWindow,
};
pub use crate::geometry::bounds::bounds_intersect_ball;
pub use crate::models::dynamics::spherical::{
    spherical_drift, spherical_drift_with_hessian, spherical_drift_with_jacobian,
    spherical_maneuver_derivatives, DerivativeOrder, DriftDerivatives, SphericalManeuverModel,
};
