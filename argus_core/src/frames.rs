// argus_core/src/frames.rs

use serde::{Deserialize, Serialize};

pub mod layout;

/// An enum naming every variable that can appear in a maneuvering-target
/// state vector. Positions are Cartesian; the velocity is carried in
/// spherical form (heading angles plus speed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ManeuverVariable {
    // --- Cartesian Position ---
    Px,
    Py,
    Pz,
    // --- Velocity Direction ---
    /// Counter-clockwise from the first axis, in the first/second-axis plane.
    Azimuth,
    /// Up from the first/second-axis plane.
    Elevation,
    // --- Velocity Magnitude ---
    Speed,
    // --- Rates ---
    AzimuthRate,
    ElevationRate,
    SpeedRate,
}

impl ManeuverVariable {
    /// The variable whose time derivative this variable is, if any.
    /// `AzimuthRate` is the derivative of `Azimuth`, and so on.
    pub fn integrates_into(self) -> Option<ManeuverVariable> {
        match self {
            ManeuverVariable::AzimuthRate => Some(ManeuverVariable::Azimuth),
            ManeuverVariable::ElevationRate => Some(ManeuverVariable::Elevation),
            ManeuverVariable::SpeedRate => Some(ManeuverVariable::Speed),
            _ => None,
        }
    }
}

/// Finds the index of a variable in a layout.
pub fn find_idx(layout: &[ManeuverVariable], var: ManeuverVariable) -> Option<usize> {
    layout.iter().position(|v| *v == var)
}
