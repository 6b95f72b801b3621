// argus_core/src/frames/layout.rs
use crate::frames::ManeuverVariable;

/// Dimension of the maneuvering state without a speed rate.
pub const MANEUVER_STATE_DIM: usize = 8;
/// Dimension of the maneuvering state including a speed rate.
pub const MANEUVER_STATE_DIM_WITH_SPEED_RATE: usize = 9;

// Fixed indices shared by both layouts.
pub const PX: usize = 0;
pub const PY: usize = 1;
pub const PZ: usize = 2;
pub const AZIMUTH: usize = 3;
pub const ELEVATION: usize = 4;
pub const SPEED: usize = 5;
pub const AZIMUTH_RATE: usize = 6;
pub const ELEVATION_RATE: usize = 7;
pub const SPEED_RATE: usize = 8;

/// Returns the layout of the spherical maneuvering state vector.
///
/// The state is composed of:
/// - Position (3), Cartesian
/// - Azimuth, elevation and speed of the velocity vector
/// - Azimuth rate and elevation rate
/// - Speed rate, only when `with_speed_rate` is set
pub fn maneuver_state_layout(with_speed_rate: bool) -> Vec<ManeuverVariable> {
    let mut layout = vec![
        // --- Position --- indices 0-2
        ManeuverVariable::Px,
        ManeuverVariable::Py,
        ManeuverVariable::Pz,
        // --- Spherical velocity --- indices 3-5
        ManeuverVariable::Azimuth,
        ManeuverVariable::Elevation,
        ManeuverVariable::Speed,
        // --- Rates --- indices 6-7 (8)
        ManeuverVariable::AzimuthRate,
        ManeuverVariable::ElevationRate,
    ];
    if with_speed_rate {
        layout.push(ManeuverVariable::SpeedRate);
    }
    layout
}
