//! Parameters structure for PanTiltCtrl

use serde::Deserialize;

use comms_if::eqpt::MotionProfile;

/// Parameters for the pan-tilt control module.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    /// Pan or tilt change per cycle while a direction is held.
    ///
    /// Units: radians
    pub step_rad: f64,

    /// Profile used for stepped moves, on both axes
    pub move_profile: MotionProfile,

    /// Profile used when going home, on both axes
    pub home_profile: MotionProfile,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            step_rad: 0.005,
            move_profile: MotionProfile::new(0.2, 0.1),
            home_profile: MotionProfile::new(1.0, 0.5),
        }
    }
}
