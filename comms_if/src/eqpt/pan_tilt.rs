//! # Pan-Tilt Camera Equipment Demands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::MotionProfile;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Combined pan and tilt position demand.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct PanTiltDems {
    /// Units: radians
    pub pan_rad: f64,

    /// Units: radians
    pub tilt_rad: f64,

    pub pan_profile: MotionProfile,
    pub tilt_profile: MotionProfile,

    pub blocking: bool,
}
