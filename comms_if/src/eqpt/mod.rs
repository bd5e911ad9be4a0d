//! # Equipment Interface
//!
//! This module defines the demand structures which are sent to the equipment clients (arm, base,
//! gripper and pan-tilt camera).

// -----------------------------------------------------------------------------------------------
// MODULES
// -----------------------------------------------------------------------------------------------

pub mod arm;
pub mod base;
pub mod pan_tilt;

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// -----------------------------------------------------------------------------------------------
// STRUCTS
// -----------------------------------------------------------------------------------------------

/// Timing profile used by the equipment when executing a motion.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct MotionProfile {
    /// Duration of the whole motion.
    ///
    /// Units: seconds
    pub moving_time_s: f64,

    /// Duration of the acceleration and deceleration phases.
    ///
    /// Units: seconds
    pub accel_time_s: f64,
}

// -----------------------------------------------------------------------------------------------
// IMPLS
// -----------------------------------------------------------------------------------------------

impl MotionProfile {
    pub const fn new(moving_time_s: f64, accel_time_s: f64) -> Self {
        Self {
            moving_time_s,
            accel_time_s,
        }
    }
}
