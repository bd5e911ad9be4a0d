//! Parameters structure for GripperCtrl

use serde::Deserialize;

/// Parameters for the gripper control module.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    /// Change in pressure per increment or decrement command
    pub pressure_step: f64,

    /// Pressure sent to the gripper at startup
    pub initial_pressure: f64,

    /// Delay passed to the gripper with each open or close command.
    ///
    /// Units: seconds
    pub open_close_delay_s: f64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            pressure_step: 0.125,
            initial_pressure: 0.5,
            open_close_delay_s: 0.0,
        }
    }
}
