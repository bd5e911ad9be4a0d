//! # Telecommand module
//!
//! This module provides the operator command snapshot sent to the control core by the
//! teleoperation front-end.
//!
//! A snapshot is a full picture of the operator's inputs at one instant. Every discrete field is a
//! closed enumeration with an explicit `None` variant, which is also its default, so a snapshot
//! that only sets the fields of interest can be written in JSON as:
//!
//! ```json
//! {"ee_x": "INC", "pan": "CCW"}
//! ```

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod cmds;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Internal
pub use cmds::*;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A telecommand snapshot, i.e. the full set of operator inputs at one instant.
///
/// Snapshots are captured by value. Consumers always work on their own copy.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TeleopCmd {
    // ---- MODE ----
    /// Loop rate increment/decrement
    pub speed: SpeedCmd,

    /// Switch between the course and fine loop rate presets
    pub speed_toggle: SpeedToggleCmd,

    // ---- BASE ----
    /// Reset the base odometry
    pub base_reset_odom: BaseResetOdomCmd,

    /// Linear velocity demand for the base.
    ///
    /// Units: meters/second
    pub base_x_ms: f64,

    /// Angular velocity demand for the base.
    ///
    /// Units: radians/second
    pub base_theta_rads: f64,

    // ---- GRIPPER ----
    pub gripper: GripperCmd,
    pub gripper_pwm: GripperPwmCmd,

    // ---- CAMERA ----
    pub pan: PanCmd,
    pub tilt: TiltCmd,

    // ---- ARM ----
    /// Move the arm to one of the preset poses
    pub pose: PoseCmd,

    /// Rotate the waist joint directly
    pub waist: WaistCmd,

    pub ee_x: EeAxisCmd,
    pub ee_y: EeAxisCmd,
    pub ee_z: EeAxisCmd,
    pub ee_roll: EeRollCmd,
    pub ee_pitch: EePitchCmd,
}

/// The end-effector part of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EeCmd {
    pub x: EeAxisCmd,
    pub y: EeAxisCmd,
    pub z: EeAxisCmd,
    pub roll: EeRollCmd,
    pub pitch: EePitchCmd,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible parsing errors.
#[derive(Debug, Error)]
pub enum TcParseError {
    #[error("TC contains invalid JSON: {0}")]
    InvalidJson(serde_json::Error),

    #[error("Expected the TC to be a JSON object, found: {0}")]
    NotAnObject(String),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TeleopCmd {
    /// Parse a new TC from a JSON packet.
    ///
    /// Missing fields take their `None` (or zero) value.
    pub fn from_json(json_str: &str) -> Result<Self, TcParseError> {
        let val: serde_json::Value =
            serde_json::from_str(json_str).map_err(TcParseError::InvalidJson)?;

        if !val.is_object() {
            return Err(TcParseError::NotAnObject(val.to_string()));
        }

        serde_json::from_value(val).map_err(TcParseError::InvalidJson)
    }

    /// Get the end-effector commands in this snapshot.
    pub fn ee_cmd(&self) -> EeCmd {
        EeCmd {
            x: self.ee_x,
            y: self.ee_y,
            z: self.ee_z,
            roll: self.ee_roll,
            pitch: self.ee_pitch,
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
