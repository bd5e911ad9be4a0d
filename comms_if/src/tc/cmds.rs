//! # Discrete command enumerations
//!
//! Each enumeration mirrors one discrete field of [`super::TeleopCmd`].

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Loop rate adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpeedCmd {
    None,
    Inc,
    Dec,
}

/// Switch between the loop rate presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpeedToggleCmd {
    None,
    Course,
    Fine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BaseResetOdomCmd {
    None,
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GripperCmd {
    None,
    Open,
    Close,
}

/// Gripper pressure adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GripperPwmCmd {
    None,
    Inc,
    Dec,
}

/// Camera pan command.
///
/// Counter-clockwise is positive about the pan axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PanCmd {
    None,
    Ccw,
    Cw,
    Home,
}

/// Camera tilt command.
///
/// Tilting up is negative about the tilt axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TiltCmd {
    None,
    Up,
    Down,
    Home,
}

/// Arm preset pose command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PoseCmd {
    None,
    Home,
    Sleep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WaistCmd {
    None,
    Ccw,
    Cw,
}

/// End-effector translation along one axis of the yaw-aligned frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EeAxisCmd {
    None,
    Inc,
    Dec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EeRollCmd {
    None,
    Ccw,
    Cw,
}

/// End-effector pitch. Pitching down is positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EePitchCmd {
    None,
    Down,
    Up,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

/// Implements `Default` as the `None` variant.
macro_rules! default_none {
    ($($t:ty),+) => {
        $(
            impl Default for $t {
                fn default() -> Self {
                    Self::None
                }
            }
        )+
    };
}

default_none!(
    SpeedCmd,
    SpeedToggleCmd,
    BaseResetOdomCmd,
    GripperCmd,
    GripperPwmCmd,
    PanCmd,
    TiltCmd,
    PoseCmd,
    WaistCmd,
    EeAxisCmd,
    EeRollCmd,
    EePitchCmd
);

impl EeAxisCmd {
    /// Direction of the step demanded by this command, `+1`, `-1` or `0`.
    pub fn sign(&self) -> f64 {
        match self {
            EeAxisCmd::None => 0.0,
            EeAxisCmd::Inc => 1.0,
            EeAxisCmd::Dec => -1.0,
        }
    }
}

impl EeRollCmd {
    pub fn sign(&self) -> f64 {
        match self {
            EeRollCmd::None => 0.0,
            EeRollCmd::Ccw => 1.0,
            EeRollCmd::Cw => -1.0,
        }
    }
}

impl EePitchCmd {
    pub fn sign(&self) -> f64 {
        match self {
            EePitchCmd::None => 0.0,
            EePitchCmd::Down => 1.0,
            EePitchCmd::Up => -1.0,
        }
    }
}

impl WaistCmd {
    pub fn sign(&self) -> f64 {
        match self {
            WaistCmd::None => 0.0,
            WaistCmd::Ccw => 1.0,
            WaistCmd::Cw => -1.0,
        }
    }
}

impl PanCmd {
    /// Direction of the pan step. `Home` carries no step on its own.
    pub fn sign(&self) -> f64 {
        match self {
            PanCmd::None | PanCmd::Home => 0.0,
            PanCmd::Ccw => 1.0,
            PanCmd::Cw => -1.0,
        }
    }
}

impl TiltCmd {
    /// Direction of the tilt step. `Home` carries no step on its own.
    pub fn sign(&self) -> f64 {
        match self {
            TiltCmd::None | TiltCmd::Home => 0.0,
            TiltCmd::Up => -1.0,
            TiltCmd::Down => 1.0,
        }
    }
}
