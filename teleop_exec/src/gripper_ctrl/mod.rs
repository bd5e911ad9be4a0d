//! Gripper control module
//!
//! Holds the gripper's grip pressure, stepped up and down by the operator, and passes open and
//! close commands through to the gripper.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Lowest grip pressure.
pub const PRESSURE_LOWER: f64 = 0.0;

/// Highest grip pressure.
pub const PRESSURE_UPPER: f64 = 1.0;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during GripperCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum GripperCtrlError {
    #[error("The pressure step must be in (0, 1], found {0}")]
    InvalidPressureStep(f64),

    #[error("The initial pressure must be in [0, 1], found {0}")]
    InvalidInitialPressure(f64),

    #[error("The open/close delay must not be negative, found {0} s")]
    InvalidDelay(f64),
}
