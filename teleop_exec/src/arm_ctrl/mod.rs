//! Arm control module
//!
//! Turns the operator's discrete arm commands into motion requests for the arm client. The
//! end-effector is driven incrementally in a yaw-aligned reference frame (see [`PoseTracker`]),
//! the waist joint is stepped directly with a fallback to its limits (see [`JointLimitGuard`]),
//! and the home and sleep presets re-anchor the tracked frame.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod frame;
mod joint_guard;
mod params;
mod pose_tracker;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use joint_guard::*;
pub use params::*;
pub use pose_tracker::*;
pub use state::*;

use crate::eqpt::ArmClientError;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during ArmCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum ArmCtrlError {
    #[error("Could not read the limits of the {0} joint: {1}")]
    NoJointLimits(String, ArmClientError),

    #[error("The {0} joint has invalid limits [{1}, {2}] rad")]
    InvalidJointLimits(String, f64, f64),

    #[error("Invalid arm control parameter: {0}")]
    InvalidParams(String),

    #[error("Arm client error: {0}")]
    ClientError(#[from] ArmClientError),

    #[error("Could not archive the tracked frame: {0}")]
    ArchiveError(#[from] util::archive::ArchiveError),
}
