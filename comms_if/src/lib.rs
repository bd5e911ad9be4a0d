//! # Communications interface crate.
//!
//! Provides the common interfaces passed between the teleoperation front-end, the control core and
//! the equipment drivers.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Operator command snapshots (telecommands)
pub mod tc;

/// Demand definitions for equipment (arm, base, gripper, pan-tilt)
pub mod eqpt;
