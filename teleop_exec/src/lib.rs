//! # Teleoperation library.
//!
//! This library holds the teleoperation control core, so that it can be driven by the
//! `teleop_exec` executable and exercised by the tests.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Arm control module - incremental end-effector control, waist stepping and presets
pub mod arm_ctrl;

/// Command store - latest value cell handing operator snapshots to the control loop
pub mod cmd_store;

/// Data store - all control state which persists between cycles
pub mod data_store;

/// Equipment client interfaces
pub mod eqpt;

/// Gripper control module - stepped grip pressure and open/close
pub mod gripper_ctrl;

/// Mode control module - loop rate and course/fine control
pub mod mode_ctrl;

/// Pan-tilt control module - stepped and home camera motion
pub mod pan_tilt_ctrl;

/// Executable parameters
pub mod params;

/// Producers - script and stdin sources of operator snapshots
pub mod producer;

/// Scheduler - fixed rate control loop
pub mod scheduler;

/// Simulation client - simulated equipment so the executable can be run without hardware
#[cfg(feature = "sim")]
pub mod sim_client;

/// Telecommand processor - applies one snapshot to the control modules and equipment
pub mod tc_processor;
