//! # Data Store

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use crate::{arm_ctrl, gripper_ctrl, mode_ctrl, pan_tilt_ctrl};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
///
/// Owns every piece of control state which persists between cycles.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    /// Sequence number of the last snapshot processed, used to apply one-shot commands once
    pub last_tc_seq: Option<u64>,

    /// True if the snapshot processed this cycle had not been seen before
    pub tc_fresh: bool,

    /// Pass base velocity and odometry commands through to the base
    pub use_base: bool,

    // ModeCtrl
    pub mode_ctrl: mode_ctrl::ModeCtrl,
    pub mode_ctrl_status_rpt: mode_ctrl::StatusReport,

    // PanTiltCtrl
    pub pan_tilt_ctrl: pan_tilt_ctrl::PanTiltCtrl,
    pub pan_tilt_ctrl_output: Option<pan_tilt_ctrl::OutputData>,

    // GripperCtrl
    pub gripper_ctrl: gripper_ctrl::GripperCtrl,
    pub gripper_ctrl_output: Option<gripper_ctrl::OutputData>,
    pub gripper_ctrl_status_rpt: gripper_ctrl::StatusReport,

    // ArmCtrl, only present if the robot has an arm
    pub arm_ctrl: Option<arm_ctrl::ArmCtrl>,

    // Monitoring Counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,

    /// Total number of cycle overruns
    pub num_cycle_overruns: u64,

    /// Number of end-effector targets rejected by the arm
    pub num_ee_rejections: u64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Perform actions required at the start of a cycle.
    ///
    /// Clears those items that only describe a single cycle.
    pub fn cycle_start(&mut self) {
        self.tc_fresh = false;

        self.mode_ctrl_status_rpt = mode_ctrl::StatusReport::default();
        self.pan_tilt_ctrl_output = None;
        self.gripper_ctrl_output = None;
        self.gripper_ctrl_status_rpt = gripper_ctrl::StatusReport::default();

        if let Some(ref mut ac) = self.arm_ctrl {
            ac.cycle_start();
        }
    }

    /// Record that the snapshot with sequence number `seq` is being processed, returning true if
    /// this is the first time it has been seen.
    pub fn mark_tc_seen(&mut self, seq: u64) -> bool {
        self.tc_fresh = self.last_tc_seq != Some(seq);
        self.last_tc_seq = Some(seq);
        self.tc_fresh
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_fresh_only_once() {
        let mut ds = DataStore::default();

        assert!(ds.mark_tc_seen(1));
        assert!(!ds.mark_tc_seen(1));
        assert!(!ds.mark_tc_seen(1));
        assert!(ds.mark_tc_seen(2));

        ds.cycle_start();
        assert!(!ds.tc_fresh);
    }
}
