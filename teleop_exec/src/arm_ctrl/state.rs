//! Implementations for the ArmCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, warn};
use serde::Serialize;

// Internal
use super::{
    frame, ArmCtrlError, GuardOutcome, JointLimitGuard, Params, PoseTracker, TrackerOutcome,
};
use crate::eqpt::ArmClient;
use comms_if::{
    eqpt::arm::ArmPreset,
    tc::{EeCmd, PoseCmd, WaistCmd},
};
use util::{
    archive::{ArchiveError, Archived, Archiver},
    session::{self, Session},
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Arm control module state
pub struct ArmCtrl {
    pub(crate) params: Params,

    pub(crate) tracker: PoseTracker,

    pub(crate) waist_guard: JointLimitGuard,

    pub(crate) report: StatusReport,

    arch_frame: Option<Archiver>,
}

/// Status report for the arm control processing in one cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusReport {
    /// The preset which was run, and whether the arm reached it
    pub preset: Option<(ArmPreset, bool)>,

    /// Outcome of the waist step, if one was commanded
    pub waist: Option<GuardOutcome>,

    /// Outcome of the end-effector step
    pub ee: Option<TrackerOutcome>,
}

/// A flat record of the tracked frame, written to the archive once per cycle.
#[derive(Debug, Serialize)]
struct FrameRecord {
    time_s: f64,
    yaw_rad: f64,
    x_m: f64,
    y_m: f64,
    z_m: f64,
    roll_rad: f64,
    pitch_rad: f64,
    ee_moved: bool,
    ee_rejected: bool,
    waist_pos_rad: Option<f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ArmCtrl {
    /// Initialise arm control from the arm's current state.
    ///
    /// The waist limits are read once here and never refreshed. The tracked frame is anchored on
    /// the arm's current end-effector pose.
    pub fn init(params: Params, arm: &dyn ArmClient) -> Result<Self, ArmCtrlError> {
        params.validate().map_err(ArmCtrlError::InvalidParams)?;

        let waist_limits = arm
            .joint_limits(&params.waist_joint_name)
            .map_err(|e| ArmCtrlError::NoJointLimits(params.waist_joint_name.clone(), e))?;

        let (lower, upper) = waist_limits;
        if lower.is_nan() || upper.is_nan() || lower >= upper {
            return Err(ArmCtrlError::InvalidJointLimits(
                params.waist_joint_name.clone(),
                lower,
                upper,
            ));
        }

        let num_joints = arm.num_joints();
        let mut tracker = PoseTracker::new(&params, num_joints);
        tracker.resync(&arm.get_current_pose());

        info!(
            "ArmCtrl initialised for a {} joint arm, {} limits [{:.3}, {:.3}] rad",
            num_joints, params.waist_joint_name, lower, upper
        );
        if !tracker.lateral_joints_ok() {
            info!("Lateral end-effector motion is disabled for this arm");
        }

        Ok(Self {
            waist_guard: JointLimitGuard::new(
                &params.waist_joint_name,
                waist_limits,
                params.waist_profile,
            ),
            tracker,
            params,
            report: StatusReport::default(),
            arch_frame: None,
        })
    }

    /// Start archiving the tracked frame into the session's archive directory.
    pub fn enable_archive(&mut self, session: &Session) -> Result<(), ArmCtrlError> {
        self.arch_frame = Some(Archiver::from_path(session, "arm_ctrl/tracked_frame.csv")?);
        Ok(())
    }

    /// Start a new cycle, clearing the status report.
    pub fn cycle_start(&mut self) {
        self.report = StatusReport::default();
    }

    /// Run a preset if one is commanded.
    ///
    /// The tracked frame is re-anchored on the arm's pose afterwards whether or not the preset
    /// succeeded, and the arm's default trajectory time is restored to the end-effector profile.
    pub fn proc_preset(&mut self, cmd: PoseCmd, arm: &mut dyn ArmClient) {
        let preset = match cmd {
            PoseCmd::Home => ArmPreset::Home,
            PoseCmd::Sleep => ArmPreset::Sleep,
            PoseCmd::None => return,
        };

        let ok = match arm.go_to_preset(preset, self.params.preset_profile) {
            Ok(()) => true,
            Err(e) => {
                warn!("Arm could not reach the {:?} preset: {}", preset, e);
                false
            }
        };

        self.tracker.resync(&arm.get_current_pose());
        arm.set_trajectory_time(self.params.ee_profile);

        self.report.preset = Some((preset, ok));
    }

    /// Step the waist if commanded, then re-anchor the tracked frame.
    pub fn proc_waist(
        &mut self,
        cmd: WaistCmd,
        arm: &mut dyn ArmClient,
    ) -> Result<(), ArmCtrlError> {
        if cmd == WaistCmd::None {
            return Ok(());
        }

        let outcome = self
            .waist_guard
            .step(arm, cmd.sign() * self.params.waist_step_rad);

        // The arm may have moved even if the step failed part way, so always resync
        self.tracker.resync(&arm.get_current_pose());

        let outcome = outcome?;
        if let GuardOutcome::AtLimit { pos_rad } = outcome {
            debug!("Waist is at its limit ({:.4} rad)", pos_rad);
        }
        self.report.waist = Some(outcome);

        Ok(())
    }

    /// Step the end-effector according to the command.
    pub fn proc_ee(&mut self, cmd: &EeCmd, arm: &mut dyn ArmClient) -> TrackerOutcome {
        let outcome = self.tracker.step(cmd, arm);
        self.report.ee = Some(outcome.clone());
        outcome
    }

    /// Re-anchor the tracked frame on the arm's current pose.
    pub fn resync(&mut self, arm: &dyn ArmClient) {
        self.tracker.resync(&arm.get_current_pose());
    }

    pub fn tracker(&self) -> &PoseTracker {
        &self.tracker
    }

    pub fn waist_guard(&self) -> &JointLimitGuard {
        &self.waist_guard
    }

    pub fn report(&self) -> &StatusReport {
        &self.report
    }
}

impl Archived for ArmCtrl {
    fn write(&mut self) -> Result<(), ArchiveError> {
        let arch = match self.arch_frame.as_mut() {
            Some(a) => a,
            None => return Ok(()),
        };

        let t_yb = self.tracker.t_yb();
        let pos = frame::translation(t_yb);
        let (roll_rad, pitch_rad, _) = frame::rotation_to_rpy(&frame::rotation(t_yb));

        arch.serialise(FrameRecord {
            time_s: session::try_get_elapsed_seconds().unwrap_or(0.0),
            yaw_rad: frame::yaw_of(self.tracker.t_sy()),
            x_m: pos[0],
            y_m: pos[1],
            z_m: pos[2],
            roll_rad,
            pitch_rad,
            ee_moved: matches!(self.report.ee, Some(TrackerOutcome::Moved)),
            ee_rejected: matches!(self.report.ee, Some(TrackerOutcome::Rejected(_))),
            waist_pos_rad: match self.report.waist {
                Some(GuardOutcome::Stepped { pos_rad })
                | Some(GuardOutcome::FallbackToLimit { pos_rad, .. })
                | Some(GuardOutcome::AtLimit { pos_rad }) => Some(pos_rad),
                None => None,
            },
        })
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::eqpt::recorder::{EqptCall, Recorder};
    use approx::assert_relative_eq;
    use comms_if::{eqpt::MotionProfile, tc::EeAxisCmd};

    #[test]
    fn test_init_reads_limits_and_pose() {
        let rec = Recorder::new(6);
        rec.arm().waist_limits_rad = (-2.0, 2.5);
        let eqpt = rec.eqpt(true, false, false);
        let arm = eqpt.arm.as_ref().unwrap().as_ref();

        let ac = ArmCtrl::init(Params::default(), arm).unwrap();

        assert_eq!(ac.waist_guard().limits(), (-2.0, 2.5));
        assert_eq!(ac.tracker().t_yb(), &rec.arm().sleep_pose);
    }

    #[test]
    fn test_init_errors() {
        let rec = Recorder::new(6);
        let eqpt = rec.eqpt(true, false, false);
        let arm = eqpt.arm.as_ref().unwrap().as_ref();

        let p = Params {
            waist_joint_name: "turret".into(),
            ..Default::default()
        };
        assert!(matches!(
            ArmCtrl::init(p, arm),
            Err(ArmCtrlError::NoJointLimits(..))
        ));

        rec.arm().waist_limits_rad = (1.0, -1.0);
        assert!(matches!(
            ArmCtrl::init(Params::default(), arm),
            Err(ArmCtrlError::InvalidJointLimits(..))
        ));
    }

    #[test]
    fn test_preset_resyncs_and_restores_trajectory_time() {
        let rec = Recorder::new(6);
        let mut eqpt = rec.eqpt(true, false, false);
        let arm = eqpt.arm.as_mut().unwrap().as_mut();
        let mut ac = ArmCtrl::init(Params::default(), arm).unwrap();

        ac.proc_preset(PoseCmd::Home, arm);

        assert_eq!(
            rec.take_calls(),
            vec![
                EqptCall::GoToPreset(ArmPreset::Home, MotionProfile::new(1.5, 0.75)),
                EqptCall::SetTrajectoryTime(MotionProfile::new(0.2, 0.1)),
            ]
        );
        assert_eq!(ac.tracker().t_yb(), &rec.arm().home_pose);
        assert_eq!(ac.report().preset, Some((ArmPreset::Home, true)));

        // No preset, no calls
        ac.proc_preset(PoseCmd::None, arm);
        assert!(rec.take_calls().is_empty());
    }

    #[test]
    fn test_preset_failure_still_resyncs() {
        let rec = Recorder::new(6);
        let mut eqpt = rec.eqpt(true, false, false);
        let arm = eqpt.arm.as_mut().unwrap().as_mut();
        let mut ac = ArmCtrl::init(Params::default(), arm).unwrap();

        // The arm stops half way between sleep (0.1, 0, 0.1) and home (0.4, 0, 0.3)
        rec.arm().preset_responses.push_back(false);
        ac.proc_preset(PoseCmd::Home, arm);

        assert_eq!(ac.report().preset, Some((ArmPreset::Home, false)));
        let pos = frame::translation(ac.tracker().t_yb());
        assert_relative_eq!(pos[0], 0.25, epsilon = 1e-12);
        assert_relative_eq!(pos[1], 0.0, epsilon = 1e-12);
        assert_relative_eq!(pos[2], 0.2, epsilon = 1e-12);
        assert_eq!(ac.tracker().t_yb(), &rec.arm().pose);

        // The default trajectory time is restored even on failure
        assert_eq!(
            rec.take_calls().last(),
            Some(&EqptCall::SetTrajectoryTime(MotionProfile::new(0.2, 0.1)))
        );
    }

    #[test]
    fn test_waist_resyncs_heading() {
        let rec = Recorder::new(6);
        rec.arm().waist_limits_rad = (-3.1, 0.1);
        let mut eqpt = rec.eqpt(true, false, false);
        let arm = eqpt.arm.as_mut().unwrap().as_mut();
        let mut ac = ArmCtrl::init(Params::default(), arm).unwrap();
        let sleep_pose = rec.arm().sleep_pose;

        // Stepped
        ac.proc_waist(WaistCmd::Ccw, arm).unwrap();
        assert_eq!(ac.report().waist, Some(GuardOutcome::Stepped { pos_rad: 0.06 }));
        assert_relative_eq!(frame::yaw_of(ac.tracker().t_sy()), 0.06, epsilon = 1e-12);
        assert_relative_eq!(*ac.tracker().t_yb(), sleep_pose, epsilon = 1e-12);

        // Rejected at 0.12 rad, falls back to the 0.1 rad limit
        ac.cycle_start();
        ac.proc_waist(WaistCmd::Ccw, arm).unwrap();
        assert_eq!(
            ac.report().waist,
            Some(GuardOutcome::FallbackToLimit {
                pos_rad: 0.1,
                executed: true
            })
        );
        assert_relative_eq!(frame::yaw_of(ac.tracker().t_sy()), 0.1, epsilon = 1e-12);
        assert_relative_eq!(*ac.tracker().t_yb(), sleep_pose, epsilon = 1e-12);

        // Forward is now along the new heading
        ac.proc_ee(
            &EeCmd {
                x: EeAxisCmd::Inc,
                ..Default::default()
            },
            arm,
        );
        let mut moved = sleep_pose;
        moved[(0, 3)] += 0.01;
        let pose = rec.arm().pose;
        assert_relative_eq!(pose, frame::yaw_transform(0.1) * moved, epsilon = 1e-12);
    }

    #[test]
    fn test_archive_tracked_frame() {
        let rec = Recorder::new(6);
        let mut eqpt = rec.eqpt(true, false, false);
        let arm = eqpt.arm.as_mut().unwrap().as_mut();
        let mut ac = ArmCtrl::init(Params::default(), arm).unwrap();

        // Without an archiver writing is a no-op
        ac.write().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.csv");
        ac.arch_frame = Some(Archiver::create(&path).unwrap());

        ac.cycle_start();
        let outcome = ac.proc_ee(
            &EeCmd {
                x: EeAxisCmd::Inc,
                ..Default::default()
            },
            arm,
        );
        assert_eq!(outcome, TrackerOutcome::Moved);
        ac.write().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("time_s,yaw_rad,x_m"));
        assert!(lines[1].contains(",true,false,"));
    }
}
