//! # Control loop scheduler
//!
//! Drives the control core at the rate set by mode control. Each cycle reads the latest snapshot
//! from the command store, processes it, archives, and then sleeps for whatever is left of the
//! period. The period is re-read from the shared rate after every cycle so a rate change made
//! while processing a snapshot applies to the very next sleep.
//!
//! When the stop flag is raised any snapshot not yet processed gets one last cycle, so the final
//! operator input is never lost.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{info, trace, warn};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread;
use std::time::Instant;

// Internal
use crate::{
    cmd_store::CmdStore, data_store::DataStore, eqpt::Eqpt, mode_ctrl::SharedRate, tc_processor,
};
use util::archive::Archived;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Fixed rate scheduler for the control loop.
pub struct Scheduler {
    rate: SharedRate,

    stop: Arc<AtomicBool>,

    /// Stop after this many cycles, if set
    max_cycles: Option<u128>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Scheduler {
    /// Create a new scheduler running at the given shared rate.
    pub fn new(rate: SharedRate) -> Self {
        Self {
            rate,
            stop: Arc::new(AtomicBool::new(false)),
            max_cycles: None,
        }
    }

    /// Limit the number of cycles the scheduler runs for.
    pub fn with_max_cycles(mut self, max_cycles: u128) -> Self {
        self.max_cycles = Some(max_cycles);
        self
    }

    /// Get a handle which can be used to stop the scheduler from another thread.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.stop.clone()
    }

    /// Run the control loop until stopped.
    pub fn run(&self, cmd_store: &CmdStore, ds: &mut DataStore, eqpt: &mut Eqpt) {
        info!("Beginning main loop");

        loop {
            if self.stop.load(Ordering::Acquire) {
                // The producer may have published its last snapshot while we slept
                if has_unseen_tc(cmd_store, ds) {
                    info!("Stop requested, processing the last TC first");
                    step(cmd_store, ds, eqpt);
                    ds.num_cycles += 1;
                } else {
                    info!("Stop requested");
                }
                break;
            }

            if let Some(max) = self.max_cycles {
                if ds.num_cycles >= max {
                    info!("Reached the cycle limit ({} cycles)", max);
                    break;
                }
            }

            // Get cycle start time
            let cycle_start_instant = Instant::now();

            step(cmd_store, ds, eqpt);

            // ---- CYCLE MANAGEMENT ----

            let cycle_dur = Instant::now() - cycle_start_instant;
            let period = self.rate.period();

            // Get sleep duration
            match period.checked_sub(cycle_dur) {
                Some(d) => {
                    ds.num_consec_cycle_overruns = 0;
                    thread::sleep(d);
                }
                None => {
                    warn!(
                        "Cycle overran by {:.06} s",
                        cycle_dur.as_secs_f64() - period.as_secs_f64()
                    );
                    ds.num_consec_cycle_overruns += 1;
                    ds.num_cycle_overruns += 1;
                }
            }

            // Increment cycle counter
            ds.num_cycles += 1;
        }

        info!(
            "Main loop stopped after {} cycles ({} overruns, {} rejected end-effector targets)",
            ds.num_cycles, ds.num_cycle_overruns, ds.num_ee_rejections
        );
    }
}

/// Perform one control cycle without any timing.
pub fn step(cmd_store: &CmdStore, ds: &mut DataStore, eqpt: &mut Eqpt) {
    // Clear items that need wiping at the start of the cycle
    ds.cycle_start();

    // ---- TELECOMMAND PROCESSING ----

    match cmd_store.read() {
        Some(stamped) => tc_processor::exec(ds, eqpt, &stamped),
        None => trace!("No TC received yet"),
    }

    // ---- ARCHIVE ----

    if let Some(ref mut ac) = ds.arm_ctrl {
        if let Err(e) = ac.write() {
            warn!("Could not archive ArmCtrl: {}", e);
        }
    }
}

/// True if the store holds a snapshot which hasn't been processed yet.
fn has_unseen_tc(cmd_store: &CmdStore, ds: &DataStore) -> bool {
    match cmd_store.read() {
        Some(stamped) => ds.last_tc_seq != Some(stamped.seq),
        None => false,
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::eqpt::recorder::{EqptCall, Recorder};
    use comms_if::tc::{PanCmd, SpeedCmd, TeleopCmd};
    use std::time::Duration;
    use util::module::State;

    #[test]
    fn test_nothing_before_first_tc() {
        let rec = Recorder::new(6);
        let mut eqpt = rec.eqpt(true, true, true);
        let mut ds = DataStore::default();
        ds.use_base = true;

        step(&CmdStore::new(), &mut ds, &mut eqpt);

        assert!(rec.take_calls().is_empty());
        assert_eq!(ds.last_tc_seq, None);
    }

    #[test]
    fn test_run_for_max_cycles() {
        let rec = Recorder::new(6);
        let mut eqpt = rec.eqpt(false, false, false);
        let mut ds = DataStore::default();
        ds.mode_ctrl.init(Default::default()).unwrap();
        ds.pan_tilt_ctrl.init(Default::default()).unwrap();

        let store = CmdStore::new();
        store.publisher().publish(TeleopCmd {
            pan: PanCmd::Ccw,
            speed: SpeedCmd::Inc,
            ..Default::default()
        });

        // Speed up to 35 Hz so the test runs quickly
        for _ in 0..10 {
            ds.mode_ctrl
                .proc(&crate::mode_ctrl::InputData {
                    speed: SpeedCmd::Inc,
                    ..Default::default()
                })
                .unwrap();
        }

        let scheduler = Scheduler::new(ds.mode_ctrl.shared_rate()).with_max_cycles(4);
        let start = Instant::now();
        scheduler.run(&store, &mut ds, &mut eqpt);

        assert_eq!(ds.num_cycles, 4);
        assert!(start.elapsed() >= 4 * (Duration::from_secs(1) / 36));

        // The held pan command is level, the held speed command is one-shot
        let moves = rec
            .take_calls()
            .iter()
            .filter(|c| matches!(c, EqptCall::PanTiltMove(_)))
            .count();
        assert_eq!(moves, 4);
        assert_eq!(ds.mode_ctrl.rate_state().current_hz, 36);
    }

    #[test]
    fn test_stop_flag() {
        let rec = Recorder::new(6);
        let mut eqpt = rec.eqpt(false, false, false);
        let mut ds = DataStore::default();

        let scheduler = Scheduler::new(SharedRate::new(40));
        scheduler.stop_handle().store(true, Ordering::Release);
        scheduler.run(&CmdStore::new(), &mut ds, &mut eqpt);

        assert_eq!(ds.num_cycles, 0);
    }

    #[test]
    fn test_last_tc_processed_after_stop() {
        let rec = Recorder::new(6);
        let mut eqpt = rec.eqpt(false, false, true);
        let mut ds = DataStore::default();
        ds.use_base = true;
        ds.mode_ctrl.init(Default::default()).unwrap();
        ds.pan_tilt_ctrl.init(Default::default()).unwrap();

        let store = CmdStore::new();
        let scheduler = Scheduler::new(ds.mode_ctrl.shared_rate());
        let stop = scheduler.stop_handle();

        // Input ends, and the stop is raised, before the loop gets to see the last line
        let n = crate::producer::publish_lines(
            std::io::Cursor::new("{\"base_reset_odom\": \"RESET\"}\n"),
            &store.publisher(),
            &stop,
        );
        assert_eq!(n, 1);
        stop.store(true, Ordering::Release);

        scheduler.run(&store, &mut ds, &mut eqpt);

        assert_eq!(ds.num_cycles, 1);
        assert_eq!(ds.last_tc_seq, Some(1));
        assert!(rec.take_calls().contains(&EqptCall::ResetOdom));

        // Nothing new, so a second run stops straight away
        scheduler.run(&store, &mut ds, &mut eqpt);
        assert_eq!(ds.num_cycles, 1);
    }
}
