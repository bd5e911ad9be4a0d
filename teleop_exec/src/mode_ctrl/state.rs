//! Implementations for the ModeCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::info;
use serde::Serialize;
use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};
use std::time::Duration;

// Internal
use super::{ModeCtrlError, Params};
use comms_if::tc::{SpeedCmd, SpeedToggleCmd};
use util::module::State;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Mode control module state
#[derive(Default)]
pub struct ModeCtrl {
    pub(crate) params: Params,

    pub(crate) rate: LoopRateState,

    pub(crate) report: StatusReport,

    shared_rate: SharedRate,
}

/// The loop rate memory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoopRateState {
    /// Rate the loop is currently running at, always within the allowed range
    pub current_hz: u32,

    /// Rate restored by the next switch to course control
    pub course_hz: u32,

    /// Rate restored by the next switch to fine control
    pub fine_hz: u32,
}

/// Handle onto the current loop rate, shared between the command handling which writes it and the
/// scheduler which reads it.
#[derive(Debug, Clone, Default)]
pub struct SharedRate(Arc<AtomicU32>);

/// Input data to mode control.
#[derive(Debug, Default, Clone, Copy)]
pub struct InputData {
    pub speed: SpeedCmd,
    pub speed_toggle: SpeedToggleCmd,
}

/// Status report for mode control processing.
#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct StatusReport {
    /// The current rate differs from the rate before this cycle
    pub rate_changed: bool,

    /// A speed command was clamped at the end of the allowed range
    pub rate_limited: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for ModeCtrl {
    type InitData = Params;
    type InitError = ModeCtrlError;

    type InputData = InputData;
    type OutputData = u32;
    type StatusReport = StatusReport;
    type ProcError = ModeCtrlError;

    /// Initialise the ModeCtrl module.
    ///
    /// Expected init data is the module's parameters, which are validated here.
    fn init(&mut self, init_data: Self::InitData) -> Result<(), Self::InitError> {
        let p = init_data;

        if p.min_rate_hz == 0 || p.min_rate_hz > p.max_rate_hz {
            return Err(ModeCtrlError::InvalidRange(p.min_rate_hz, p.max_rate_hz));
        }

        for (name, hz) in [
            ("initial", p.initial_rate_hz),
            ("course", p.course_rate_hz),
            ("fine", p.fine_rate_hz),
        ] {
            if hz < p.min_rate_hz || hz > p.max_rate_hz {
                return Err(ModeCtrlError::RateOutOfRange(
                    name,
                    hz,
                    p.min_rate_hz,
                    p.max_rate_hz,
                ));
            }
        }

        self.rate = LoopRateState {
            current_hz: p.initial_rate_hz,
            course_hz: p.course_rate_hz,
            fine_hz: p.fine_rate_hz,
        };
        self.params = p;
        self.shared_rate.set(self.rate.current_hz);

        info!("Current loop rate is {} Hz", self.rate.current_hz);

        Ok(())
    }

    /// Apply the speed and speed toggle commands, in that order, returning the new loop rate.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        // Clear the status report
        self.report = StatusReport::default();

        let prev_hz = self.rate.current_hz;

        match input_data.speed {
            SpeedCmd::Inc => self.step_rate(1),
            SpeedCmd::Dec => self.step_rate(-1),
            SpeedCmd::None => (),
        }

        match input_data.speed_toggle {
            SpeedToggleCmd::Fine => {
                self.rate.course_hz = self.rate.current_hz;
                self.rate.current_hz = self.rate.fine_hz;
                info!("Switched to Fine Control");
            }
            SpeedToggleCmd::Course => {
                self.rate.fine_hz = self.rate.current_hz;
                self.rate.current_hz = self.rate.course_hz;
                info!("Switched to Course Control");
            }
            SpeedToggleCmd::None => (),
        }

        if self.rate.current_hz != prev_hz {
            self.report.rate_changed = true;
            self.shared_rate.set(self.rate.current_hz);
            info!("Current loop rate is {} Hz", self.rate.current_hz);
        }

        Ok((self.rate.current_hz, self.report))
    }
}

impl ModeCtrl {
    /// Get a handle onto the current loop rate.
    pub fn shared_rate(&self) -> SharedRate {
        self.shared_rate.clone()
    }

    /// Get the current rate memory.
    pub fn rate_state(&self) -> LoopRateState {
        self.rate
    }

    /// Step the current rate by `delta_hz`, saturating at the ends of the allowed range.
    fn step_rate(&mut self, delta_hz: i64) {
        let target = self.rate.current_hz as i64 + delta_hz;
        let clamped = target
            .max(self.params.min_rate_hz as i64)
            .min(self.params.max_rate_hz as i64);

        if clamped != target {
            self.report.rate_limited = true;
        }

        self.rate.current_hz = clamped as u32;
    }
}

impl SharedRate {
    pub fn new(rate_hz: u32) -> Self {
        Self(Arc::new(AtomicU32::new(rate_hz)))
    }

    /// Get the current rate.
    ///
    /// Units: hertz
    pub fn get(&self) -> u32 {
        self.0.load(Ordering::Acquire)
    }

    pub(crate) fn set(&self, rate_hz: u32) {
        self.0.store(rate_hz, Ordering::Release)
    }

    /// Get the loop period at the current rate. A zero rate, which only occurs before the owning
    /// module is initialised, is treated as 1 Hz.
    pub fn period(&self) -> Duration {
        Duration::from_secs(1) / self.get().max(1)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
