//! Implementations for the GripperCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::info;
use serde::Serialize;

// Internal
use super::{GripperCtrlError, Params, PRESSURE_LOWER, PRESSURE_UPPER};
use comms_if::tc::{GripperCmd, GripperPwmCmd};
use util::{maths, module::State};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Gripper control module state
#[derive(Default)]
pub struct GripperCtrl {
    pub(crate) params: Params,

    /// Current grip pressure, always within `[PRESSURE_LOWER, PRESSURE_UPPER]`
    pub(crate) pressure: f64,

    pub(crate) report: StatusReport,
}

/// Input data to gripper control.
#[derive(Debug, Default, Clone, Copy)]
pub struct InputData {
    pub gripper: GripperCmd,

    /// Pressure adjustment, only set on the first cycle a command is seen
    pub pwm: GripperPwmCmd,
}

/// Demands for the gripper.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputData {
    /// New pressure to send to the gripper, `None` if it hasn't changed
    pub pressure: Option<f64>,

    pub action: GripperAction,
}

/// Status report for gripper control processing.
#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct StatusReport {
    /// An adjustment was requested beyond the end of the pressure range
    pub pressure_limited: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Discrete gripper action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GripperAction {
    None,
    Open { delay_s: f64 },
    Close { delay_s: f64 },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for GripperCtrl {
    type InitData = Params;
    type InitError = GripperCtrlError;

    type InputData = InputData;
    type OutputData = OutputData;
    type StatusReport = StatusReport;
    type ProcError = GripperCtrlError;

    fn init(&mut self, init_data: Self::InitData) -> Result<(), Self::InitError> {
        let p = init_data;

        if p.pressure_step.is_nan() || p.pressure_step <= 0.0 || p.pressure_step > PRESSURE_UPPER {
            return Err(GripperCtrlError::InvalidPressureStep(p.pressure_step));
        }
        if !(PRESSURE_LOWER..=PRESSURE_UPPER).contains(&p.initial_pressure) {
            return Err(GripperCtrlError::InvalidInitialPressure(p.initial_pressure));
        }
        if p.open_close_delay_s.is_nan() || p.open_close_delay_s < 0.0 {
            return Err(GripperCtrlError::InvalidDelay(p.open_close_delay_s));
        }

        self.pressure = p.initial_pressure;
        self.params = p;

        info!("Gripper pressure is {:.1}%", self.pressure * 100.0);

        Ok(())
    }

    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        self.report = StatusReport::default();

        let delta = match input_data.pwm {
            GripperPwmCmd::Inc => self.params.pressure_step,
            GripperPwmCmd::Dec => -self.params.pressure_step,
            GripperPwmCmd::None => 0.0,
        };

        let mut pressure = None;
        if delta != 0.0 {
            let new = adjust(self.pressure, delta);

            if new == self.pressure {
                self.report.pressure_limited = true;
            } else {
                self.pressure = new;
                pressure = Some(new);
                info!("Gripper pressure is {:.1}%", new * 100.0);
            }
        }

        let delay_s = self.params.open_close_delay_s;
        let action = match input_data.gripper {
            GripperCmd::Open => GripperAction::Open { delay_s },
            GripperCmd::Close => GripperAction::Close { delay_s },
            GripperCmd::None => GripperAction::None,
        };

        Ok((OutputData { pressure, action }, self.report))
    }
}

impl GripperCtrl {
    /// The current grip pressure.
    pub fn pressure(&self) -> f64 {
        self.pressure
    }
}

/// Step a pressure by `delta`, clamped into the allowed range.
pub fn adjust(current: f64, delta: f64) -> f64 {
    maths::step_clamped(current, delta, PRESSURE_LOWER, PRESSURE_UPPER)
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn gripper_ctrl() -> GripperCtrl {
        let mut gc = GripperCtrl::default();
        gc.init(Params::default()).unwrap();
        gc
    }

    fn pwm(gc: &mut GripperCtrl, pwm: GripperPwmCmd) -> OutputData {
        gc.proc(&InputData {
            pwm,
            ..Default::default()
        })
        .unwrap()
        .0
    }

    #[test]
    fn test_adjust() {
        assert_eq!(adjust(0.5, 0.125), 0.625);
        assert_eq!(adjust(0.95, 0.125), 1.0);
        assert_eq!(adjust(0.05, -0.125), 0.0);
    }

    #[test]
    fn test_pressure_saturates() {
        let mut gc = gripper_ctrl();
        assert_eq!(gc.pressure(), 0.5);

        // Four steps up reaches the top exactly
        for i in 1..=4 {
            let out = pwm(&mut gc, GripperPwmCmd::Inc);
            assert_eq!(out.pressure, Some(0.5 + 0.125 * i as f64));
        }
        assert_eq!(gc.pressure(), 1.0);

        // Further increments are no-ops and nothing is sent
        let (out, report) = gc
            .proc(&InputData {
                pwm: GripperPwmCmd::Inc,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(out.pressure, None);
        assert!(report.pressure_limited);

        for _ in 0..20 {
            pwm(&mut gc, GripperPwmCmd::Dec);
            assert!(gc.pressure() >= 0.0 && gc.pressure() <= 1.0);
        }
        assert_eq!(gc.pressure(), 0.0);
        assert_eq!(pwm(&mut gc, GripperPwmCmd::Dec).pressure, None);
    }

    #[test]
    fn test_open_close_independent_of_pressure() {
        let mut gc = gripper_ctrl();

        let (out, _) = gc
            .proc(&InputData {
                gripper: GripperCmd::Close,
                pwm: GripperPwmCmd::Dec,
            })
            .unwrap();
        assert_eq!(out.pressure, Some(0.375));
        assert_eq!(out.action, GripperAction::Close { delay_s: 0.0 });

        let (out, _) = gc
            .proc(&InputData {
                gripper: GripperCmd::Open,
                pwm: GripperPwmCmd::None,
            })
            .unwrap();
        assert_eq!(out.pressure, None);
        assert_eq!(out.action, GripperAction::Open { delay_s: 0.0 });
    }

    #[test]
    fn test_invalid_params() {
        let mut gc = GripperCtrl::default();

        assert!(matches!(
            gc.init(Params {
                pressure_step: 0.0,
                ..Default::default()
            }),
            Err(GripperCtrlError::InvalidPressureStep(_))
        ));
        assert!(matches!(
            gc.init(Params {
                initial_pressure: 1.5,
                ..Default::default()
            }),
            Err(GripperCtrlError::InvalidInitialPressure(_))
        ));
    }
}
