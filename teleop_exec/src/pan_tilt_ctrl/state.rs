//! Implementations for the PanTiltCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;

// Internal
use super::{PanTiltCtrlError, Params};
use comms_if::{
    eqpt::{pan_tilt::PanTiltDems, MotionProfile},
    tc::{PanCmd, TiltCmd},
};
use util::module::State;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Pan-tilt control module state
#[derive(Default)]
pub struct PanTiltCtrl {
    pub(crate) params: Params,
}

/// Input data to pan-tilt control.
#[derive(Debug, Default, Clone, Copy)]
pub struct InputData {
    pub pan: PanCmd,
    pub tilt: TiltCmd,

    /// Last commanded `(pan, tilt)` positions, only read from the camera when
    /// [`needs_current_pos`] is true.
    ///
    /// Units: radians
    pub current_pos_rad: (f64, f64),
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Demand for the pan-tilt camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputData {
    /// Nothing to send
    None,

    /// Send both axes home
    Home {
        pan_profile: MotionProfile,
        tilt_profile: MotionProfile,
    },

    /// Move to an absolute position
    Move(PanTiltDems),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for PanTiltCtrl {
    type InitData = Params;
    type InitError = PanTiltCtrlError;

    type InputData = InputData;
    type OutputData = OutputData;
    type StatusReport = ();
    type ProcError = PanTiltCtrlError;

    fn init(&mut self, init_data: Self::InitData) -> Result<(), Self::InitError> {
        if init_data.step_rad.is_nan() || init_data.step_rad <= 0.0 {
            return Err(PanTiltCtrlError::InvalidStep(init_data.step_rad));
        }

        self.params = init_data;

        Ok(())
    }

    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        let (pan, tilt) = (input_data.pan, input_data.tilt);

        if is_home(pan, tilt) {
            return Ok((
                OutputData::Home {
                    pan_profile: self.params.home_profile,
                    tilt_profile: self.params.home_profile,
                },
                (),
            ));
        }

        if !is_active(pan, tilt) {
            return Ok((OutputData::None, ()));
        }

        let (pan_rad, tilt_rad) = input_data.current_pos_rad;
        let dems = PanTiltDems {
            pan_rad: pan_rad + pan.sign() * self.params.step_rad,
            tilt_rad: tilt_rad + tilt.sign() * self.params.step_rad,
            pan_profile: self.params.move_profile,
            tilt_profile: self.params.move_profile,
            blocking: false,
        };

        trace!(
            "Pan-tilt demand: pan {:.4} rad, tilt {:.4} rad",
            dems.pan_rad,
            dems.tilt_rad
        );

        Ok((OutputData::Move(dems), ()))
    }
}

/// True if either axis is commanded.
pub fn is_active(pan: PanCmd, tilt: TiltCmd) -> bool {
    pan != PanCmd::None || tilt != TiltCmd::None
}

/// True if both axes are commanded home together.
pub fn is_home(pan: PanCmd, tilt: TiltCmd) -> bool {
    pan == PanCmd::Home && tilt == TiltCmd::Home
}

/// True if processing these commands needs the camera's current position.
pub fn needs_current_pos(pan: PanCmd, tilt: TiltCmd) -> bool {
    is_active(pan, tilt) && !is_home(pan, tilt)
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn pan_tilt_ctrl() -> PanTiltCtrl {
        let mut ptc = PanTiltCtrl::default();
        ptc.init(Params::default()).unwrap();
        ptc
    }

    fn proc(ptc: &mut PanTiltCtrl, pan: PanCmd, tilt: TiltCmd) -> OutputData {
        ptc.proc(&InputData {
            pan,
            tilt,
            current_pos_rad: (0.1, -0.2),
        })
        .unwrap()
        .0
    }

    #[test]
    fn test_home_overrides_steps() {
        let mut ptc = pan_tilt_ctrl();

        assert_eq!(
            proc(&mut ptc, PanCmd::Home, TiltCmd::Home),
            OutputData::Home {
                pan_profile: MotionProfile::new(1.0, 0.5),
                tilt_profile: MotionProfile::new(1.0, 0.5),
            }
        );
        assert!(!needs_current_pos(PanCmd::Home, TiltCmd::Home));
    }

    #[test]
    fn test_idle() {
        let mut ptc = pan_tilt_ctrl();
        assert_eq!(proc(&mut ptc, PanCmd::None, TiltCmd::None), OutputData::None);
        assert!(!needs_current_pos(PanCmd::None, TiltCmd::None));
    }

    #[test]
    fn test_step_directions() {
        let mut ptc = pan_tilt_ctrl();
        let step = Params::default().step_rad;

        match proc(&mut ptc, PanCmd::Ccw, TiltCmd::Up) {
            OutputData::Move(d) => {
                assert_eq!(d.pan_rad, 0.1 + step);
                assert_eq!(d.tilt_rad, -0.2 - step);
                assert_eq!(d.pan_profile, MotionProfile::new(0.2, 0.1));
                assert!(!d.blocking);
            }
            o => panic!("Expected a move, got {:?}", o),
        }

        match proc(&mut ptc, PanCmd::Cw, TiltCmd::Down) {
            OutputData::Move(d) => {
                assert_eq!(d.pan_rad, 0.1 - step);
                assert_eq!(d.tilt_rad, -0.2 + step);
            }
            o => panic!("Expected a move, got {:?}", o),
        }
    }

    #[test]
    fn test_lone_home_holds_axis() {
        let mut ptc = pan_tilt_ctrl();
        let step = Params::default().step_rad;

        assert!(needs_current_pos(PanCmd::Home, TiltCmd::None));

        match proc(&mut ptc, PanCmd::Home, TiltCmd::Down) {
            OutputData::Move(d) => {
                assert_eq!(d.pan_rad, 0.1);
                assert_eq!(d.tilt_rad, -0.2 + step);
            }
            o => panic!("Expected a move, got {:?}", o),
        }
    }
}
